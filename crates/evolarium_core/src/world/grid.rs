use evolarium_data::{Obstacle, Rect};

#[derive(Clone, Debug, Default)]
/// Uniform grid over obstacle footprints.
///
/// Uses the offset-array layout (as in compressed sparse rows): the
/// indices of every obstacle touching cell `i` live in
/// `obstacle_indices[cell_offsets[i]..cell_offsets[i + 1]]`. An obstacle
/// spanning several cells is listed once per cell, so range queries
/// deduplicate their output.
///
/// # Examples
/// ```
/// use evolarium_core::world::grid::ObstacleGrid;
/// use evolarium_data::{Obstacle, ObstacleKind, Provenance, Rect};
///
/// let obstacles = vec![Obstacle::new(
///     0,
///     ObstacleKind::Wall,
///     Rect::new(10.0, 10.0, 20.0, 20.0),
///     Provenance::Manual,
/// )];
/// let mut grid = ObstacleGrid::new(40.0, 200.0, 200.0);
/// grid.build(&obstacles);
///
/// let mut hits = Vec::new();
/// grid.query_into(&Rect::new(0.0, 0.0, 30.0, 30.0), &mut hits);
/// assert_eq!(hits, vec![0]);
/// ```
pub struct ObstacleGrid {
    pub cell_size: f64,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub obstacle_indices: Vec<usize>,
}

impl ObstacleGrid {
    pub fn new(cell_size: f64, width: f64, height: f64) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { 1.0 };
        let cols = ((width / cell_size).ceil() as usize).max(1);
        let rows = ((height / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            cols,
            rows,
            cell_offsets: vec![0; cols * rows + 1],
            obstacle_indices: Vec::new(),
        }
    }

    /// Clamped cell span `(col_min, col_max, row_min, row_max)` of `area`.
    #[inline]
    fn span(&self, area: &Rect) -> Option<(usize, usize, usize, usize)> {
        if !(area.x.is_finite() && area.y.is_finite() && area.width.is_finite() && area.height.is_finite())
        {
            return None;
        }
        let to_col = |x: f64| ((x / self.cell_size).floor().max(0.0) as usize).min(self.cols - 1);
        let to_row = |y: f64| ((y / self.cell_size).floor().max(0.0) as usize).min(self.rows - 1);
        if area.max_x() < 0.0 || area.max_y() < 0.0 {
            return None;
        }
        Some((
            to_col(area.x),
            to_col(area.max_x()),
            to_row(area.y),
            to_row(area.max_y()),
        ))
    }

    /// Rebuilds the index from scratch with a counting pass followed by a
    /// fill pass.
    pub fn build(&mut self, obstacles: &[Obstacle]) {
        let cells = self.cols * self.rows;
        let mut counts = vec![0usize; cells];
        for obstacle in obstacles {
            if let Some((c0, c1, r0, r1)) = self.span(&obstacle.rect) {
                for row in r0..=r1 {
                    for col in c0..=c1 {
                        counts[row * self.cols + col] += 1;
                    }
                }
            }
        }

        self.cell_offsets.clear();
        self.cell_offsets.reserve(cells + 1);
        let mut total = 0;
        self.cell_offsets.push(0);
        for count in &counts {
            total += count;
            self.cell_offsets.push(total);
        }

        self.obstacle_indices.clear();
        self.obstacle_indices.resize(total, 0);
        let mut cursor: Vec<usize> = self.cell_offsets[..cells].to_vec();
        for (idx, obstacle) in obstacles.iter().enumerate() {
            if let Some((c0, c1, r0, r1)) = self.span(&obstacle.rect) {
                for row in r0..=r1 {
                    for col in c0..=c1 {
                        let cell = row * self.cols + col;
                        self.obstacle_indices[cursor[cell]] = idx;
                        cursor[cell] += 1;
                    }
                }
            }
        }
    }

    /// Collects the indices of obstacles whose cells overlap `area`, sorted
    /// and without duplicates.
    pub fn query_into(&self, area: &Rect, out: &mut Vec<usize>) {
        out.clear();
        let Some((c0, c1, r0, r1)) = self.span(area) else {
            return;
        };
        for row in r0..=r1 {
            for col in c0..=c1 {
                let cell = row * self.cols + col;
                out.extend_from_slice(
                    &self.obstacle_indices[self.cell_offsets[cell]..self.cell_offsets[cell + 1]],
                );
            }
        }
        out.sort_unstable();
        out.dedup();
    }

    /// True if `pred` holds for any obstacle whose cells overlap `area`.
    /// Stops at the first match and allocates nothing; an obstacle spanning
    /// several cells may be tested more than once.
    pub fn any_in<F>(&self, area: &Rect, mut pred: F) -> bool
    where
        F: FnMut(usize) -> bool,
    {
        let Some((c0, c1, r0, r1)) = self.span(area) else {
            return false;
        };
        for row in r0..=r1 {
            for col in c0..=c1 {
                let cell = row * self.cols + col;
                let bucket =
                    &self.obstacle_indices[self.cell_offsets[cell]..self.cell_offsets[cell + 1]];
                if bucket.iter().any(|&idx| pred(idx)) {
                    return true;
                }
            }
        }
        false
    }

    /// Calls `visit` for every obstacle index in cells overlapping `area`,
    /// duplicates included.
    pub fn for_each_in<F>(&self, area: &Rect, mut visit: F)
    where
        F: FnMut(usize),
    {
        self.any_in(area, |idx| {
            visit(idx);
            false
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evolarium_data::{ObstacleKind, Provenance};

    fn wall(id: u32, rect: Rect) -> Obstacle {
        Obstacle::new(id, ObstacleKind::Wall, rect, Provenance::Generated)
    }

    #[test]
    fn test_spanning_obstacle_is_deduplicated() {
        let obstacles = vec![wall(0, Rect::new(30.0, 30.0, 60.0, 60.0))];
        let mut grid = ObstacleGrid::new(20.0, 200.0, 200.0);
        grid.build(&obstacles);
        let mut out = Vec::new();
        grid.query_into(&Rect::new(0.0, 0.0, 200.0, 200.0), &mut out);
        assert_eq!(out, vec![0]);
    }

    #[test]
    fn test_query_is_local() {
        let obstacles = vec![
            wall(0, Rect::new(5.0, 5.0, 10.0, 10.0)),
            wall(1, Rect::new(150.0, 150.0, 10.0, 10.0)),
        ];
        let mut grid = ObstacleGrid::new(20.0, 200.0, 200.0);
        grid.build(&obstacles);
        let mut out = Vec::new();
        grid.query_into(&Rect::new(140.0, 140.0, 30.0, 30.0), &mut out);
        assert_eq!(out, vec![1]);
    }

    #[test]
    fn test_out_of_bounds_queries_clamp() {
        let obstacles = vec![wall(0, Rect::new(190.0, 190.0, 10.0, 10.0))];
        let mut grid = ObstacleGrid::new(20.0, 200.0, 200.0);
        grid.build(&obstacles);
        let mut out = Vec::new();
        grid.query_into(&Rect::new(195.0, 195.0, 50.0, 50.0), &mut out);
        assert_eq!(out, vec![0]);
        grid.query_into(&Rect::new(-50.0, -50.0, 10.0, 10.0), &mut out);
        assert!(out.is_empty());
        grid.query_into(&Rect::new(f64::NAN, 0.0, 10.0, 10.0), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_any_in_matches_query_into() {
        let obstacles = vec![
            wall(0, Rect::new(30.0, 30.0, 60.0, 60.0)),
            wall(1, Rect::new(150.0, 150.0, 10.0, 10.0)),
        ];
        let mut grid = ObstacleGrid::new(20.0, 200.0, 200.0);
        grid.build(&obstacles);
        let area = Rect::new(140.0, 140.0, 30.0, 30.0);
        assert!(grid.any_in(&area, |i| i == 1));
        assert!(!grid.any_in(&area, |i| i == 0));
        assert!(grid.any_in(&Rect::new(0.0, 0.0, 200.0, 200.0), |i| i == 0));
        assert!(!grid.any_in(&Rect::new(f64::NAN, 0.0, 10.0, 10.0), |_| true));
    }
}
