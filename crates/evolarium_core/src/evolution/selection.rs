use crate::config::SelectionMethod;
use rand::Rng;

/// A population index paired with its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub index: usize,
    pub score: f64,
}

/// Ranks scores in descending order. Ties keep population order and
/// non-finite scores rank as zero.
#[must_use]
pub fn rank(scores: &[f64]) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = scores
        .iter()
        .enumerate()
        .map(|(index, &score)| Ranked {
            index,
            score: if score.is_finite() { score } else { 0.0 },
        })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Best of `size` uniform draws (with replacement). Returns a position in
/// `ranked`, so ties go to the better rank.
fn tournament<R: Rng>(ranked: &[Ranked], size: usize, rng: &mut R) -> usize {
    (0..size.max(1))
        .map(|_| rng.gen_range(0..ranked.len()))
        .min()
        .unwrap_or(0)
}

/// Size of the meeting pool drawn from the top of the ranking.
#[must_use]
pub fn meeting_pool_size(population: usize, fraction: f64) -> usize {
    ((population as f64 * fraction).ceil() as usize).clamp(1, population.max(1))
}

/// Picks one parent and returns its population index. Never mutates the
/// ranking. `None` only for an empty ranking.
pub fn select_parent<R: Rng>(
    ranked: &[Ranked],
    method: &SelectionMethod,
    rng: &mut R,
) -> Option<usize> {
    if ranked.is_empty() {
        return None;
    }
    let position = match *method {
        SelectionMethod::ElitismTournament {
            tournament_size, ..
        }
        | SelectionMethod::Tournament { tournament_size } => {
            tournament(ranked, tournament_size, rng)
        }
        SelectionMethod::MeetingPool { fraction } => {
            rng.gen_range(0..meeting_pool_size(ranked.len(), fraction))
        }
    };
    ranked.get(position).map(|r| r.index)
}
