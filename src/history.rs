//! JSON-lines log of generation summaries and the markdown report built
//! from it.

use anyhow::{Context, Result};
use evolarium_data::GenerationSummary;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub struct HistoryLog {
    file: BufWriter<File>,
}

impl HistoryLog {
    /// Opens `path` for appending, creating parent directories as needed.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open history {}", path.display()))?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }

    pub fn append(&mut self, summary: &GenerationSummary) -> Result<()> {
        let json = serde_json::to_string(summary)?;
        writeln!(self.file, "{json}")?;
        self.file.flush()?;
        Ok(())
    }
}

/// Reads every parseable summary from a JSON-lines file. Malformed lines
/// are skipped.
pub fn read_history(path: &Path) -> Result<Vec<GenerationSummary>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open history {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut summaries = Vec::new();
    for line in reader.lines().map_while(std::result::Result::ok) {
        match serde_json::from_str::<GenerationSummary>(&line) {
            Ok(summary) => summaries.push(summary),
            Err(e) => tracing::debug!(error = %e, "Skipping malformed history line"),
        }
    }
    Ok(summaries)
}

/// Markdown overview of a run.
#[must_use]
pub fn render_report(summaries: &[GenerationSummary]) -> String {
    let Some(last) = summaries.last() else {
        return "# Evolarium Run Report\n\nNo generations recorded.\n".to_string();
    };
    let best = summaries
        .iter()
        .max_by(|a, b| a.max_fitness.total_cmp(&b.max_fitness))
        .unwrap_or(last);
    let restarts = summaries.iter().filter(|s| s.random_restart).count();
    let immigrants: usize = summaries.iter().map(|s| s.immigrants).sum();
    let destroyed: u32 = summaries.iter().map(|s| s.structures_destroyed).sum();

    let mut report = format!(
        "# Evolarium Run Report\n\n\
        ## Summary\n\
        - **Generations**: {}\n\
        - **Best Fitness**: {:.2} (generation {})\n\
        - **Final Average Fitness**: {:.2}\n\
        - **Random Restarts**: {}\n\
        - **Immigrants**: {}\n\
        - **Structures Destroyed**: {}\n\
        - **Doors Opened**: {}\n\
        - **Chest Opened**: {}\n\n\
        ## Generations\n\n\
        | Gen | Ticks | Avg | Max | Alive | Diversity | Mutation |\n\
        |----:|------:|----:|----:|------:|----------:|---------:|\n",
        summaries.len(),
        best.max_fitness,
        best.generation,
        last.avg_fitness,
        restarts,
        immigrants,
        destroyed,
        last.puzzle.doors_opened,
        if last.puzzle.chest_opened { "yes" } else { "no" },
    );
    for s in summaries {
        report.push_str(&format!(
            "| {} | {} | {:.2} | {:.2} | {} | {:.4} | {:.2} |\n",
            s.generation, s.ticks, s.avg_fitness, s.max_fitness, s.alive, s.diversity, s.mutation_rate
        ));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        assert!(render_report(&[]).contains("No generations recorded"));
    }

    #[test]
    fn test_report_names_best_generation() {
        let summaries = vec![
            GenerationSummary {
                generation: 1,
                max_fitness: 12.0,
                ..GenerationSummary::default()
            },
            GenerationSummary {
                generation: 2,
                max_fitness: 30.5,
                random_restart: true,
                ..GenerationSummary::default()
            },
        ];
        let report = render_report(&summaries);
        assert!(report.contains("**Best Fitness**: 30.50 (generation 2)"));
        assert!(report.contains("**Random Restarts**: 1"));
        assert!(report.contains("| 1 | 0 | 0.00 | 12.00 |"));
        assert!(report.contains("| 2 | 0 | 0.00 | 30.50 |"));
    }
}
