use evolarium_lib::app::{self, RunOptions};
use evolarium_lib::history::{read_history, render_report};
use std::path::PathBuf;

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("evolarium-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const SMALL_RUN: &str = r#"
[world]
seed = 21

[evolution]
population_size = 6
max_generations = 5

[time]
adaptive = false
max_ticks = 30
"#;

#[test]
fn test_run_from_toml_writes_history() {
    let dir = scratch_dir();
    let config = dir.join("evolarium.toml");
    std::fs::write(&config, SMALL_RUN).unwrap();
    let history = dir.join("logs/history.jsonl");

    let options = RunOptions {
        config: Some(config),
        generations: Some(2),
        history: Some(history.clone()),
        ..RunOptions::default()
    };
    let summaries = app::run(&options).unwrap();
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.ticks <= 30 && s.population == 6));

    let logged = read_history(&history).unwrap();
    assert_eq!(logged.len(), summaries.len());
    for (read, ran) in logged.iter().zip(&summaries) {
        assert_eq!(read.generation, ran.generation);
        assert_eq!(read.ticks, ran.ticks);
        assert_eq!(read.puzzle, ran.puzzle);
    }
    assert!(render_report(&logged).contains("**Generations**: 2"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_invalid_toml_is_rejected_with_context() {
    let dir = scratch_dir();
    let config = dir.join("bad.toml");
    std::fs::write(&config, "[evolution]\npopulation_size = 0\n").unwrap();

    let options = RunOptions {
        config: Some(config),
        ..RunOptions::default()
    };
    let err = app::run(&options).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Invalid config"), "{message}");
    assert!(message.contains("Population size must be positive"), "{message}");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_history_skips_malformed_lines() {
    let dir = scratch_dir();
    let path = dir.join("history.jsonl");
    std::fs::write(&path, "not json\n{\"generation\": 1}\n").unwrap();
    let summaries = read_history(&path).unwrap();
    assert!(summaries.is_empty());
    std::fs::remove_dir_all(&dir).ok();
}
