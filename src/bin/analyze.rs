use clap::Parser;
use evolarium_lib::history::{read_history, render_report};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarize an Evolarium history log", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "logs/history.jsonl")]
    input: PathBuf,

    #[arg(short, long, default_value = "report.md")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let summaries = read_history(&args.input)?;
    if summaries.is_empty() {
        println!("No summaries found in {}.", args.input.display());
        return Ok(());
    }

    std::fs::write(&args.output, render_report(&summaries))?;
    println!(
        "Report for {} generations written to {}",
        summaries.len(),
        args.output.display()
    );
    Ok(())
}
