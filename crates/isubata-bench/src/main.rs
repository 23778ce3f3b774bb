use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use isubata_bench::{BenchCommand, Report, runner};

#[derive(Parser, Debug)]
#[command(about = "Run the isubata benchmark repeatedly and summarise its scores")]
struct Args {
    /// Number of benchmark runs
    runs: usize,

    /// Benchmark executable
    #[arg(long, default_value = "bin/bench")]
    bench: PathBuf,

    /// Target host passed as -remotes
    #[arg(long, default_value = "127.0.0.1")]
    remotes: String,

    /// JSON file the benchmark writes its result to
    #[arg(long, default_value = "result.json")]
    output: PathBuf,

    /// Directory for the aggregated report
    #[arg(long, default_value = "result")]
    result_dir: PathBuf,

    /// Print the summary without writing a report file
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "isubata_bench=info".into()),
        )
        .init();

    let args = Args::parse();
    let cmd = BenchCommand::new(args.bench.clone(), &args.remotes, &args.output);

    let scores = runner::run_all(&cmd, args.runs)?;
    let report = Report::new(scores)?;

    for line in report.lines() {
        println!("{line}");
    }

    if !args.no_save {
        let path = report.save(&args.result_dir, &chrono::Local::now())?;
        info!("Report written to {}", path.display());
    }

    Ok(())
}
