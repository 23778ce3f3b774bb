use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::{info, warn};

/// How to invoke the external benchmark and where it leaves its result.
#[derive(Debug, Clone)]
pub struct BenchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub output: PathBuf,
}

impl BenchCommand {
    /// `<program> -remotes=<remotes> -output <output>`
    pub fn new(program: impl Into<PathBuf>, remotes: &str, output: impl Into<PathBuf>) -> Self {
        let output = output.into();
        Self {
            program: program.into(),
            args: vec![
                format!("-remotes={remotes}"),
                "-output".to_string(),
                output.display().to_string(),
            ],
            output,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BenchOutput {
    score: f64,
}

/// Reads the `score` field of a benchmark result file.
pub fn read_score(path: &Path) -> Result<f64> {
    let raw = std::fs::read(path)
        .with_context(|| format!("Failed to read benchmark result {}", path.display()))?;
    let output: BenchOutput = serde_json::from_slice(&raw)
        .with_context(|| format!("Malformed benchmark result {}", path.display()))?;
    Ok(output.score)
}

/// Runs the benchmark once, waits for it, and returns its score.
pub fn run_once(cmd: &BenchCommand) -> Result<f64> {
    let status = Command::new(&cmd.program)
        .args(&cmd.args)
        .status()
        .with_context(|| format!("Failed to start {}", cmd.program.display()))?;

    if !status.success() {
        warn!("{} exited with {}", cmd.program.display(), status);
    }

    read_score(&cmd.output)
}

/// Runs the benchmark `runs` times in sequence. The first failure aborts.
pub fn run_all(cmd: &BenchCommand, runs: usize) -> Result<Vec<f64>> {
    if runs == 0 {
        bail!("At least one run is required");
    }

    let mut scores = Vec::with_capacity(runs);
    for i in 1..=runs {
        info!("Benchmark run {} / {}", i, runs);
        // A stale file from an earlier run must not be mistaken for this one.
        match std::fs::remove_file(&cmd.output) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to clear {}", cmd.output.display()));
            }
        }
        scores.push(run_once(cmd).with_context(|| format!("Benchmark run {i} failed"))?);
    }
    Ok(scores)
}
