use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::stats::{StatsError, Summary};

/// Everything persisted after a benchmark session.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Per-run scores, written as `{"1": s1, "2": s2, ...}`.
    #[serde(serialize_with = "numbered")]
    pub results: Vec<f64>,
    #[serde(flatten)]
    pub summary: Summary,
}

fn numbered<S: Serializer>(scores: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(scores.len()))?;
    for (i, score) in scores.iter().enumerate() {
        map.serialize_entry(&(i + 1).to_string(), score)?;
    }
    map.end()
}

impl Report {
    pub fn new(scores: Vec<f64>) -> Result<Self, StatsError> {
        let summary = Summary::from_scores(&scores)?;
        Ok(Self {
            results: scores,
            summary,
        })
    }

    /// `MMDDHHMM.json_<mean>` with the mean truncated to an integer.
    pub fn file_name<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("{}.json_{}", at.format("%m%d%H%M"), self.summary.mean.trunc() as i64)
    }

    /// Writes the report as one JSON line into `dir` and returns its path.
    pub fn save<Tz: TimeZone>(&self, dir: &Path, at: &DateTime<Tz>) -> Result<PathBuf>
    where
        Tz::Offset: std::fmt::Display,
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(self.file_name(at));
        let mut body = serde_json::to_string(self)?;
        body.push('\n');
        std::fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Human readable lines for the terminal.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .results
            .iter()
            .enumerate()
            .map(|(i, score)| format!("run {}: score {}", i + 1, score))
            .collect();
        lines.push(format!("mean:   {}", self.summary.mean));
        lines.push(format!("median: {}", self.summary.median));
        lines.push(format!("min:    {}", self.summary.min));
        lines.push(format!("max:    {}", self.summary.max));
        lines
    }
}
