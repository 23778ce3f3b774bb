use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Placeholder session secrets that should never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &["dev-secret-change-me"];

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub session_secret: String,
    pub public_dir: PathBuf,
    pub fetch_delay: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        let session_secret: String = try_load("ISUBATA_SESSION_SECRET", "dev-secret-change-me")?;
        if PLACEHOLDER_SECRETS.contains(&session_secret.as_str()) {
            warn!("ISUBATA_SESSION_SECRET is a placeholder; sessions can be forged");
        }

        Ok(Self {
            host: try_load("ISUBATA_HOST", "0.0.0.0")?,
            port: try_load("ISUBATA_PORT", "5000")?,
            db_path: try_load("ISUBATA_DB_PATH", "isubata.db")?,
            session_secret,
            public_dir: try_load("ISUBATA_PUBLIC_DIR", "../public")?,
            fetch_delay: Duration::from_millis(try_load("ISUBATA_FETCH_DELAY_MS", "1000")?),
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw)
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: Display,
{
    raw.parse()
        .map_err(|e: T::Err| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw:?}"))
}
