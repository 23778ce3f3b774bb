//! Writes every stored avatar image to a directory, one file per image name.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use isubata_db::Database;

#[derive(Parser, Debug)]
#[command(about = "Export stored avatar images to disk")]
struct Args {
    /// SQLite database to read from
    #[arg(long, env = "ISUBATA_DB_PATH", default_value = "isubata.db")]
    db: PathBuf,

    /// Directory the images are written to
    #[arg(long, default_value = "./images")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "isubata_dump_icons=info,isubata_db=info".into()),
        )
        .init();

    let args = Args::parse();
    let db = Database::open(&args.db)?;
    let written = dump(&db, &args.out)?;
    info!("Wrote {} images to {}", written, args.out.display());
    Ok(())
}

fn dump(db: &Database, out: &Path) -> Result<usize> {
    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create {}", out.display()))?;

    let mut written = 0;
    for image in db.list_images()? {
        // Names are content hashes plus extension; anything else is not ours to write.
        if image.name.contains(['/', '\\']) || image.name.starts_with('.') {
            warn!("Skipping image {} with unsafe name {:?}", image.id, image.name);
            continue;
        }
        let path = out.join(&image.name);
        std::fs::write(&path, &image.data)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written += 1;
    }

    Ok(written)
}
