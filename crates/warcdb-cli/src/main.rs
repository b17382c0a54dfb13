//! `warcdb` binary.
//!
//! ```text
//! warcdb import archive.db crawl-1.warc.gz crawl-2.warc
//! warcdb tables archive.db
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use warcdb_cli::{
  config::ImportConfig,
  import::{self, ImportOptions, UnsupportedPolicy},
};
use warcdb_core::{WarcDb, route};
use warcdb_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Load WARC archives into a SQLite database")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Import one or more WARC files.
  Import {
    /// SQLite file to write to; created if absent.
    #[arg(value_parser = not_a_directory)]
    db_path:          PathBuf,
    /// Archives to read, in order. Gzipped archives are accepted.
    #[arg(required = true, value_parser = existing_file)]
    warc_paths:       Vec<PathBuf>,
    /// Batch size for chunked inserts (currently ignored).
    #[arg(long, env = "WARCDB_BATCH_SIZE")]
    batch_size:       Option<usize>,
    /// Skip records of unsupported types instead of aborting.
    #[arg(long)]
    skip_unsupported: bool,
    /// Optional TOML file with import settings.
    #[arg(short, long)]
    config:           Option<PathBuf>,
  },
  /// List record tables and their row counts.
  Tables {
    #[arg(value_parser = existing_file)]
    db_path: PathBuf,
  },
}

fn existing_file(s: &str) -> Result<PathBuf, String> {
  let path = PathBuf::from(s);
  if path.is_file() {
    Ok(path)
  } else {
    Err(format!("{s} is not an existing file"))
  }
}

fn not_a_directory(s: &str) -> Result<PathBuf, String> {
  let path = PathBuf::from(s);
  if path.is_dir() {
    Err(format!("{s} is a directory"))
  } else {
    Ok(path)
  }
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  match Cli::parse().command {
    Command::Import {
      db_path,
      warc_paths,
      batch_size,
      skip_unsupported,
      config,
    } => {
      let cfg = ImportConfig::load(config.as_deref())
        .context("failed to load import configuration")?;
      let mut options = ImportOptions::from(cfg);
      if let Some(n) = batch_size {
        options.batch_size = n;
      }
      if skip_unsupported {
        options.unsupported = UnsupportedPolicy::Skip;
      }

      let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open database at {db_path:?}"))?;
      let mut db = WarcDb::new(store);
      import::ingest(&mut db, &warc_paths, &options).context("import failed")?;
    }
    Command::Tables { db_path } => {
      let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open database at {db_path:?}"))?;
      for name in route::tables() {
        let table = store.table(name);
        if table.exists()? {
          println!("{name}\t{}", table.count()?);
        }
      }
    }
  }

  Ok(())
}
