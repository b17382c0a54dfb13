//! Import settings layered from an optional config file and `WARCDB_*`
//! environment variables.

use std::path::Path;

use serde::Deserialize;

use crate::Result;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
  /// Accepted for compatibility; rows are committed one at a time.
  pub batch_size:       usize,
  pub skip_unsupported: bool,
}

impl Default for ImportConfig {
  fn default() -> Self {
    Self { batch_size: DEFAULT_BATCH_SIZE, skip_unsupported: false }
  }
}

impl ImportConfig {
  /// Load from `file` (when given) and then the environment; later sources
  /// override earlier ones.
  pub fn load(file: Option<&Path>) -> Result<Self> {
    let mut builder = config::Config::builder();
    if let Some(path) = file {
      builder = builder.add_source(config::File::from(path));
    }
    let settings = builder
      .add_source(config::Environment::with_prefix("WARCDB"))
      .build()?;
    Ok(settings.try_deserialize()?)
  }
}
