use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a layout configuration or an inventory.
///
/// Placers themselves never fail; this only covers parsing input documents.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
