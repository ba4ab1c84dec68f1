use std::path::PathBuf;

use thiserror::Error;

/// Fatal document failures. Everything recoverable is defaulted with a warning instead.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
