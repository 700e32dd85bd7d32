//! Errors for the few fallible surfaces outside the frame loop
//!
//! The simulation itself never fails; these only come out of reading level
//! and settings files, and the public loaders swallow them into fallbacks.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("level {0} declares no spawns")]
    EmptyLevel(u32),
}
