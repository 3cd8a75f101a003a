use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by configuration and setup code.
///
/// Expected gameplay conditions (a missing clip, a gesture that is already
/// running) are not errors; they come back as `false` from the relevant call.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown action name `{0}`")]
    UnknownAction(String),
    #[error("unknown key name `{0}`")]
    UnknownKey(String),
}

pub type Result<T> = std::result::Result<T, Error>;
