//! Crate-wide error type.
//!
//! Only persistence and configuration can fail.  Gameplay misuse (shooting
//! while dead, teleporting without a charge, poking the phase machine
//! mid-transition) is not an error: it comes back as a rejected
//! [`crate::compute::CommandOutcome`] or is ignored.

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum GameError {
    /// Reading or writing a file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A save or high-score file exists but is not valid JSON for its schema.
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A snapshot decoded fine but describes an impossible game.
    InvalidSnapshot(String),
    /// The configuration file could not be parsed or holds unusable values.
    Config(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io { path, source } => {
                write!(f, "i/o error on {}: {source}", path.display())
            }
            GameError::Corrupt { path, source } => {
                write!(f, "corrupt data in {}: {source}", path.display())
            }
            GameError::InvalidSnapshot(reason) => write!(f, "invalid snapshot: {reason}"),
            GameError::Config(reason) => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io { source, .. } => Some(source),
            GameError::Corrupt { source, .. } => Some(source),
            GameError::InvalidSnapshot(_) | GameError::Config(_) => None,
        }
    }
}

pub type GameResult<T> = Result<T, GameError>;
