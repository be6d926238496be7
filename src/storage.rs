//! JSON files for the save game and the high-score ledger.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a
//! crash mid-write never leaves a truncated file behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{GameError, GameResult};
use crate::highscores::Ledger;
use crate::snapshot::Snapshot;

pub const SAVE_FILE: &str = "savegame.json";
pub const LEDGER_FILE: &str = "highscores.json";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> GameError + '_ {
    move |source| GameError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> GameResult<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| GameError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_error(dir))?;
    }
    let tmp = temp_path(path);
    fs::write(&tmp, json).map_err(io_error(&tmp))?;
    fs::rename(&tmp, path).map_err(io_error(path))?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> GameResult<T> {
    let contents = fs::read_to_string(path).map_err(io_error(path))?;
    serde_json::from_str(&contents).map_err(|source| {
        tracing::warn!("rejecting {}: {source}", path.display());
        GameError::Corrupt {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> GameResult<()> {
    write_json(path, snapshot)?;
    tracing::info!("saved game to {}", path.display());
    Ok(())
}

/// A missing or malformed save file is an error.
pub fn load_snapshot(path: &Path) -> GameResult<Snapshot> {
    let snapshot = read_json(path)?;
    tracing::info!("loaded game from {}", path.display());
    Ok(snapshot)
}

pub fn save_ledger(path: &Path, ledger: &Ledger) -> GameResult<()> {
    write_json(path, ledger)?;
    tracing::info!("saved {} high scores to {}", ledger.len(), path.display());
    Ok(())
}

/// A missing ledger file is an empty ledger; a malformed one is an error.
pub fn load_ledger(path: &Path) -> GameResult<Ledger> {
    if !path.exists() {
        return Ok(Ledger::new());
    }
    read_json(path)
}
