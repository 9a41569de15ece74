#![deny(warnings)]

//! Persistence layer: save and restore the full [`GameState`] snapshot.
//!
//! Saves ending in `.json` are pretty-printed JSON; anything else is written
//! as compact bincode. No schema versioning is attempted.

use std::fs;
use std::path::{Path, PathBuf};
use studio_core::{validate_state, GamePhase, GameState, GameTables, ValidationError};
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised while reading or writing a save.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),
    /// The snapshot decoded but breaks a domain invariant.
    #[error("invalid saved state: {0}")]
    Invalid(#[from] ValidationError),
}

/// On-disk encoding of a save.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveFormat {
    Json,
    Bincode,
}

impl SaveFormat {
    /// `.json` (any case) selects JSON, everything else bincode.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SaveFormat::Json,
            _ => SaveFormat::Bincode,
        }
    }
}

/// Returns the default location for the local save.
pub fn default_save_path() -> PathBuf {
    PathBuf::from("./saves/studio.json")
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PersistenceError + '_ {
    move |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `state` to `path`, creating parent directories as needed.
///
/// The bytes go to a sibling temp file first and are renamed into place, so
/// an interrupted save leaves the previous file intact.
pub fn save_game(state: &GameState, path: &Path) -> Result<(), PersistenceError> {
    let bytes = match SaveFormat::from_path(path) {
        SaveFormat::Json => serde_json::to_vec_pretty(state)?,
        SaveFormat::Bincode => bincode::serialize(state)?,
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err(dir))?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes).map_err(io_err(&tmp))?;
    fs::rename(&tmp, path).map_err(io_err(path))?;
    info!(path = %path.display(), week = state.current_week, bytes = bytes.len(), "game saved");
    Ok(())
}

/// Read and validate a save without applying the resume rule.
pub fn read_game(path: &Path, tables: &GameTables) -> Result<GameState, PersistenceError> {
    let bytes = fs::read(path).map_err(io_err(path))?;
    let state: GameState = match SaveFormat::from_path(path) {
        SaveFormat::Json => serde_json::from_slice(&bytes)?,
        SaveFormat::Bincode => bincode::deserialize(&bytes)?,
    };
    validate_state(&state, tables)?;
    Ok(state)
}

/// Restore the session's starting state.
///
/// A save past week 1 resumes on the main menu. A week-1 save, a missing
/// file or any decode failure yields a fresh initial state.
pub fn load_game(path: &Path, tables: &GameTables) -> GameState {
    match read_game(path, tables) {
        Ok(mut state) if state.current_week > 1 => {
            state.phase = GamePhase::MainMenu;
            info!(path = %path.display(), week = state.current_week, "save restored");
            state
        }
        Ok(_) => GameState::initial(tables),
        Err(PersistenceError::Io { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            info!(path = %path.display(), "no save found, starting fresh");
            GameState::initial(tables)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "save unreadable, starting fresh");
            GameState::initial(tables)
        }
    }
}
