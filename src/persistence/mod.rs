//! Save/load of round snapshots
//!
//! Features:
//! - Versioned little-endian binary layout (see `snapshot`)
//! - Legacy headerless layout still readable
//! - Write to a temp file, then rename over the target
//!
//! Callers decide whether a failure matters; the round state machine logs
//! and carries on.

pub mod snapshot;

pub use snapshot::{SNAPSHOT_MAGIC, SNAPSHOT_VERSION, Snapshot};

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Snapshot save/load failures
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot truncated at byte {offset}: needed {needed}, {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("negative {field} in snapshot: {value}")]
    Negative { field: &'static str, value: i32 },

    #[error("invalid flag byte {value:#04x} at byte {offset}")]
    InvalidFlag { offset: usize, value: u8 },

    #[error("{0} unexpected trailing bytes after snapshot")]
    TrailingBytes(usize),
}

/// Write a snapshot, replacing any previous file atomically
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), PersistenceError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, snapshot.to_bytes())?;
    fs::rename(&tmp, path)?;
    log::info!(
        "Saved snapshot to {} ({} enemies, {} players)",
        path.display(),
        snapshot.roster.enemies.len(),
        snapshot.roster.players.len()
    );
    Ok(())
}

/// Read and decode a snapshot file
pub fn load_snapshot(path: &Path) -> Result<Snapshot, PersistenceError> {
    let bytes = fs::read(path)?;
    let snapshot = Snapshot::from_bytes(&bytes)?;
    log::info!("Loaded snapshot from {}", path.display());
    Ok(snapshot)
}
