//! Game settings
//!
//! Persisted as JSON next to the save files. Physics constants live in
//! `crate::consts`; these are the knobs that vary between runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{CHARGE_DT, SIM_DT};

/// Run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for enemy placement
    pub seed: u64,

    // === Pacing ===
    /// Integration timestep per frame
    pub step_dt: f32,
    /// Charge seconds added per frame while charging
    pub charge_dt: f32,

    // === Files ===
    /// Snapshot written when a round finishes, reopened by Replay
    pub final_save_path: PathBuf,
    /// Manual save slot
    pub save_path: PathBuf,
    /// Append-only high score log
    pub highscore_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,

            step_dt: SIM_DT,
            charge_dt: CHARGE_DT,

            final_save_path: PathBuf::from("final_save.bin"),
            save_path: PathBuf::from("savegame.bin"),
            highscore_path: PathBuf::from("highscores.txt"),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Bad settings file {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Rebase all file paths under `dir`
    pub fn in_dir(mut self, dir: &Path) -> Self {
        self.final_save_path = dir.join(&self.final_save_path);
        self.save_path = dir.join(&self.save_path);
        self.highscore_path = dir.join(&self.highscore_path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(Settings::load(&dir.path().join("settings.json")), Settings::default());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            seed: 1234,
            step_dt: 0.05,
            ..Settings::default()
        }
        .in_dir(dir.path());

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "seed": 9 }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.step_dt, SIM_DT);
        assert_eq!(settings.save_path, PathBuf::from("savegame.bin"));
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ seed: ").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }
}
