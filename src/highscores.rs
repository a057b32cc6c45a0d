//! High score log
//!
//! Plain text, one finished-round score per line. Scores are only ever
//! appended; the best score is the max over the whole file.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Append-only score log on disk
#[derive(Debug, Clone)]
pub struct HighScoreLog {
    path: PathBuf,
}

impl HighScoreLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All recorded scores in file order.
    ///
    /// A missing file is an empty log; unparsable lines are skipped.
    pub fn entries(&self) -> io::Result<Vec<u32>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut scores = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<u32>() {
                Ok(score) => scores.push(score),
                Err(_) => log::warn!(
                    "{}:{}: ignoring bad score entry {:?}",
                    self.path.display(),
                    line_no + 1,
                    line
                ),
            }
        }
        Ok(scores)
    }

    /// Best score on record (0 when the log is empty)
    pub fn best(&self) -> io::Result<u32> {
        Ok(self.entries()?.into_iter().max().unwrap_or(0))
    }

    /// Best score, treating an unreadable log as empty
    pub fn load_best(&self) -> u32 {
        match self.best() {
            Ok(best) => {
                log::info!("High score {} from {}", best, self.path.display());
                best
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", self.path.display(), e);
                0
            }
        }
    }

    /// Record a finished round
    pub fn append(&self, score: u32) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", score)
    }
}
