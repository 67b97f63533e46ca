//! Capped per-mode leaderboards persisted as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mode::GameMode;
use crate::record::{compare, ScoreRecord};

/// Entries kept per mode unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 10;

/// Top-N table for one mode, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    mode: GameMode,
    capacity: usize,
    entries: Vec<ScoreRecord>,
}

impl Leaderboard {
    pub fn new(mode: GameMode, capacity: usize) -> Self {
        Self {
            mode,
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    pub fn top(&self, n: usize) -> &[ScoreRecord] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Insert `record` if it makes the table. Returns its 1-based rank.
    ///
    /// A record tying an existing entry ranks below it.
    pub fn submit(&mut self, record: ScoreRecord) -> Option<usize> {
        let pos = self
            .entries
            .iter()
            .position(|existing| compare(self.mode, &record, existing).is_lt())
            .unwrap_or(self.entries.len());
        if pos >= self.capacity {
            debug!(mode = %self.mode, "record did not make the table");
            return None;
        }
        self.entries.insert(pos, record);
        self.entries.truncate(self.capacity);
        debug!(mode = %self.mode, rank = pos + 1, "record submitted");
        Some(pos + 1)
    }

    /// Restore ordering and the cap after loading from disk.
    fn normalize(&mut self, capacity: usize) {
        let mode = self.mode;
        self.capacity = capacity;
        self.entries.sort_by(|a, b| compare(mode, a, b));
        self.entries.truncate(capacity);
    }
}

/// Leaderboards for every mode, sharing one capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighscoreBook {
    capacity: usize,
    boards: BTreeMap<GameMode, Leaderboard>,
}

impl HighscoreBook {
    pub fn new(capacity: usize) -> Self {
        let boards = GameMode::ALL
            .into_iter()
            .map(|mode| (mode, Leaderboard::new(mode, capacity)))
            .collect();
        Self { capacity, boards }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn board(&self, mode: GameMode) -> Option<&Leaderboard> {
        self.boards.get(&mode)
    }

    pub fn top(&self, mode: GameMode, n: usize) -> &[ScoreRecord] {
        match self.boards.get(&mode) {
            Some(board) => board.top(n),
            None => &[],
        }
    }

    pub fn submit(&mut self, mode: GameMode, record: ScoreRecord) -> Option<usize> {
        let capacity = self.capacity;
        self.boards
            .entry(mode)
            .or_insert_with(|| Leaderboard::new(mode, capacity))
            .submit(record)
    }

    /// Load a book from `path`; a missing file yields an empty book.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no highscore file, starting empty");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut book: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let capacity = book.capacity;
        for mode in GameMode::ALL {
            book.boards
                .entry(mode)
                .or_insert_with(|| Leaderboard::new(mode, capacity));
        }
        for (mode, board) in book.boards.iter_mut() {
            board.mode = *mode;
            board.normalize(capacity);
        }
        Ok(book)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "saved highscores");
        Ok(())
    }
}

impl Default for HighscoreBook {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
