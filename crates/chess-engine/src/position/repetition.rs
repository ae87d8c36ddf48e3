//! Position keys since the last irreversible move.

/// One reached position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    key: u64,
    /// Reached by a move played in the game rather than made in search.
    played: bool,
}

/// A stack of position keys that forgets everything before the most recent
/// pawn move or capture, and remembers it again when that move is undone.
#[derive(Debug, Clone, Default)]
pub struct RepetitionHistory {
    entries: Vec<Entry>,
    /// Start index of each window opened by an irreversible move.
    resets: Vec<usize>,
}

impl RepetitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the key reached by a move.
    pub fn push(&mut self, key: u64, irreversible: bool, played: bool) {
        if irreversible {
            self.resets.push(self.entries.len());
        }
        self.entries.push(Entry { key, played });
    }

    /// Drops the latest key. Returns whether it came from a played move.
    pub fn pop(&mut self) -> Option<bool> {
        let entry = self.entries.pop()?;
        if self.resets.last() == Some(&self.entries.len()) {
            self.resets.pop();
        }
        Some(entry.played)
    }

    fn window(&self) -> &[Entry] {
        let start = self.resets.last().copied().unwrap_or(0);
        &self.entries[start..]
    }

    /// The most recently recorded key.
    pub fn last_key(&self) -> Option<u64> {
        self.entries.last().map(|e| e.key)
    }

    /// The most recent key and whether a played move reached it.
    pub fn last(&self) -> Option<(u64, bool)> {
        self.entries.last().map(|e| (e.key, e.played))
    }

    /// Occurrences of `key` since the last irreversible move.
    pub fn occurrences(&self, key: u64) -> usize {
        self.window().iter().filter(|e| e.key == key).count()
    }

    /// Occurrences of `key` reached by played moves since the last
    /// irreversible move.
    pub fn played_occurrences(&self, key: u64) -> usize {
        self.window()
            .iter()
            .filter(|e| e.played && e.key == key)
            .count()
    }

    /// Played keys since the last irreversible move, oldest first.
    pub fn played_keys(&self) -> Vec<u64> {
        self.window()
            .iter()
            .filter(|e| e.played)
            .map(|e| e.key)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
