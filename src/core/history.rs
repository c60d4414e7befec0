//! Fixed-capacity ring of submitted lines with a browsing cursor.
//!
//! Storage position (`count % capacity`) and navigation position are kept
//! apart: `selection` indexes the retained entries from oldest (`0`) to
//! newest (`len() - 1`) and is `None` while the user is editing live input.

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Outcome of a navigation step, telling the editor what to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation<'a> {
    /// A history entry is now selected.
    Entry(&'a [u8]),
    /// Browsing ended; the line returns to empty live input.
    Live,
    /// Nothing to do (no history, or not browsing).
    Unchanged,
}

#[derive(Debug)]
pub struct History {
    slots: Vec<Option<Vec<u8>>>,
    count: usize,
    selection: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    /// Creates an empty ring; a zero capacity is raised to one slot.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            count: 0,
            selection: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of entries currently retained.
    pub fn len(&self) -> usize {
        self.count.min(self.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Entries ever saved, including ones since overwritten.
    pub fn total_saved(&self) -> usize {
        self.count
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Returns to live editing without touching stored entries.
    pub fn reset_selection(&mut self) {
        self.selection = None;
    }

    /// Retained entry by age, `0` being the oldest.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let len = self.len();
        if index >= len {
            return None;
        }
        let slot = (self.count - len + index) % self.capacity();
        self.slots[slot].as_deref()
    }

    /// Retained entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }

    /// Stores `line` unless it is empty or whitespace only. Returns whether it
    /// was stored.
    pub fn save(&mut self, line: &[u8]) -> bool {
        if is_blank(line) {
            return false;
        }
        let slot = self.count % self.capacity();
        if self.slots[slot].is_some() {
            tracing::trace!(slot, "history slot overwritten");
        }
        self.slots[slot] = Some(line.to_vec());
        self.count += 1;
        tracing::debug!(count = self.count, bytes = line.len(), "history entry saved");
        true
    }

    /// Moves one entry into the past, starting from the newest; the oldest
    /// retained entry is the floor.
    pub fn navigate_up(&mut self) -> Navigation<'_> {
        let len = self.len();
        if len == 0 {
            return Navigation::Unchanged;
        }
        let next = match self.selection {
            None => len - 1,
            Some(current) => current.saturating_sub(1).min(len - 1),
        };
        self.select(next)
    }

    /// Moves one entry toward the present; past the newest entry browsing ends.
    pub fn navigate_down(&mut self) -> Navigation<'_> {
        let Some(current) = self.selection else {
            return Navigation::Unchanged;
        };
        let next = current + 1;
        if next >= self.len() {
            self.selection = None;
            return Navigation::Live;
        }
        self.select(next)
    }

    fn select(&mut self, index: usize) -> Navigation<'_> {
        self.selection = Some(index);
        match self.get(index) {
            Some(entry) => Navigation::Entry(entry),
            None => Navigation::Unchanged,
        }
    }
}

/// Empty, or nothing but whitespace.
pub fn is_blank(line: &[u8]) -> bool {
    String::from_utf8_lossy(line).trim().is_empty()
}
