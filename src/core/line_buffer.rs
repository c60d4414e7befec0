//! Growable byte buffer holding the line being edited.

/// Smallest capacity handed out once storage is requested.
pub const MIN_CAPACITY: usize = 255;

/// Bytes of the current line plus a reserved terminator slot.
///
/// Invariant: `len < capacity` whenever `capacity > 0`. Storage is kept zeroed
/// past `len`, so the slot after the last byte always reads as a terminator.
#[derive(Debug, Default)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops held storage and zeroes length and capacity.
    pub fn reset(&mut self) {
        self.bytes = Vec::new();
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Whether the next append would consume the terminator slot.
    pub fn is_nearly_full(&self) -> bool {
        self.len + 1 >= self.capacity()
    }

    /// Grows storage to `max(min, MIN_CAPACITY, len)` when `min` exceeds the
    /// current capacity. Never shrinks.
    pub fn ensure_capacity(&mut self, min: usize) {
        if self.capacity() >= min {
            return;
        }
        let target = min.max(MIN_CAPACITY).max(self.len);
        self.bytes.resize(target, 0);
    }

    /// Grows by half again, keeping room for the terminator.
    pub fn grow(&mut self) {
        let capacity = self.capacity();
        self.ensure_capacity((capacity + capacity / 2).max(self.len + 2));
    }

    /// Writes `byte` at the end. The read loop grows ahead of time; this only
    /// grows itself if a caller skipped that step.
    pub fn append_byte(&mut self, byte: u8) {
        if self.len + 1 >= self.capacity() {
            self.grow();
        }
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    /// Removes the last byte; returns whether anything was removed.
    pub fn delete_last(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len -= 1;
        self.bytes[self.len] = 0;
        true
    }

    /// Replaces the whole contents, e.g. with a history entry.
    pub fn set_from(&mut self, contents: &[u8]) {
        self.reset();
        self.ensure_capacity(contents.len() + 1);
        self.bytes[..contents.len()].copy_from_slice(contents);
        self.len = contents.len();
    }

    /// Copies the contents out as an owned string; invalid UTF-8 is replaced.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.as_bytes()).into_owned()
    }
}
