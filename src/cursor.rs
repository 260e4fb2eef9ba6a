//! # Cursor
//!
//! The Cursor owns the input buffer and the mutable scan state that every
//! parser threads through its calls: the current byte offset, the current
//! line, and a probe counter.
//!
//! There is no peek operation. All lookahead in the engine is expressed as a
//! trial match bracketed by [`Cursor::mark`] and [`Cursor::reset`], which is
//! the sole backtracking primitive the combinators build on.
//!
//! The probe counter records how many bytes have been physically consumed
//! over the whole parse, including consumption that was later rolled back.
//! It is diagnostic only: `reset` never rewinds it.

/// Mutable scan state over a fully materialized input buffer.
///
/// A cursor is exclusively owned by one parse in progress; the engine gives
/// no guarantees for concurrent parses sharing a cursor.
#[derive(Debug, Clone)]
pub struct Cursor {
    input: Vec<u8>,
    position: usize,
    line: usize,
    probe_count: usize,
}

/// Atomic snapshot of `(position, line)`, captured by [`Cursor::mark`] and
/// restored by [`Cursor::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    position: usize,
    line: usize,
}

impl Marker {
    /// The byte offset this marker restores to.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The line counter this marker restores to.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl Cursor {
    /// Creates a cursor at the start of `input`, on line 1.
    pub fn new(input: impl AsRef<[u8]>) -> Self {
        Self {
            input: input.as_ref().to_vec(),
            position: 0,
            line: 1,
            probe_count: 0,
        }
    }

    /// Consumes and returns the next byte, or `None` at end of input.
    ///
    /// End of input is not a fault: matchers and repetition combinators use
    /// the `None` case to detect exhaustion. On success the offset and probe
    /// counter advance, and the line counter increments when the consumed
    /// byte is a line feed.
    pub fn advance(&mut self) -> Option<u8> {
        let next = *self.input.get(self.position)?;
        self.position += 1;
        self.probe_count += 1;
        if next == b'\n' {
            self.line += 1;
        }
        Some(next)
    }

    /// Captures the current `(position, line)` pair.
    pub fn mark(&self) -> Marker {
        Marker {
            position: self.position,
            line: self.line,
        }
    }

    /// Restores a previously captured `(position, line)` pair.
    ///
    /// The probe counter is monotone and is deliberately not restored.
    pub fn reset(&mut self, marker: Marker) {
        self.position = marker.position;
        self.line = marker.line;
    }

    /// Current byte offset into the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Current line, starting at 1.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Total bytes physically consumed so far, backtracking included.
    pub fn probe_count(&self) -> usize {
        self.probe_count
    }

    /// Length of the input buffer.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Whether the input buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Whether the cursor has consumed the whole input.
    ///
    /// Trailing unconsumed input is not a failure signal from the engine;
    /// callers compare [`Cursor::position`] against [`Cursor::len`] (or use
    /// this helper) when a full-consumption parse is required.
    pub fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}
