//! Caret and selection management for the markup buffer
//!
//! Positions are byte offsets into the buffer string. They are kept on
//! UTF-8 character boundaries by [`snap_to_boundary`].

use serde::{Deserialize, Serialize};

/// A range of the buffer from start (inclusive) to end (exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    /// Create a range; the endpoints are ordered automatically
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Empty range at a single position
    pub fn caret(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if a position lies within this range (exclusive end)
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }

    /// Check if `other` lies entirely within this range
    pub fn covers(&self, other: TextRange) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

/// Selection state (anchor + head)
///
/// A collapsed selection is a plain caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Where the selection started
    pub anchor: usize,
    /// Current caret position
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a caret with no selected text
    pub fn collapsed(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Selection covering a range, anchored at its start
    pub fn from_range(range: TextRange) -> Self {
        Self {
            anchor: range.start,
            head: range.end,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Get the range covered by this selection (ordered start to end)
    pub fn range(&self) -> TextRange {
        TextRange::new(self.anchor, self.head)
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Clamp both ends into `text`, snapping down to character boundaries
    pub fn clamp_to(&self, text: &str) -> Selection {
        Selection {
            anchor: snap_to_boundary(text, self.anchor),
            head: snap_to_boundary(text, self.head),
        }
    }
}

/// Clamp `offset` to the length of `text` and move it back to the nearest
/// character boundary
pub fn snap_to_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
