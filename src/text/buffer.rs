//! Editable markup buffer
//!
//! A single owned string of HTML-like markup. Edits are expressed as
//! [`Splice`]s so callers can map caret positions across a change.

use super::cursor::{snap_to_boundary, TextRange};
use serde::{Deserialize, Serialize};

/// Replace `range` with `text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Splice {
    pub range: TextRange,
    pub text: String,
}

impl Splice {
    pub fn new(range: TextRange, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Pure insertion at `pos`
    pub fn insert(pos: usize, text: impl Into<String>) -> Self {
        Self::new(TextRange::caret(pos), text)
    }

    /// Pure deletion of `range`
    pub fn delete(range: TextRange) -> Self {
        Self::new(range, String::new())
    }
}

/// Which side of an insertion a mapped position sticks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Before,
    After,
}

/// Apply non-overlapping splices to `text`
///
/// Splices may be given in any order; they are applied back to front so
/// earlier offsets stay valid.
pub fn apply_splices(text: &str, splices: &[Splice]) -> String {
    let mut ordered: Vec<&Splice> = splices.iter().collect();
    ordered.sort_by_key(|s| (s.range.start, s.range.end));

    let mut out = String::with_capacity(text.len() + splices.iter().map(|s| s.text.len()).sum::<usize>());
    let mut last = 0;
    for splice in ordered {
        let start = splice.range.start.max(last);
        out.push_str(&text[last..start]);
        out.push_str(&splice.text);
        last = splice.range.end.max(start);
    }
    out.push_str(&text[last..]);
    out
}

/// Map an offset in the original text to the equivalent offset after the
/// splices are applied
pub fn map_offset(offset: usize, splices: &[Splice], bias: Bias) -> usize {
    let mut ordered: Vec<&Splice> = splices.iter().collect();
    ordered.sort_by_key(|s| (s.range.start, s.range.end));

    let mut delta: isize = 0;
    for splice in ordered {
        let range = splice.range;
        let inserted = splice.text.len() as isize;
        let removed = range.len() as isize;

        if range.start > offset {
            break;
        }
        if range.is_empty() && range.start == offset {
            if bias == Bias::After {
                delta += inserted;
            }
            continue;
        }
        if range.end <= offset {
            delta += inserted - removed;
            continue;
        }
        if range.start == offset {
            continue;
        }
        // Offset falls strictly inside a replaced region
        let base = (range.start as isize + delta) as usize;
        return match bias {
            Bias::Before => base,
            Bias::After => base + splice.text.len(),
        };
    }
    (offset as isize + delta) as usize
}

/// The editable markup buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditableBuffer {
    markup: String,
}

impl EditableBuffer {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.markup
    }

    pub fn len(&self) -> usize {
        self.markup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markup.is_empty()
    }

    /// Replace the whole buffer
    pub fn set(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
    }

    /// Get the markup inside a range (clamped to the buffer)
    pub fn slice(&self, range: TextRange) -> &str {
        let range = self.clamp(range);
        &self.markup[range.start..range.end]
    }

    /// Clamp a range into the buffer on character boundaries
    pub fn clamp(&self, range: TextRange) -> TextRange {
        TextRange::new(
            snap_to_boundary(&self.markup, range.start),
            snap_to_boundary(&self.markup, range.end),
        )
    }

    /// Replace a range with new markup; returns the range of the inserted text
    pub fn replace_range(&mut self, range: TextRange, text: &str) -> TextRange {
        let range = self.clamp(range);
        self.markup.replace_range(range.start..range.end, text);
        TextRange::new(range.start, range.start + text.len())
    }

    pub fn into_string(self) -> String {
        self.markup
    }
}
