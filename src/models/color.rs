//! Color value validation
//!
//! Colors end up inside `style="..."` attributes, so anything that is not a
//! recognizable CSS color is rejected before it reaches the buffer.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{EditorError, EditorResult};

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());

static FUNCTIONAL_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:rgba?|hsla?)\(\s*[-+0-9.%\s,/a-zA-Z]*\)$").unwrap()
});

static NAMED_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]{3,20}$").unwrap());

/// Validate a color and return it trimmed
pub fn parse_color(value: &str) -> EditorResult<String> {
    let trimmed = value.trim();
    if HEX_COLOR.is_match(trimmed)
        || FUNCTIONAL_COLOR.is_match(trimmed)
        || NAMED_COLOR.is_match(trimmed)
    {
        Ok(trimmed.to_string())
    } else {
        Err(EditorError::InvalidColor(value.to_string()))
    }
}
