//! Toolbar-selected formatting attributes
//!
//! StyleState is independent of buffer content. It is rendered as the
//! editable surface's CSS and applies prospectively to what the user types.

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};
use crate::models::color::parse_color;

pub const FONT_FAMILIES: &[&str] = &[
    "Arial",
    "Georgia",
    "Times New Roman",
    "Courier New",
    "Verdana",
    "Tahoma",
    "Trebuchet MS",
];

pub const FONT_SIZES: &[&str] = &[
    "12px", "14px", "16px", "18px", "20px", "24px", "28px", "32px",
];

pub const LINE_HEIGHTS: &[&str] = &["1", "1.15", "1.5", "1.75", "2"];

/// Fixed palette offered next to the free-form color picker
pub const COLOR_PALETTE: &[&str] = &[
    "#000000", "#434343", "#666666", "#999999", "#ffffff", "#e53935", "#fb8c00", "#fdd835",
    "#43a047", "#00acc1", "#1e88e5", "#3949ab", "#8e24aa", "#d81b60", "#6d4c41", "#fff59d",
];

/// Style fields the toolbar can set
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StyleField {
    FontFamily,
    FontSize,
    LineHeight,
    TextColor,
    HighlightColor,
    BackgroundColor,
}

impl StyleField {
    fn label(self) -> &'static str {
        match self {
            StyleField::FontFamily => "font family",
            StyleField::FontSize => "font size",
            StyleField::LineHeight => "line height",
            StyleField::TextColor => "text color",
            StyleField::HighlightColor => "highlight color",
            StyleField::BackgroundColor => "background color",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StyleState {
    pub font_family: String,
    pub font_size: String,
    pub line_height: String,
    pub text_color: String,
    pub highlight_color: String,
    pub background_color: String,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size: "16px".to_string(),
            line_height: "1.5".to_string(),
            text_color: "#000000".to_string(),
            highlight_color: "#fff59d".to_string(),
            background_color: "#ffffff".to_string(),
        }
    }
}

impl StyleState {
    /// Set one field after validating the value; returns the stored value
    pub fn set(&mut self, field: StyleField, value: &str) -> EditorResult<String> {
        let value = match field {
            StyleField::FontFamily => pick(FONT_FAMILIES, field, value)?,
            StyleField::FontSize => pick(FONT_SIZES, field, value)?,
            StyleField::LineHeight => pick(LINE_HEIGHTS, field, value)?,
            StyleField::TextColor | StyleField::HighlightColor | StyleField::BackgroundColor => {
                parse_color(value)?
            }
        };

        let slot = match field {
            StyleField::FontFamily => &mut self.font_family,
            StyleField::FontSize => &mut self.font_size,
            StyleField::LineHeight => &mut self.line_height,
            StyleField::TextColor => &mut self.text_color,
            StyleField::HighlightColor => &mut self.highlight_color,
            StyleField::BackgroundColor => &mut self.background_color,
        };
        *slot = value.clone();
        Ok(value)
    }

    /// Inline CSS for the editable surface
    pub fn surface_css(&self) -> String {
        let family = if self.font_family.contains(' ') {
            format!("'{}'", self.font_family)
        } else {
            self.font_family.clone()
        };
        format!(
            "font-family: {}; font-size: {}; line-height: {}; color: {}; background-color: {};",
            family, self.font_size, self.line_height, self.text_color, self.background_color
        )
    }
}

fn pick(options: &[&str], field: StyleField, value: &str) -> EditorResult<String> {
    let value = value.trim();
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(value))
        .map(|o| o.to_string())
        .ok_or_else(|| EditorError::InvalidStyle {
            field: field.label().to_string(),
            value: value.to_string(),
        })
}
