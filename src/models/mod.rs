//! Models module for the lesson editor
//!
//! This module contains the data models shared by the editor session,
//! the toolbar and the WASM API.

pub mod color;
pub mod config;
pub mod dialog;
pub mod style;

// Re-export commonly used types
pub use color::parse_color;
pub use config::EditorConfig;
pub use dialog::{DialogField, DialogSubmission, PromptDialog};
pub use style::{StyleField, StyleState, COLOR_PALETTE, FONT_FAMILIES, FONT_SIZES, LINE_HEIGHTS};
