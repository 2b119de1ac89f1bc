//! Lesson editor WASM API
//!
//! This module provides the JavaScript-facing API for the lesson editor.
//! The editor core lives outside this module and knows nothing about
//! JavaScript; everything here converts values and errors at the boundary.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error conversion, and logging
//! - `editor`: The `LessonEditor` handle plus toolbar option lists
//! - `drafts`: Lesson draft persistence in localStorage

pub mod helpers;
pub mod editor;
pub mod drafts;

pub use editor::{command_names, toolbar_palettes, LessonEditor};
pub use drafts::{load_lesson_draft, save_lesson_draft, LocalStorageDraftStore};
