//! Lesson Editor WASM Module
//!
//! Command, history and media core of the EduSecure+ lesson editor. The
//! editor works on an owned markup buffer with explicit selections, so
//! everything below `api` runs and tests without a browser.

pub mod error;
pub mod text;
pub mod parse;
pub mod models;
pub mod undo;
pub mod commands;
pub mod normalize;
pub mod media;
pub mod drafts;
pub mod editor;
pub mod toolbar;
pub mod api;

// Re-export commonly used types
pub use commands::{Applied, Clipboard, FormatCommand};
pub use editor::RichTextEditor;
pub use error::{EditorError, EditorResult, StorageError};
pub use models::{EditorConfig, PromptDialog, StyleState};
pub use text::Selection;
pub use toolbar::{ToolbarAction, ToolbarState};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second init only fails because a logger is already installed
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Lesson editor WASM module initialized");
}
