//! Layer 0: markup buffer and caret positions
//!
//! The buffer is an owned string, independent of any rendering surface.
//! The browser surface is a view driven by it; selection is tracked as
//! explicit byte offsets rather than implicit platform selection state.
//!
//! ## Modules
//!
//! - `buffer`: Markup storage and splice-based editing
//! - `cursor`: Caret and selection (byte offsets)

pub mod buffer;
pub mod cursor;

pub use buffer::{apply_splices, map_offset, Bias, EditableBuffer, Splice};
pub use cursor::{snap_to_boundary, Selection, TextRange};
