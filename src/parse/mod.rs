//! Parsing module for the lesson editor
//!
//! This module contains the markup scanner used by formatting commands
//! and the content normalizer.

pub mod entities;
pub mod markup;

// Re-export commonly used types
pub use entities::*;
pub use markup::*;
