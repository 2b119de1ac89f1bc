//! Lesson draft persistence
//!
//! A single slot holding the in-progress lesson form. Saving overwrites
//! whatever was there; there is no versioning.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::{EditorError, EditorResult};

/// Key the draft is stored under
pub const LESSON_DRAFT_KEY: &str = "lessonDraft";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LessonDraft {
    pub title: String,
    /// Editor markup
    pub content: String,
    pub video_url: String,
}

/// Key-value store collaborator
pub trait DraftStore {
    fn save(&self, key: &str, value: &str) -> EditorResult<()>;
    fn load(&self, key: &str) -> EditorResult<Option<String>>;
}

pub fn save_draft<S: DraftStore + ?Sized>(store: &S, draft: &LessonDraft) -> EditorResult<()> {
    let json = serde_json::to_string(draft).map_err(|e| EditorError::Draft(e.to_string()))?;
    store.save(LESSON_DRAFT_KEY, &json)?;
    log::debug!("saved lesson draft ({} bytes)", json.len());
    Ok(())
}

/// Load the stored draft, if any
///
/// A slot holding something that is not a draft is reported as an error
/// rather than silently discarded.
pub fn load_draft<S: DraftStore + ?Sized>(store: &S) -> EditorResult<Option<LessonDraft>> {
    match store.load(LESSON_DRAFT_KEY)? {
        Some(json) => serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| EditorError::Draft(format!("stored draft is corrupt: {}", e))),
        None => Ok(None),
    }
}

#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStore for MemoryDraftStore {
    fn save(&self, key: &str, value: &str) -> EditorResult<()> {
        self.slots.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> EditorResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }
}
