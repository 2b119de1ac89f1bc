//! Lesson draft persistence in the browser's localStorage

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, editor_error, serialize};
use crate::drafts::{load_draft, save_draft, DraftStore, LessonDraft};
use crate::error::{EditorError, EditorResult};
use crate::wasm_log;

/// `DraftStore` backed by `window.localStorage`
pub struct LocalStorageDraftStore {
    storage: web_sys::Storage,
}

impl LocalStorageDraftStore {
    pub fn open() -> EditorResult<Self> {
        let window = web_sys::window().ok_or_else(|| EditorError::Draft("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| EditorError::Draft(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| EditorError::Draft("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl DraftStore for LocalStorageDraftStore {
    fn save(&self, key: &str, value: &str) -> EditorResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| EditorError::Draft(format!("localStorage write failed: {:?}", e)))
    }

    fn load(&self, key: &str) -> EditorResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| EditorError::Draft(format!("localStorage read failed: {:?}", e)))
    }
}

/// Save `{title, content, videoUrl}` as the lesson draft
#[wasm_bindgen(js_name = saveLessonDraft)]
pub fn save_lesson_draft(draft: JsValue) -> Result<(), JsValue> {
    let draft: LessonDraft = deserialize(draft, "Invalid lesson draft")?;
    let store = LocalStorageDraftStore::open().map_err(editor_error)?;
    save_draft(&store, &draft).map_err(editor_error)?;
    wasm_log!("lesson draft saved");
    Ok(())
}

/// Load the lesson draft, or `null` when none is stored
#[wasm_bindgen(js_name = loadLessonDraft)]
pub fn load_lesson_draft() -> Result<JsValue, JsValue> {
    let store = LocalStorageDraftStore::open().map_err(editor_error)?;
    let draft = load_draft(&store).map_err(editor_error)?;
    match draft {
        Some(draft) => serialize(&draft, "LessonDraft serialization error"),
        None => Ok(JsValue::NULL),
    }
}
