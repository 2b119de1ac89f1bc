//! JavaScript-facing editor handle
//!
//! `LessonEditor` wraps one `RichTextEditor` for the lesson form. Offsets
//! crossing the boundary are byte offsets into the markup; the host's
//! surface is responsible for mapping them to its own selection model.

use wasm_bindgen::prelude::*;

use crate::api::helpers::{
    deserialize, deserialize_or_default, editor_error, parse_ticket_id, selection_from_offsets,
    serialize,
};
use crate::commands::FormatCommand;
use crate::editor::RichTextEditor;
use crate::error::StorageError;
use crate::media::ImageFile;
use crate::models::{DialogField, EditorConfig, COLOR_PALETTE, FONT_FAMILIES, FONT_SIZES, LINE_HEIGHTS};
use crate::toolbar::{self, ToolbarAction};
use crate::{wasm_error, wasm_info, wasm_warn};

#[wasm_bindgen]
pub struct LessonEditor {
    inner: RichTextEditor,
}

#[wasm_bindgen]
impl LessonEditor {
    /// Create an editor; `config` may be omitted for the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(initial: &str, zen_mode: bool, config: JsValue) -> Result<LessonEditor, JsValue> {
        let config: EditorConfig = deserialize_or_default(config, "Invalid editor config")?;
        let inner = RichTextEditor::new(initial, zen_mode, config).map_err(editor_error)?;
        wasm_info!("LessonEditor created ({} bytes, zen={})", initial.len(), zen_mode);
        Ok(LessonEditor { inner })
    }

    /// Register the change callback; it receives the full markup
    ///
    /// The callback runs while this editor is still borrowed by the call
    /// that changed it. It must work from the markup argument and must not
    /// call back into the editor (not even the `content` getter); such a
    /// call fails with a recursive borrow error, which is only logged.
    #[wasm_bindgen(js_name = setOnChange)]
    pub fn set_on_change(&mut self, callback: js_sys::Function) {
        self.inner.set_on_change(move |markup| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(markup)) {
                wasm_error!("onChange callback threw: {:?}", e);
            }
        });
    }

    /// Run the normalizer once; returns pending direction repairs
    pub fn mount(&mut self) -> Result<JsValue, JsValue> {
        let repairs = self.inner.mount().to_vec();
        if !repairs.is_empty() {
            wasm_warn!("{} suspected reversed text run(s) found on load", repairs.len());
        }
        serialize(&repairs, "DirectionRepair serialization error")
    }

    #[wasm_bindgen(js_name = applyDirectionRepairs)]
    pub fn apply_direction_repairs(&mut self) -> bool {
        self.inner.apply_direction_repairs()
    }

    #[wasm_bindgen(js_name = dismissDirectionRepairs)]
    pub fn dismiss_direction_repairs(&mut self) {
        self.inner.dismiss_direction_repairs();
    }

    #[wasm_bindgen(getter)]
    pub fn content(&self) -> String {
        self.inner.content().to_string()
    }

    #[wasm_bindgen(getter = zenMode)]
    pub fn zen_mode(&self) -> bool {
        self.inner.zen_mode()
    }

    #[wasm_bindgen(setter = zenMode)]
    pub fn set_zen_mode(&mut self, zen_mode: bool) {
        self.inner.set_zen_mode(zen_mode);
    }

    // ---- selection ----

    /// Current selection as `{anchor, head}`, or `null`
    pub fn selection(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.selection(), "Selection serialization error")
    }

    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(&mut self, anchor: u32, head: u32) {
        self.inner
            .set_selection(selection_from_offsets(Some(anchor), Some(head)));
    }

    #[wasm_bindgen(js_name = selectAll)]
    pub fn select_all(&mut self) {
        self.inner.select_all();
    }

    pub fn focus(&mut self) {
        self.inner.focus();
    }

    pub fn blur(&mut self) {
        self.inner.blur();
    }

    // ---- editing ----

    /// Report markup produced by direct typing on the surface
    pub fn input(&mut self, markup: &str, anchor: Option<u32>, head: Option<u32>) -> bool {
        self.inner.input(markup, selection_from_offsets(anchor, head))
    }

    #[wasm_bindgen(js_name = typeText)]
    pub fn type_text(&mut self, text: &str) -> bool {
        self.inner.type_text(text)
    }

    /// Run a formatting command by name (`bold`, `justifyCenter`, ...)
    #[wasm_bindgen(js_name = execCommand)]
    pub fn exec_command(&mut self, name: &str, value: Option<String>) -> Result<bool, JsValue> {
        self.inner
            .execute_named(name, value.as_deref())
            .map_err(editor_error)
    }

    /// Apply a toolbar action object, e.g. `{action: "undo"}`
    pub fn dispatch(&mut self, action: JsValue) -> Result<bool, JsValue> {
        let action: ToolbarAction = deserialize(action, "Invalid toolbar action")?;
        toolbar::dispatch(&mut self.inner, &action).map_err(editor_error)
    }

    #[wasm_bindgen(js_name = insertHtml)]
    pub fn insert_html(&mut self, fragment: &str) -> bool {
        self.inner.insert_html(fragment)
    }

    #[wasm_bindgen(js_name = insertTable)]
    pub fn insert_table(&mut self, rows: u32, cols: u32) -> Result<bool, JsValue> {
        self.inner
            .insert_table(rows as usize, cols as usize)
            .map_err(editor_error)
    }

    #[wasm_bindgen(js_name = insertLink)]
    pub fn insert_link(&mut self, url: &str, text: &str) -> Result<bool, JsValue> {
        self.inner.insert_link(url, text).map_err(editor_error)
    }

    // ---- history ----

    pub fn undo(&mut self) -> String {
        self.inner.undo().to_string()
    }

    pub fn redo(&mut self) -> String {
        self.inner.redo().to_string()
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.inner.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.inner.can_redo()
    }

    // ---- toolbar ----

    #[wasm_bindgen(js_name = toolbarState)]
    pub fn toolbar_state(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.toolbar_state(), "ToolbarState serialization error")
    }

    /// CSS for the editable surface from the current toolbar styles
    #[wasm_bindgen(js_name = surfaceCss)]
    pub fn surface_css(&self) -> String {
        self.inner.surface_css()
    }

    // ---- dialogs ----

    pub fn dialog(&self) -> Result<JsValue, JsValue> {
        serialize(self.inner.dialog(), "Dialog serialization error")
    }

    #[wasm_bindgen(js_name = openTableDialog)]
    pub fn open_table_dialog(&mut self) {
        self.inner.open_table_dialog();
    }

    #[wasm_bindgen(js_name = openLinkDialog)]
    pub fn open_link_dialog(&mut self) {
        self.inner.open_link_dialog();
    }

    #[wasm_bindgen(js_name = setDialogField)]
    pub fn set_dialog_field(&mut self, field: &str, value: &str) -> Result<bool, JsValue> {
        let field: DialogField = field.parse().map_err(editor_error)?;
        Ok(self.inner.set_dialog_field(field, value))
    }

    #[wasm_bindgen(js_name = confirmDialog)]
    pub fn confirm_dialog(&mut self) -> Result<bool, JsValue> {
        self.inner.confirm_dialog().map_err(editor_error)
    }

    #[wasm_bindgen(js_name = cancelDialog)]
    pub fn cancel_dialog(&mut self) {
        self.inner.cancel_dialog();
    }

    // ---- uploads ----

    /// Register an upload; the host uploads the file under `ticket.key`
    /// and reports back with `completeImageUpload` or `failImageUpload`
    #[wasm_bindgen(js_name = beginImageUpload)]
    pub fn begin_image_upload(&mut self, name: &str, mime_type: &str) -> Result<JsValue, JsValue> {
        let file = ImageFile::new(name, mime_type, Vec::new());
        let now_ms = js_sys::Date::now() as u64;
        let ticket = self
            .inner
            .begin_image_upload(&file, now_ms)
            .map_err(editor_error)?;
        serialize(&ticket, "UploadTicket serialization error")
    }

    #[wasm_bindgen(js_name = completeImageUpload)]
    pub fn complete_image_upload(&mut self, ticket_id: &str, url: &str) -> Result<bool, JsValue> {
        let id = parse_ticket_id(ticket_id).map_err(editor_error)?;
        self.inner
            .complete_image_upload(id, url)
            .map_err(editor_error)
    }

    /// Drop a failed upload; returns the error message to show the user
    #[wasm_bindgen(js_name = failImageUpload)]
    pub fn fail_image_upload(&mut self, ticket_id: &str, reason: &str) -> JsValue {
        let err = match parse_ticket_id(ticket_id) {
            Ok(id) => self
                .inner
                .fail_image_upload(id, StorageError::Network(reason.to_string())),
            Err(err) => err,
        };
        editor_error(err)
    }

    #[wasm_bindgen(js_name = isUploading)]
    pub fn is_uploading(&self) -> bool {
        self.inner.is_uploading()
    }
}

/// Names of every supported formatting command
#[wasm_bindgen(js_name = commandNames)]
pub fn command_names() -> Vec<String> {
    FormatCommand::ALL
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Palettes {
    font_families: &'static [&'static str],
    font_sizes: &'static [&'static str],
    line_heights: &'static [&'static str],
    colors: &'static [&'static str],
}

/// The fixed option lists offered by the toolbar
#[wasm_bindgen(js_name = toolbarPalettes)]
pub fn toolbar_palettes() -> Result<JsValue, JsValue> {
    serialize(
        &Palettes {
            font_families: FONT_FAMILIES,
            font_sizes: FONT_SIZES,
            line_heights: LINE_HEIGHTS,
            colors: COLOR_PALETTE,
        },
        "Palette serialization error",
    )
}
