//! Editor session
//!
//! `RichTextEditor` owns everything the lesson form's editor needs while it
//! is mounted: the markup buffer, the selection, history, toolbar styles,
//! clipboard, the open prompt dialog and pending uploads. Every operation
//! that changes the buffer records a history snapshot and then calls the
//! change listener with the full markup.

use uuid::Uuid;

use crate::commands::{self, insert, Applied, Clipboard, FormatCommand};
use crate::error::{EditorError, EditorResult, StorageError};
use crate::media::{image_markup, BlobStore, ImageFile, UploadQueue, UploadTicket};
use crate::models::{DialogField, DialogSubmission, EditorConfig, PromptDialog, StyleField, StyleState};
use crate::normalize::{self, DirectionRepair, NormalizerMode};
use crate::parse::{escape_text, Markup};
use crate::text::{EditableBuffer, Selection};
use crate::toolbar::ToolbarState;
use crate::undo::History;

/// Called with the full markup after every change
pub type ChangeListener = Box<dyn FnMut(&str)>;

pub struct RichTextEditor {
    buffer: EditableBuffer,
    selection: Option<Selection>,
    history: History,
    style: StyleState,
    clipboard: Clipboard,
    dialog: PromptDialog,
    uploads: UploadQueue,
    config: EditorConfig,
    zen_mode: bool,
    mounted: bool,
    pending_repairs: Vec<DirectionRepair>,
    on_change: Option<ChangeListener>,
}

impl RichTextEditor {
    /// Create an editor seeded with `initial` content
    ///
    /// `zen_mode` only affects the host's layout.
    pub fn new(initial: &str, zen_mode: bool, config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        Ok(Self {
            buffer: EditableBuffer::new(initial),
            selection: None,
            history: History::new(initial, config.history_capacity),
            style: StyleState::default(),
            clipboard: Clipboard::default(),
            dialog: PromptDialog::Closed,
            uploads: UploadQueue::new(),
            config,
            zen_mode,
            mounted: false,
            pending_repairs: Vec::new(),
            on_change: None,
        })
    }

    pub fn set_on_change(&mut self, listener: impl FnMut(&str) + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    /// Run the content normalizer over the loaded content
    ///
    /// Only the first call does anything. In `Repair` mode a changed buffer
    /// becomes a new history entry, so the repair can be undone. In `Detect`
    /// mode the candidates are kept for `apply_direction_repairs`.
    pub fn mount(&mut self) -> &[DirectionRepair] {
        if self.mounted {
            return &self.pending_repairs;
        }
        self.mounted = true;

        let normalized = normalize::clean(self.buffer.as_str(), self.config.normalizer);
        match self.config.normalizer {
            NormalizerMode::Repair => {
                if normalized.changed(self.buffer.as_str()) {
                    self.replace_content(normalized.markup);
                }
            }
            NormalizerMode::Detect => self.pending_repairs = normalized.repairs,
            NormalizerMode::Off => {}
        }
        &self.pending_repairs
    }

    pub fn direction_repairs(&self) -> &[DirectionRepair] {
        &self.pending_repairs
    }

    /// Apply the repairs found on mount after the user confirmed them
    pub fn apply_direction_repairs(&mut self) -> bool {
        let repairs = std::mem::take(&mut self.pending_repairs);
        if repairs.is_empty() {
            return false;
        }
        let repaired = normalize::apply_repairs(self.buffer.as_str(), &repairs);
        self.replace_content(repaired)
    }

    pub fn dismiss_direction_repairs(&mut self) {
        if !self.pending_repairs.is_empty() {
            log::info!("direction repairs dismissed ({})", self.pending_repairs.len());
        }
        self.pending_repairs.clear();
    }

    // ---- content & selection ----

    pub fn content(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection.map(|s| s.clamp_to(self.buffer.as_str()));
    }

    pub fn select_all(&mut self) {
        self.selection = Some(Selection::new(0, self.buffer.len()));
    }

    /// Give the editor focus; without a selection the caret goes to the end
    pub fn focus(&mut self) {
        if self.selection.is_none() {
            self.selection = Some(Selection::collapsed(self.buffer.len()));
        }
    }

    pub fn blur(&mut self) {
        self.selection = None;
    }

    /// The editable surface reports new markup after direct user input
    pub fn input(&mut self, markup: &str, selection: Option<Selection>) -> bool {
        let changed = self.replace_content(markup.to_string());
        self.set_selection(selection);
        changed
    }

    /// Type plain text at the caret, replacing any selected content
    pub fn type_text(&mut self, text: &str) -> bool {
        self.insert_html(&escape_text(text))
    }

    // ---- commands ----

    /// Run a formatting command on the current selection
    ///
    /// Without a selection this is a no-op: nothing changes and no history
    /// entry is written.
    pub fn execute(&mut self, command: FormatCommand, value: Option<&str>) -> EditorResult<bool> {
        let Some(selection) = self.selection else {
            log::debug!("{} ignored: no selection", command);
            return Ok(false);
        };
        let applied = commands::apply(
            self.buffer.as_str(),
            selection,
            command,
            value,
            &mut self.clipboard,
        )?;
        Ok(match applied {
            Some(applied) => self.commit(applied),
            None => false,
        })
    }

    pub fn execute_named(&mut self, name: &str, value: Option<&str>) -> EditorResult<bool> {
        let command: FormatCommand = name.parse()?;
        self.execute(command, value)
    }

    /// Replace the selection with a markup fragment
    pub fn insert_html(&mut self, fragment: &str) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let applied = insert::insert_fragment(self.buffer.as_str(), selection, fragment);
        self.commit(applied)
    }

    pub fn insert_table(&mut self, rows: usize, cols: usize) -> EditorResult<bool> {
        insert::validate_table_dimensions(rows, cols, self.config.max_table_dimension)?;
        Ok(self.insert_html(&insert::table_markup(rows, cols)))
    }

    /// Insert a link; blank fields abort without an error
    pub fn insert_link(&mut self, url: &str, text: &str) -> EditorResult<bool> {
        match insert::link_markup(url, text)? {
            Some(link) => Ok(self.insert_html(&link)),
            None => {
                log::debug!("link insertion aborted: empty url or text");
                Ok(false)
            }
        }
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    // ---- history ----

    pub fn undo(&mut self) -> &str {
        let previous = self.history.undo().to_string();
        self.restore(previous);
        self.buffer.as_str()
    }

    pub fn redo(&mut self) -> &str {
        let next = self.history.redo().to_string();
        self.restore(next);
        self.buffer.as_str()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // ---- toolbar styles ----

    pub fn style(&self) -> &StyleState {
        &self.style
    }

    pub fn set_style(&mut self, field: StyleField, value: &str) -> EditorResult<String> {
        self.style.set(field, value)
    }

    pub fn surface_css(&self) -> String {
        self.style.surface_css()
    }

    // ---- dialogs ----

    pub fn dialog(&self) -> &PromptDialog {
        &self.dialog
    }

    pub fn open_table_dialog(&mut self) {
        self.dialog = PromptDialog::table();
    }

    /// Open the link dialog with the selected text as the link text
    pub fn open_link_dialog(&mut self) {
        let selected = match self.selection {
            Some(selection) => {
                let doc = Markup::parse(self.buffer.as_str());
                doc.plain_text(selection.clamp_to(self.buffer.as_str()).range())
            }
            None => String::new(),
        };
        self.dialog = PromptDialog::link(selected.trim());
    }

    pub fn set_dialog_field(&mut self, field: DialogField, value: &str) -> bool {
        self.dialog.set_field(field, value)
    }

    /// Close the dialog and insert what it collected
    ///
    /// Unusable input closes the dialog without touching the buffer.
    pub fn confirm_dialog(&mut self) -> EditorResult<bool> {
        match self.dialog.confirm() {
            Some(DialogSubmission::Table { rows, cols }) => self.insert_table(rows, cols),
            Some(DialogSubmission::Link { url, text }) => self.insert_link(&url, &text),
            None => Ok(false),
        }
    }

    pub fn cancel_dialog(&mut self) {
        self.dialog.cancel();
    }

    // ---- uploads ----

    pub fn is_uploading(&self) -> bool {
        self.uploads.is_uploading()
    }

    pub fn pending_uploads(&self) -> &[UploadTicket] {
        self.uploads.pending()
    }

    /// Start an upload; the host sends the bytes under the ticket's key
    pub fn begin_image_upload(&mut self, file: &ImageFile, now_ms: u64) -> EditorResult<UploadTicket> {
        self.uploads.begin(file, &self.config.image_key_prefix, now_ms)
    }

    /// Insert the uploaded image at the selection, or at the end of the
    /// buffer when the editor has no selection
    pub fn complete_image_upload(&mut self, id: Uuid, url: &str) -> EditorResult<bool> {
        let ticket = self.uploads.finish(id)?;
        let image = image_markup(url, &ticket.file_name);
        log::info!("upload {} finished: {}", ticket.id, url);

        match self.selection {
            Some(selection) => {
                let applied = insert::insert_fragment(self.buffer.as_str(), selection, &image);
                Ok(self.commit(applied))
            }
            None => {
                let appended = format!("{}{}", self.buffer.as_str(), image);
                Ok(self.replace_content(appended))
            }
        }
    }

    /// Drop a failed upload's ticket and hand back the error to surface
    pub fn fail_image_upload(&mut self, id: Uuid, error: StorageError) -> EditorError {
        match self.uploads.finish(id) {
            Ok(ticket) => {
                log::error!("upload of {} failed: {}", ticket.file_name, error);
                EditorError::Upload(error)
            }
            Err(unknown) => unknown,
        }
    }

    /// Upload through a blob store and insert the result
    pub fn upload_image<S: BlobStore + ?Sized>(
        &mut self,
        store: &S,
        file: &ImageFile,
        now_ms: u64,
    ) -> EditorResult<bool> {
        let ticket = self.begin_image_upload(file, now_ms)?;
        match store.upload(&file.bytes, &ticket.key) {
            Ok(url) => self.complete_image_upload(ticket.id, &url),
            Err(error) => Err(self.fail_image_upload(ticket.id, error)),
        }
    }

    // ---- misc ----

    pub fn zen_mode(&self) -> bool {
        self.zen_mode
    }

    pub fn set_zen_mode(&mut self, zen_mode: bool) {
        self.zen_mode = zen_mode;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn toolbar_state(&self) -> ToolbarState {
        ToolbarState {
            style: self.style.clone(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            uploading: self.is_uploading(),
            dialog_open: self.dialog.is_open(),
        }
    }

    // ---- internals ----

    /// Adopt a command result; history and listener only see real changes
    fn commit(&mut self, applied: Applied) -> bool {
        self.selection = Some(applied.selection.clamp_to(&applied.markup));
        self.replace_content(applied.markup)
    }

    fn replace_content(&mut self, markup: String) -> bool {
        if markup == self.buffer.as_str() {
            return false;
        }
        self.buffer.set(markup);
        self.history.save(self.buffer.as_str());
        self.notify();
        true
    }

    /// Show a history entry without recording a new one
    fn restore(&mut self, markup: String) {
        if markup == self.buffer.as_str() {
            return;
        }
        self.buffer.set(markup);
        self.selection = self.selection.map(|s| s.clamp_to(self.buffer.as_str()));
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_change.as_mut() {
            listener(self.buffer.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn editor(initial: &str) -> RichTextEditor {
        RichTextEditor::new(initial, false, EditorConfig::default()).unwrap()
    }

    fn recorded(editor: &mut RichTextEditor) -> Rc<RefCell<Vec<String>>> {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        editor.set_on_change(move |markup| sink.borrow_mut().push(markup.to_string()));
        changes
    }

    #[test]
    fn test_type_then_bold_then_undo() {
        let mut ed = editor("");
        ed.focus();
        assert!(ed.type_text("Hello"));
        ed.select_all();
        assert!(ed.execute(FormatCommand::Bold, None).unwrap());
        assert_eq!(ed.content(), "<b>Hello</b>");
        assert_eq!(ed.undo(), "Hello");
        assert_eq!(ed.undo(), "");
        assert_eq!(ed.undo(), "");
    }

    #[test]
    fn test_listener_sees_every_change() {
        let mut ed = editor("");
        let changes = recorded(&mut ed);
        ed.focus();
        ed.type_text("Hi");
        ed.undo();
        ed.undo();
        assert_eq!(*changes.borrow(), vec!["Hi".to_string(), String::new()]);
    }

    #[test]
    fn test_no_selection_is_noop() {
        let mut ed = editor("Hello");
        let changes = recorded(&mut ed);
        for command in FormatCommand::ALL {
            assert!(!ed.execute(command, Some("#ff0000")).unwrap());
        }
        assert!(!ed.insert_table(2, 2).unwrap());
        assert_eq!(ed.content(), "Hello");
        assert_eq!(ed.history().len(), 1);
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn test_copy_does_not_record_history() {
        let mut ed = editor("Hello");
        ed.select_all();
        assert!(!ed.execute(FormatCommand::Copy, None).unwrap());
        assert_eq!(ed.clipboard().get(), Some("Hello"));
        assert_eq!(ed.history().len(), 1);
    }

    #[test]
    fn test_link_dialog_prefills_selection() {
        let mut ed = editor("Read <b>this</b> now");
        ed.set_selection(Some(Selection::new(5, 16)));
        ed.open_link_dialog();
        assert_eq!(ed.dialog(), &PromptDialog::link("this"));

        ed.set_dialog_field(DialogField::Url, "https://example.com");
        assert!(ed.confirm_dialog().unwrap());
        assert_eq!(
            ed.content(),
            "Read <a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">this</a> now"
        );
        assert!(!ed.dialog().is_open());
    }

    #[test]
    fn test_cancelled_dialog_changes_nothing() {
        let mut ed = editor("x");
        ed.focus();
        ed.open_table_dialog();
        ed.cancel_dialog();
        assert!(!ed.confirm_dialog().unwrap());
        assert_eq!(ed.content(), "x");
    }

    #[test]
    fn test_repair_mode_is_undoable() {
        let config = EditorConfig {
            normalizer: NormalizerMode::Repair,
            ..EditorConfig::default()
        };
        let mut ed = RichTextEditor::new("<p>olleH dlrow</p>", false, config).unwrap();
        let changes = recorded(&mut ed);
        ed.mount();
        assert_eq!(ed.content(), "<p>world Hello</p>");
        assert_eq!(changes.borrow().len(), 1);

        // Second mount is a no-op
        ed.mount();
        assert_eq!(changes.borrow().len(), 1);

        assert_eq!(ed.undo(), "<p>olleH dlrow</p>");
    }

    #[test]
    fn test_detect_mode_waits_for_confirmation() {
        let config = EditorConfig {
            normalizer: NormalizerMode::Detect,
            ..EditorConfig::default()
        };
        let mut ed = RichTextEditor::new("olleH", false, config).unwrap();
        assert_eq!(ed.mount().len(), 1);
        assert_eq!(ed.content(), "olleH");
        assert!(ed.apply_direction_repairs());
        assert_eq!(ed.content(), "Hello");
        assert!(ed.direction_repairs().is_empty());
    }

    #[test]
    fn test_upload_without_selection_appends() {
        let mut ed = editor("<p>Intro</p>");
        let file = ImageFile::new("leaf.png", "image/png", vec![1]);
        let ticket = ed.begin_image_upload(&file, 42).unwrap();
        assert_eq!(ticket.key, "lesson-images/42_leaf.png");
        assert!(ed.toolbar_state().uploading);

        assert!(ed.complete_image_upload(ticket.id, "https://cdn.test/leaf.png").unwrap());
        assert_eq!(
            ed.content(),
            "<p>Intro</p><img src=\"https://cdn.test/leaf.png\" alt=\"leaf.png\" style=\"max-width: 100%;\">"
        );
        assert!(!ed.is_uploading());
    }

    #[test]
    fn test_failed_upload_leaves_buffer() {
        let mut ed = editor("text");
        let file = ImageFile::new("leaf.png", "image/png", vec![1]);
        let ticket = ed.begin_image_upload(&file, 1).unwrap();
        let err = ed.fail_image_upload(ticket.id, StorageError::Rejected("quota".into()));
        assert_eq!(err, EditorError::Upload(StorageError::Rejected("quota".into())));
        assert_eq!(ed.content(), "text");
        assert!(!ed.is_uploading());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EditorConfig {
            history_capacity: 0,
            ..EditorConfig::default()
        };
        assert!(RichTextEditor::new("", false, config).is_err());
    }
}
