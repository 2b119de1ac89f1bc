//! Toolbar dispatch
//!
//! The toolbar holds no state of its own. Each control maps to one
//! `ToolbarAction`, and `dispatch` forwards it to the editor session.

use serde::{Deserialize, Serialize};

use crate::commands::FormatCommand;
use crate::editor::RichTextEditor;
use crate::error::EditorResult;
use crate::models::{StyleField, StyleState};

/// One toolbar control activation
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ToolbarAction {
    Command {
        command: FormatCommand,
        #[serde(default)]
        value: Option<String>,
    },
    SetFontFamily { value: String },
    SetFontSize { value: String },
    SetLineHeight { value: String },
    /// Sets the surface text color and colors the selection
    SetTextColor { value: String },
    /// Sets the highlight swatch and highlights the selection
    SetHighlightColor { value: String },
    SetBackgroundColor { value: String },
    OpenTableDialog,
    OpenLinkDialog,
    Undo,
    Redo,
}

/// What the toolbar shows: current styles and which controls are enabled
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarState {
    pub style: StyleState,
    pub can_undo: bool,
    pub can_redo: bool,
    /// The image button stays disabled while this is set
    pub uploading: bool,
    pub dialog_open: bool,
}

/// Apply a toolbar action; returns whether the buffer changed
pub fn dispatch(editor: &mut RichTextEditor, action: &ToolbarAction) -> EditorResult<bool> {
    log::debug!("toolbar: {:?}", action);
    match action {
        ToolbarAction::Command { command, value } => editor.execute(*command, value.as_deref()),
        ToolbarAction::SetFontFamily { value } => set_style(editor, StyleField::FontFamily, value),
        ToolbarAction::SetFontSize { value } => set_style(editor, StyleField::FontSize, value),
        ToolbarAction::SetLineHeight { value } => set_style(editor, StyleField::LineHeight, value),
        ToolbarAction::SetTextColor { value } => {
            let color = editor.set_style(StyleField::TextColor, value)?;
            editor.execute(FormatCommand::ForeColor, Some(&color))
        }
        ToolbarAction::SetHighlightColor { value } => {
            let color = editor.set_style(StyleField::HighlightColor, value)?;
            editor.execute(FormatCommand::HiliteColor, Some(&color))
        }
        ToolbarAction::SetBackgroundColor { value } => {
            set_style(editor, StyleField::BackgroundColor, value)
        }
        ToolbarAction::OpenTableDialog => {
            editor.open_table_dialog();
            Ok(false)
        }
        ToolbarAction::OpenLinkDialog => {
            editor.open_link_dialog();
            Ok(false)
        }
        ToolbarAction::Undo => {
            let before = editor.content().to_string();
            Ok(editor.undo() != before)
        }
        ToolbarAction::Redo => {
            let before = editor.content().to_string();
            Ok(editor.redo() != before)
        }
    }
}

fn set_style(editor: &mut RichTextEditor, field: StyleField, value: &str) -> EditorResult<bool> {
    editor.set_style(field, value)?;
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::models::EditorConfig;

    fn editor(initial: &str) -> RichTextEditor {
        RichTextEditor::new(initial, false, EditorConfig::default()).unwrap()
    }

    #[test]
    fn test_action_json_shape() {
        let action: ToolbarAction =
            serde_json::from_str(r#"{"action":"command","command":"justifyCenter"}"#).unwrap();
        assert_eq!(
            action,
            ToolbarAction::Command {
                command: FormatCommand::JustifyCenter,
                value: None
            }
        );
        let action: ToolbarAction =
            serde_json::from_str(r##"{"action":"setTextColor","value":"#1e88e5"}"##).unwrap();
        assert_eq!(
            action,
            ToolbarAction::SetTextColor {
                value: "#1e88e5".into()
            }
        );
    }

    #[test]
    fn test_text_color_updates_style_and_selection() {
        let mut ed = editor("Hi");
        ed.select_all();
        let changed = dispatch(
            &mut ed,
            &ToolbarAction::SetTextColor {
                value: "#e53935".into(),
            },
        )
        .unwrap();
        assert!(changed);
        assert_eq!(ed.style().text_color, "#e53935");
        assert_eq!(ed.content(), r#"<span style="color: #e53935;">Hi</span>"#);
    }

    #[test]
    fn test_font_size_is_prospective() {
        let mut ed = editor("Hi");
        ed.select_all();
        let changed = dispatch(
            &mut ed,
            &ToolbarAction::SetFontSize {
                value: "24px".into(),
            },
        )
        .unwrap();
        assert!(!changed);
        assert_eq!(ed.content(), "Hi");
        assert_eq!(ed.toolbar_state().style.font_size, "24px");
    }

    #[test]
    fn test_invalid_style_rejected() {
        let mut ed = editor("");
        let err = dispatch(
            &mut ed,
            &ToolbarAction::SetLineHeight {
                value: "9".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, EditorError::InvalidStyle { .. }));
    }

    #[test]
    fn test_undo_redo_report_changes() {
        let mut ed = editor("");
        ed.focus();
        ed.type_text("a");
        assert!(dispatch(&mut ed, &ToolbarAction::Undo).unwrap());
        assert!(!dispatch(&mut ed, &ToolbarAction::Undo).unwrap());
        assert!(dispatch(&mut ed, &ToolbarAction::Redo).unwrap());
        assert!(ed.toolbar_state().can_undo);
    }

    #[test]
    fn test_dialog_actions() {
        let mut ed = editor("");
        dispatch(&mut ed, &ToolbarAction::OpenTableDialog).unwrap();
        assert!(ed.toolbar_state().dialog_open);
    }
}
