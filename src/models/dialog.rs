//! Prompt dialog state machine
//!
//! Table and link insertion collect their input through an explicit dialog
//! (open -> edit fields -> confirm/cancel) instead of a blocking prompt.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::EditorError;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PromptDialog {
    #[default]
    Closed,
    Table { rows: String, cols: String },
    Link { url: String, text: String },
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DialogField {
    Rows,
    Cols,
    Url,
    Text,
}

impl FromStr for DialogField {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rows" => Ok(DialogField::Rows),
            "cols" => Ok(DialogField::Cols),
            "url" => Ok(DialogField::Url),
            "text" => Ok(DialogField::Text),
            _ => Err(EditorError::UnknownDialogField(s.to_string())),
        }
    }
}

/// Parsed dialog input ready to be applied to the buffer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DialogSubmission {
    Table { rows: usize, cols: usize },
    Link { url: String, text: String },
}

impl PromptDialog {
    pub fn table() -> Self {
        PromptDialog::Table {
            rows: "2".to_string(),
            cols: "2".to_string(),
        }
    }

    /// Link dialog, pre-filled with the selected text
    pub fn link(selected_text: &str) -> Self {
        PromptDialog::Link {
            url: String::new(),
            text: selected_text.to_string(),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, PromptDialog::Closed)
    }

    /// Update a field; fields that do not belong to the open dialog are
    /// ignored and reported as `false`
    pub fn set_field(&mut self, field: DialogField, value: &str) -> bool {
        let slot = match (self, field) {
            (PromptDialog::Table { rows, .. }, DialogField::Rows) => rows,
            (PromptDialog::Table { cols, .. }, DialogField::Cols) => cols,
            (PromptDialog::Link { url, .. }, DialogField::Url) => url,
            (PromptDialog::Link { text, .. }, DialogField::Text) => text,
            _ => return false,
        };
        *slot = value.to_string();
        true
    }

    /// Close the dialog and parse its fields
    ///
    /// Returns `None` when the input is unusable (non-numeric or zero
    /// dimensions, empty link fields) or the dialog was not open.
    pub fn confirm(&mut self) -> Option<DialogSubmission> {
        match std::mem::take(self) {
            PromptDialog::Closed => None,
            PromptDialog::Table { rows, cols } => {
                let rows = parse_dimension(&rows)?;
                let cols = parse_dimension(&cols)?;
                Some(DialogSubmission::Table { rows, cols })
            }
            PromptDialog::Link { url, text } => {
                let url = url.trim();
                let text = text.trim();
                if url.is_empty() || text.is_empty() {
                    return None;
                }
                Some(DialogSubmission::Link {
                    url: url.to_string(),
                    text: text.to_string(),
                })
            }
        }
    }

    pub fn cancel(&mut self) {
        *self = PromptDialog::Closed;
    }
}

fn parse_dimension(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_dialog_confirm() {
        let mut dialog = PromptDialog::table();
        assert!(dialog.set_field(DialogField::Rows, "3"));
        assert!(dialog.set_field(DialogField::Cols, " 4 "));
        assert_eq!(
            dialog.confirm(),
            Some(DialogSubmission::Table { rows: 3, cols: 4 })
        );
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_non_numeric_dimensions_abort() {
        let mut dialog = PromptDialog::table();
        dialog.set_field(DialogField::Rows, "two");
        assert_eq!(dialog.confirm(), None);
        assert_eq!(dialog, PromptDialog::Closed);

        let mut dialog = PromptDialog::table();
        dialog.set_field(DialogField::Cols, "0");
        assert_eq!(dialog.confirm(), None);
    }

    #[test]
    fn test_link_dialog_requires_both_fields() {
        let mut dialog = PromptDialog::link("Read more");
        assert_eq!(dialog.confirm(), None);

        let mut dialog = PromptDialog::link("");
        dialog.set_field(DialogField::Url, "https://example.com");
        assert_eq!(dialog.confirm(), None);
    }

    #[test]
    fn test_field_for_other_dialog_ignored() {
        let mut dialog = PromptDialog::table();
        assert!(!dialog.set_field(DialogField::Url, "https://example.com"));
        assert!(!PromptDialog::Closed.set_field(DialogField::Rows, "1"));
    }

    #[test]
    fn test_cancel() {
        let mut dialog = PromptDialog::link("x");
        dialog.cancel();
        assert_eq!(dialog.confirm(), None);
    }

    #[test]
    fn test_field_names() {
        assert_eq!("cols".parse::<DialogField>().unwrap(), DialogField::Cols);
        assert!("color".parse::<DialogField>().is_err());
    }
}
