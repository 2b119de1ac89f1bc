// Table, link and dialog-driven insertion

use edusecure_editor::models::DialogField;
use edusecure_editor::{EditorConfig, EditorError, RichTextEditor, Selection};

fn editor_with_caret(initial: &str, caret: usize) -> RichTextEditor {
    let mut editor =
        RichTextEditor::new(initial, false, EditorConfig::default()).expect("default config");
    editor.set_selection(Some(Selection::collapsed(caret)));
    editor
}

#[test]
fn test_table_dimensions_and_position() {
    let before = "<p>Intro</p>";
    let after = "<p>Outro</p>";
    let mut editor = editor_with_caret(&format!("{}{}", before, after), before.len());

    assert!(editor.insert_table(2, 3).expect("valid dimensions"));

    let content = editor.content();
    assert!(content.starts_with(before));
    assert!(content.ends_with(after));

    let table = &content[before.len()..content.len() - after.len()];
    assert!(table.starts_with("<table"));
    assert!(table.ends_with("</table>"));
    assert_eq!(table.matches("<tr>").count(), 2);
    for row in table.split("<tr>").skip(1) {
        assert_eq!(row.matches("<td ").count(), 3);
    }
    assert_eq!(
        editor.selection(),
        Some(Selection::collapsed(before.len() + table.len()))
    );
}

#[test]
fn test_invalid_table_dimensions_abort() {
    let mut editor = editor_with_caret("x", 1);
    let err = editor.insert_table(0, 3).unwrap_err();
    assert_eq!(err, EditorError::InvalidDimensions { rows: 0, cols: 3, max: 20 });
    assert!(editor.insert_table(21, 1).is_err());
    assert_eq!(editor.content(), "x");
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_table_dialog_flow() {
    let mut editor = editor_with_caret("", 0);
    editor.open_table_dialog();
    assert!(editor.set_dialog_field(DialogField::Rows, "3"));
    assert!(editor.set_dialog_field(DialogField::Cols, "1"));
    assert!(!editor.set_dialog_field(DialogField::Url, "ignored"));

    assert!(editor.confirm_dialog().unwrap());
    assert_eq!(editor.content().matches("<tr>").count(), 3);
    assert_eq!(editor.content().matches("<td ").count(), 3);
    assert!(!editor.dialog().is_open());
}

#[test]
fn test_table_dialog_with_garbage_aborts() {
    let mut editor = editor_with_caret("", 0);
    editor.open_table_dialog();
    editor.set_dialog_field(DialogField::Rows, "two");
    assert!(!editor.confirm_dialog().unwrap());
    assert_eq!(editor.content(), "");
    assert!(!editor.dialog().is_open());
}

#[test]
fn test_link_insertion() {
    let mut editor = editor_with_caret("See ", 4);
    assert!(editor.insert_link(" https://example.com ", "the docs").unwrap());
    assert_eq!(
        editor.content(),
        "See <a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">the docs</a>"
    );
}

#[test]
fn test_link_with_empty_field_is_aborted() {
    let mut editor = editor_with_caret("See ", 4);
    assert!(!editor.insert_link("", "the docs").unwrap());
    assert!(!editor.insert_link("https://example.com", "").unwrap());
    assert_eq!(editor.content(), "See ");
}

#[test]
fn test_script_links_rejected() {
    let mut editor = editor_with_caret("", 0);
    let err = editor.insert_link("javascript:alert(1)", "click").unwrap_err();
    assert!(matches!(err, EditorError::UnsafeUrl(_)));
    assert_eq!(editor.content(), "");
}

#[test]
fn test_insert_html_replaces_selection() {
    let mut editor = editor_with_caret("one two three", 0);
    editor.set_selection(Some(Selection::new(4, 7)));
    assert!(editor.insert_html("<b>2</b>"));
    assert_eq!(editor.content(), "one <b>2</b> three");
    assert_eq!(editor.selection(), Some(Selection::collapsed(12)));
}

#[test]
fn test_typing_over_partial_element_keeps_the_rest() {
    let mut editor = editor_with_caret("xx<b>Hello</b>", 0);
    editor.set_selection(Some(Selection::new(0, 7)));
    assert!(editor.type_text("Z"));
    assert_eq!(editor.content(), "Z<b>llo</b>");
    assert_eq!(editor.selection(), Some(Selection::collapsed(1)));

    assert_eq!(editor.undo(), "xx<b>Hello</b>");
}
