//! Command executor
//!
//! Formatting commands are pure functions of (markup, selection, command)
//! producing new markup and a new selection. The only extra state is the
//! editor clipboard used by copy, cut and paste.
//!
//! # Module Structure
//!
//! - `inline`: character formatting (bold, colors, remove format)
//! - `block`: alignment, lists, indentation
//! - `insert`: replacing the selection with markup (html, tables, links)

pub mod block;
pub mod inline;
pub mod insert;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EditorError, EditorResult};
use crate::models::parse_color;
use crate::parse::Markup;
use crate::text::{apply_splices, map_offset, Bias, Selection, Splice, TextRange};

/// The closed set of formatting commands
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Subscript,
    Superscript,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
    JustifyFull,
    InsertUnorderedList,
    InsertOrderedList,
    Indent,
    Outdent,
    ForeColor,
    HiliteColor,
    RemoveFormat,
    Copy,
    Cut,
    Paste,
}

impl FormatCommand {
    pub const ALL: [FormatCommand; 20] = [
        FormatCommand::Bold,
        FormatCommand::Italic,
        FormatCommand::Underline,
        FormatCommand::Strikethrough,
        FormatCommand::Subscript,
        FormatCommand::Superscript,
        FormatCommand::JustifyLeft,
        FormatCommand::JustifyCenter,
        FormatCommand::JustifyRight,
        FormatCommand::JustifyFull,
        FormatCommand::InsertUnorderedList,
        FormatCommand::InsertOrderedList,
        FormatCommand::Indent,
        FormatCommand::Outdent,
        FormatCommand::ForeColor,
        FormatCommand::HiliteColor,
        FormatCommand::RemoveFormat,
        FormatCommand::Copy,
        FormatCommand::Cut,
        FormatCommand::Paste,
    ];

    /// The command's camelCase name as used by the toolbar
    pub fn name(self) -> &'static str {
        match self {
            FormatCommand::Bold => "bold",
            FormatCommand::Italic => "italic",
            FormatCommand::Underline => "underline",
            FormatCommand::Strikethrough => "strikethrough",
            FormatCommand::Subscript => "subscript",
            FormatCommand::Superscript => "superscript",
            FormatCommand::JustifyLeft => "justifyLeft",
            FormatCommand::JustifyCenter => "justifyCenter",
            FormatCommand::JustifyRight => "justifyRight",
            FormatCommand::JustifyFull => "justifyFull",
            FormatCommand::InsertUnorderedList => "insertUnorderedList",
            FormatCommand::InsertOrderedList => "insertOrderedList",
            FormatCommand::Indent => "indent",
            FormatCommand::Outdent => "outdent",
            FormatCommand::ForeColor => "foreColor",
            FormatCommand::HiliteColor => "hiliteColor",
            FormatCommand::RemoveFormat => "removeFormat",
            FormatCommand::Copy => "copy",
            FormatCommand::Cut => "cut",
            FormatCommand::Paste => "paste",
        }
    }

    /// Color commands carry a value; every other command ignores it
    pub fn requires_value(self) -> bool {
        matches!(self, FormatCommand::ForeColor | FormatCommand::HiliteColor)
    }
}

impl FromStr for FormatCommand {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatCommand::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| EditorError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for FormatCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Editor-local clipboard for copy, cut and paste
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Clipboard {
    content: Option<String>,
}

impl Clipboard {
    pub fn get(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn set(&mut self, markup: impl Into<String>) {
        self.content = Some(markup.into());
    }

    pub fn clear(&mut self) {
        self.content = None;
    }
}

/// New buffer content and selection produced by a command
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Applied {
    pub markup: String,
    pub selection: Selection,
}

impl Applied {
    /// Apply splices and map the selected range across them, keeping the
    /// selection on the content it covered
    pub(crate) fn from_splices(source: &str, splices: &[Splice], range: TextRange) -> Self {
        let start = map_offset(range.start, splices, Bias::After);
        let end = map_offset(range.end, splices, Bias::Before);
        Self {
            markup: apply_splices(source, splices),
            selection: Selection::new(start, end.max(start)),
        }
    }
}

/// Apply one command to the markup
///
/// Returns `Ok(None)` when the command leaves the buffer untouched (copy,
/// a collapsed caret for inline formatting, an empty clipboard, ...).
pub fn apply(
    markup: &str,
    selection: Selection,
    command: FormatCommand,
    value: Option<&str>,
    clipboard: &mut Clipboard,
) -> EditorResult<Option<Applied>> {
    let doc = Markup::parse(markup);
    let range = doc.snap(selection.clamp_to(markup).range());

    let applied = match command {
        FormatCommand::Bold => inline::toggle(&doc, range, inline::BOLD),
        FormatCommand::Italic => inline::toggle(&doc, range, inline::ITALIC),
        FormatCommand::Underline => inline::toggle(&doc, range, inline::UNDERLINE),
        FormatCommand::Strikethrough => inline::toggle(&doc, range, inline::STRIKETHROUGH),
        FormatCommand::Subscript => inline::toggle(&doc, range, inline::SUBSCRIPT),
        FormatCommand::Superscript => inline::toggle(&doc, range, inline::SUPERSCRIPT),
        FormatCommand::JustifyLeft => block::align(&doc, range, "left"),
        FormatCommand::JustifyCenter => block::align(&doc, range, "center"),
        FormatCommand::JustifyRight => block::align(&doc, range, "right"),
        FormatCommand::JustifyFull => block::align(&doc, range, "justify"),
        FormatCommand::InsertUnorderedList => block::toggle_list(&doc, range, "ul"),
        FormatCommand::InsertOrderedList => block::toggle_list(&doc, range, "ol"),
        FormatCommand::Indent => block::indent(&doc, range),
        FormatCommand::Outdent => block::outdent(&doc, range),
        FormatCommand::ForeColor | FormatCommand::HiliteColor => {
            let raw = value.ok_or_else(|| EditorError::MissingValue(command.name().to_string()))?;
            let color = parse_color(raw)?;
            let property = if command == FormatCommand::ForeColor {
                "color"
            } else {
                "background-color"
            };
            inline::apply_span_style(&doc, range, property, &color)
        }
        FormatCommand::RemoveFormat => inline::remove_format(&doc, range),
        FormatCommand::Copy => {
            if !range.is_empty() {
                clipboard.set(insert::selected_markup(&doc, range));
            }
            None
        }
        FormatCommand::Cut => {
            if range.is_empty() {
                None
            } else {
                clipboard.set(insert::selected_markup(&doc, range));
                Some(insert::replace_range(&doc, range, ""))
            }
        }
        FormatCommand::Paste => clipboard
            .get()
            .filter(|content| !content.is_empty())
            .map(|content| insert::replace_range(&doc, range, content)),
    };

    Ok(applied.filter(|a| a.markup != markup || a.selection != selection))
}
