//! Block-level commands: alignment, lists and indentation
//!
//! Block commands work on the block around the selection, so they also
//! apply to a collapsed caret.

use super::Applied;
use crate::parse::{set_style_property, Markup, TokenKind};
use crate::text::{Selection, Splice, TextRange};

/// Elements whose own `text-align` can be rewritten in place
const ALIGNABLE: &[&str] = &[
    "div", "p", "li", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "td", "th",
];

pub const INDENT_OPEN: &str =
    "<blockquote style=\"margin: 0 0 0 40px; border: none; padding: 0px;\">";
pub const INDENT_CLOSE: &str = "</blockquote>";

/// Set the text alignment of the selected block
pub fn align(doc: &Markup, range: TextRange, alignment: &str) -> Option<Applied> {
    let block = doc.block_range(range);

    let splices = match doc.exact_wrapper(block, ALIGNABLE) {
        Some((open, _)) => {
            let source = doc.token_source(open);
            let aligned = set_style_property(source, "text-align", alignment);
            if aligned == source {
                return None;
            }
            vec![Splice::new(doc.token(open).span, aligned)]
        }
        None => vec![
            Splice::insert(
                block.start,
                format!("<div style=\"text-align: {};\">", alignment),
            ),
            Splice::insert(block.end, "</div>"),
        ],
    };
    Some(Applied::from_splices(doc.source(), &splices, range))
}

/// Toggle a list (`ul` or `ol`) around the selected block
///
/// Inside a list of the same kind the list is removed; inside the other
/// kind the list type is switched; otherwise every line of the block
/// becomes a list item.
pub fn toggle_list(doc: &Markup, range: TextRange, kind: &str) -> Option<Applied> {
    let block = doc.block_range(range);

    if let Some((open, close)) = doc.enclosing(block, &["ul", "ol"]) {
        if doc.token(open).name == kind {
            return Some(unwrap_list(doc, open, close));
        }
        let source = doc.token_source(open);
        let old_name_len = doc.token(open).name.len();
        let renamed = format!("<{}{}", kind, &source[1 + old_name_len..]);
        let splices = [
            Splice::new(doc.token(open).span, renamed),
            Splice::new(doc.token(close).span, format!("</{}>", kind)),
        ];
        return Some(Applied::from_splices(doc.source(), &splices, range));
    }

    let items: String = split_lines(doc, block)
        .into_iter()
        .map(|line| {
            let content = doc.slice(line);
            if content.is_empty() {
                "<li><br></li>".to_string()
            } else {
                format!("<li>{}</li>", content)
            }
        })
        .collect();
    let list = format!("<{kind}>{items}</{kind}>");

    // Keep the selection on the item contents so toggling again finds the list
    let head = "<li>".len() + kind.len() + 2;
    let tail = "</li>".len() + kind.len() + 3;
    let markup = replace(doc.source(), block, &list);
    let start = block.start + head;
    let end = block.start + list.len() - tail;
    Some(Applied {
        markup,
        selection: Selection::new(start, end.max(start)),
    })
}

/// Wrap the selected block in an indenting blockquote
pub fn indent(doc: &Markup, range: TextRange) -> Option<Applied> {
    let block = doc.block_range(range);
    let splices = [
        Splice::insert(block.start, INDENT_OPEN),
        Splice::insert(block.end, INDENT_CLOSE),
    ];
    Some(Applied::from_splices(doc.source(), &splices, range))
}

/// Remove the innermost blockquote around the selection
pub fn outdent(doc: &Markup, range: TextRange) -> Option<Applied> {
    let block = doc.block_range(range);
    let (open, close) = doc.enclosing(block, &["blockquote"])?;
    let splices = [
        Splice::delete(doc.token(open).span),
        Splice::delete(doc.token(close).span),
    ];
    Some(Applied::from_splices(doc.source(), &splices, range))
}

/// Replace a list with its items' contents joined by line breaks
fn unwrap_list(doc: &Markup, open: usize, close: usize) -> Applied {
    let mut items = Vec::new();
    let mut i = open + 1;
    while i < close {
        let token = doc.token(i);
        match doc.partner(i) {
            Some(end) if token.kind == TokenKind::StartTag && token.name == "li" => {
                let inner = TextRange::new(token.span.end, doc.token(end).span.start);
                let content = doc.slice(inner);
                items.push(if content == "<br>" { "" } else { content });
                i = end + 1;
            }
            _ => i += 1,
        }
    }

    let whole = TextRange::new(doc.token(open).span.start, doc.token(close).span.end);
    let joined = items.join("<br>");
    let markup = replace(doc.source(), whole, &joined);
    Applied {
        markup,
        selection: Selection::new(whole.start, whole.start + joined.len()),
    }
}

/// Split a block at its top-level `<br>` tags
fn split_lines(doc: &Markup, block: TextRange) -> Vec<TextRange> {
    let mut lines = Vec::new();
    let mut depth = 0usize;
    let mut line_start = block.start;

    for token in doc.tokens().iter().filter(|t| block.covers(t.span)) {
        match token.kind {
            TokenKind::StartTag => depth += 1,
            TokenKind::EndTag => depth = depth.saturating_sub(1),
            TokenKind::VoidTag if token.name == "br" && depth == 0 => {
                lines.push(TextRange::new(line_start, token.span.start));
                line_start = token.span.end;
            }
            _ => {}
        }
    }
    lines.push(TextRange::new(line_start, block.end));
    lines
}

fn replace(source: &str, range: TextRange, text: &str) -> String {
    format!("{}{}{}", &source[..range.start], text, &source[range.end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caret(src: &str, needle: &str) -> TextRange {
        TextRange::caret(src.find(needle).unwrap())
    }

    #[test]
    fn test_align_wraps_plain_block() {
        let src = "one<br>two";
        let doc = Markup::parse(src);
        let applied = align(&doc, caret(src, "two"), "center").unwrap();
        assert_eq!(
            applied.markup,
            "one<br><div style=\"text-align: center;\">two</div>"
        );
    }

    #[test]
    fn test_align_rewrites_existing_block() {
        let src = "<p style=\"text-align: center;\">Title</p>";
        let doc = Markup::parse(src);
        let applied = align(&doc, caret(src, "Title"), "right").unwrap();
        assert_eq!(applied.markup, "<p style=\"text-align: right;\">Title</p>");

        let doc = Markup::parse(&applied.markup);
        assert!(align(&doc, caret(&applied.markup, "Title"), "right").is_none());
    }

    #[test]
    fn test_list_wraps_lines() {
        let src = "a<br>b";
        let doc = Markup::parse(src);
        let applied = toggle_list(&doc, TextRange::new(0, 6), "ul").unwrap();
        assert_eq!(applied.markup, "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(applied.selection, Selection::new(8, 19));
    }

    #[test]
    fn test_list_toggles_off() {
        let src = "<ul><li>a</li><li>b</li></ul>";
        let doc = Markup::parse(src);
        let applied = toggle_list(&doc, TextRange::new(8, 19), "ul").unwrap();
        assert_eq!(applied.markup, "a<br>b");
    }

    #[test]
    fn test_list_switches_kind() {
        let src = "<ul><li>a</li></ul>";
        let doc = Markup::parse(src);
        let applied = toggle_list(&doc, caret(src, "a"), "ol").unwrap();
        assert_eq!(applied.markup, "<ol><li>a</li></ol>");
    }

    #[test]
    fn test_indent_and_outdent() {
        let src = "text";
        let doc = Markup::parse(src);
        let indented = indent(&doc, TextRange::caret(2)).unwrap();
        assert_eq!(indented.markup, format!("{}text{}", INDENT_OPEN, INDENT_CLOSE));

        let doc = Markup::parse(&indented.markup);
        let outdented = outdent(&doc, indented.selection.range()).unwrap();
        assert_eq!(outdented.markup, "text");
        assert_eq!(outdented.selection, Selection::collapsed(2));
    }

    #[test]
    fn test_outdent_without_indent_is_noop() {
        let doc = Markup::parse("text");
        assert!(outdent(&doc, TextRange::caret(0)).is_none());
    }
}
