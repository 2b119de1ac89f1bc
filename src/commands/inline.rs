//! Character formatting commands

use super::Applied;
use crate::parse::{is_inline_format, set_style_property, Markup, TokenKind};
use crate::text::{Splice, TextRange};

/// A toggleable inline format: the tag it writes plus the tags that count
/// as that format when reading existing markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineFormat {
    pub tag: &'static str,
    pub aliases: &'static [&'static str],
}

pub const BOLD: InlineFormat = InlineFormat { tag: "b", aliases: &["b", "strong"] };
pub const ITALIC: InlineFormat = InlineFormat { tag: "i", aliases: &["i", "em"] };
pub const UNDERLINE: InlineFormat = InlineFormat { tag: "u", aliases: &["u"] };
pub const STRIKETHROUGH: InlineFormat = InlineFormat { tag: "s", aliases: &["s", "strike", "del"] };
pub const SUBSCRIPT: InlineFormat = InlineFormat { tag: "sub", aliases: &["sub"] };
pub const SUPERSCRIPT: InlineFormat = InlineFormat { tag: "sup", aliases: &["sup"] };

/// Toggle a format on the selected range
///
/// - Exactly wrapped by the format: the wrapper is removed.
/// - Inside a larger element of the format: that element is split around
///   the range, leaving the range unformatted.
/// - Otherwise: the range is wrapped.
pub fn toggle(doc: &Markup, range: TextRange, format: InlineFormat) -> Option<Applied> {
    if range.is_empty() {
        return None;
    }

    if let Some((open, close)) = doc.exact_wrapper(range, format.aliases) {
        let splices = [
            Splice::delete(doc.token(open).span),
            Splice::delete(doc.token(close).span),
        ];
        return Some(Applied::from_splices(doc.source(), &splices, range));
    }

    if doc.is_balanced(range) {
        if let Some((open, close)) = doc.enclosing(range, format.aliases) {
            return Some(split(doc, open, close, range));
        }
    }

    wrap(
        doc,
        range,
        &format!("<{}>", format.tag),
        &format!("</{}>", format.tag),
    )
}

/// Split the element `open..close` so `range` falls outside it
///
/// The split points move outward past elements nested inside it that
/// start or end exactly at the range edges. Nested elements still cut by a
/// split point are closed before it and reopened after it.
fn split(doc: &Markup, open: usize, close: usize, range: TextRange) -> Applied {
    let open_span = doc.token(open).span;
    let close_span = doc.token(close).span;
    let reopen = doc.token_source(open);
    let closing = format!("</{}>", doc.token(open).name);

    let mut start = range.start;
    let mut nested_at_start = nested_at(doc, open, close, start);
    while let Some(&inner) = nested_at_start.last() {
        if doc.token(inner).span.end != start {
            break;
        }
        start = doc.token(inner).span.start;
        nested_at_start.pop();
    }

    let mut end = range.end;
    let mut nested_at_end = nested_at(doc, open, close, end);
    while let Some(&inner) = nested_at_end.last() {
        let Some(inner_close) = doc.partner(inner) else {
            break;
        };
        if doc.token(inner_close).span.start != end {
            break;
        }
        end = doc.token(inner_close).span.end;
        nested_at_end.pop();
    }

    let before = if open_span.end == start {
        Splice::delete(open_span)
    } else {
        let text = format!(
            "{}{}{}",
            close_tags(doc, &nested_at_start),
            closing,
            open_tags(doc, &nested_at_start)
        );
        Splice::insert(start, text)
    };
    let after = if close_span.start == end {
        Splice::delete(close_span)
    } else {
        let text = format!(
            "{}{}{}",
            close_tags(doc, &nested_at_end),
            reopen,
            open_tags(doc, &nested_at_end)
        );
        Splice::insert(end, text)
    };
    Applied::from_splices(doc.source(), &[before, after], range)
}

/// Elements between `open` and `close` that are still open at `pos`,
/// outermost first
fn nested_at(doc: &Markup, open: usize, close: usize, pos: usize) -> Vec<usize> {
    (open + 1..close)
        .filter(|&i| {
            let token = doc.token(i);
            token.kind == TokenKind::StartTag && token.span.end <= pos
        })
        .filter(|&i| {
            doc.partner(i)
                .map(|j| doc.token(j).span.start >= pos)
                .unwrap_or(false)
        })
        .collect()
}

fn close_tags(doc: &Markup, elements: &[usize]) -> String {
    elements
        .iter()
        .rev()
        .map(|&i| format!("</{}>", doc.token(i).name))
        .collect()
}

fn open_tags(doc: &Markup, elements: &[usize]) -> String {
    elements.iter().map(|&i| doc.token_source(i)).collect()
}

/// Set a CSS property on the range through a `<span>`, reusing a span that
/// already wraps exactly this range
pub fn apply_span_style(doc: &Markup, range: TextRange, property: &str, value: &str) -> Option<Applied> {
    if range.is_empty() {
        return None;
    }

    if let Some((open, _)) = doc.exact_wrapper(range, &["span"]) {
        let source = doc.token_source(open);
        let restyled = set_style_property(source, property, value);
        if restyled == source {
            return None;
        }
        let splices = [Splice::new(doc.token(open).span, restyled)];
        return Some(Applied::from_splices(doc.source(), &splices, range));
    }

    wrap(
        doc,
        range,
        &format!("<span style=\"{}: {};\">", property, value),
        "</span>",
    )
}

/// Strip inline formatting from the range
///
/// Removes every formatting element whose text lies entirely inside the
/// range. Elements that also format text outside the range are kept.
pub fn remove_format(doc: &Markup, range: TextRange) -> Option<Applied> {
    if range.is_empty() {
        return None;
    }

    let tokens = doc.tokens();
    let mut removed: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::StartTag || !is_inline_format(&token.name) {
            continue;
        }
        let Some(j) = doc.partner(i) else {
            continue;
        };
        let element = TextRange::new(token.span.start, tokens[j].span.end);
        let segments = doc.text_segments(TextRange::new(token.span.end, tokens[j].span.start));
        let inside = if segments.is_empty() {
            range.covers(element)
        } else {
            segments.iter().all(|seg| range.covers(*seg))
        };
        if inside {
            removed.push(i);
            removed.push(j);
        }
    }

    if removed.is_empty() {
        return None;
    }
    removed.sort_unstable();

    let splices: Vec<Splice> = removed
        .into_iter()
        .map(|i| Splice::delete(tokens[i].span))
        .collect();
    Some(Applied::from_splices(doc.source(), &splices, range))
}

/// Wrap the range in `open`/`close`
///
/// A range that cuts through other elements cannot be wrapped as one piece
/// without overlapping tags, so each text run inside it is wrapped instead.
fn wrap(doc: &Markup, range: TextRange, open: &str, close: &str) -> Option<Applied> {
    let splices: Vec<Splice> = if doc.is_balanced(range) {
        vec![Splice::insert(range.start, open), Splice::insert(range.end, close)]
    } else {
        doc.text_segments(range)
            .into_iter()
            .flat_map(|seg| [Splice::insert(seg.start, open), Splice::insert(seg.end, close)])
            .collect()
    };

    if splices.is_empty() {
        return None;
    }
    Some(Applied::from_splices(doc.source(), &splices, range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Selection;

    fn toggle_on(src: &str, start: usize, end: usize, format: InlineFormat) -> Applied {
        let doc = Markup::parse(src);
        toggle(&doc, TextRange::new(start, end), format).unwrap()
    }

    #[test]
    fn test_toggle_unwraps_outside_wrapper() {
        // Selection covers only the text inside <b>...</b>
        let applied = toggle_on("<b>Hello</b>", 3, 8, BOLD);
        assert_eq!(applied.markup, "Hello");
        assert_eq!(applied.selection, Selection::new(0, 5));
    }

    #[test]
    fn test_toggle_unwraps_inside_wrapper() {
        let applied = toggle_on("x<strong>Hi</strong>y", 1, 20, BOLD);
        assert_eq!(applied.markup, "xHiy");
        assert_eq!(applied.selection, Selection::new(1, 3));
    }

    #[test]
    fn test_toggle_splits_enclosing_element() {
        let applied = toggle_on("<b>Hello world</b>", 9, 14, BOLD);
        assert_eq!(applied.markup, "<b>Hello </b>world");
        let applied = toggle_on("<b>Hello world</b>", 3, 8, BOLD);
        assert_eq!(applied.markup, "Hello<b> world</b>");
    }

    #[test]
    fn test_toggle_split_moves_past_nested_element() {
        // "Hello" fills the <i> inside the bold element
        let applied = toggle_on("<b><i>Hello</i> world</b>", 6, 11, BOLD);
        assert_eq!(applied.markup, "<i>Hello</i><b> world</b>");
        assert_eq!(applied.selection, Selection::new(3, 8));
    }

    #[test]
    fn test_toggle_split_reopens_cut_nested_element() {
        let applied = toggle_on("<b><i>Hello there</i> world</b>", 12, 17, BOLD);
        assert_eq!(
            applied.markup,
            "<b><i>Hello </i></b><i>there</i><b> world</b>"
        );
        assert_eq!(applied.selection, Selection::new(23, 28));
    }

    #[test]
    fn test_partial_overlap_wraps_each_text_run() {
        // Selection starts before <i> and ends inside it
        let src = "ab<i>cd</i>";
        let applied = toggle_on(src, 1, 6, UNDERLINE);
        assert_eq!(applied.markup, "a<u>b</u><i><u>c</u>d</i>");
    }

    #[test]
    fn test_span_style_reuses_span() {
        let src = r#"<span style="color: red;">Hi</span>"#;
        let doc = Markup::parse(src);
        let applied = apply_span_style(&doc, TextRange::new(26, 28), "color", "blue").unwrap();
        assert_eq!(applied.markup, r#"<span style="color: blue;">Hi</span>"#);
    }

    #[test]
    fn test_remove_format() {
        let src = "<b><i>Hi</i></b> <u>there</u>!";
        let doc = Markup::parse(src);
        let applied = remove_format(&doc, TextRange::new(6, 29)).unwrap();
        assert_eq!(applied.markup, "Hi there!");
        assert_eq!(applied.selection, Selection::new(0, 8));
    }

    #[test]
    fn test_remove_format_keeps_partially_selected_element() {
        let src = "<b>Hello world</b>";
        let doc = Markup::parse(src);
        assert!(remove_format(&doc, TextRange::new(9, 14)).is_none());
    }

    #[test]
    fn test_remove_format_without_formatting() {
        let doc = Markup::parse("plain");
        assert!(remove_format(&doc, TextRange::new(0, 5)).is_none());
    }
}
