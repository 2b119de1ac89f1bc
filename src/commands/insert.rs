//! Insertion sub-operations
//!
//! Every insertion removes the selected range, puts the fragment in its
//! place and collapses the selection to the end of the inserted content.

use super::Applied;
use crate::error::{EditorError, EditorResult};
use crate::parse::{escape_attr, escape_text, Markup, TokenKind};
use crate::text::{Selection, TextRange};

const TABLE_STYLE: &str = "border-collapse: collapse; width: 100%;";
const CELL_STYLE: &str = "border: 1px solid #ccc; padding: 8px;";

/// URL schemes a link may use; scheme-less URLs are treated as relative
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Replace `range` with `fragment`, leaving a caret after it
///
/// Only the selected content is removed. A tag inside the range whose
/// partner lies outside it belongs to an element that continues past the
/// selection, so it stays in place after the fragment.
pub fn replace_range(doc: &Markup, range: TextRange, fragment: &str) -> Applied {
    let source = doc.source();
    let kept: String = doc
        .tokens()
        .iter()
        .enumerate()
        .filter(|(_, token)| token.is_tag() && range.covers(token.span))
        .filter(|&(i, _)| crosses_edge(doc, i, range))
        .map(|(i, _)| doc.token_source(i))
        .collect();

    let markup = format!(
        "{}{}{}{}",
        &source[..range.start],
        fragment,
        kept,
        &source[range.end..]
    );
    Applied {
        markup,
        selection: Selection::collapsed(range.start + fragment.len()),
    }
}

/// Markup for the selected range on its own
///
/// Elements cut by the range edges are closed or reopened so the result
/// is balanced: `xx<b>He` becomes `xx<b>He</b>`.
pub fn selected_markup(doc: &Markup, range: TextRange) -> String {
    let mut reopen: Vec<usize> = Vec::new();
    let mut unclosed: Vec<usize> = Vec::new();

    for (i, token) in doc.tokens().iter().enumerate() {
        if !token.is_tag() || !range.covers(token.span) || !crosses_edge(doc, i, range) {
            continue;
        }
        match (token.kind, doc.partner(i)) {
            (TokenKind::StartTag, _) => unclosed.push(i),
            (TokenKind::EndTag, Some(open)) => reopen.push(open),
            _ => {}
        }
    }
    reopen.sort_unstable();

    let mut out: String = reopen.iter().map(|&i| doc.token_source(i)).collect();
    out.push_str(doc.slice(range));
    for &i in unclosed.iter().rev() {
        out.push_str(&format!("</{}>", doc.token(i).name));
    }
    out
}

/// True for a paired tag whose partner lies outside `range`
fn crosses_edge(doc: &Markup, index: usize, range: TextRange) -> bool {
    doc.partner(index)
        .map(|j| !range.covers(doc.token(j).span))
        .unwrap_or(false)
}

/// Replace the selection with a markup fragment
pub fn insert_fragment(markup: &str, selection: Selection, fragment: &str) -> Applied {
    let doc = Markup::parse(markup);
    let range = doc.snap(selection.clamp_to(markup).range());
    replace_range(&doc, range, fragment)
}

/// Grid of uniformly styled empty cells
pub fn table_markup(rows: usize, cols: usize) -> String {
    let cell = format!("<td style=\"{}\">&nbsp;</td>", CELL_STYLE);
    let row = format!("<tr>{}</tr>", cell.repeat(cols));
    format!(
        "<table style=\"{}\"><tbody>{}</tbody></table>",
        TABLE_STYLE,
        row.repeat(rows)
    )
}

pub fn validate_table_dimensions(rows: usize, cols: usize, max: usize) -> EditorResult<()> {
    if rows == 0 || cols == 0 || rows > max || cols > max {
        return Err(EditorError::InvalidDimensions { rows, cols, max });
    }
    Ok(())
}

/// Anchor markup for a link, or `None` when either field is blank
pub fn link_markup(url: &str, text: &str) -> EditorResult<Option<String>> {
    let url = url.trim();
    let text = text.trim();
    if url.is_empty() || text.is_empty() {
        return Ok(None);
    }
    if !is_safe_url(url) {
        return Err(EditorError::UnsafeUrl(url.to_string()));
    }
    Ok(Some(format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        escape_attr(url),
        escape_text(text)
    )))
}

/// True for http(s)/mailto/tel URLs and for relative URLs
pub fn is_safe_url(url: &str) -> bool {
    let url = url.trim();
    let scheme_end = url.find(':');
    let path_start = url.find(['/', '?', '#']);

    match (scheme_end, path_start) {
        (Some(colon), Some(path)) if path < colon => true,
        (Some(colon), _) => {
            let scheme = url[..colon].to_ascii_lowercase();
            SAFE_SCHEMES.contains(&scheme.as_str())
        }
        (None, _) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_markup_dimensions() {
        let table = table_markup(2, 3);
        assert_eq!(table.matches("<tr>").count(), 2);
        assert_eq!(table.matches("<td ").count(), 6);
        assert!(table.starts_with("<table"));
        assert!(table.ends_with("</tbody></table>"));
    }

    #[test]
    fn test_dimension_bounds() {
        assert!(validate_table_dimensions(2, 3, 20).is_ok());
        assert!(validate_table_dimensions(0, 3, 20).is_err());
        assert!(validate_table_dimensions(2, 21, 20).is_err());
    }

    #[test]
    fn test_link_markup_escapes() {
        let link = link_markup("https://example.com/?a=1&b=\"2\"", "Fish & <Chips>")
            .unwrap()
            .unwrap();
        assert_eq!(
            link,
            "<a href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\" target=\"_blank\" rel=\"noopener noreferrer\">Fish &amp; &lt;Chips&gt;</a>"
        );
    }

    #[test]
    fn test_link_blank_fields_abort() {
        assert_eq!(link_markup("", "text").unwrap(), None);
        assert_eq!(link_markup("https://example.com", "   ").unwrap(), None);
    }

    #[test]
    fn test_unsafe_schemes_rejected() {
        assert!(matches!(
            link_markup("javascript:alert(1)", "x"),
            Err(EditorError::UnsafeUrl(_))
        ));
        assert!(!is_safe_url("JaVaScRiPt:alert(1)"));
        assert!(!is_safe_url("data:text/html,hi"));
        assert!(is_safe_url("/lessons/3"));
        assert!(is_safe_url("page?ref=a:b"));
        assert!(is_safe_url("mailto:teacher@example.com"));
    }

    #[test]
    fn test_insert_fragment_replaces_selection() {
        let applied = insert_fragment("Hello world", Selection::new(6, 11), "<i>there</i>");
        assert_eq!(applied.markup, "Hello <i>there</i>");
        assert_eq!(applied.selection, Selection::collapsed(18));
    }

    #[test]
    fn test_insert_keeps_unselected_part_of_element() {
        // Selection covers "xx<b>He", the element continues past it
        let applied = insert_fragment("xx<b>Hello</b>", Selection::new(0, 7), "Z");
        assert_eq!(applied.markup, "Z<b>llo</b>");
        assert_eq!(applied.selection, Selection::collapsed(1));

        let applied = insert_fragment("<b>Hello</b> world", Selection::new(5, 16), "Z");
        assert_eq!(applied.markup, "<b>HeZ</b>ld");
    }

    #[test]
    fn test_insert_drops_elements_wholly_selected() {
        let applied = insert_fragment("a<i>b</i>c<br>d", Selection::new(1, 14), "");
        assert_eq!(applied.markup, "ad");
    }

    #[test]
    fn test_selected_markup_closes_cut_elements() {
        let doc = Markup::parse("xx<b>Hello</b>");
        assert_eq!(selected_markup(&doc, TextRange::new(0, 7)), "xx<b>He</b>");

        let doc = Markup::parse("<b><i>Hello</i> world</b>!");
        assert_eq!(
            selected_markup(&doc, TextRange::new(8, 26)),
            "<b><i>llo</i> world</b>!"
        );
    }
}
