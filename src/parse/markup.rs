//! Markup scanner
//!
//! Tokenizes the HTML-like editor buffer into text runs and tags with byte
//! spans, and pairs start tags with their end tags. The scanner is lenient:
//! anything that does not look like a tag is treated as text, and unmatched
//! tags simply have no partner.

use serde::{Deserialize, Serialize};

use crate::parse::entities::{decode_entities, reference_spans};
use crate::text::TextRange;

/// Elements that never have an end tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements that start a new line of content
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "footer", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th",
    "thead", "tr", "ul",
];

/// Inline elements that only carry formatting
pub const INLINE_FORMAT_ELEMENTS: &[&str] = &[
    "b", "del", "em", "font", "i", "mark", "s", "span", "strike", "strong", "sub", "sup", "u",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    Text,
    StartTag,
    EndTag,
    /// Void element or explicit `<x/>`
    VoidTag,
    Comment,
}

/// Token with its byte span in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupToken {
    pub kind: TokenKind,
    pub span: TextRange,
    /// Lowercase tag name; empty for text and comments
    pub name: String,
}

impl MarkupToken {
    fn new(kind: TokenKind, start: usize, end: usize, name: String) -> Self {
        Self {
            kind,
            span: TextRange::new(start, end),
            name,
        }
    }

    pub fn is_tag(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::StartTag | TokenKind::EndTag | TokenKind::VoidTag
        )
    }

    /// Block tags and line breaks delimit a block of content
    pub fn is_block_boundary(&self) -> bool {
        match self.kind {
            TokenKind::StartTag | TokenKind::EndTag => is_block(&self.name),
            TokenKind::VoidTag => self.name == "br" || self.name == "hr",
            _ => false,
        }
    }
}

pub fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

pub fn is_inline_format(name: &str) -> bool {
    INLINE_FORMAT_ELEMENTS.contains(&name)
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Tokenize a markup fragment
pub fn tokenize(source: &str) -> Vec<MarkupToken> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' {
            if let Some((token, end)) = scan_tag(source, i) {
                if let Some(start) = text_start.take() {
                    tokens.push(MarkupToken::new(TokenKind::Text, start, i, String::new()));
                }
                tokens.push(token);
                i = end;
                continue;
            }
        }
        if text_start.is_none() {
            text_start = Some(i);
        }
        i += 1;
    }

    if let Some(start) = text_start {
        tokens.push(MarkupToken::new(
            TokenKind::Text,
            start,
            bytes.len(),
            String::new(),
        ));
    }
    tokens
}

/// Try to scan a tag or comment starting at `start` (which holds `<`)
fn scan_tag(source: &str, start: usize) -> Option<(MarkupToken, usize)> {
    let bytes = source.as_bytes();
    let rest = &source[start..];

    if rest.starts_with("<!--") {
        let end = rest[4..].find("-->").map(|i| start + 4 + i + 3)?;
        return Some((
            MarkupToken::new(TokenKind::Comment, start, end, String::new()),
            end,
        ));
    }

    let (is_end, name_start) = if bytes.get(start + 1) == Some(&b'/') {
        (true, start + 2)
    } else {
        (false, start + 1)
    };

    if !bytes.get(name_start)?.is_ascii_alphabetic() {
        return None;
    }

    let name_end = bytes[name_start..]
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'-'))
        .map(|p| name_start + p)
        .unwrap_or(bytes.len());
    let name = source[name_start..name_end].to_ascii_lowercase();
    let end = find_tag_end(bytes, name_end)?;

    let kind = if is_end {
        TokenKind::EndTag
    } else if is_void(&name) || source[..end].ends_with("/>") {
        TokenKind::VoidTag
    } else {
        TokenKind::StartTag
    };
    Some((MarkupToken::new(kind, start, end, name), end))
}

/// Find the byte after the closing `>`, skipping quoted attribute values
fn find_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'>' => return Some(i + 1),
                b'<' => return None,
                _ => {}
            },
        }
    }
    None
}

/// Tokenized markup with start/end tag pairing
#[derive(Debug, Clone)]
pub struct Markup<'a> {
    source: &'a str,
    tokens: Vec<MarkupToken>,
    partners: Vec<Option<usize>>,
}

impl<'a> Markup<'a> {
    pub fn parse(source: &'a str) -> Self {
        let tokens = tokenize(source);
        let partners = pair_tags(&tokens);
        Self {
            source,
            tokens,
            partners,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn tokens(&self) -> &[MarkupToken] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> &MarkupToken {
        &self.tokens[index]
    }

    /// Source text of one token
    pub fn token_source(&self, index: usize) -> &'a str {
        let span = self.tokens[index].span;
        &self.source[span.start..span.end]
    }

    /// Index of the matching start/end tag
    pub fn partner(&self, index: usize) -> Option<usize> {
        self.partners.get(index).copied().flatten()
    }

    pub fn slice(&self, range: TextRange) -> &'a str {
        &self.source[range.start..range.end]
    }

    /// Move range endpoints that fall inside a tag, comment or character
    /// reference out to its edges
    ///
    /// A caret inside a character reference moves to the reference's start.
    pub fn snap(&self, range: TextRange) -> TextRange {
        let mut start = range.start.min(self.source.len());
        let mut end = range.end.min(self.source.len());
        let collapsed = start == end;

        for token in &self.tokens {
            if token.kind != TokenKind::Text {
                if token.span.start < start && start < token.span.end {
                    start = token.span.start;
                }
                if token.span.start < end && end < token.span.end {
                    end = token.span.end;
                }
                continue;
            }
            let offset = token.span.start;
            for (from, to) in reference_spans(self.slice(token.span)) {
                let (from, to) = (offset + from, offset + to);
                if from < start && start < to {
                    start = from;
                }
                if from < end && end < to {
                    end = if collapsed { from } else { to };
                }
            }
        }
        TextRange::new(start, end)
    }

    /// Grow a range until every paired tag inside it has its partner inside
    /// too, so the range can be wrapped without producing overlapping tags
    pub fn balance(&self, range: TextRange) -> TextRange {
        let mut range = self.snap(range);
        loop {
            let mut grown = range;
            for (i, token) in self.tokens.iter().enumerate() {
                if !range.covers(token.span) {
                    continue;
                }
                if let Some(j) = self.partner(i) {
                    let other = self.tokens[j].span;
                    grown = TextRange::new(grown.start.min(other.start), grown.end.max(other.end));
                }
            }
            if grown == range {
                return range;
            }
            range = grown;
        }
    }

    /// True if no tag inside the range has its partner outside it
    pub fn is_balanced(&self, range: TextRange) -> bool {
        self.tokens.iter().enumerate().all(|(i, token)| {
            !range.covers(token.span)
                || self
                    .partner(i)
                    .map(|j| range.covers(self.tokens[j].span))
                    .unwrap_or(true)
        })
    }

    /// Expand a range to the block of content it sits in: bounded by the
    /// buffer edges, block tags and line breaks
    pub fn block_range(&self, range: TextRange) -> TextRange {
        let range = self.snap(range);
        let mut start = 0;
        let mut end = self.source.len();

        for token in self.tokens.iter().filter(|t| t.is_block_boundary()) {
            if token.span.end <= range.start {
                start = start.max(token.span.end);
            } else if token.span.start >= range.end {
                end = end.min(token.span.start);
                break;
            }
        }
        self.balance(TextRange::new(start, end))
    }

    /// Innermost element named in `names` that contains the whole range
    ///
    /// Returns (start tag index, end tag index).
    pub fn enclosing(&self, range: TextRange, names: &[&str]) -> Option<(usize, usize)> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == TokenKind::StartTag && names.contains(&t.name.as_str()))
            .filter(|(_, t)| t.span.end <= range.start)
            .filter_map(|(i, _)| self.partner(i).map(|j| (i, j)))
            .filter(|&(_, j)| self.tokens[j].span.start >= range.end)
            .max_by_key(|&(i, _)| self.tokens[i].span.start)
    }

    /// Element named in `names` that wraps exactly this range, with its tags
    /// either just outside the range or forming its first and last tokens
    pub fn exact_wrapper(&self, range: TextRange, names: &[&str]) -> Option<(usize, usize)> {
        let matches = |i: usize| {
            let t = &self.tokens[i];
            t.kind == TokenKind::StartTag && names.contains(&t.name.as_str())
        };

        for (i, token) in self.tokens.iter().enumerate() {
            let outside = token.span.end == range.start;
            let inside = token.span.start == range.start;
            if !(outside || inside) || !matches(i) {
                continue;
            }
            if let Some(j) = self.partner(i) {
                let close = self.tokens[j].span;
                if (outside && close.start == range.end) || (inside && close.end == range.end) {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// Text runs intersecting the range, clipped to it
    pub fn text_segments(&self, range: TextRange) -> Vec<TextRange> {
        self.tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Text)
            .filter_map(|t| {
                let start = t.span.start.max(range.start);
                let end = t.span.end.min(range.end);
                (start < end).then(|| TextRange::new(start, end))
            })
            .collect()
    }

    /// Decoded plain text inside a range
    pub fn plain_text(&self, range: TextRange) -> String {
        self.text_segments(range)
            .into_iter()
            .map(|seg| decode_entities(self.slice(seg)))
            .collect()
    }
}

/// Pair start tags with end tags using a stack
///
/// An end tag closes the nearest open start tag of the same name; any
/// start tags opened after that one stay unmatched.
fn pair_tags(tokens: &[MarkupToken]) -> Vec<Option<usize>> {
    let mut partners = vec![None; tokens.len()];
    let mut open: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::StartTag => open.push(i),
            TokenKind::EndTag => {
                if let Some(pos) = open.iter().rposition(|&o| tokens[o].name == token.name) {
                    let start = open[pos];
                    open.truncate(pos);
                    partners[start] = Some(i);
                    partners[i] = Some(start);
                }
            }
            _ => {}
        }
    }
    partners
}

/// Decoded plain text of a whole fragment
pub fn plain_text(source: &str) -> String {
    let markup = Markup::parse(source);
    markup.plain_text(TextRange::new(0, source.len()))
}

/// Read an attribute value from a start tag's source
pub fn attribute(tag_source: &str, name: &str) -> Option<String> {
    let lower = tag_source.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut search = 0;

    while let Some(found) = lower[search..].find(name) {
        let at = search + found;
        search = at + name.len();

        let preceded_by_space = at > 0 && bytes[at - 1].is_ascii_whitespace();
        let rest = lower[search..].trim_start();
        if !preceded_by_space || !rest.starts_with('=') {
            continue;
        }
        let value_start = tag_source.len() - rest.len() + 1;
        let value = tag_source[value_start..].trim_start();
        return Some(match value.chars().next() {
            Some(q @ ('"' | '\'')) => value[1..].split(q).next().unwrap_or("").to_string(),
            _ => value
                .split(|c: char| c.is_whitespace() || c == '>' || c == '/')
                .next()
                .unwrap_or("")
                .to_string(),
        });
    }
    None
}

/// Rewrite one CSS property in a start tag's `style` attribute, adding the
/// attribute if it is missing
pub fn set_style_property(tag_source: &str, property: &str, value: &str) -> String {
    let declaration = format!("{}: {};", property, value);
    let existing = attribute(tag_source, "style");

    let kept: Vec<String> = existing
        .as_deref()
        .unwrap_or("")
        .split(';')
        .map(str::trim)
        .filter(|decl| !decl.is_empty())
        .filter(|decl| {
            decl.split(':')
                .next()
                .map(|p| !p.trim().eq_ignore_ascii_case(property))
                .unwrap_or(true)
        })
        .map(|decl| format!("{};", decl))
        .collect();

    let mut style = kept.join(" ");
    if !style.is_empty() {
        style.push(' ');
    }
    style.push_str(&declaration);

    let name_end = tag_source
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(tag_source.len());
    let tag_name = &tag_source[..name_end];

    let mut attrs = without_attribute(&tag_source[name_end..], "style");
    let close = if attrs.trim_end().ends_with("/>") { "/>" } else { ">" };
    let trimmed_len = attrs.trim_end().len() - close.len();
    attrs.truncate(trimmed_len);
    let attrs = attrs.trim_end();

    format!("{}{} style=\"{}\"{}", tag_name, attrs, style, close)
}

/// Remove an attribute (with its value) from the attribute part of a tag
fn without_attribute(attrs: &str, name: &str) -> String {
    let lower = attrs.to_ascii_lowercase();
    let bytes = attrs.as_bytes();
    let mut search = 0;

    while let Some(found) = lower[search..].find(name) {
        let at = search + found;
        search = at + name.len();
        if at == 0 || !bytes[at - 1].is_ascii_whitespace() {
            continue;
        }
        let after_name = &attrs[search..];
        let rest = after_name.trim_start();
        let Some(value) = rest.strip_prefix('=') else {
            continue;
        };
        let value = value.trim_start();
        let value_len = match value.chars().next() {
            Some(q @ ('"' | '\'')) => value[1..].find(q).map(|p| p + 2).unwrap_or(value.len()),
            _ => value
                .find(|c: char| c.is_whitespace() || c == '>')
                .unwrap_or(value.len()),
        };
        let end = attrs.len() - value.len() + value_len;
        let start = attrs[..at].trim_end().len();
        return format!("{}{}", &attrs[..start], &attrs[end..]);
    }
    attrs.to_string()
}
