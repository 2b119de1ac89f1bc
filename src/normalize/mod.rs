//! Content normalizer
//!
//! Detects text runs that look like they were stored character-reversed:
//! the reversed run contains a common word that the stored run does not.
//! This is a guess, so it never runs silently. `Detect` reports candidates
//! for the host to confirm; only `Repair` rewrites the buffer, and every
//! rewrite is logged.

use serde::{Deserialize, Serialize};

use crate::parse::{decode_entities, escape_text, Markup, TokenKind};
use crate::text::{apply_splices, Splice, TextRange};

/// Words whose presence in the reversed text triggers a repair
pub const COMMON_WORDS: &[&str] = &[
    "the", "and", "that", "this", "with", "from", "have", "hello", "welcome", "lesson", "chapter",
    "course", "student", "teacher",
];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NormalizerMode {
    /// Content is loaded exactly as stored
    #[default]
    Off,
    /// Candidates are reported but the buffer is left alone
    Detect,
    /// Candidates are rewritten on load
    Repair,
}

/// One suspected reversed text run
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DirectionRepair {
    /// Span of the text run in the markup it was detected in
    pub span: TextRange,
    /// Raw markup of the run as stored
    pub original: String,
    /// Escaped markup of the reversed run
    pub replacement: String,
}

/// Result of normalizing a fragment
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Normalized {
    pub markup: String,
    /// Applied repairs in `Repair` mode, pending candidates in `Detect` mode
    pub repairs: Vec<DirectionRepair>,
}

impl Normalized {
    pub fn changed(&self, input: &str) -> bool {
        self.markup != input
    }
}

/// Normalize freshly loaded content
pub fn clean(markup: &str, mode: NormalizerMode) -> Normalized {
    match mode {
        NormalizerMode::Off => Normalized {
            markup: markup.to_string(),
            repairs: Vec::new(),
        },
        NormalizerMode::Detect => {
            let repairs = detect(markup);
            if !repairs.is_empty() {
                log::info!(
                    "normalizer: {} suspected reversed text run(s) awaiting confirmation",
                    repairs.len()
                );
            }
            Normalized {
                markup: markup.to_string(),
                repairs,
            }
        }
        NormalizerMode::Repair => {
            let repairs = detect(markup);
            let markup = apply_repairs(markup, &repairs);
            Normalized { markup, repairs }
        }
    }
}

/// Find text runs whose reversed form reads as common words
pub fn detect(markup: &str) -> Vec<DirectionRepair> {
    let parsed = Markup::parse(markup);

    parsed
        .tokens()
        .iter()
        .filter(|t| t.kind == TokenKind::Text)
        .filter_map(|token| {
            let raw = parsed.slice(token.span);
            let text = decode_entities(raw);
            if text.trim().is_empty() {
                return None;
            }
            let reversed: String = text.chars().rev().collect();
            if contains_common_word(&reversed) && !contains_common_word(&text) {
                Some(DirectionRepair {
                    span: token.span,
                    original: raw.to_string(),
                    replacement: escape_text(&reversed).replace('\u{a0}', "&nbsp;"),
                })
            } else {
                None
            }
        })
        .collect()
}

/// Apply repairs whose span still holds the text they were detected on
pub fn apply_repairs(markup: &str, repairs: &[DirectionRepair]) -> String {
    let splices: Vec<Splice> = repairs
        .iter()
        .filter(|r| still_matches(markup, r))
        .map(|r| {
            log::warn!(
                "normalizer: reversing text run at {}..{}: {:?} -> {:?}",
                r.span.start,
                r.span.end,
                r.original,
                r.replacement
            );
            Splice::new(r.span, r.replacement.clone())
        })
        .collect();
    apply_splices(markup, &splices)
}

fn still_matches(markup: &str, repair: &DirectionRepair) -> bool {
    let TextRange { start, end } = repair.span;
    markup.get(start..end) == Some(repair.original.as_str())
}

fn contains_common_word(text: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .any(|w| {
            let lower = w.to_lowercase();
            COMMON_WORDS.contains(&lower.as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_is_identity() {
        let input = "<p>olleH dlrow</p>";
        let out = clean(input, NormalizerMode::Off);
        assert_eq!(out.markup, input);
        assert!(out.repairs.is_empty());
    }

    #[test]
    fn test_detect_reports_without_mutating() {
        let input = "<p>olleH dlrow</p>";
        let out = clean(input, NormalizerMode::Detect);
        assert_eq!(out.markup, input);
        assert_eq!(out.repairs.len(), 1);
        assert_eq!(out.repairs[0].replacement, "world Hello");
        assert_eq!(out.repairs[0].span, TextRange::new(3, 14));
    }

    #[test]
    fn test_repair_rewrites_only_reversed_runs() {
        let input = "<p>olleH dlrow</p><p>Hello again</p>";
        let out = clean(input, NormalizerMode::Repair);
        assert_eq!(out.markup, "<p>world Hello</p><p>Hello again</p>");
        assert!(out.changed(input));
    }

    #[test]
    fn test_clean_input_untouched() {
        let input = "<h1>Photosynthesis</h1><p>Plants convert light into energy.</p>";
        let out = clean(input, NormalizerMode::Repair);
        assert_eq!(out.markup, input);
        assert!(out.repairs.is_empty());
    }

    #[test]
    fn test_entities_survive_reversal() {
        // "the & cat" stored reversed
        let input = "tac &amp; eht";
        let out = clean(input, NormalizerMode::Repair);
        assert_eq!(out.markup, "the &amp; cat");
    }

    #[test]
    fn test_non_breaking_space_stays_encoded() {
        let out = clean("<p>olleH&nbsp;dlrow</p>", NormalizerMode::Repair);
        assert_eq!(out.markup, "<p>world&nbsp;Hello</p>");
    }

    #[test]
    fn test_stale_repair_skipped() {
        let repairs = detect("olleH");
        assert_eq!(apply_repairs("changed", &repairs), "changed");
    }

    #[test]
    fn test_whole_word_matching() {
        // "ehtla" reversed is "althe": no whole common word
        assert!(detect("ehtla").is_empty());
    }
}
