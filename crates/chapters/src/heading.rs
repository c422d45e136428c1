//! Chapter-heading classification.
//!
//! Font size is a hard gate: only sizes the profile marked as heading sizes
//! qualify. Past the gate, five independent textual checks vote and a
//! heading needs `min_header_votes` of them. Large text that reads like a
//! sentence (pull quotes, emphasized body) loses the vote.

use crate::config::ExtractorConfig;
use crate::types::{DocumentLayoutProfile, FontSize};

/// One textual heading check, applied to trimmed text.
pub struct HeadingCheck {
    pub name: &'static str,
    pub test: fn(&str, &ExtractorConfig) -> bool,
}

fn starts_uppercase(text: &str, _: &ExtractorConfig) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

fn has_digit(text: &str, _: &ExtractorConfig) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn no_trailing_period(text: &str, _: &ExtractorConfig) -> bool {
    !text.ends_with('.')
}

fn is_short(text: &str, config: &ExtractorConfig) -> bool {
    word_count(text) <= config.short_header_words
}

fn no_clause_punctuation(text: &str, _: &ExtractorConfig) -> bool {
    !text.contains([',', ':', ';'])
}

pub const HEADING_CHECKS: [HeadingCheck; 5] = [
    HeadingCheck {
        name: "starts-uppercase",
        test: starts_uppercase,
    },
    HeadingCheck {
        name: "has-digit",
        test: has_digit,
    },
    HeadingCheck {
        name: "no-trailing-period",
        test: no_trailing_period,
    },
    HeadingCheck {
        name: "short",
        test: is_short,
    },
    HeadingCheck {
        name: "no-clause-punctuation",
        test: no_clause_punctuation,
    },
];

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of [`HEADING_CHECKS`] that `text` passes.
pub fn heading_votes(text: &str, config: &ExtractorConfig) -> usize {
    let text = text.trim();
    HEADING_CHECKS
        .iter()
        .filter(|check| (check.test)(text, config))
        .count()
}

/// Classify a span with explicit tunables.
pub fn classify(
    text: &str,
    font_size: FontSize,
    profile: &DocumentLayoutProfile,
    config: &ExtractorConfig,
) -> bool {
    if !profile.is_header_size(font_size) {
        return false;
    }

    let text = text.trim();
    if text.is_empty() || word_count(text) > config.max_header_words {
        return false;
    }

    heading_votes(text, config) >= config.min_header_votes
}

/// Whether `text` set at `font_size` looks like a chapter heading, using the
/// default tunables.
pub fn is_potential_header(
    text: &str,
    font_size: FontSize,
    profile: &DocumentLayoutProfile,
) -> bool {
    classify(text, font_size, profile, &ExtractorConfig::default())
}
