//! Extraction tunables and the built-in noise registries.
//!
//! The registries are plain data so they can be swapped per language or
//! extended from a TOML file without touching the cleaner.

use std::path::Path;

use serde::Deserialize;

use crate::PdfError;

/// Which built-in skip-section and noise tables to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Russian,
    #[default]
    All,
}

/// Front/back-matter section names, matched as lowercase substrings.
pub const ENGLISH_SKIP_SECTIONS: &[&str] = &[
    "preface",
    "acknowledgments",
    "acknowledgements",
    "about the author",
    "table of contents",
    "bibliography",
    "appendix",
    "notes",
    "copyright",
    "publisher",
    "isbn",
];

pub const RUSSIAN_SKIP_SECTIONS: &[&str] = &[
    "предисловие",
    "благодарности",
    "об авторе",
    "содержание",
    "оглавление",
    "список литературы",
    "приложение",
    "примечания",
    "выходные данные",
    "copyright",
    "isbn",
];

/// Patterns stripped wherever they match, independent of language.
pub const COMMON_NOISE_PATTERNS: &[&str] = &[
    r"©.*?\d{4}",
    r"\(c\).*?\d{4}",
    r"ISBN.*?\d+",
    r"www\..*?\.[a-z]{2,4}",
    r"https?://\S+",
    r"\[.*?\]",
];

pub const ENGLISH_NOISE_PATTERNS: &[&str] = &[
    r"Published by.*?\n",
    r"Publisher.*?\n",
    r"All rights reserved.*?\n",
    r"Printed in.*?\n",
];

pub const RUSSIAN_NOISE_PATTERNS: &[&str] = &[
    r"Издательство.*?\n",
    r"Все права защищены.*?\n",
    r"Подписано в печать.*?\n",
    r"Формат.*?\n",
    r"Тираж.*?\n",
];

impl Language {
    pub fn skip_sections(self) -> Vec<&'static str> {
        let tables: &[&[&str]] = match self {
            Language::English => &[ENGLISH_SKIP_SECTIONS],
            Language::Russian => &[RUSSIAN_SKIP_SECTIONS],
            Language::All => &[ENGLISH_SKIP_SECTIONS, RUSSIAN_SKIP_SECTIONS],
        };
        let mut out: Vec<&str> = Vec::new();
        for entry in tables.iter().flat_map(|t| t.iter()) {
            if !out.contains(entry) {
                out.push(*entry);
            }
        }
        out
    }

    pub fn noise_patterns(self) -> Vec<&'static str> {
        let specific: &[&[&str]] = match self {
            Language::English => &[ENGLISH_NOISE_PATTERNS],
            Language::Russian => &[RUSSIAN_NOISE_PATTERNS],
            Language::All => &[ENGLISH_NOISE_PATTERNS, RUSSIAN_NOISE_PATTERNS],
        };
        COMMON_NOISE_PATTERNS
            .iter()
            .chain(specific.iter().flat_map(|t| t.iter()))
            .copied()
            .collect()
    }
}

/// Tunables for a [`crate::ChapterExtractor`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// A chapter body must be strictly longer than this many characters.
    pub min_chapter_length: usize,
    /// Passing heading checks required out of five.
    pub min_header_votes: usize,
    /// Text with more words than this is never a heading.
    pub max_header_words: usize,
    /// Word count for the "short" heading check.
    pub short_header_words: usize,
    /// A heading size must occur less often than this share of the body size.
    pub header_frequency_ratio: f64,
    pub samples_per_size: usize,
    pub language: Language,
    /// Added to the language's built-in skip sections.
    pub skip_sections: Vec<String>,
    /// Added to the language's built-in noise patterns.
    pub noise_patterns: Vec<String>,
    /// Line prefix that ends a skipped section.
    pub heading_marker: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_chapter_length: 1000,
            min_header_votes: 3,
            max_header_words: 20,
            short_header_words: 15,
            header_frequency_ratio: 0.5,
            samples_per_size: 5,
            language: Language::All,
            skip_sections: Vec::new(),
            noise_patterns: Vec::new(),
            heading_marker: "#".to_string(),
        }
    }
}

impl ExtractorConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, PdfError> {
        toml::from_str(s).map_err(|e| PdfError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, PdfError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Built-in skip sections for the configured language plus the extras,
    /// lowercased and trimmed.
    pub fn skip_section_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .language
            .skip_sections()
            .into_iter()
            .map(str::to_string)
            .collect();
        for extra in &self.skip_sections {
            let extra = extra.trim().to_lowercase();
            if !extra.is_empty() && !names.contains(&extra) {
                names.push(extra);
            }
        }
        names
    }

    pub fn noise_pattern_sources(&self) -> Vec<String> {
        self.language
            .noise_patterns()
            .into_iter()
            .map(str::to_string)
            .chain(self.noise_patterns.iter().cloned())
            .collect()
    }
}
