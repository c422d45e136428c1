//! Boilerplate removal for chapter bodies.
//!
//! Steps run in a fixed order:
//!
//! 1. drop skip-listed sections (a matching line through the next blank line
//!    or heading-marker line, which is kept);
//! 2. strip every noise-pattern match anywhere in the text;
//! 3. collapse runs of blank lines to one;
//! 4. drop stand-alone page-number lines;
//! 5. trim.
//!
//! Dropping a page-number line can leave two blank lines side by side, so
//! step 4 re-collapses. The output is a fixed point of [`TextCleaner::clean`].

use std::sync::OnceLock;

use regex::Regex;

use crate::config::ExtractorConfig;
use crate::PdfError;

#[derive(Debug, Clone)]
pub struct TextCleaner {
    skip_sections: Vec<String>,
    noise_patterns: Vec<Regex>,
    heading_marker: String,
}

fn blank_run_regex() -> &'static Regex {
    static RE_BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    RE_BLANK_RUN.get_or_init(|| Regex::new(r"\n\s*\n").unwrap())
}

impl TextCleaner {
    /// Compile the registries selected by `config`.
    pub fn new(config: &ExtractorConfig) -> Result<Self, PdfError> {
        let noise_patterns = config
            .noise_pattern_sources()
            .iter()
            .map(|src| {
                Regex::new(src)
                    .map_err(|e| PdfError::Config(format!("invalid noise pattern {src:?}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_sections: config.skip_section_names(),
            noise_patterns,
            heading_marker: config.heading_marker.clone(),
        })
    }

    pub fn clean(&self, raw: &str) -> String {
        let text = self.drop_skip_sections(raw);
        let text = self.strip_noise(&text);
        let text = collapse_blank_lines(&text);
        let text = drop_page_numbers(&text);
        text.trim().to_string()
    }

    fn is_skip_line(&self, line: &str) -> bool {
        let lower = line.trim().to_lowercase();
        self.skip_sections.iter().any(|name| lower.contains(name.as_str()))
    }

    fn drop_skip_sections(&self, text: &str) -> String {
        let mut kept: Vec<&str> = Vec::new();
        let mut skipping = false;

        for line in text.split('\n') {
            if self.is_skip_line(line) {
                skipping = true;
                continue;
            }

            let trimmed = line.trim();
            if skipping && (trimmed.is_empty() || trimmed.starts_with(&self.heading_marker)) {
                skipping = false;
            }

            if !skipping {
                kept.push(line);
            }
        }

        kept.join("\n")
    }

    fn strip_noise(&self, text: &str) -> String {
        let mut text = text.to_string();
        for re in &self.noise_patterns {
            text = re.replace_all(&text, "").into_owned();
        }
        text
    }
}

fn collapse_blank_lines(text: &str) -> String {
    blank_run_regex().replace_all(text, "\n\n").into_owned()
}

fn is_page_number(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

fn drop_page_numbers(text: &str) -> String {
    if !text.lines().any(is_page_number) {
        return text.to_string();
    }
    let kept: Vec<&str> = text.split('\n').filter(|l| !is_page_number(l)).collect();
    collapse_blank_lines(&kept.join("\n"))
}

fn default_cleaner() -> &'static TextCleaner {
    static DEFAULT: OnceLock<TextCleaner> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        TextCleaner::new(&ExtractorConfig::default()).expect("built-in noise patterns compile")
    })
}

/// Clean `raw` with the built-in registries for all languages.
pub fn clean_text(raw: &str) -> String {
    default_cleaner().clean(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Language;

    #[test]
    fn passthrough() {
        assert_eq!(clean_text("Plain prose stays."), "Plain prose stays.");
    }

    #[test]
    fn empty_input() {
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn skip_section_runs_to_blank_line() {
        let raw =
            "Body before.\nAcknowledgments\nThanks to my editor.\nAnd my cat.\n\nBody after.";
        assert_eq!(clean_text(raw), "Body before.\n\nBody after.");
    }

    #[test]
    fn skip_section_ends_at_heading_marker_which_is_kept() {
        let raw = "Preface\nWhy I wrote this.\n# Part One\nStory.";
        assert_eq!(clean_text(raw), "# Part One\nStory.");
    }

    #[test]
    fn skip_section_runs_to_end_without_terminator() {
        let raw = "Story.\nBibliography\nSmith, J. A Book.\nDoe, J. Another.";
        assert_eq!(clean_text(raw), "Story.");
    }

    #[test]
    fn skip_match_is_case_insensitive_substring() {
        let raw = "Story.\n  APPENDIX A: Tables  \nrow\n\nMore story.";
        assert_eq!(clean_text(raw), "Story.\n\nMore story.");
    }

    #[test]
    fn russian_skip_section() {
        let raw = "Текст главы.\nПримечания\nсноска один\n\nПродолжение.";
        assert_eq!(clean_text(raw), "Текст главы.\n\nПродолжение.");
    }

    #[test]
    fn no_skip_keyword_survives_as_section_header() {
        let raw = "Intro text.\nNotes\na\nb\n\nPreface\nc\n\nEnd text.";
        let cleaned = clean_text(raw);
        let cleaner = default_cleaner();
        assert!(cleaned.lines().all(|line| !cleaner.is_skip_line(line)));
    }

    #[test]
    fn strips_copyright_inline() {
        assert_eq!(clean_text("Text © Jane Doe 2019 more"), "Text  more");
    }

    #[test]
    fn strips_bracketed_citations_and_urls() {
        let raw = "As shown [12] before, see www.example.com and https://example.org/x now.";
        assert_eq!(clean_text(raw), "As shown  before, see  and  now.");
    }

    #[test]
    fn strips_print_run_lines() {
        let raw = "Story.\nPrinted in the USA\nMore story.";
        assert_eq!(clean_text(raw), "Story.\nMore story.");
    }

    #[test]
    fn strips_russian_print_metadata() {
        let raw = "Текст.\nТираж 3000 экз.\nЕщё текст.";
        assert_eq!(clean_text(raw), "Текст.\nЕщё текст.");
    }

    #[test]
    fn collapses_blank_runs() {
        assert_eq!(clean_text("a\n\n\n \n\nb"), "a\n\nb");
    }

    #[test]
    fn drops_page_number_lines() {
        assert_eq!(
            clean_text("end of page\n  42 \nstart of next"),
            "end of page\nstart of next"
        );
    }

    #[test]
    fn drops_page_number_on_first_line() {
        assert_eq!(clean_text("7\nOpening line."), "Opening line.");
    }

    #[test]
    fn dropped_page_number_leaves_single_blank_line() {
        assert_eq!(clean_text("a\n\n5\n\nb"), "a\n\nb");
    }

    #[test]
    fn drops_consecutive_page_numbers() {
        assert_eq!(clean_text("a\n5\n6\nb"), "a\nb");
    }

    #[test]
    fn keeps_numbers_inside_prose() {
        assert_eq!(clean_text("In 1984 we left."), "In 1984 we left.");
    }

    #[test]
    fn trims_result() {
        assert_eq!(clean_text("\n\n  text  \n\n"), "text");
    }

    #[test]
    fn cleaning_is_idempotent() {
        let raw = "Chapter body line one.\n\n\n12\n\nPreface\nskip me\n\nLine two [3] here.\n\
                   © Someone 2001\n  7  \n\nThe end.\n";
        let once = clean_text(raw);
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn configured_language_limits_registry() {
        let config = ExtractorConfig {
            language: Language::English,
            ..ExtractorConfig::default()
        };
        let cleaner = TextCleaner::new(&config).unwrap();
        let raw = "Текст.\nПримечания\nсноска";
        assert_eq!(cleaner.clean(raw), raw);
    }

    #[test]
    fn custom_heading_marker_ends_skip() {
        let config = ExtractorConfig {
            heading_marker: "==".to_string(),
            ..ExtractorConfig::default()
        };
        let cleaner = TextCleaner::new(&config).unwrap();
        assert_eq!(cleaner.clean("Notes\nx\n== Next\ny"), "== Next\ny");
    }

    #[test]
    fn invalid_pattern_is_config_error() {
        let config = ExtractorConfig {
            noise_patterns: vec!["(unclosed".to_string()],
            ..ExtractorConfig::default()
        };
        assert!(matches!(TextCleaner::new(&config), Err(PdfError::Config(_))));
    }
}
