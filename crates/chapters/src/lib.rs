//! Recover chapter structure from PDF books that carry no usable outline.
//!
//! Extraction runs in two passes over the laid-out text:
//!
//! 1. [`profile`] builds a font-size histogram and picks the body size and
//!    the larger, rarer heading sizes.
//! 2. [`assembler`] walks the spans in reading order, asks [`heading`]
//!    whether each one opens a chapter, and hands finished chapter bodies to
//!    [`clean`] before applying the minimum-length filter.
//!
//! [`files`] writes the result as `chapter_NN.txt` files for the mind-map
//! stage.

use std::path::Path;

use thiserror::Error;

pub mod assembler;
pub mod clean;
pub mod config;
pub mod document;
pub mod files;
pub mod heading;
pub mod parser;
pub mod profile;
pub mod types;

pub use clean::{clean_text, TextCleaner};
pub use config::{ExtractorConfig, Language};
pub use document::{Document, Page, Span};
pub use files::{
    mindmap_file_name, pending_chapter_files, read_chapter_file, save_chapters_to_files,
};
pub use heading::is_potential_header;
pub use profile::analyze_document_structure;
pub use types::*;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("No text found in document")]
    NoText,
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Invalid chapter file: {0}")]
    InvalidChapterFile(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Chapter extraction with a fixed set of tunables.
///
/// Construction compiles the noise patterns once; the extractor can then be
/// reused across documents.
#[derive(Debug, Clone)]
pub struct ChapterExtractor {
    config: ExtractorConfig,
    cleaner: TextCleaner,
}

impl ChapterExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, PdfError> {
        let cleaner = TextCleaner::new(&config)?;
        Ok(Self { config, cleaner })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Layout profile of `doc` under this extractor's tunables.
    pub fn profile(&self, doc: &Document) -> Result<DocumentLayoutProfile, PdfError> {
        profile::build_profile(doc, &self.config)
    }

    /// Chapters of `doc` in reading order.
    ///
    /// A document without any text yields no chapters rather than an error.
    pub fn extract(&self, doc: &Document) -> Result<Vec<Chapter>, PdfError> {
        let layout = match self.profile(doc) {
            Ok(layout) => layout,
            Err(PdfError::NoText) => {
                log::warn!("no extractable text; returning no chapters");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut assembler = assembler::ChapterAssembler::new(&self.cleaner, &self.config);
        for (page, span) in doc.spans() {
            if heading::classify(&span.text, span.font_size, &layout, &self.config) {
                assembler.heading(&span.text, page);
            } else {
                assembler.body(&span.text);
            }
        }

        let headings = assembler.headings_seen();
        let chapters = assembler.finish();
        log::info!(
            "extracted {} chapters from {} headings over {} pages",
            chapters.len(),
            headings,
            doc.pages().len()
        );
        Ok(chapters)
    }

    /// Open, lay out and extract the PDF at `path`.
    pub fn extract_path(&self, path: &Path) -> Result<Vec<Chapter>, PdfError> {
        let doc = Document::open(path)?;
        self.extract(&doc)
    }

    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Vec<Chapter>, PdfError> {
        let doc = Document::from_bytes(bytes)?;
        self.extract(&doc)
    }
}

fn default_extractor() -> Result<ChapterExtractor, PdfError> {
    ChapterExtractor::new(ExtractorConfig::default())
}

/// Extract chapters from the PDF at `path` with the default tunables.
///
/// Unreadable or corrupt files are errors; a readable PDF without headings
/// or text returns an empty list.
pub fn extract_chapters(path: &Path) -> Result<Vec<Chapter>, PdfError> {
    default_extractor()?.extract_path(path)
}

pub fn extract_chapters_from_bytes(bytes: &[u8]) -> Result<Vec<Chapter>, PdfError> {
    default_extractor()?.extract_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_span(text: &str, size: f32) -> Span {
        Span::new(text, size)
    }

    fn paragraph(seed: &str, n: usize) -> Vec<Span> {
        (0..n)
            .map(|i| make_span(&format!("{seed} line {i} of the running prose."), 10.0))
            .collect()
    }

    fn book() -> Document {
        let mut first = vec![make_span("A Book Title Page", 10.0)];
        first.push(make_span("Chapter 1", 18.0));
        first.extend(paragraph("Opening", 40));
        let mut second = vec![make_span("Chapter 2", 18.0)];
        second.extend(paragraph("Middle", 40));
        second.push(make_span("Chapter 3", 18.0));
        second.extend(paragraph("Short", 2));
        Document::from_pages(vec![Page::new(1, first), Page::new(2, second)])
    }

    #[test]
    fn extracts_chapters_in_heading_order() {
        let extractor = ChapterExtractor::new(ExtractorConfig::default()).unwrap();
        let chapters = extractor.extract(&book()).unwrap();

        let titles: Vec<&str> = chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Chapter 1", "Chapter 2"]);
        assert_eq!(chapters[0].page, 1);
        assert_eq!(chapters[1].page, 2);
        assert!(chapters.iter().all(|c| c.len() > 1000));
        assert!(!chapters[0].body.contains("Title Page"));
    }

    #[test]
    fn large_sentence_is_body_text() {
        let mut spans = vec![make_span("Chapter 1", 18.0)];
        spans.extend(paragraph("Body", 40));
        spans.push(make_span("this pull quote is set large, for effect.", 18.0));
        let doc = Document::from_pages(vec![Page::new(1, spans)]);

        let chapters = extract_with_defaults(&doc);
        assert_eq!(chapters.len(), 1);
        assert!(chapters[0].body.ends_with("for effect."));
    }

    #[test]
    fn single_font_document_yields_no_chapters() {
        let mut spans = vec![make_span("Chapter 1", 10.0)];
        spans.extend(paragraph("Body", 60));
        let doc = Document::from_pages(vec![Page::new(1, spans)]);

        assert!(extract_with_defaults(&doc).is_empty());
    }

    #[test]
    fn empty_document_yields_no_chapters() {
        assert!(extract_with_defaults(&Document::default()).is_empty());
    }

    #[test]
    fn profile_surfaces_no_text() {
        let extractor = ChapterExtractor::new(ExtractorConfig::default()).unwrap();
        assert!(matches!(
            extractor.profile(&Document::default()),
            Err(PdfError::NoText)
        ));
    }

    #[test]
    fn custom_minimum_length_keeps_short_chapter() {
        let config = ExtractorConfig {
            min_chapter_length: 50,
            ..ExtractorConfig::default()
        };
        let extractor = ChapterExtractor::new(config).unwrap();
        let chapters = extractor.extract(&book()).unwrap();
        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[2].title, "Chapter 3");
    }

    #[test]
    fn invalid_config_fails_construction() {
        let config = ExtractorConfig {
            noise_patterns: vec!["[".to_string()],
            ..ExtractorConfig::default()
        };
        assert!(matches!(
            ChapterExtractor::new(config),
            Err(PdfError::Config(_))
        ));
    }

    #[test]
    fn corrupt_bytes_are_parse_errors() {
        assert!(matches!(
            extract_chapters_from_bytes(b"not a pdf at all"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            extract_chapters(Path::new("/nonexistent/book.pdf")),
            Err(PdfError::Io(_))
        ));
    }

    fn extract_with_defaults(doc: &Document) -> Vec<Chapter> {
        ChapterExtractor::new(ExtractorConfig::default())
            .unwrap()
            .extract(doc)
            .unwrap()
    }
}
