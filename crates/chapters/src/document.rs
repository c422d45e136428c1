//! Typed view of a PDF as pages of font-sized text spans.
//!
//! The heuristics only ever see [`Document`], [`Page`] and [`Span`]; how the
//! spans were obtained stays behind [`PdfBackend`].

use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::parser::backend::{LopdfBackend, PdfBackend};
use crate::parser::layout;
use crate::types::FontSize;
use crate::PdfError;

/// A run of text set in one font size.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub font_size: FontSize,
}

impl Span {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size: FontSize::from_points(font_size),
        }
    }
}

/// A page's spans in reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    spans: Vec<Span>,
}

impl Page {
    pub fn new(number: usize, spans: Vec<Span>) -> Self {
        Self { number, spans }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    pub fn from_pages(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Read a PDF from local storage.
    ///
    /// The parsed PDF is released before this returns, on success and on error.
    pub fn open(path: &Path) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load(path)?;
        log::debug!("{}: {} pages", path.display(), backend.page_count());
        Self::from_backend(&backend)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        let backend = LopdfBackend::load_bytes(bytes)?;
        log::debug!("in-memory PDF: {} pages", backend.page_count());
        Self::from_backend(&backend)
    }

    /// Lay out every page of `backend` into reading-order spans.
    ///
    /// A page whose content stream cannot be decoded is kept as an empty page.
    pub fn from_backend(backend: &dyn PdfBackend) -> Result<Self, PdfError> {
        let mut pages = Vec::new();

        for (&number, &page_id) in &backend.pages() {
            let raw = match layout::extract_page_spans(backend, page_id) {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("page {}: skipping unreadable content: {}", number, e);
                    Vec::new()
                }
            };
            let spans = layout::group_spans_into_lines(raw)
                .into_iter()
                .flat_map(|line| line.spans)
                .map(|raw| Span {
                    text: normalize_text(&raw.text),
                    font_size: FontSize::from_points(raw.font_size),
                })
                .collect();
            pages.push(Page::new(number as usize, spans));
        }

        log::debug!(
            "laid out {} pages, {} spans",
            pages.len(),
            pages.iter().map(|p| p.spans.len()).sum::<usize>()
        );

        Ok(Self { pages })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Every span with its page number, in reading order.
    pub fn spans(&self) -> impl Iterator<Item = (usize, &Span)> {
        self.pages
            .iter()
            .flat_map(|page| page.spans.iter().map(move |span| (page.number, span)))
    }
}

/// NFC-normalize, expand typographic ligatures and drop replacement characters.
pub fn normalize_text(text: &str) -> String {
    const LIGATURES: [(char, &str); 5] = [
        ('\u{FB00}', "ff"),
        ('\u{FB01}', "fi"),
        ('\u{FB02}', "fl"),
        ('\u{FB03}', "ffi"),
        ('\u{FB04}', "ffl"),
    ];

    let mut out = String::with_capacity(text.len());
    for c in text.nfc() {
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, expanded)) => out.push_str(expanded),
            None if c == '\u{FFFD}' => {}
            None => out.push(c),
        }
    }
    out
}
