//! Reading-order walk that turns classified spans into chapters.
//!
//! ```text
//!                 heading                         heading (close + filter)
//! NoOpenChapter ----------> ChapterOpen(title) ---------------------------+
//!      |                        ^    |                                    |
//!      | body: dropped          |    | body: appended                     |
//!      v                        +----+------------------------------------+
//! ```
//!
//! Closing a chapter cleans its accumulated lines; the chapter is kept only
//! when the cleaned body is longer than `min_chapter_length`. Short chapters
//! are dropped, never merged into a neighbour.

use crate::clean::TextCleaner;
use crate::config::ExtractorConfig;
use crate::types::Chapter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblerState {
    NoOpenChapter,
    ChapterOpen {
        title: String,
        page: usize,
        lines: Vec<String>,
    },
}

pub struct ChapterAssembler<'a> {
    cleaner: &'a TextCleaner,
    min_chapter_length: usize,
    state: AssemblerState,
    chapters: Vec<Chapter>,
    headings_seen: usize,
}

impl<'a> ChapterAssembler<'a> {
    pub fn new(cleaner: &'a TextCleaner, config: &ExtractorConfig) -> Self {
        Self {
            cleaner,
            min_chapter_length: config.min_chapter_length,
            state: AssemblerState::NoOpenChapter,
            chapters: Vec::new(),
            headings_seen: 0,
        }
    }

    pub fn state(&self) -> &AssemblerState {
        &self.state
    }

    pub fn headings_seen(&self) -> usize {
        self.headings_seen
    }

    /// A span classified as a heading: close the open chapter, open a new one.
    pub fn heading(&mut self, title: &str, page: usize) {
        self.headings_seen += 1;
        let next = AssemblerState::ChapterOpen {
            title: title.trim().to_string(),
            page,
            lines: Vec::new(),
        };
        let previous = std::mem::replace(&mut self.state, next);
        self.close(previous);
    }

    /// A non-heading span: part of the open chapter's body, if there is one.
    pub fn body(&mut self, text: &str) {
        match &mut self.state {
            AssemblerState::ChapterOpen { lines, .. } => lines.push(text.trim().to_string()),
            AssemblerState::NoOpenChapter => {}
        }
    }

    /// End of document: close whatever is open and return the chapters in
    /// heading order.
    pub fn finish(mut self) -> Vec<Chapter> {
        let last = std::mem::replace(&mut self.state, AssemblerState::NoOpenChapter);
        self.close(last);
        self.chapters
    }

    fn close(&mut self, state: AssemblerState) {
        let AssemblerState::ChapterOpen { title, page, lines } = state else {
            return;
        };
        if lines.is_empty() {
            return;
        }

        let body = self.cleaner.clean(&lines.join("\n"));
        let length = body.chars().count();
        if length > self.min_chapter_length {
            log::debug!("chapter {:?} (page {}): kept, {} chars", title, page, length);
            self.chapters.push(Chapter { title, body, page });
        } else {
            log::debug!(
                "chapter {:?} (page {}): dropped, {} chars <= {}",
                title,
                page,
                length,
                self.min_chapter_length
            );
        }
    }
}
