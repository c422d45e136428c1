//! Document-wide font-size histogram.
//!
//! Body text is the most frequent size; heading candidates are larger sizes
//! used markedly less often.

use std::collections::HashMap;

use crate::config::ExtractorConfig;
use crate::document::Document;
use crate::types::{DocumentLayoutProfile, FontSize, FontSizeStats};
use crate::PdfError;

/// Build the layout profile of `doc` with default tunables.
pub fn analyze_document_structure(doc: &Document) -> Result<DocumentLayoutProfile, PdfError> {
    build_profile(doc, &ExtractorConfig::default())
}

/// Count non-empty spans per rounded size and derive body and heading sizes.
///
/// Fails with [`PdfError::NoText`] when the document has no text at all.
/// Ties for the body size go to the size seen first in reading order.
pub fn build_profile(
    doc: &Document,
    config: &ExtractorConfig,
) -> Result<DocumentLayoutProfile, PdfError> {
    let mut stats: Vec<FontSizeStats> = Vec::new();
    let mut index: HashMap<FontSize, usize> = HashMap::new();

    for (_, span) in doc.spans() {
        let text = span.text.trim();
        if text.is_empty() {
            continue;
        }

        let slot = *index.entry(span.font_size).or_insert_with(|| {
            stats.push(FontSizeStats {
                size: span.font_size,
                count: 0,
                samples: Vec::new(),
            });
            stats.len() - 1
        });

        let entry = &mut stats[slot];
        entry.count += 1;
        if entry.samples.len() < config.samples_per_size {
            entry.samples.push(text.to_string());
        }
    }

    let (main_size, main_count) = stats
        .iter()
        .fold(None, |best: Option<&FontSizeStats>, s| match best {
            Some(b) if b.count >= s.count => Some(b),
            _ => Some(s),
        })
        .map(|s| (s.size, s.count))
        .ok_or(PdfError::NoText)?;

    let threshold = main_count as f64 * config.header_frequency_ratio;
    let mut header_font_sizes: Vec<FontSize> = stats
        .iter()
        .filter(|s| s.size > main_size && (s.count as f64) < threshold)
        .map(|s| s.size)
        .collect();
    header_font_sizes.sort();

    log::debug!(
        "font profile: body {}pt ({} spans), heading sizes {:?}",
        main_size,
        main_count,
        header_font_sizes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
    );

    Ok(DocumentLayoutProfile {
        main_font_size: main_size,
        header_font_sizes,
        font_samples: stats,
    })
}
