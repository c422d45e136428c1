//! Chapter file storage.
//!
//! One file per chapter, `chapter_NN.txt`, 1-based and zero-padded to two
//! digits. The mind-map stage finds its inputs by this name and writes
//! `chapter_NN_mindmap.md` next to them, so the naming is part of the
//! contract.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Chapter;
use crate::PdfError;

const TITLE_PREFIX: &str = "Title: ";
const SEPARATOR_WIDTH: usize = 50;
const UNTITLED: &str = "Untitled";

/// File name for the chapter at 1-based `index`.
pub fn chapter_file_name(index: usize) -> String {
    format!("chapter_{:02}.txt", index)
}

/// Parse the 1-based index out of a `chapter_NN.txt` file name.
pub fn chapter_index(path: &Path) -> Option<usize> {
    if path.extension().and_then(|e| e.to_str()) != Some("txt") {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.strip_prefix("chapter_")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Mind-map file name for a chapter file: `<stem>_mindmap.md`.
pub fn mindmap_file_name(chapter_path: &Path) -> String {
    let stem = chapter_path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    format!("{}_mindmap.md", stem)
}

fn render_chapter(chapter: &Chapter) -> String {
    format!(
        "{}{}\n{}\n\n{}",
        TITLE_PREFIX,
        chapter.title,
        "=".repeat(SEPARATOR_WIDTH),
        chapter.body
    )
}

/// Write `chapters` to `output_dir`, creating it if needed.
///
/// Returns the written paths in chapter order.
pub fn save_chapters_to_files(
    chapters: &[Chapter],
    output_dir: &Path,
) -> Result<Vec<PathBuf>, PdfError> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::with_capacity(chapters.len());
    for (i, chapter) in chapters.iter().enumerate() {
        let path = output_dir.join(chapter_file_name(i + 1));
        fs::write(&path, render_chapter(chapter))?;
        written.push(path);
    }

    log::info!(
        "saved {} chapters to {}",
        written.len(),
        output_dir.display()
    );
    Ok(written)
}

/// Read a chapter file back.
///
/// The title comes from the first `Title: ` line and defaults to `Untitled`.
/// When the header and separator are present the body is what follows the
/// blank line after them; otherwise the whole file is the body.
pub fn read_chapter_file(path: &Path) -> Result<Chapter, PdfError> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8(bytes).map_err(|_| {
        PdfError::InvalidChapterFile(format!("{} is not valid UTF-8", path.display()))
    })?;

    let title = content
        .lines()
        .find_map(|line| line.strip_prefix(TITLE_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
        .to_string();

    let body = split_header(&content).unwrap_or(content.as_str());

    Ok(Chapter::new(title, body))
}

/// The body after a `Title:` line, separator line and blank line.
fn split_header(content: &str) -> Option<&str> {
    let (first, rest) = content.split_once('\n')?;
    if !first.starts_with(TITLE_PREFIX) {
        return None;
    }
    let (separator, rest) = rest.split_once('\n')?;
    if separator.is_empty() || !separator.chars().all(|c| c == '=') {
        return None;
    }
    Some(rest.strip_prefix('\n').unwrap_or(rest))
}

/// Chapter files in `chapters_dir` that have no mind map in `mindmaps_dir`,
/// ordered by chapter index.
///
/// A missing chapters directory is not an error.
pub fn pending_chapter_files(
    chapters_dir: &Path,
    mindmaps_dir: &Path,
) -> Result<Vec<PathBuf>, PdfError> {
    if !chapters_dir.exists() {
        return Ok(Vec::new());
    }

    let mut pending: Vec<(usize, PathBuf)> = Vec::new();
    for entry in fs::read_dir(chapters_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(index) = chapter_index(&path) else {
            continue;
        };
        if mindmaps_dir.join(mindmap_file_name(&path)).exists() {
            continue;
        }
        pending.push((index, path));
    }

    pending.sort();
    Ok(pending.into_iter().map(|(_, path)| path).collect())
}
