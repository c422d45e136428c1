use std::path::{Path, PathBuf};

use chapters::Chapter;
use colored::Colorize;
use serde::Serialize;

use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Directory for the chapter_NN.txt files
    #[arg(short, long, default_value = "chapters")]
    pub output: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// One written chapter file.
#[derive(Debug, Serialize)]
pub struct ChapterSummary {
    pub index: usize,
    pub title: String,
    pub page: usize,
    pub chars: usize,
    pub file: PathBuf,
}

pub fn summarize(chapters: &[Chapter], files: &[PathBuf]) -> Vec<ChapterSummary> {
    chapters
        .iter()
        .zip(files)
        .enumerate()
        .map(|(i, (chapter, file))| ChapterSummary {
            index: i + 1,
            title: chapter.title.clone(),
            page: chapter.page,
            chars: chapter.len(),
            file: file.clone(),
        })
        .collect()
}

fn print_table(summaries: &[ChapterSummary], source: &Path) {
    if summaries.is_empty() {
        println!("No chapters found in {}", source.display());
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "#".bold().cyan(),
        "Title".bold().cyan(),
        "Page".bold().cyan(),
        "Chars".bold().cyan(),
        "File".bold().cyan()
    ]);
    for s in summaries {
        table.add_row(prettytable::row![
            s.index.to_string().green(),
            s.title.bright_white(),
            s.page,
            s.chars,
            s.file.display().to_string().bright_black()
        ]);
    }
    table.printstd();
}

pub fn run(options: Options, global: &crate::Global) -> Result<()> {
    let extractor = global.extractor()?;

    let chapters = extractor
        .extract_path(&options.path)
        .map_err(|e| eyre!("Failed to extract {}: {}", options.path.display(), e))?;
    let files =
        chapters::save_chapters_to_files(&chapters, &options.output).map_err(|e| eyre!(e))?;

    let summaries = summarize(&chapters, &files);
    if options.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        print_table(&summaries, &options.path);
    }

    Ok(())
}
