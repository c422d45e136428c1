use std::path::PathBuf;

use chapters::{Document, DocumentLayoutProfile, FontSizeStats};
use colored::Colorize;

use crate::prelude::{println, *};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

fn role(profile: &DocumentLayoutProfile, stats: &FontSizeStats) -> &'static str {
    if stats.size == profile.main_font_size {
        "body"
    } else if profile.is_header_size(stats.size) {
        "heading"
    } else {
        "-"
    }
}

/// Sizes largest first, which is how headings are usually scanned by eye.
fn sorted_sizes(profile: &DocumentLayoutProfile) -> Vec<&FontSizeStats> {
    let mut sizes: Vec<&FontSizeStats> = profile.font_samples.iter().collect();
    sizes.sort_by(|a, b| b.size.cmp(&a.size));
    sizes
}

fn print_table(profile: &DocumentLayoutProfile) {
    let mut table = new_table();
    table.add_row(prettytable::row![
        "Size".bold().cyan(),
        "Spans".bold().cyan(),
        "Role".bold().cyan(),
        "Samples".bold().cyan()
    ]);
    for stats in sorted_sizes(profile) {
        let role = match role(profile, stats) {
            "body" => "body".green(),
            "heading" => "heading".yellow(),
            other => other.bright_black(),
        };
        table.add_row(prettytable::row![
            stats.size,
            stats.count,
            role,
            stats.samples.join(" | ")
        ]);
    }
    table.printstd();
}

pub fn run(options: Options, global: &crate::Global) -> Result<()> {
    let extractor = global.extractor()?;
    let doc = Document::open(&options.path)
        .map_err(|e| eyre!("Failed to read {}: {}", options.path.display(), e))?;
    let profile = extractor.profile(&doc).map_err(|e| eyre!(e))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!(
            "\n{} pages, body text at {}pt\n",
            doc.pages().len(),
            profile.main_font_size
        );
        print_table(&profile);
    }

    Ok(())
}
