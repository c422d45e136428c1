use std::path::{Path, PathBuf};

use crate::prelude::{eprintln, println, *};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Directory holding chapter_NN.txt files
    pub chapters_dir: PathBuf,

    /// Directory holding chapter_NN_mindmap.md files
    pub mindmaps_dir: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Title of a pending chapter file, or `?` when it cannot be read.
fn chapter_title(path: &Path, verbose: bool) -> String {
    match chapters::read_chapter_file(path) {
        Ok(chapter) => chapter.title,
        Err(e) => {
            if verbose {
                eprintln!("Cannot read {}: {}", path.display(), e);
            }
            "?".to_string()
        }
    }
}

pub fn run(options: Options, global: &crate::Global) -> Result<()> {
    let pending = chapters::pending_chapter_files(&options.chapters_dir, &options.mindmaps_dir)
        .map_err(|e| eyre!(e))?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&pending)?);
        return Ok(());
    }

    if pending.is_empty() {
        println!("Every chapter has a mind map");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["Chapter", "Title", "Mind map"]);
    for path in &pending {
        table.add_row(prettytable::row![
            path.display(),
            chapter_title(path, global.verbose),
            chapters::mindmap_file_name(path)
        ]);
    }
    table.printstd();

    Ok(())
}
