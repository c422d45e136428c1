use std::path::PathBuf;

use crate::prelude::{eprintln, *};
use chapters::{ChapterExtractor, ExtractorConfig};
use clap::Parser;

mod extract;
mod pending;
mod prelude;
mod profile;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Split PDF books into chapter files and track which ones still need a mind map"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// TOML file with extraction tunables
    #[clap(long, env = "BOOKMAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Whether to display additional information.
    #[clap(long, env = "BOOKMAP_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

impl Global {
    pub fn extractor_config(&self) -> Result<ExtractorConfig> {
        match &self.config {
            Some(path) => ExtractorConfig::load(path)
                .map_err(|e| eyre!("Failed to load config {}: {}", path.display(), e)),
            None => Ok(ExtractorConfig::default()),
        }
    }

    pub fn extractor(&self) -> Result<ChapterExtractor> {
        let extractor = ChapterExtractor::new(self.extractor_config()?).map_err(|e| eyre!(e))?;
        if self.verbose {
            eprintln!("Using config: {:?}", extractor.config());
        }
        Ok(extractor)
    }
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Extract chapters from a PDF and write them as chapter_NN.txt files
    Extract(crate::extract::Options),

    /// Print the font-size profile used to detect headings
    Profile(crate::profile::Options),

    /// List chapter files that have no mind map yet
    Pending(crate::pending::Options),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Extract(options) => crate::extract::run(options, &app.global),
        SubCommands::Profile(options) => crate::profile::run(options, &app.global),
        SubCommands::Pending(options) => crate::pending::run(options, &app.global),
    }
}
