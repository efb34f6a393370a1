use crate::sorter_core::category::{MAX_SLOT, MIN_SLOT};
use clap::{Args, Parser, Subcommand};
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sort a folder of photos into up to nine folders, one key press per photo")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable file logging to photosorter.log
    #[arg(long = "log", global = true)]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug, global = true)]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sort photos interactively.
    ///
    /// Shows one photo at a time. Type a slot number (1-9) and Enter to move
    /// the photo into that category's folder, `s` to leave it where it is, or
    /// `q` to stop. Files that already exist in the destination are never
    /// overwritten.
    ///
    /// Without SOURCE_DIR, resumes the folder of the last unfinished session.
    Sort {
        /// Folder containing the photos to sort (not searched recursively)
        source_dir: Option<PathBuf>,

        #[command(flatten)]
        categories: CategoryArgs,

        /// Do not decode images; show only file name and size
        #[arg(long)]
        no_preview: bool,
    },

    /// List the photos a sort session would go through, in order
    List {
        /// Folder containing the photos
        #[arg(required = true)]
        source_dir: PathBuf,
    },

    /// Check and display the configured categories
    Categories {
        #[command(flatten)]
        categories: CategoryArgs,

        /// Write the categories to the config file
        #[arg(long)]
        save: bool,

        /// Forget all categories and the remembered source folder
        #[arg(long, conflicts_with_all = ["save", "category"])]
        reset: bool,
    },
}

#[derive(Args, Debug)]
pub struct CategoryArgs {
    /// Category as SLOT=LABEL=FOLDER (repeatable). Overrides the config file.
    #[arg(short = 'c', long = "category", value_parser = parse_category)]
    pub category: Vec<CategorySpec>,

    /// Categories file (defaults to ~/.photosorter.json when it exists)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// A category given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec {
    pub slot: u8,
    pub label: String,
    pub path: PathBuf,
}

/// Parse `SLOT=LABEL=FOLDER`. The folder may itself contain `=`.
/// Slots that fit a `u8` are range-checked later, when the category is
/// registered.
pub fn parse_category(value: &str) -> Result<CategorySpec, String> {
    let mut parts = value.splitn(3, '=');
    let (Some(slot), Some(label), Some(path)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected SLOT=LABEL=FOLDER, got {:?}", value));
    };

    let number = slot
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("slot must be a number, got {:?}", slot))?;
    let slot = u8::try_from(number).map_err(|_| {
        format!(
            "Invalid slot {}: slots are numbered {} to {}",
            number, MIN_SLOT, MAX_SLOT
        )
    })?;
    if path.is_empty() {
        return Err("folder must not be empty".to_string());
    }

    Ok(CategorySpec {
        slot,
        label: label.to_string(),
        path: PathBuf::from(path),
    })
}
