use anyhow::Result;
use clap::Parser;
use photosorter::sorter_core::{
    AppContext, CategoryArgs, CategoryRegistry, Cli, Commands, MetadataPreview, PreviewDecoder,
    RasterPreview, SorterConfig, SorterError, list_images, terminal,
};
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("photosorter.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    match cli.command {
        Commands::Sort {
            source_dir,
            categories,
            no_preview,
        } => {
            let registry = build_registry(&categories)?;
            if registry.is_empty() {
                log::warn!("No categories configured; photos can only be skipped");
            }

            let config_path = config_path(&categories);
            let source_dir = match source_dir {
                Some(dir) => dir,
                None => {
                    let remembered = match &config_path {
                        Some(path) => SorterConfig::load_or_default(path)?.last_folder,
                        None => None,
                    };
                    let dir = remembered.ok_or_else(|| {
                        SorterError::Argument(
                            "no source folder given and none remembered".to_string(),
                        )
                    })?;
                    println!("Resuming {}", dir.display());
                    dir
                }
            };

            let decoder: Box<dyn PreviewDecoder> = if no_preview {
                Box::new(MetadataPreview)
            } else {
                Box::new(RasterPreview)
            };

            let mut ctx = AppContext::new(registry, decoder);
            ctx.open_folder(&source_dir)?;
            let folder = fs::canonicalize(&source_dir).unwrap_or(source_dir);
            remember_folder(config_path.as_deref(), Some(folder.as_path()));

            let stdin = io::stdin();
            let stdout = io::stdout();
            terminal::run(&mut ctx, &mut stdin.lock(), &mut stdout.lock())?;

            if ctx.session().is_some_and(|s| s.is_complete()) {
                remember_folder(config_path.as_deref(), None);
            }
        }

        Commands::List { source_dir } => {
            let images = list_images(&source_dir)?;
            for path in &images {
                println!("{}", path.display());
            }
            println!("{} images", images.len());
        }

        Commands::Categories {
            categories,
            save,
            reset,
        } => {
            if reset {
                let path = required_config_path(&categories)?;
                SorterConfig::default().save(&path)?;
                println!("Cleared categories and last folder in {}", path.display());
                return Ok(());
            }

            let registry = build_registry(&categories)?;
            terminal::print_legend(&registry, &mut io::stdout())?;

            if save {
                let path = required_config_path(&categories)?;
                let mut config = SorterConfig::load_or_default(&path)?;
                config.set_categories(&registry);
                config.save(&path)?;
                println!("Saved {} categories to {}", registry.size(), path.display());
            }
        }
    }

    Ok(())
}

/// `--config`, else `~/.photosorter.json`.
fn config_path(args: &CategoryArgs) -> Option<PathBuf> {
    args.config.clone().or_else(SorterConfig::default_path)
}

fn required_config_path(args: &CategoryArgs) -> Result<PathBuf, SorterError> {
    config_path(args).ok_or_else(|| {
        SorterError::Argument("no config path and no home directory".to_string())
    })
}

/// Store (or clear) the folder to resume. Failing to do so does not stop
/// sorting.
fn remember_folder(config_path: Option<&Path>, folder: Option<&Path>) {
    let Some(path) = config_path else {
        return;
    };
    if let Err(e) = SorterConfig::remember_folder(path, folder) {
        log::warn!("Could not update last folder in {}: {}", path.display(), e);
    }
}

/// Categories from the command line if any were given, otherwise from the
/// config file.
fn build_registry(args: &CategoryArgs) -> Result<CategoryRegistry, SorterError> {
    if !args.category.is_empty() {
        let mut registry = CategoryRegistry::new();
        for spec in &args.category {
            registry.register(spec.slot, spec.label.as_str(), &spec.path)?;
        }
        return Ok(registry);
    }

    if let Some(path) = &args.config {
        return SorterConfig::load(path)?.to_registry();
    }

    match SorterConfig::default_path() {
        Some(path) if path.exists() => {
            log::info!("Using categories from {}", path.display());
            SorterConfig::load(&path)?.to_registry()
        }
        _ => Ok(CategoryRegistry::new()),
    }
}
