use crate::sorter_core::app::{AppContext, Render, View};
use crate::sorter_core::category::{CategoryRegistry, MAX_SLOT, MIN_SLOT};
use crate::sorter_core::error::Result;
use crate::sorter_core::session::SessionStats;
use std::io::{BufRead, Write};

/// A line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Sort(u8),
    Skip,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Command> {
        match input.trim().to_lowercase().as_str() {
            "s" | "skip" => Some(Command::Skip),
            "q" | "quit" => Some(Command::Quit),
            other => other
                .parse::<u8>()
                .ok()
                .filter(|slot| (MIN_SLOT..=MAX_SLOT).contains(slot))
                .map(Command::Sort),
        }
    }
}

/// Print the category keys.
pub fn print_legend(registry: &CategoryRegistry, output: &mut impl Write) -> Result<()> {
    if registry.is_empty() {
        writeln!(output, "No categories configured; only skipping is possible.")?;
        return Ok(());
    }
    writeln!(output, "Categories:")?;
    for category in registry.iter() {
        writeln!(output, "  {}", category)?;
    }
    Ok(())
}

/// Drive the session from line-based input until every photo is handled,
/// the user quits or the input ends. Returns the session counters.
pub fn run(
    ctx: &mut AppContext,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<SessionStats> {
    print_legend(ctx.registry(), output)?;
    let mut render = ctx.render();

    loop {
        if show(&render, output)? {
            break;
        }

        write!(output, "[{}-{}] sort, s skip, q quit: ", MIN_SLOT, MAX_SLOT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            log::info!("Input closed, stopping early");
            break;
        }

        render = match Command::parse(&line) {
            Some(Command::Sort(slot)) => ctx.on_key(slot),
            Some(Command::Skip) => ctx.on_skip(),
            Some(Command::Quit) => {
                log::info!("Quit requested");
                break;
            }
            None => {
                writeln!(output, "Unrecognised input {:?}", line.trim())?;
                ctx.render()
            }
        };
    }

    let stats = ctx.session().map(|s| s.stats()).unwrap_or_default();
    writeln!(output, "Summary: {}", stats)?;
    Ok(stats)
}

/// Print a render. Returns true when there is nothing left to sort.
fn show(render: &Render, output: &mut impl Write) -> Result<bool> {
    if let Some(notice) = &render.notice {
        writeln!(output, "{}", notice)?;
    }

    match &render.view {
        View::Photo(photo) => {
            write!(output, "\n({}/{}) ", photo.position, photo.total)?;
            match &photo.preview {
                Ok(preview) => writeln!(output, "{}", preview)?,
                Err(e) => writeln!(output, "{} [no preview: {}]", photo.path.display(), e)?,
            }
            Ok(false)
        }
        View::Finished(stats) => {
            if stats.total == 0 {
                writeln!(output, "No images found.")?;
            } else {
                writeln!(output, "All images sorted from this folder!")?;
            }
            Ok(true)
        }
        View::NoSession => {
            writeln!(output, "Select a source folder")?;
            Ok(true)
        }
    }
}
