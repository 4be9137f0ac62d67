//! Interactive fallbacks for values not given on the command line.

use anyhow::{bail, Result};
use dialoguer::{Input, Select};
use std::path::PathBuf;

use super::CliCommand;

pub(super) fn operation() -> Result<CliCommand> {
    let choice = Select::new()
        .with_prompt("Operation")
        .items(&["download", "verify missing lessons"])
        .default(0)
        .interact()?;
    Ok(match choice {
        0 => CliCommand::Download {
            lists: None,
            output: None,
            select: None,
        },
        _ => CliCommand::Verify { root: None },
    })
}

pub(super) fn directory(prompt: &str) -> Result<PathBuf> {
    let raw: String = Input::new().with_prompt(prompt).interact_text()?;
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("no directory given");
    }
    Ok(PathBuf::from(raw))
}

pub(super) fn selection() -> Result<String> {
    let raw: String = Input::new()
        .with_prompt("Job lists to run (numbers separated by spaces, or 'all')")
        .interact_text()?;
    Ok(raw)
}
