use std::{env, path::PathBuf};

use anyhow::{Context, Result};

use super::{
    args::{Arguments, Command, CommonArgs},
    commands::{CommandResult, init::init, translate::translate},
};

fn project_root(common: &CommonArgs) -> Result<PathBuf> {
    match &common.root {
        Some(root) => Ok(root.clone()),
        None => env::current_dir().context("Failed to determine the current directory"),
    }
}

/// Dispatch to the handler of the parsed command.
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Translate(cmd)) => {
            let root = project_root(&cmd.common)?;
            translate(cmd, &root)
        }
        Some(Command::Init) => init(&project_root(&CommonArgs::default())?),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
