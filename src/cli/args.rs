//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `translate`: translate source bundles into the configured languages
//! - `init`: write a default `.propbabelrc.json`

use std::{num::NonZeroUsize, path::PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::{
    config::{Config, split_languages},
    provider::ProviderKind,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Translate(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Project root directory (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Default, Args)]
pub struct TranslateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Directory containing the source bundles (overrides config file)
    #[arg(long)]
    pub source_dir: Option<String>,

    /// Directory receiving the generated bundles (overrides config file)
    #[arg(long)]
    pub target_dir: Option<String>,

    /// Cache root directory (overrides config file)
    #[arg(long)]
    pub cache_dir: Option<String>,

    /// Cache namespace tag (overrides config file)
    #[arg(long)]
    pub cache_tag: Option<String>,

    /// Source language code (overrides config file)
    #[arg(long)]
    pub source_language: Option<String>,

    /// Target languages, comma separated: --languages es,fr,nl
    #[arg(long, value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Regex for text that must not be translated; can be repeated
    #[arg(long = "no-translate", value_name = "REGEX")]
    pub no_translate: Vec<String>,

    /// Translation provider (overrides config file)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Google Translate API key
    #[arg(long, env = "GOOGLE_TRANSLATE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Report what would be translated without calling the provider or writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Drop cache entries for keys that no longer exist in the source bundle
    #[arg(long)]
    pub prune_cache: bool,

    /// Number of bundles translated in parallel (default: one per CPU)
    #[arg(short, long)]
    pub jobs: Option<NonZeroUsize>,
}

impl TranslateCommand {
    /// Apply command line values on top of the loaded configuration.
    ///
    /// List arguments replace the configured list rather than extending it.
    pub fn apply_overrides(&self, config: &mut Config) {
        let strings = [
            (&self.source_dir, &mut config.source_dir),
            (&self.target_dir, &mut config.target_dir),
            (&self.cache_dir, &mut config.cache_dir),
            (&self.source_language, &mut config.source_language),
        ];
        for (value, field) in strings {
            if let Some(value) = value {
                *field = value.clone();
            }
        }

        if self.cache_tag.is_some() {
            config.cache_tag = self.cache_tag.clone();
        }
        let languages: Vec<String> = self.languages.iter().flat_map(|l| split_languages(l)).collect();
        if !languages.is_empty() {
            config.languages = languages;
        }
        if !self.no_translate.is_empty() {
            config.no_translate_patterns = self.no_translate.clone();
        }
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if self.api_key.is_some() {
            config.api_key = self.api_key.clone();
        }
        if self.prune_cache {
            config.prune_cache = true;
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate source bundles, reusing cached and overridden translations
    Translate(TranslateCommand),
    /// Initialize a new .propbabelrc.json configuration file
    Init,
}
