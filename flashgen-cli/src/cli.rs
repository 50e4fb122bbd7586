use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use flashgen_core::TomlSettingsStore;

use crate::{commands, error::CliError};
use commands::*;

#[derive(Debug, Parser)]
#[command(name = "flashgen")]
#[command(about = "Generate Anki flashcards from your notes with a language model")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Settings file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate flashcards from the current file
    Generate {
        /// Note to read; piped stdin is used when omitted
        file: Option<PathBuf>,

        /// Deck to use when the note has no `Deck:` line
        #[arg(short, long)]
        deck: Option<String>,

        /// Treat a `Deck:` line as ordinary note text
        #[arg(long)]
        ignore_deck_directive: bool,

        /// Print the parsed flashcards without adding them to Anki
        #[arg(long)]
        dry_run: bool,
    },

    /// Settings management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// List supported models
    Models,

    /// Check the API key and the connection to AnkiConnect
    Doctor,

    /// Show version information
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show current settings
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a setting and save it
    Set {
        /// Setting key
        key: String,

        /// New value
        value: String,
    },

    /// Get a setting
    Get {
        /// Setting key
        key: String,
    },

    /// Write a settings file with the defaults
    Init,

    /// Print the settings file location
    Path,
}

impl Cli {
    pub async fn run(&self) -> Result<(), CliError> {
        match &self.command {
            Some(Commands::Generate {
                file,
                deck,
                ignore_deck_directive,
                dry_run,
            }) => {
                let request = GenerateRequest {
                    file: file.clone(),
                    deck: deck.clone(),
                    deck_directive: !ignore_deck_directive,
                    dry_run: *dry_run,
                };
                generate_flashcards(&self.settings_store(), &request).await
            }
            Some(Commands::Config { action }) => {
                handle_config_command(&self.settings_store(), action)
            }
            Some(Commands::Models) => list_models(&self.settings_store()),
            Some(Commands::Doctor) => run_doctor(&self.settings_store()).await,
            Some(Commands::Version) => self.handle_version(),
            None => {
                println!("flashgen - generate Anki flashcards from your notes");
                println!("Run 'flashgen --help' for usage information.");
                Ok(())
            }
        }
    }

    fn settings_store(&self) -> TomlSettingsStore {
        match &self.config {
            Some(path) => TomlSettingsStore::new(path),
            None => TomlSettingsStore::at_default_location(),
        }
    }

    fn handle_version(&self) -> Result<(), CliError> {
        println!("flashgen version: {}", env!("CARGO_PKG_VERSION"));
        println!("Description: {}", env!("CARGO_PKG_DESCRIPTION"));
        Ok(())
    }
}
