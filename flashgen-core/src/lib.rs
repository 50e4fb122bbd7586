//! # Flashgen core
//!
//! Turns a note into Anki flashcards: the note's text is sent to a chat
//! model, the reply is parsed into `front || back` pairs separated by
//! `=======`, and each pair is added to Anki through AnkiConnect.
//!
//! The host-facing pieces (document access, notices, settings storage) are
//! traits so the pipeline can run under the CLI or inside tests.

pub mod anki;
pub mod completer;
pub mod document;
pub mod generate;
pub mod notify;
pub mod parser;
pub mod settings;
pub mod store;

pub use anki::{AnkiConnectClient, AnkiError, DeckRef, DeckService, NewNote};
pub use completer::{Completer, OpenAiCompleter};
pub use document::{DocumentSource, FileDocument, InMemoryDocument};
pub use generate::{
    GenerateOptions, GenerationError, GenerationOutcome, GenerationReport, Generator,
};
pub use notify::{NoticeId, Notifier};
pub use parser::{extract_deck_directive, parse_flashcards, Flashcard, ParseError};
pub use settings::{PartialSettings, Settings, SettingsError};
pub use store::{load_settings, update_setting, MemorySettingsStore, SettingsStore, TomlSettingsStore};
