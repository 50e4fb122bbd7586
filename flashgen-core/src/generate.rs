//! The "generate flashcards from current file" pipeline.
//!
//! Document text goes to the model, the reply is parsed into flashcards and
//! each card is added to Anki as a Basic note. Everything runs
//! sequentially; cards are submitted one at a time in document order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use flashgen_llm_sdk::{
    error::LlmError,
    types::{CompletionRequest, Message},
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::anki::{AnkiError, DeckRef, DeckService, NewNote};
use crate::completer::Completer;
use crate::document::DocumentSource;
use crate::notify::Notifier;
use crate::parser::{extract_deck_directive, parse_flashcards, Flashcard, ParseError};
use crate::settings::Settings;

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that turns study notes into clear, accurate flashcards.";
pub const DOCUMENT_PREFIX: &str = "Create flashcards from the following text:";
pub const TEMPERATURE: f32 = 0.2;
pub const PRESENCE_PENALTY: f32 = -0.2;

const NOTICE_DURATION: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Failed to read the current file: {0}")]
    Document(#[from] std::io::Error),

    #[error("Language model request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Anki request failed: {0}")]
    Anki(#[from] AnkiError),

    #[error("Deck '{0}' is still missing after creating it")]
    DeckUnavailable(String),
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Honour a `Deck: <name>` line in the document
    pub deck_directive: bool,
    /// Deck to use instead of the configured one when the document names none
    pub deck_override: Option<String>,
    /// Parse cards but do not touch Anki
    pub dry_run: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            deck_directive: true,
            deck_override: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    pub deck: DeckRef,
    pub deck_created: bool,
    pub cards: Vec<Flashcard>,
    pub malformed: Vec<ParseError>,
    pub added: usize,
    pub failed: usize,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum GenerationOutcome {
    /// No document was open; nothing happened
    NoDocument,
    /// The document had no text
    EmptyDocument,
    /// Another run on the same generator was still in progress
    Busy,
    Completed(GenerationReport),
    Failed(GenerationError),
}

/// Build the fixed three-message request for `text`
pub fn build_request(settings: &Settings, text: &str) -> CompletionRequest {
    let messages = vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(settings.effective_prompt()),
        Message::user(format!("{DOCUMENT_PREFIX}{text}")),
    ];

    let mut request = CompletionRequest::new(settings.model_name.clone(), messages);
    request.temperature = Some(TEMPERATURE);
    request.presence_penalty = Some(PRESENCE_PENALTY);
    request
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Generator {
    completer: Arc<dyn Completer>,
    decks: Arc<dyn DeckService>,
    notifier: Arc<dyn Notifier>,
    in_flight: AtomicBool,
}

impl Generator {
    pub fn new(
        completer: Arc<dyn Completer>,
        decks: Arc<dyn DeckService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            completer,
            decks,
            notifier,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run the pipeline, reporting every failure through the notifier.
    ///
    /// Never panics on remote or parse failures; they come back as
    /// [`GenerationOutcome::Failed`].
    pub async fn run(
        &self,
        document: &dyn DocumentSource,
        settings: &Settings,
        options: &GenerateOptions,
    ) -> GenerationOutcome {
        match self.try_run(document, settings, options).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Flashcard generation failed: {}", e);
                self.notifier.notify(
                    "Failed to generate flashcards. Check the log for details.",
                    Some(NOTICE_DURATION),
                );
                GenerationOutcome::Failed(e)
            }
        }
    }

    /// Like [`Generator::run`] but hands remote and document errors back to the caller
    pub async fn try_run(
        &self,
        document: &dyn DocumentSource,
        settings: &Settings,
        options: &GenerateOptions,
    ) -> Result<GenerationOutcome, GenerationError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!("Flashcard generation already in progress");
            return Ok(GenerationOutcome::Busy);
        };

        if !settings.has_api_key() {
            warn!("No OpenAI API key configured");
            self.notifier.notify(
                "OpenAI API key is not set. Run `flashgen config set api_key <key>`.",
                Some(NOTICE_DURATION),
            );
        }

        let Some(text) = document.active_document_text()? else {
            debug!("No active document, nothing to do");
            return Ok(GenerationOutcome::NoDocument);
        };

        if text.trim().is_empty() {
            info!("Active document is empty");
            self.notifier
                .notify("The current file is empty.", Some(NOTICE_DURATION));
            return Ok(GenerationOutcome::EmptyDocument);
        }

        let default_deck = options
            .deck_override
            .clone()
            .unwrap_or_else(|| settings.deck_name.clone());

        let (deck_name, body) = if options.deck_directive {
            match extract_deck_directive(&text) {
                (Some(name), cleaned) => {
                    debug!("Using deck '{}' from the document", name);
                    (name, cleaned)
                }
                (None, unchanged) => (default_deck, unchanged),
            }
        } else {
            (default_deck, text)
        };

        let request = build_request(settings, &body);
        info!(
            model = %request.model,
            deck = %deck_name,
            "Requesting flashcards from the language model"
        );

        let progress = self.notifier.notify("Generating flashcards...", None);
        let response = self.completer.complete(request).await;
        self.notifier.dismiss(progress);
        let response = response?;

        let (cards, malformed) = split_results(parse_flashcards(&response));
        for problem in &malformed {
            warn!("Skipping malformed flashcard: {} ({:?})", problem, problem.segment());
        }
        if !malformed.is_empty() {
            self.notifier.notify(
                &format!(
                    "Skipped {} malformed flashcard(s) in the model response.",
                    malformed.len()
                ),
                Some(NOTICE_DURATION),
            );
        }

        let mut report = GenerationReport {
            deck: DeckRef {
                name: deck_name,
                id: None,
            },
            cards,
            malformed,
            dry_run: options.dry_run,
            ..Default::default()
        };

        if report.cards.is_empty() {
            warn!("Model response contained no usable flashcards");
            self.notifier.notify(
                "No flashcards found in the model response.",
                Some(NOTICE_DURATION),
            );
            return Ok(GenerationOutcome::Completed(report));
        }

        if options.dry_run {
            info!("Dry run: parsed {} flashcard(s)", report.cards.len());
            return Ok(GenerationOutcome::Completed(report));
        }

        let (deck, created) = self.resolve_deck(&report.deck.name).await?;
        report.deck = deck;
        report.deck_created = created;

        for (i, card) in report.cards.iter().enumerate() {
            let note = NewNote::basic(report.deck.name.clone(), card);
            match self.decks.add_note(&note).await {
                Ok(note_id) => {
                    debug!("Added flashcard {} as note {}", i + 1, note_id);
                    report.added += 1;
                }
                Err(e) => {
                    error!("Failed to add flashcard {} ({:?}): {}", i + 1, card.front, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            added = report.added,
            failed = report.failed,
            deck = %report.deck.name,
            "Flashcard generation finished"
        );
        self.notifier
            .notify(&summary(&report), Some(NOTICE_DURATION));

        Ok(GenerationOutcome::Completed(report))
    }

    /// Find `name` among the existing decks, creating it once if missing
    async fn resolve_deck(&self, name: &str) -> Result<(DeckRef, bool), GenerationError> {
        if let Some(deck) = self.find_deck(name).await? {
            return Ok((deck, false));
        }

        info!("Deck '{}' not found, creating it", name);
        self.decks.create_deck(name).await?;

        match self.find_deck(name).await? {
            Some(deck) => Ok((deck, true)),
            None => Err(GenerationError::DeckUnavailable(name.to_string())),
        }
    }

    async fn find_deck(&self, name: &str) -> Result<Option<DeckRef>, GenerationError> {
        let decks = self.decks.deck_names_and_ids().await?;
        Ok(decks.into_iter().find(|deck| deck.name == name))
    }
}

fn split_results(
    parsed: Vec<Result<Flashcard, ParseError>>,
) -> (Vec<Flashcard>, Vec<ParseError>) {
    let mut cards = Vec::new();
    let mut malformed = Vec::new();
    for result in parsed {
        match result {
            Ok(card) => cards.push(card),
            Err(e) => malformed.push(e),
        }
    }
    (cards, malformed)
}

fn summary(report: &GenerationReport) -> String {
    let mut message = format!(
        "Added {} flashcard(s) to deck '{}'.",
        report.added, report.deck.name
    );
    if report.failed > 0 {
        message.push_str(&format!(
            " {} could not be added (possibly duplicates).",
            report.failed
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashgen_llm_sdk::types::Role;

    #[test]
    fn test_request_has_three_messages_in_order() {
        let settings = Settings::default();
        let request = build_request(&settings, "Cells are small.");

        assert_eq!(request.model, settings.model_name);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.presence_penalty, Some(-0.2));

        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::User]);
        assert_eq!(request.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(request.messages[1].content, settings.effective_prompt());
        assert_eq!(
            request.messages[2].content,
            "Create flashcards from the following text:Cells are small."
        );
    }

    #[test]
    fn test_blank_prompt_uses_default_template() {
        let mut settings = Settings::default();
        settings.prompt = String::new();
        let request = build_request(&settings, "x");
        assert_eq!(request.messages[1].content, crate::settings::DEFAULT_PROMPT);
    }

    #[test]
    fn test_split_results_keeps_order() {
        let parsed = parse_flashcards("A||B=======oops=======C||D");
        let (cards, malformed) = split_results(parsed);
        assert_eq!(cards, vec![Flashcard::new("A", "B"), Flashcard::new("C", "D")]);
        assert_eq!(malformed.len(), 1);
        assert_eq!(malformed[0].index(), 2);
    }

    #[test]
    fn test_summary_mentions_failures() {
        let report = GenerationReport {
            deck: DeckRef {
                name: "Bio".to_string(),
                id: Some(1),
            },
            added: 2,
            failed: 1,
            ..Default::default()
        };
        assert_eq!(
            summary(&report),
            "Added 2 flashcard(s) to deck 'Bio'. 1 could not be added (possibly duplicates)."
        );
    }

    #[test]
    fn test_in_flight_guard_is_exclusive_and_released() {
        let flag = AtomicBool::new(false);
        let first = InFlightGuard::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlightGuard::acquire(&flag).is_none());
        drop(first);
        assert!(InFlightGuard::acquire(&flag).is_some());
    }
}
