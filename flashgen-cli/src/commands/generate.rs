//! The `generate` command: one run of the flashcard pipeline

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use flashgen_core::{
    load_settings, AnkiConnectClient, DocumentSource, FileDocument, GenerateOptions,
    GenerationOutcome, GenerationReport, Generator, InMemoryDocument, OpenAiCompleter,
    SettingsStore,
};
use tracing::{debug, info};

use crate::{error::CliError, notifier::TerminalNotifier};

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub file: Option<PathBuf>,
    pub deck: Option<String>,
    pub deck_directive: bool,
    pub dry_run: bool,
}

/// Generate flashcards from the given file (or piped stdin) into Anki
pub async fn generate_flashcards(
    store: &dyn SettingsStore,
    request: &GenerateRequest,
) -> Result<(), CliError> {
    let settings = load_settings(store)?;
    let document = resolve_document(request.file.as_ref())?;

    let generator = Generator::new(
        Arc::new(OpenAiCompleter::new(
            settings.api_key.clone(),
            settings.openai_base_url.clone(),
        )),
        Arc::new(AnkiConnectClient::new(settings.anki_connect_url.clone())),
        Arc::new(TerminalNotifier::default()),
    );

    let options = GenerateOptions {
        deck_directive: request.deck_directive,
        deck_override: request.deck.clone(),
        dry_run: request.dry_run,
    };

    info!("Generating flashcards with model {}", settings.model_name);
    let outcome = generator.run(document.as_ref(), &settings, &options).await;
    outcome_to_result(outcome)
}

fn outcome_to_result(outcome: GenerationOutcome) -> Result<(), CliError> {
    match outcome {
        GenerationOutcome::NoDocument => {
            debug!("No note given and stdin is a terminal; nothing to do");
            Ok(())
        }
        GenerationOutcome::EmptyDocument => {
            Err(CliError::Generation("the note is empty".to_string()))
        }
        GenerationOutcome::Busy => Err(CliError::Generation(
            "another generation is already running".to_string(),
        )),
        GenerationOutcome::Completed(report) => {
            if report.dry_run {
                print_cards(&report);
            }
            Ok(())
        }
        GenerationOutcome::Failed(e) => Err(CliError::Generation(e.to_string())),
    }
}

/// The file when given, otherwise piped stdin; an interactive terminal means no document
fn resolve_document(file: Option<&PathBuf>) -> Result<Box<dyn DocumentSource>, CliError> {
    if let Some(path) = file {
        return Ok(Box::new(FileDocument::new(path)));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(Box::new(InMemoryDocument::none()));
    }

    let mut text = String::new();
    stdin.lock().read_to_string(&mut text)?;
    Ok(Box::new(InMemoryDocument::new(text)))
}

fn print_cards(report: &GenerationReport) {
    println!("Deck: {}", report.deck.name);
    for (i, card) in report.cards.iter().enumerate() {
        if i > 0 {
            println!("=======");
        }
        println!("Front: {} || Back: {}", card.front, card.back);
    }
}
