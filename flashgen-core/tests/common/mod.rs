#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use flashgen_core::{
    AnkiError, Completer, DeckRef, DeckService, GenerateOptions, GenerationOutcome, Generator,
    InMemoryDocument, NewNote, NoticeId, Notifier, Settings,
};
use flashgen_llm_sdk::{error::LlmError, types::CompletionRequest};

/// Completer returning a canned reply and recording every request
pub struct FakeCompleter {
    reply: Result<String, String>,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompleter {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Completer for FakeCompleter {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(LlmError::api_error(500, message.clone())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeckCall {
    List,
    Create(String),
    AddNote(NewNote),
}

/// In-memory stand-in for AnkiConnect
pub struct FakeDecks {
    decks: Mutex<Vec<DeckRef>>,
    pub calls: Mutex<Vec<DeckCall>>,
    reject_fronts: HashSet<String>,
    create_is_noop: bool,
    next_id: AtomicU64,
}

impl FakeDecks {
    pub fn with_decks(names: &[&str]) -> Self {
        Self {
            decks: Mutex::new(
                names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| DeckRef {
                        name: name.to_string(),
                        id: Some(i as i64 + 1),
                    })
                    .collect(),
            ),
            calls: Mutex::new(Vec::new()),
            reject_fronts: HashSet::new(),
            create_is_noop: false,
            next_id: AtomicU64::new(1000),
        }
    }

    /// `addNote` fails for cards with this front, as Anki does for duplicates
    pub fn rejecting(mut self, front: &str) -> Self {
        self.reject_fronts.insert(front.to_string());
        self
    }

    /// `createDeck` succeeds but the deck never shows up in listings
    pub fn with_noop_create(mut self) -> Self {
        self.create_is_noop = true;
        self
    }

    pub fn calls(&self) -> Vec<DeckCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeckCall::Create(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn added_notes(&self) -> Vec<NewNote> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeckCall::AddNote(note) => Some(note),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl DeckService for FakeDecks {
    async fn deck_names_and_ids(&self) -> Result<Vec<DeckRef>, AnkiError> {
        self.calls.lock().unwrap().push(DeckCall::List);
        Ok(self.decks.lock().unwrap().clone())
    }

    async fn create_deck(&self, name: &str) -> Result<i64, AnkiError> {
        self.calls
            .lock()
            .unwrap()
            .push(DeckCall::Create(name.to_string()));
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        if !self.create_is_noop {
            self.decks.lock().unwrap().push(DeckRef {
                name: name.to_string(),
                id: Some(id),
            });
        }
        Ok(id)
    }

    async fn add_note(&self, note: &NewNote) -> Result<i64, AnkiError> {
        self.calls
            .lock()
            .unwrap()
            .push(DeckCall::AddNote(note.clone()));
        if self.reject_fronts.contains(&note.fields.front) {
            return Err(AnkiError::Remote(
                "cannot create note because it is a duplicate".to_string(),
            ));
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) as i64)
    }
}

/// Notifier that remembers what it was asked to show
#[derive(Default)]
pub struct RecordingNotifier {
    next: AtomicU64,
    pub shown: Mutex<Vec<(NoticeId, String, Option<Duration>)>>,
    pub dismissed: Mutex<Vec<NoticeId>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message, _)| message.clone())
            .collect()
    }

    pub fn dismissed(&self) -> Vec<NoticeId> {
        self.dismissed.lock().unwrap().clone()
    }

    pub fn sticky_notices(&self) -> Vec<NoticeId> {
        self.shown
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, _, duration)| duration.is_none())
            .map(|(id, _, _)| *id)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, duration: Option<Duration>) -> NoticeId {
        let id = NoticeId(self.next.fetch_add(1, Ordering::SeqCst));
        self.shown
            .lock()
            .unwrap()
            .push((id, message.to_string(), duration));
        id
    }

    fn dismiss(&self, id: NoticeId) {
        self.dismissed.lock().unwrap().push(id);
    }
}

pub struct Harness {
    pub completer: Arc<FakeCompleter>,
    pub decks: Arc<FakeDecks>,
    pub notifier: Arc<RecordingNotifier>,
    pub generator: Generator,
}

impl Harness {
    pub fn new(completer: Arc<FakeCompleter>, decks: FakeDecks) -> Self {
        let decks = Arc::new(decks);
        let notifier = Arc::new(RecordingNotifier::default());
        let generator = Generator::new(completer.clone(), decks.clone(), notifier.clone());
        Self {
            completer,
            decks,
            notifier,
            generator,
        }
    }

    pub async fn run(&self, text: Option<&str>, settings: &Settings) -> GenerationOutcome {
        self.run_with(text, settings, &GenerateOptions::default())
            .await
    }

    pub async fn run_with(
        &self,
        text: Option<&str>,
        settings: &Settings,
        options: &GenerateOptions,
    ) -> GenerationOutcome {
        let document = match text {
            Some(text) => InMemoryDocument::new(text),
            None => InMemoryDocument::none(),
        };
        self.generator.run(&document, settings, options).await
    }
}

pub fn settings_with_key() -> Settings {
    let mut settings = Settings::default();
    settings.api_key = "sk-test".to_string();
    settings
}
