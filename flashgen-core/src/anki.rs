//! AnkiConnect automation client.
//!
//! Every call is a single `POST {action, params, version}` to the local
//! AnkiConnect endpoint; the reply is `{result, error}`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::parser::Flashcard;

pub const ANKI_CONNECT_VERSION: u32 = 6;
pub const BASIC_NOTE_TYPE: &str = "Basic";
pub const GENERATED_TAG: &str = "generated";

#[derive(Error, Debug)]
pub enum AnkiError {
    /// AnkiConnect answered with a non-null `error` field
    #[error("AnkiConnect error: {0}")]
    Remote(String),

    #[error("Cannot reach AnkiConnect at {url}: {source}. Make sure Anki is running with the AnkiConnect add-on")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    #[error("AnkiConnect returned HTTP status {0}")]
    Status(u16),

    #[error("Unexpected AnkiConnect response: {0}")]
    Decode(String),
}

/// A deck known to Anki; `id` is `None` until resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRef {
    pub name: String,
    pub id: Option<i64>,
}

/// Payload of the `addNote` action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNote {
    pub deck_name: String,
    pub model_name: String,
    pub fields: NoteFields,
    pub options: NoteOptions,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteFields {
    #[serde(rename = "Front")]
    pub front: String,
    #[serde(rename = "Back")]
    pub back: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    pub allow_duplicate: bool,
}

impl NewNote {
    /// A "Basic" note tagged `generated`, rejected by Anki if it duplicates an existing note
    pub fn basic(deck_name: impl Into<String>, card: &Flashcard) -> Self {
        Self {
            deck_name: deck_name.into(),
            model_name: BASIC_NOTE_TYPE.to_string(),
            fields: NoteFields {
                front: card.front.clone(),
                back: card.back.clone(),
            },
            options: NoteOptions {
                allow_duplicate: false,
            },
            tags: vec![GENERATED_TAG.to_string()],
        }
    }
}

#[derive(Serialize)]
struct RequestEnvelope<'a> {
    action: &'a str,
    params: Value,
    version: u32,
}

#[derive(Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Value,
}

/// The deck and note operations the generation pipeline needs
#[async_trait]
pub trait DeckService: Send + Sync {
    async fn deck_names_and_ids(&self) -> Result<Vec<DeckRef>, AnkiError>;

    async fn create_deck(&self, name: &str) -> Result<i64, AnkiError>;

    async fn add_note(&self, note: &NewNote) -> Result<i64, AnkiError>;
}

pub struct AnkiConnectClient {
    url: String,
    http_client: reqwest::Client,
}

impl AnkiConnectClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call one AnkiConnect action and decode its `result`
    pub async fn invoke<T: DeserializeOwned>(
        &self,
        action: &str,
        params: Value,
    ) -> Result<T, AnkiError> {
        let request = RequestEnvelope {
            action,
            params,
            version: ANKI_CONNECT_VERSION,
        };

        debug!("AnkiConnect request: {}", action);

        let response = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|source| AnkiError::Network {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnkiError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(|source| AnkiError::Network {
            url: self.url.clone(),
            source,
        })?;

        let envelope: ResponseEnvelope = serde_json::from_str(&body)
            .map_err(|e| AnkiError::Decode(format!("{action}: {e}")))?;

        match envelope.error {
            Value::Null => {}
            Value::String(message) => return Err(AnkiError::Remote(message)),
            other => return Err(AnkiError::Remote(other.to_string())),
        }

        serde_json::from_value(envelope.result)
            .map_err(|e| AnkiError::Decode(format!("{action}: {e}")))
    }

    /// AnkiConnect protocol version reported by the add-on
    pub async fn version(&self) -> Result<u32, AnkiError> {
        self.invoke("version", json!({})).await
    }
}

#[async_trait]
impl DeckService for AnkiConnectClient {
    async fn deck_names_and_ids(&self) -> Result<Vec<DeckRef>, AnkiError> {
        let decks: BTreeMap<String, i64> = self.invoke("deckNamesAndIds", json!({})).await?;
        Ok(decks
            .into_iter()
            .map(|(name, id)| DeckRef { name, id: Some(id) })
            .collect())
    }

    async fn create_deck(&self, name: &str) -> Result<i64, AnkiError> {
        self.invoke("createDeck", json!({ "deck": name })).await
    }

    async fn add_note(&self, note: &NewNote) -> Result<i64, AnkiError> {
        self.invoke("addNote", json!({ "note": note })).await
    }
}
