//! Narrow text-completion interface used by the generation pipeline.

use async_trait::async_trait;
use flashgen_llm_sdk::{
    client::LlmClient, error::LlmError, openai::OpenAIClient, types::CompletionRequest,
};

/// Sends a completion request and returns the generated text
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// Completer backed by the OpenAI Chat Completions API.
///
/// The HTTP client is built per call, so a missing API key surfaces as an
/// authentication error from the call rather than at construction.
pub struct OpenAiCompleter {
    api_key: String,
    base_url: String,
}

impl OpenAiCompleter {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Completer for OpenAiCompleter {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let client = OpenAIClient::new(self.api_key.clone())?.with_base_url(self.base_url.clone());
        let response = client.complete(request).await?;
        tracing::debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Completion finished"
        );
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashgen_llm_sdk::types::Message;

    #[tokio::test]
    async fn test_missing_key_is_an_authentication_error() {
        let completer = OpenAiCompleter::new("", "http://127.0.0.1:9");
        let result = completer
            .complete(CompletionRequest::new("gpt-4o", vec![Message::user("hi")]))
            .await;
        assert!(matches!(result, Err(LlmError::Authentication { .. })));
    }

    #[tokio::test]
    async fn test_returns_first_choice_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(
                r#"{"id":"c","object":"chat.completion","created":0,"model":"gpt-4o",
                    "choices":[{"index":0,"message":{"role":"assistant","content":"Q||A"},"finish_reason":"stop"}]}"#,
            )
            .create_async()
            .await;

        let completer = OpenAiCompleter::new("sk-test", server.url());
        let text = completer
            .complete(CompletionRequest::new("gpt-4o", vec![Message::user("hi")]))
            .await
            .unwrap();
        assert_eq!(text, "Q||A");
    }
}
