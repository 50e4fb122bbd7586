use crate::{
    error::LlmError,
    openai::{
        client::OpenAIClient,
        types::{OpenAIChatCompletionRequest, OpenAIChatCompletionResponse, OpenAIMessage, OpenAIRole},
    },
};

/// Builder for creating OpenAI chat completion requests
pub struct OpenAIMessageBuilder<'a> {
    client: &'a OpenAIClient,
    model: Option<String>,
    max_tokens: Option<u32>,
    messages: Vec<OpenAIMessage>,
    temperature: Option<f32>,
    presence_penalty: Option<f32>,
}

impl<'a> OpenAIMessageBuilder<'a> {
    /// Create a new message builder
    pub fn new(client: &'a OpenAIClient) -> Self {
        Self {
            client,
            model: None,
            max_tokens: None,
            messages: Vec::new(),
            temperature: None,
            presence_penalty: None,
        }
    }

    /// Set the model to use
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Add a message to the conversation
    ///
    /// Valid roles: "system", "user", "assistant".
    /// Invalid roles will be treated as "user".
    pub fn message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        let role_str = role.into();
        let role = match role_str.as_str() {
            "system" => OpenAIRole::System,
            "user" => OpenAIRole::User,
            "assistant" => OpenAIRole::Assistant,
            _ => {
                tracing::warn!("Invalid role '{}', defaulting to 'user'", role_str);
                OpenAIRole::User
            }
        };

        self.messages.push(OpenAIMessage::new(role, content));
        self
    }

    /// Add a system message
    pub fn system_message(self, content: impl Into<String>) -> Self {
        self.message("system", content)
    }

    /// Add a user message
    pub fn user_message(self, content: impl Into<String>) -> Self {
        self.message("user", content)
    }

    /// Set the temperature for randomness
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the presence penalty
    pub fn presence_penalty(mut self, presence_penalty: f32) -> Self {
        self.presence_penalty = Some(presence_penalty);
        self
    }

    /// Build the request without sending it
    pub fn build(self) -> Result<OpenAIChatCompletionRequest, LlmError> {
        if self.messages.is_empty() {
            return Err(LlmError::invalid_request("At least one message is required"));
        }

        Ok(OpenAIChatCompletionRequest {
            model: self
                .model
                .ok_or_else(|| LlmError::invalid_request("Model must be specified"))?,
            messages: self.messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            presence_penalty: self.presence_penalty,
        })
    }

    /// Send the request and get the response
    pub async fn send(self) -> Result<OpenAIChatCompletionResponse, LlmError> {
        let client = self.client;
        let request = self.build()?;
        client.create_chat_completion(request).await
    }
}

impl OpenAIClient {
    /// Start building a chat completion request
    pub fn message_builder(&self) -> OpenAIMessageBuilder<'_> {
        OpenAIMessageBuilder::new(self)
    }
}
