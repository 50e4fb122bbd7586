//! Model constants for the supported chat-completion models
//!
//! Model IDs are sourced from the provider's documentation.

/// OpenAI model constants
pub mod openai {
    /// GPT-4o - Flagship multimodal model
    pub const GPT_4O_ID: &str = "gpt-4o";
    pub const GPT_4O_NAME: &str = "GPT-4o";

    /// GPT-4o Mini - Smaller, faster version of GPT-4o
    pub const GPT_4O_MINI_ID: &str = "gpt-4o-mini";
    pub const GPT_4O_MINI_NAME: &str = "GPT-4o Mini";

    /// GPT-4 Turbo - Enhanced GPT-4 model
    pub const GPT_4_TURBO_ID: &str = "gpt-4-turbo";
    pub const GPT_4_TURBO_NAME: &str = "GPT-4 Turbo";

    /// GPT-4 - Original GPT-4 model
    pub const GPT_4_ID: &str = "gpt-4";
    pub const GPT_4_NAME: &str = "GPT-4";

    /// GPT-3.5 Turbo - Fast and efficient model
    pub const GPT_3_5_TURBO_ID: &str = "gpt-3.5-turbo";
    pub const GPT_3_5_TURBO_NAME: &str = "GPT-3.5 Turbo";

    /// Chat models accepted by the Chat Completions endpoint, as `(id, name)` pairs
    pub const SUPPORTED_CHAT_MODELS: &[(&str, &str)] = &[
        (GPT_3_5_TURBO_ID, GPT_3_5_TURBO_NAME),
        (GPT_4_ID, GPT_4_NAME),
        (GPT_4_TURBO_ID, GPT_4_TURBO_NAME),
        (GPT_4O_ID, GPT_4O_NAME),
        (GPT_4O_MINI_ID, GPT_4O_MINI_NAME),
    ];

    /// Model used when nothing else is configured
    pub const DEFAULT_CHAT_MODEL: &str = GPT_3_5_TURBO_ID;

    /// Whether `id` is one of [`SUPPORTED_CHAT_MODELS`]
    pub fn is_supported_chat_model(id: &str) -> bool {
        SUPPORTED_CHAT_MODELS.iter().any(|(model, _)| *model == id)
    }

    /// Human-readable name for a supported model id
    pub fn display_name(id: &str) -> Option<&'static str> {
        SUPPORTED_CHAT_MODELS
            .iter()
            .find(|(model, _)| *model == id)
            .map(|(_, name)| *name)
    }
}
