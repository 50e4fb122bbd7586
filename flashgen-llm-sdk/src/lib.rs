//! # Flashgen LLM SDK
//!
//! A small chat-completion client for OpenAI-compatible endpoints.
//!
//! ## Example
//!
//! ```rust,no_run
//! use flashgen_llm_sdk::openai::OpenAIClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAIClient::new("your-api-key")?;
//!     let response = client
//!         .message_builder()
//!         .model("gpt-3.5-turbo")
//!         .system_message("You are a helpful assistant.")
//!         .user_message("Hello!")
//!         .temperature(0.2)
//!         .send()
//!         .await?;
//!
//!     println!("Response: {}", response.content().unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod openai;
pub mod providers;
pub mod types;
