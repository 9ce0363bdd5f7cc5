//! LLM integration crate for Grounded.
//!
//! Provider-agnostic access to generative models, plus the [`Generator`]
//! capability the workflow consumes.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **OpenAI-compatible**: OpenAI, vLLM and other `/v1/chat/completions` servers
//!
//! # Example
//! ```no_run
//! use grounded_llm::{Generator, LlmGenerator, providers::OllamaClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = LlmGenerator::new(Arc::new(OllamaClient::new()), "llama3.2");
//! let text = generator.generate("Hello, world!").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod generator;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use generator::{Generator, LlmGenerator};
pub use providers::{OllamaClient, OpenAiClient};
pub use types::ProviderType;
