//! Prompt system for Grounded.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions, with workspace overrides
//! - Handlebars template rendering
//! - Research context injection

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, render_research_list};
pub use defaults::{builtin_prompt, SYNTHESIS_PROMPT_ID};
pub use loader::{list_prompts, load_prompt, validate_prompt};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptBehavior, PromptDefinition, PromptOutputSpec};
