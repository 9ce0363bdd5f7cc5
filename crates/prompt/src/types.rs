//! Prompt types for Grounded.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Behavioral settings
    pub behavior: PromptBehavior,

    /// Role instruction placed at the top of the prompt
    pub persona: String,

    /// Replaces the research section when retrieval found nothing
    #[serde(rename = "noResearchNotice")]
    pub no_research_notice: String,

    /// Template string with Handlebars syntax
    pub template: String,

    /// Output specification
    pub output: PromptOutputSpec,
}

/// Behavioral settings for prompt execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptBehavior {
    /// Tone (e.g., "professional", "technical")
    pub tone: String,

    /// Style (e.g., "concise", "detailed")
    pub style: String,
}

/// Output specification for the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOutputSpec {
    /// Output format (e.g., "text", "markdown")
    pub format: String,
}

/// A fully built prompt ready for the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Rendered prompt text
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Number of research entries rendered into the prompt
    #[serde(rename = "researchItems")]
    pub research_items: usize,

    /// False when the no-research notice stood in for the research section
    pub grounded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: test.prompt
title: Test Prompt
apiVersion: "1.0"
createdBy: test
behavior:
  tone: professional
  style: concise
persona: "You are a reviewer."
noResearchNotice: "Nothing found."
template: "{{persona}} {{request}} {{research}}"
output:
  format: markdown
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "test.prompt");
        assert_eq!(def.behavior.tone, "professional");
        assert_eq!(def.persona, "You are a reviewer.");
        assert_eq!(def.no_research_notice, "Nothing found.");
    }

    #[test]
    fn test_missing_persona_is_rejected() {
        let yaml = r#"
id: test.prompt
title: Test Prompt
apiVersion: "1.0"
behavior:
  tone: professional
  style: concise
noResearchNotice: "Nothing found."
template: "{{request}} {{research}}"
output:
  format: markdown
"#;

        assert!(serde_yaml::from_str::<PromptDefinition>(yaml).is_err());
    }
}
