//! Built-in prompt definitions.

use crate::types::PromptDefinition;
use grounded_core::{AppError, AppResult};

/// Identifier of the built-in synthesis prompt.
pub const SYNTHESIS_PROMPT_ID: &str = "workflow.synthesis.default";

const SYNTHESIS_PROMPT_YAML: &str = r#"
id: workflow.synthesis.default
title: Research synthesis proposal
apiVersion: "1.0"
createdBy: grounded
behavior:
  tone: professional
  style: detailed
persona: >-
  You are a senior solutions architect. Write a structured proposal that
  answers the request using the research below as your evidence.
noResearchNotice: >-
  No documents in the corpus matched this request. Answer from general
  knowledge, and open your answer with a clear note that the proposal is not
  grounded in the document corpus.
template: |
  {{persona}}

  Tone: {{tone}}. Style: {{style}}. Format: {{format}}.
  Organise the answer as: Summary, Proposal, Risks, Sources.
  Cite research entries by their number and source name, for example [1] (source: design.md).

  ## Request
  {{request}}

  ## Research
  {{research}}
output:
  format: markdown
"#;

/// Look up a built-in prompt definition by ID.
pub fn builtin_prompt(prompt_id: &str) -> AppResult<Option<PromptDefinition>> {
    let yaml = match prompt_id {
        SYNTHESIS_PROMPT_ID => SYNTHESIS_PROMPT_YAML,
        _ => return Ok(None),
    };

    let definition: PromptDefinition = serde_yaml::from_str(yaml).map_err(|e| {
        AppError::Prompt(format!("Failed to parse built-in prompt {}: {}", prompt_id, e))
    })?;

    Ok(Some(definition))
}
