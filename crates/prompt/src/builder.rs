//! Prompt builder for rendering templates and injecting research context.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, PromptDefinition};
use grounded_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

/// Build the synthesis prompt from a definition, the user request and research.
///
/// Sections always come out in template order. The request is inserted
/// verbatim. Research is rendered as a numbered list of `(content, source)`
/// entries; when there is none, the definition's no-research notice takes
/// its place.
///
/// # Example
/// ```no_run
/// use grounded_prompt::{build_prompt, builtin_prompt, SYNTHESIS_PROMPT_ID};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = builtin_prompt(SYNTHESIS_PROMPT_ID)?.expect("built-in prompt");
/// let research = [("Sharding splits data by key.", "db.md")];
/// let built = build_prompt(&def, "Propose a storage layout", research)?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt<'a, I>(
    definition: &PromptDefinition,
    request: &str,
    research: I,
) -> AppResult<BuiltPrompt>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    tracing::debug!("Building prompt: {}", definition.id);

    let (research_text, research_items) = render_research_list(research);
    let grounded = research_items > 0;

    let mut variables = HashMap::new();
    variables.insert("persona".to_string(), definition.persona.trim().to_string());
    variables.insert("tone".to_string(), definition.behavior.tone.clone());
    variables.insert("style".to_string(), definition.behavior.style.clone());
    variables.insert("format".to_string(), definition.output.format.clone());
    variables.insert("request".to_string(), request.to_string());

    if grounded {
        variables.insert("research".to_string(), research_text);
    } else {
        tracing::debug!("No research entries, using the no-research notice");
        variables.insert(
            "research".to_string(),
            definition.no_research_notice.trim().to_string(),
        );
    }

    let text = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt {
        text,
        metadata: BuiltPromptMetadata {
            source_prompt_id: definition.id.clone(),
            research_items,
            grounded,
        },
    })
}

/// Render research entries as `[n] content (source: name)` lines.
///
/// Returns the rendered block and the number of entries.
pub fn render_research_list<'a, I>(entries: I) -> (String, usize)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut output = String::new();
    let mut count = 0;

    for (content, source) in entries {
        count += 1;
        if count > 1 {
            output.push('\n');
        }
        output.push_str(&format!("[{}] {} (source: {})", count, content.trim(), source));
    }

    (output, count)
}

/// Render a Handlebars template with variables.
pub(crate) fn render_template(
    template: &str,
    variables: &HashMap<String, String>,
) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Prompts are plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", &variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}
