//! Prompt loader for YAML prompt definitions.

use crate::defaults::builtin_prompt;
use crate::types::PromptDefinition;
use grounded_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Load a prompt definition by ID.
///
/// A workspace file `.grounded/prompts/<id>.yml` takes precedence; otherwise
/// the built-in definition with that ID is used.
///
/// # Example
/// ```no_run
/// use grounded_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "workflow.synthesis.default")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    if !prompt_file.exists() {
        tracing::debug!("No workspace override at {:?}", prompt_file);
        return builtin_prompt(prompt_id)?
            .ok_or_else(|| AppError::Prompt(format!("Prompt not found: {}", prompt_id)));
    }

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    if definition.id != prompt_id {
        tracing::warn!(
            "Prompt file {:?} declares id {}, expected {}",
            prompt_file,
            definition.id,
            prompt_id
        );
    }

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// List the prompt IDs overridden in the workspace.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let prompts_dir = prompts_dir(workspace_path);

    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(&prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    prompt_ids.sort();
    Ok(prompt_ids)
}

/// Validate a prompt definition.
pub fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.api_version.is_empty() {
        return Err(AppError::Prompt(
            "Prompt apiVersion cannot be empty".to_string(),
        ));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    let request_at = def.template.find("{{request}}");
    let research_at = def.template.find("{{research}}");

    match (request_at, research_at) {
        (Some(request), Some(research)) if request < research => Ok(()),
        (Some(_), Some(_)) => Err(AppError::Prompt(
            "Prompt template must place {{request}} before {{research}}".to_string(),
        )),
        _ => Err(AppError::Prompt(
            "Prompt template must reference {{request}} and {{research}}".to_string(),
        )),
    }
}

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".grounded").join("prompts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::SYNTHESIS_PROMPT_ID;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, template: &str) -> PathBuf {
        let prompts_dir = dir.join(".grounded/prompts");
        fs::create_dir_all(&prompts_dir).unwrap();

        let content = format!(
            r#"
id: {}
title: "Test Prompt"
apiVersion: "1.0"
createdBy: test
behavior:
  tone: professional
  style: concise
persona: "You are terse."
noResearchNotice: "Nothing matched."
template: "{}"
output:
  format: text
"#,
            id, template
        );

        let file_path = prompts_dir.join(format!("{}.yml", id));
        fs::write(&file_path, content).unwrap();
        file_path
    }

    #[test]
    fn test_load_workspace_override() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(
            temp_dir.path(),
            SYNTHESIS_PROMPT_ID,
            "{{persona}} {{request}} {{research}}",
        );

        let prompt = load_prompt(temp_dir.path(), SYNTHESIS_PROMPT_ID).unwrap();
        assert_eq!(prompt.persona, "You are terse.");
    }

    #[test]
    fn test_load_falls_back_to_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_prompt(temp_dir.path(), SYNTHESIS_PROMPT_ID).unwrap();
        assert_eq!(prompt.id, SYNTHESIS_PROMPT_ID);
        assert_eq!(prompt.output.format, "markdown");
    }

    #[test]
    fn test_load_unknown_prompt() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_prompt(temp_dir.path(), "nonexistent").unwrap_err();
        assert!(err.to_string().contains("Prompt not found"));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let prompts_dir = temp_dir.path().join(".grounded/prompts");
        fs::create_dir_all(&prompts_dir).unwrap();
        fs::write(prompts_dir.join("broken.yml"), "invalid: yaml: content:").unwrap();

        assert!(load_prompt(temp_dir.path(), "broken").is_err());
    }

    #[test]
    fn test_override_without_research_slot_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "custom", "{{persona}} {{request}}");

        let err = load_prompt(temp_dir.path(), "custom").unwrap_err();
        assert!(err.to_string().contains("{{research}}"));
    }

    #[test]
    fn test_override_with_sections_swapped_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "custom", "{{research}} {{request}}");

        let err = load_prompt(temp_dir.path(), "custom").unwrap_err();
        assert!(err.to_string().contains("before"));
    }

    #[test]
    fn test_list_prompts() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "prompt2", "{{request}} {{research}}");
        write_prompt(temp_dir.path(), "prompt1", "{{request}} {{research}}");

        let prompts = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(prompts, vec!["prompt1".to_string(), "prompt2".to_string()]);
    }

    #[test]
    fn test_list_prompts_without_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_prompts(temp_dir.path()).unwrap().is_empty());
    }
}
