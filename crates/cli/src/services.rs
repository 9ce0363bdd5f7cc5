//! Wiring from configuration to the search, generation and workflow services.

use grounded_core::{config::AppConfig, AppError, AppResult};
use grounded_llm::{create_client, Generator, LlmGenerator};
use grounded_prompt::load_prompt;
use grounded_retrieval::{HttpSearchClient, Retriever};
use grounded_workflow::{CancellationToken, Router, WorkflowEngine, WorkflowSettings};
use std::path::PathBuf;
use std::sync::Arc;

pub fn search_client(config: &AppConfig) -> Arc<HttpSearchClient> {
    tracing::debug!("Search endpoint: {}", config.search.endpoint);
    Arc::new(HttpSearchClient::new(
        config.search.endpoint.clone(),
        config.resolve_search_api_key(),
    ))
}

pub fn generator(config: &AppConfig) -> AppResult<Arc<dyn Generator>> {
    config.validate()?;

    let endpoint = config.provider_endpoint(&config.provider);
    let api_key = config.resolve_api_key(&config.provider);
    let client = create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())?;

    let workflow = &config.workflow;
    Ok(Arc::new(
        LlmGenerator::new(client, config.model.clone())
            .with_temperature(workflow.temperature)
            .with_max_tokens(workflow.max_tokens)
            .with_max_prompt_chars(workflow.max_prompt_chars),
    ))
}

pub fn engine(config: &AppConfig, retriever: Arc<dyn Retriever>) -> AppResult<WorkflowEngine> {
    let prompt = load_prompt(&config.workspace, &config.workflow.prompt_id)?;
    Ok(WorkflowEngine::new(
        retriever,
        generator(config)?,
        prompt,
        WorkflowSettings::from_config(&config.workflow),
    ))
}

pub fn router(config: &AppConfig) -> AppResult<Router> {
    let retriever: Arc<dyn Retriever> = search_client(config);
    let engine = engine(config, retriever.clone())?;

    Ok(Router::new(
        retriever,
        Arc::new(engine),
        WorkflowSettings::from_config(&config.workflow),
    )
    .with_extra_indicators(config.routing.extra_workflow_indicators.clone()))
}

/// Token cancelled when the user presses Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling at the next step");
            trigger.cancel();
        }
    });
    token
}

/// Resolve request text from a positional argument or a file.
pub fn read_request(request: Option<&str>, file: Option<&PathBuf>) -> AppResult<String> {
    let text = match (request, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read request file {:?}: {}", path, e))
        })?,
        (None, None) => return Err(AppError::Config("No request provided".to_string())),
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Config("Request is empty".to_string()));
    }
    Ok(text)
}

pub fn print_json(value: &serde_json::Value) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
