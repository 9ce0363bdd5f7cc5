//! Configuration management for Grounded.
//!
//! Sources, lowest precedence first:
//! - Built-in defaults
//! - Config file (`.grounded/config.yaml`)
//! - Environment variables (`GROUNDED_*`)
//! - Command-line flags
//!
//! Credentials are never stored in the file; it only names the environment
//! variables that hold them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .grounded/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Active LLM provider ("ollama", "openai")
    pub provider: String,

    /// Default model identifier
    pub model: String,

    /// API key for the LLM provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// LLM provider configurations
    pub llm: Option<LlmConfig>,

    /// External search service settings
    pub search: SearchConfig,

    /// Workflow tuning
    pub workflow: WorkflowConfig,

    /// Router tuning
    pub routing: RoutingConfig,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Model configured for this provider.
    pub fn model(&self) -> &str {
        match self {
            ProviderConfig::OpenAI { model, .. } => model,
            ProviderConfig::Ollama { model, .. } => model,
        }
    }

    /// Endpoint override, if any.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ProviderConfig::OpenAI { endpoint, .. } => endpoint.as_deref(),
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint.as_str()),
        }
    }
}

/// External search service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Base URL of the search service
    pub endpoint: String,

    /// Environment variable holding the bearer token, if the service needs one
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Upload batch size for corpus ingestion
    #[serde(default = "default_upload_batch_size")]
    pub upload_batch_size: usize,
}

fn default_upload_batch_size() -> usize {
    100
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            api_key_env: None,
            upload_batch_size: default_upload_batch_size(),
        }
    }
}

/// Workflow tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkflowConfig {
    /// Result count for the single-hop direct path
    pub direct_max_results: usize,

    /// Result count for the research node
    pub research_max_results: usize,

    /// Bound on each search call, in seconds
    pub retrieval_timeout_secs: u64,

    /// Bound on each generation call, in seconds
    pub generation_timeout_secs: u64,

    /// Prompts longer than this are rejected before reaching the model
    pub max_prompt_chars: usize,

    /// Sampling temperature for synthesis
    pub temperature: Option<f32>,

    /// Token ceiling for synthesis
    pub max_tokens: Option<u32>,

    /// Prompt definition used by the synthesis node
    pub prompt_id: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            direct_max_results: 3,
            research_max_results: 10,
            retrieval_timeout_secs: 30,
            generation_timeout_secs: 120,
            max_prompt_chars: 200_000,
            temperature: Some(0.3),
            max_tokens: Some(2048),
            prompt_id: "workflow.synthesis.default".to_string(),
        }
    }
}

/// Router tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutingConfig {
    /// Extra phrases that mark a request as planning/synthesis work
    pub extra_workflow_indicators: Vec<String>,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    search: Option<SearchConfig>,
    workflow: Option<WorkflowConfig>,
    routing: Option<RoutingConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

const KNOWN_PROVIDERS: [&str; 2] = ["ollama", "openai"];

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "ollama".to_string(),
            model: "llama3.2".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            search: SearchConfig::default(),
            workflow: WorkflowConfig::default(),
            routing: RoutingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file and environment.
    ///
    /// Environment variables:
    /// - `GROUNDED_WORKSPACE`: Override workspace path
    /// - `GROUNDED_CONFIG`: Path to config file
    /// - `GROUNDED_PROVIDER`: LLM provider
    /// - `GROUNDED_MODEL`: Model identifier
    /// - `GROUNDED_API_KEY`: API key
    /// - `GROUNDED_SEARCH_ENDPOINT`: Search service base URL
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("GROUNDED_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("GROUNDED_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.grounded_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("GROUNDED_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("GROUNDED_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("GROUNDED_SEARCH_ENDPOINT") {
            config.search.endpoint = endpoint;
        }

        config.api_key = std::env::var("GROUNDED_API_KEY").ok();

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> Result<Self, serde_yaml::Error> {
        let config_file: ConfigFile = serde_yaml::from_str(contents)?;

        let mut result = self.clone();

        if let Some(path) = config_file.workspace.and_then(|ws| ws.path) {
            result.workspace = PathBuf::from(path);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(search) = config_file.search {
            result.search = search;
        }

        if let Some(workflow) = config_file.workflow {
            result.workflow = workflow;
        }

        if let Some(routing) = config_file.routing {
            result.routing = routing;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();
            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = provider_config.model().to_string();
            }
            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        search_endpoint: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(endpoint) = search_endpoint {
            self.search.endpoint = endpoint;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .grounded directory.
    pub fn grounded_dir(&self) -> PathBuf {
        self.workspace.join(".grounded")
    }

    /// Ensure the .grounded directory exists.
    pub fn ensure_grounded_dir(&self) -> AppResult<()> {
        let dir = self.grounded_dir();
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                AppError::Config(format!("Failed to create .grounded directory: {}", e))
            })?;
        }
        Ok(())
    }

    /// Get a provider's configuration block, if one was configured.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Endpoint configured for a provider, if any.
    pub fn provider_endpoint(&self, provider: &str) -> Option<String> {
        self.get_provider_config(provider)
            .and_then(|pc| pc.endpoint())
            .map(str::to_string)
    }

    /// Resolve the LLM API key: `GROUNDED_API_KEY` first, then the provider's env var.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.get_provider_config(provider) {
            Some(ProviderConfig::OpenAI { api_key_env, .. }) => std::env::var(api_key_env).ok(),
            _ => None,
        }
    }

    /// Resolve the search service bearer token, if one is configured.
    pub fn resolve_search_api_key(&self) -> Option<String> {
        self.search
            .api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok())
    }

    /// Validate configuration for the active provider and the workflow knobs.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();

        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if let Some(ProviderConfig::OpenAI { api_key_env, .. }) =
            self.get_provider_config(&self.provider)
        {
            if self.api_key.is_none() && std::env::var(api_key_env).is_err() {
                return Err(AppError::Config(format!(
                    "API key not found in environment variable: {}",
                    api_key_env
                )));
            }
        }

        if self.search.endpoint.trim().is_empty() {
            return Err(AppError::Config(
                "Search endpoint cannot be empty".to_string(),
            ));
        }

        let wf = &self.workflow;
        if wf.direct_max_results == 0 || wf.research_max_results == 0 {
            return Err(AppError::Config(
                "Result counts must be at least 1".to_string(),
            ));
        }

        if wf.research_max_results < wf.direct_max_results {
            tracing::warn!(
                "researchMaxResults ({}) is smaller than directMaxResults ({})",
                wf.research_max_results,
                wf.direct_max_results
            );
        }

        if wf.retrieval_timeout_secs == 0 || wf.generation_timeout_secs == 0 {
            return Err(AppError::Config("Timeouts must be non-zero".to_string()));
        }

        Ok(())
    }
}
