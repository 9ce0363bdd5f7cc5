//! Deterministic doubles for the search and generation capabilities.

mod scenarios;

use crate::engine::{WorkflowEngine, WorkflowSettings};
use grounded_core::{AppError, AppResult};
use grounded_llm::Generator;
use grounded_prompt::{builtin_prompt, PromptDefinition, SYNTHESIS_PROMPT_ID};
use grounded_retrieval::{RetrievedItem, Retriever};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shared, ordered record of capability calls.
pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub(crate) struct FakeRetriever {
    items: Vec<RetrievedItem>,
    log: CallLog,
    failure: Option<String>,
    delay: Option<Duration>,
    cancel_on_search: Option<CancellationToken>,
}

impl FakeRetriever {
    pub(crate) fn new(items: Vec<RetrievedItem>, log: &CallLog) -> Self {
        Self {
            items,
            log: log.clone(),
            failure: None,
            delay: None,
            cancel_on_search: None,
        }
    }

    pub(crate) fn failing(message: &str, log: &CallLog) -> Self {
        let mut retriever = Self::new(Vec::new(), log);
        retriever.failure = Some(message.to_string());
        retriever
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Cancel `token` while serving a search, as a caller hanging up mid-request would.
    pub(crate) fn cancelling(mut self, token: CancellationToken) -> Self {
        self.cancel_on_search = Some(token);
        self
    }
}

#[async_trait::async_trait]
impl Retriever for FakeRetriever {
    async fn search(&self, _query: &str, max_results: usize) -> AppResult<Vec<RetrievedItem>> {
        self.log.lock().unwrap().push(format!("search:{}", max_results));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(ref token) = self.cancel_on_search {
            token.cancel();
        }
        if let Some(ref message) = self.failure {
            return Err(AppError::Retrieval(message.clone()));
        }

        Ok(self.items.iter().take(max_results).cloned().collect())
    }
}

type Reply = Box<dyn Fn(&str) -> AppResult<String> + Send + Sync>;

pub(crate) struct FakeGenerator {
    log: CallLog,
    prompts: Mutex<Vec<String>>,
    reply: Reply,
    delay: Option<Duration>,
}

impl FakeGenerator {
    pub(crate) fn new<F>(log: &CallLog, reply: F) -> Self
    where
        F: Fn(&str) -> AppResult<String> + Send + Sync + 'static,
    {
        Self {
            log: log.clone(),
            prompts: Mutex::new(Vec::new()),
            reply: Box::new(reply),
            delay: None,
        }
    }

    /// Answers by citing the first source in the prompt's research section.
    pub(crate) fn citing(log: &CallLog) -> Self {
        Self::new(log, |prompt| {
            let research = prompt.split("## Research").nth(1).unwrap_or_default();
            let cited = research
                .split("(source: ")
                .nth(1)
                .and_then(|rest| rest.split(')').next());
            Ok(match cited {
                Some(source) => format!("Proposal: shard the index per tenant [1] ({})", source),
                None => "Note: this proposal is not grounded in the corpus.".to_string(),
            })
        })
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.log.lock().unwrap().push("generate".to_string());
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        (self.reply)(prompt)
    }
}

pub(crate) fn synthesis_prompt() -> PromptDefinition {
    builtin_prompt(SYNTHESIS_PROMPT_ID).unwrap().unwrap()
}

pub(crate) fn engine(retriever: FakeRetriever, generator: Arc<FakeGenerator>) -> WorkflowEngine {
    engine_with(retriever, generator, WorkflowSettings::default())
}

pub(crate) fn engine_with(
    retriever: FakeRetriever,
    generator: Arc<FakeGenerator>,
    settings: WorkflowSettings,
) -> WorkflowEngine {
    WorkflowEngine::new(Arc::new(retriever), generator, synthesis_prompt(), settings)
}

/// `count` numbered items spread over three sources.
pub(crate) fn research_items(count: usize) -> Vec<RetrievedItem> {
    (1..=count)
        .map(|i| {
            RetrievedItem::new(
                format!("Finding {} about search platform scaling.", i),
                format!("design-note-{}.md", i % 3),
            )
            .with_score(1.0 / i as f32)
        })
        .collect()
}
