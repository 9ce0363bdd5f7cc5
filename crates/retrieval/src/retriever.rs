//! The search capability consumed by the router and the research node.

use crate::types::RetrievedItem;
use grounded_core::{AppError, AppResult};

/// Query in, ranked snippets out.
///
/// Results keep the service's relevance order and never exceed
/// `max_results`. An empty vector means nothing matched; transport and
/// protocol problems are `AppError::Retrieval`, never an empty result.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> AppResult<Vec<RetrievedItem>>;
}

/// Reject arguments no search service should see.
pub fn check_search_args(query: &str, max_results: usize) -> AppResult<()> {
    if query.trim().is_empty() {
        return Err(AppError::Retrieval("Search query is empty".to_string()));
    }

    if max_results == 0 {
        return Err(AppError::Retrieval(
            "max_results must be at least 1".to_string(),
        ));
    }

    Ok(())
}
