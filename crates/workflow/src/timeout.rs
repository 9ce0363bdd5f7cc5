//! Time limits for service calls.

use grounded_core::{AppError, AppResult};
use std::future::Future;
use std::time::Duration;

/// Await `fut` for at most `limit`; on expiry return `on_timeout(message)`.
pub(crate) async fn bounded<T, F>(
    limit: Duration,
    what: &str,
    on_timeout: fn(String) -> AppError,
    fut: F,
) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(on_timeout(format!("{} timed out after {:?}", what, limit))),
    }
}
