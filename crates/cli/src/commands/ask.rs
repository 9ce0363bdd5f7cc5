//! Ask command handler.
//!
//! Routes a request and prints the answer from whichever path handled it.

use crate::services;
use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Ask a question or make a request against the corpus
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The request text
    pub request: Option<String>,

    /// Read the request from a file
    #[arg(short, long, conflicts_with = "request")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let request = services::read_request(self.request.as_deref(), self.file.as_ref())?;
        let router = services::router(config)?;
        let analysis = router.analyze(&request);

        let cancel = services::cancel_on_ctrl_c();
        let answer = router.dispatch_with_cancel(&request, &cancel).await?;

        if self.json {
            services::print_json(&serde_json::json!({
                "answer": answer,
                "route": analysis.decision,
                "reasoning": analysis.reasoning,
                "provider": config.provider,
                "model": config.model,
            }))?;
        } else {
            println!("{}", answer);
        }

        Ok(())
    }
}
