//! Research command handler.
//!
//! Runs the research-synthesis workflow regardless of how the request
//! would be routed.

use crate::services;
use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Produce a researched proposal for a request
#[derive(Args, Debug)]
pub struct ResearchCommand {
    /// The request text
    pub request: Option<String>,

    /// Read the request from a file
    #[arg(short, long, conflicts_with = "request")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ResearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing research command");

        let request = services::read_request(self.request.as_deref(), self.file.as_ref())?;
        let engine = services::engine(config, services::search_client(config))?;

        let cancel = services::cancel_on_ctrl_c();
        let proposal = engine.execute_with_cancel(&request, &cancel).await?;

        if self.json {
            services::print_json(&serde_json::json!({
                "proposal": proposal,
                "promptId": config.workflow.prompt_id,
                "researchMaxResults": config.workflow.research_max_results,
                "provider": config.provider,
                "model": config.model,
            }))?;
        } else {
            println!("{}", proposal);
        }

        Ok(())
    }
}
