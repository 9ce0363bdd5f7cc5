//! Route command handler.

use crate::services;
use clap::Args;
use grounded_core::{config::AppConfig, AppResult};
use grounded_workflow::analyze;
use std::path::PathBuf;

/// Show which path a request would take, without calling any service
#[derive(Args, Debug)]
pub struct RouteCommand {
    /// The request text
    pub request: Option<String>,

    /// Read the request from a file
    #[arg(short, long, conflicts_with = "request")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RouteCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let request = services::read_request(self.request.as_deref(), self.file.as_ref())?;
        let analysis = analyze(&request, &config.routing.extra_workflow_indicators);

        if self.json {
            services::print_json(&serde_json::to_value(&analysis)?)?;
        } else {
            println!("{} ({})", analysis.decision.as_str(), analysis.reasoning);
        }

        Ok(())
    }
}
