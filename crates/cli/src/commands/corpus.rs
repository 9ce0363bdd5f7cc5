//! Corpus command handler.
//!
//! Uploads a JSONL corpus to the search service and reports what was sent.

use crate::services;
use clap::{Args, Subcommand};
use grounded_core::{config::AppConfig, AppResult};
use grounded_retrieval::{read_corpus, CorpusUploader, UploadOutcome};
use std::path::PathBuf;

/// Corpus management
#[derive(Args, Debug)]
pub struct CorpusCommand {
    #[command(subcommand)]
    pub action: CorpusAction,
}

#[derive(Subcommand, Debug)]
pub enum CorpusAction {
    /// Upload a JSONL corpus, skipping it if unchanged since the last upload
    Upload(CorpusUploadCommand),
    /// Show the fingerprint of the last upload
    Status(CorpusStatusCommand),
}

impl CorpusCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        match &self.action {
            CorpusAction::Upload(cmd) => cmd.execute(config).await,
            CorpusAction::Status(cmd) => cmd.execute(config),
        }
    }
}

/// Upload records to the search service
#[derive(Args, Debug)]
pub struct CorpusUploadCommand {
    /// JSONL file of {"content", "source"} records
    pub file: PathBuf,

    /// Corpus name
    #[arg(short, long, default_value = "default")]
    pub name: String,

    /// Upload even if the corpus is unchanged
    #[arg(long)]
    pub force: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CorpusUploadCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing corpus upload for '{}'", self.name);

        let records = read_corpus(&self.file)?;
        let uploader = CorpusUploader::new(&config.workspace, &self.name, services::search_client(config))
            .with_batch_size(config.search.upload_batch_size);

        let outcome = uploader.upload(&records, self.force).await?;

        match (&outcome, self.json) {
            (UploadOutcome::Unchanged { hash }, true) => services::print_json(&serde_json::json!({
                "corpus": self.name,
                "status": "unchanged",
                "hash": hash,
            }))?,
            (UploadOutcome::Unchanged { hash }, false) => {
                println!("Corpus '{}' unchanged ({}), nothing uploaded", self.name, short_hash(hash))
            }
            (UploadOutcome::Uploaded { hash, records, batches }, true) => {
                services::print_json(&serde_json::json!({
                    "corpus": self.name,
                    "status": "uploaded",
                    "hash": hash,
                    "records": records,
                    "batches": batches,
                }))?
            }
            (UploadOutcome::Uploaded { hash, records, batches }, false) => println!(
                "Uploaded {} records in {} batches to corpus '{}' ({})",
                records,
                batches,
                self.name,
                short_hash(hash)
            ),
        }

        Ok(())
    }
}

/// Show the last upload fingerprint
#[derive(Args, Debug)]
pub struct CorpusStatusCommand {
    /// Corpus name
    #[arg(short, long, default_value = "default")]
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CorpusStatusCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let uploader =
            CorpusUploader::new(&config.workspace, &self.name, services::search_client(config));
        let fingerprint = uploader.status()?;

        if self.json {
            services::print_json(&serde_json::json!({
                "corpus": self.name,
                "fingerprint": fingerprint,
            }))?;
            return Ok(());
        }

        match fingerprint {
            Some(fp) => println!(
                "Corpus '{}': {} records, hash {}, uploaded {}",
                self.name,
                fp.records,
                short_hash(&fp.hash),
                fp.uploaded_at.to_rfc3339()
            ),
            None => println!("Corpus '{}' has not been uploaded", self.name),
        }

        Ok(())
    }
}

fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
