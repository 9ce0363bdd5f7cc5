//! Corpus ingestion: JSONL reading, content hashing and idempotent upload.
//!
//! The uploader keeps a fingerprint of the last successful upload under
//! `.grounded/corpus/<name>/fingerprint.json`. Uploading a record set whose
//! hash matches that fingerprint does nothing.

use crate::types::CorpusRecord;
use chrono::{DateTime, Utc};
use grounded_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Destination for corpus records, normally the search service.
#[async_trait::async_trait]
pub trait CorpusSink: Send + Sync {
    async fn upload_batch(&self, records: &[CorpusRecord]) -> AppResult<()>;

    async fn reindex(&self) -> AppResult<()>;
}

/// Read a JSONL corpus file of `{content, source}` records.
pub fn read_corpus(path: &Path) -> AppResult<Vec<CorpusRecord>> {
    let file = File::open(path)
        .map_err(|e| AppError::Corpus(format!("Failed to open corpus {:?}: {}", path, e)))?;

    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| {
            AppError::Corpus(format!("Failed to read line {}: {}", line_num + 1, e))
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let record: CorpusRecord = serde_json::from_str(&line).map_err(|e| {
            AppError::Corpus(format!(
                "Failed to parse line {} in {:?}: {}",
                line_num + 1,
                path,
                e
            ))
        })?;

        if record.content.trim().is_empty() || record.source.trim().is_empty() {
            return Err(AppError::Corpus(format!(
                "Line {} in {:?} has an empty content or source",
                line_num + 1,
                path
            )));
        }

        records.push(record);
    }

    tracing::debug!("Read {} corpus records from {:?}", records.len(), path);
    Ok(records)
}

/// SHA-256 over the canonical record stream, as lowercase hex.
///
/// Each record contributes its compact JSON form plus a newline, in order.
pub fn corpus_hash(records: &[CorpusRecord]) -> AppResult<String> {
    let mut hasher = Sha256::new();
    for record in records {
        let line = serde_json::to_string(record)?;
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Record of the last successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub hash: String,
    pub records: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// What an upload run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The corpus matched the stored fingerprint; nothing was sent
    Unchanged { hash: String },
    /// Records were sent and the index rebuilt
    Uploaded {
        hash: String,
        records: usize,
        batches: usize,
    },
}

/// Uploads a named corpus, skipping work when it has not changed.
pub struct CorpusUploader {
    workspace: PathBuf,
    name: String,
    sink: Arc<dyn CorpusSink>,
    batch_size: usize,
}

impl CorpusUploader {
    pub fn new(workspace: &Path, name: &str, sink: Arc<dyn CorpusSink>) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            name: name.to_string(),
            sink,
            batch_size: 100,
        }
    }

    /// Set the number of records per upload request.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn fingerprint_path(&self) -> AppResult<PathBuf> {
        check_corpus_name(&self.name)?;
        Ok(self
            .workspace
            .join(".grounded")
            .join("corpus")
            .join(&self.name)
            .join("fingerprint.json"))
    }

    /// Fingerprint of the last successful upload, if any.
    pub fn status(&self) -> AppResult<Option<Fingerprint>> {
        let path = self.fingerprint_path()?;
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            AppError::Corpus(format!("Failed to read fingerprint {:?}: {}", path, e))
        })?;

        let fingerprint = serde_json::from_str(&contents).map_err(|e| {
            AppError::Corpus(format!("Failed to parse fingerprint {:?}: {}", path, e))
        })?;

        Ok(Some(fingerprint))
    }

    /// Upload `records` unless they match the stored fingerprint.
    ///
    /// With `force`, the fingerprint check is skipped. The fingerprint is
    /// only rewritten after every batch and the reindex succeeded.
    pub async fn upload(&self, records: &[CorpusRecord], force: bool) -> AppResult<UploadOutcome> {
        check_corpus_name(&self.name)?;
        if records.is_empty() {
            return Err(AppError::Corpus("Corpus has no records".to_string()));
        }

        let hash = corpus_hash(records)?;

        if !force {
            if let Some(previous) = self.status()? {
                if previous.hash == hash {
                    tracing::info!(corpus = %self.name, "Corpus unchanged, skipping upload");
                    return Ok(UploadOutcome::Unchanged { hash });
                }
            }
        }

        let mut batches = 0;
        for batch in records.chunks(self.batch_size) {
            self.sink.upload_batch(batch).await?;
            batches += 1;
            tracing::debug!("Uploaded batch {} ({} records)", batches, batch.len());
        }

        self.sink.reindex().await?;

        self.write_fingerprint(&Fingerprint {
            hash: hash.clone(),
            records: records.len(),
            uploaded_at: Utc::now(),
        })?;

        tracing::info!(
            corpus = %self.name,
            records = records.len(),
            batches,
            "Corpus uploaded"
        );

        Ok(UploadOutcome::Uploaded {
            hash,
            records: records.len(),
            batches,
        })
    }

    fn write_fingerprint(&self, fingerprint: &Fingerprint) -> AppResult<()> {
        let path = self.fingerprint_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(fingerprint)?;
        std::fs::write(&path, json).map_err(|e| {
            AppError::Corpus(format!("Failed to write fingerprint {:?}: {}", path, e))
        })?;

        Ok(())
    }
}

/// Corpus names become a directory under `.grounded/corpus/`.
fn check_corpus_name(name: &str) -> AppResult<()> {
    if name.is_empty()
        || name.contains(['/', '\\'])
        || name.contains("..")
        || name == "."
    {
        return Err(AppError::Corpus(format!("Invalid corpus name: {:?}", name)));
    }
    Ok(())
}
