//! Retrieval crate for Grounded.
//!
//! Provides:
//! - The [`Retriever`] search capability and its HTTP implementation
//! - Citation formatting for direct answers
//! - Corpus JSONL reading and idempotent, hash-checked upload

pub mod corpus;
pub mod format;
pub mod http;
pub mod retriever;
pub mod types;

pub use corpus::{corpus_hash, read_corpus, CorpusSink, CorpusUploader, Fingerprint, UploadOutcome};
pub use format::{format_citations, unique_sources, NO_MATCHES_ANSWER};
pub use http::HttpSearchClient;
pub use retriever::{check_search_args, Retriever};
pub use types::{CorpusRecord, RetrievedItem};
