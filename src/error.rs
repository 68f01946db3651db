// src/error.rs

//! Domain errors for queue resolution, entry point discovery and submission.
//!
//! Plumbing failures (file IO, YAML, SDK calls) stay in `anyhow` with context;
//! these variants are the conditions callers and tests need to tell apart.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no queues found in stack {stack}")]
    NoQueuesFound { stack: String },

    #[error("no matching queue for pattern '{pattern}' in stack {stack}")]
    NoMatchingQueue { stack: String, pattern: String },

    #[error("invalid queue pattern '{pattern}': {source}")]
    InvalidQueuePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no submission entry point found (marker '{marker}')")]
    NoSubmissionEntryPoint { marker: String },

    #[error("unknown workflow: {0}")]
    UnknownWorkflow(String),

    #[error("invalid workflow input: {0}")]
    InvalidInput(String),

    #[error("submission function {function} failed: {message}")]
    InvocationFailed { function: String, message: String },

    #[error("malformed submission response: {0}")]
    MalformedResponse(String),
}
