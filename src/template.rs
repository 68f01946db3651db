// src/template.rs

//! Workflow input templates and the submission payload.
//!
//! A template is raw JSON text that may reference the job queue through the
//! `${BatchJobQueue}` placeholder. Substitution is textual and happens before
//! the document is ever parsed, so the queue name is inserted verbatim.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::util::read_to_string;

/// Placeholder replaced with the resolved job queue name.
pub const QUEUE_PLACEHOLDER: &str = "${BatchJobQueue}";

/// Message sent to the submission function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub workflow_name: String,

    /// JSON document, still encoded as a string.
    pub input: String,
}

impl SubmissionPayload {
    pub fn new(workflow_name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            input: input.into(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).context("Failed to encode submission payload")
    }
}

/// Load a template from disk without interpreting it.
pub fn load_template(path: &Path) -> Result<String> {
    read_to_string(path).with_context(|| format!("Failed to load workflow inputs {:?}", path))
}

/// Replace every `${BatchJobQueue}` occurrence with `queue`.
pub fn render_input(template: &str, queue: &str) -> String {
    template.replace(QUEUE_PLACEHOLDER, queue)
}
