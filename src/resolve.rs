// src/resolve.rs

//! Job queue resolution and submission entry point discovery.
//!
//! Both follow the same shape: enumerate, filter, fail when nothing is left,
//! warn and take the first candidate (enumeration order) when several are.

use anyhow::Result;
use regex::Regex;
use serde::Deserialize;

use crate::cloud::{FunctionInvoker, StackCatalog, StackExport, StackResource, JOB_QUEUE_RESOURCE_TYPE};
use crate::error::SubmitError;
use crate::util::last_path_segment;

/// Default queue pattern: any queue whose name starts with `default`.
pub const DEFAULT_QUEUE_PATTERN: &str = "default.*";

/// Marker identifying workflow submission functions / exports.
pub const DEFAULT_SUBMISSION_MARKER: &str = "WorkflowSubmission";

/// Where the job queue name comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueSource {
    /// Use this queue name as-is.
    Explicit(String),

    /// Pick a `AWS::Batch::JobQueue` resource of the stack matching `pattern`.
    Stack { stack_name: String, pattern: String },
}

/// How the submission function is located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Discovery {
    /// CloudFormation exports whose name contains the marker.
    #[default]
    Exports,

    /// Lambda functions whose name contains the marker.
    Functions,
}

/* ---------------- job queue ---------------- */

pub async fn resolve_queue(catalog: &dyn StackCatalog, source: &QueueSource) -> Result<String> {
    match source {
        QueueSource::Explicit(name) => Ok(name.clone()),
        QueueSource::Stack {
            stack_name,
            pattern,
        } => {
            let resources = catalog.list_stack_resources(stack_name).await?;
            let queue = select_queue(&resources, stack_name, pattern)?;
            tracing::info!(stack = %stack_name, queue = %queue, "resolved job queue");
            Ok(queue)
        }
    }
}

/// Select a job queue from a stack's resources and return its short name.
///
/// `pattern` is matched against the short name, anchored at its start.
pub fn select_queue(
    resources: &[StackResource],
    stack_name: &str,
    pattern: &str,
) -> Result<String, SubmitError> {
    let queues: Vec<&str> = resources
        .iter()
        .filter(|r| r.resource_type == JOB_QUEUE_RESOURCE_TYPE)
        .map(|r| r.physical_resource_id.as_str())
        .collect();

    if queues.is_empty() {
        return Err(SubmitError::NoQueuesFound {
            stack: stack_name.to_string(),
        });
    }

    let re = Regex::new(&format!("^(?:{})", pattern)).map_err(|source| {
        SubmitError::InvalidQueuePattern {
            pattern: pattern.to_string(),
            source,
        }
    })?;

    let matching: Vec<&str> = queues
        .into_iter()
        .map(last_path_segment)
        .filter(|name| re.is_match(name))
        .collect();

    match matching.as_slice() {
        [] => Err(SubmitError::NoMatchingQueue {
            stack: stack_name.to_string(),
            pattern: pattern.to_string(),
        }),
        [only] => Ok(only.to_string()),
        [first, ..] => {
            tracing::warn!(
                candidates = ?matching,
                chosen = %first,
                "multiple queues found, using the first"
            );
            Ok(first.to_string())
        }
    }
}

/* ---------------- submission entry point ---------------- */

pub async fn discover_entry_point(
    discovery: Discovery,
    marker: &str,
    catalog: &dyn StackCatalog,
    invoker: &dyn FunctionInvoker,
) -> Result<String> {
    let candidates = match discovery {
        Discovery::Exports => export_candidates(&catalog.list_exports().await?, marker),
        Discovery::Functions => function_candidates(&invoker.list_functions().await?, marker),
    };

    let entry_point = pick_entry_point(candidates, marker)?;
    tracing::info!(entry_point = %entry_point, ?discovery, "resolved submission function");
    Ok(entry_point)
}

/// Values of the exports whose name carries the marker.
pub fn export_candidates(exports: &[StackExport], marker: &str) -> Vec<String> {
    exports
        .iter()
        .filter(|e| e.name.contains(marker))
        .map(|e| e.value.clone())
        .collect()
}

pub fn function_candidates(functions: &[String], marker: &str) -> Vec<String> {
    functions
        .iter()
        .filter(|name| name.contains(marker))
        .cloned()
        .collect()
}

pub fn pick_entry_point(candidates: Vec<String>, marker: &str) -> Result<String, SubmitError> {
    if candidates.len() > 1 {
        tracing::warn!(
            candidates = ?candidates,
            "multiple submission functions found, using the first"
        );
    }

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| SubmitError::NoSubmissionEntryPoint {
            marker: marker.to_string(),
        })
}
