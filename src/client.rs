// src/client.rs

//! Submission client.
//!
//! Resolves the job queue and the submission function, renders the input
//! template and invokes the function synchronously. The template is read
//! before any AWS configuration is loaded so a bad path fails fast.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use crate::cli::Cli;
use crate::cloud::aws::{load_sdk_config, CloudFormationCatalog, LambdaInvoker};
use crate::cloud::{FunctionInvoker, StackCatalog, StartedExecution};
use crate::config::{FileConfig, Settings};
use crate::error::SubmitError;
use crate::execution_id::ExecutionId;
use crate::resolve::{discover_entry_point, resolve_queue};
use crate::template::{load_template, render_input, SubmissionPayload};

/// What was submitted, and the identity it was given.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReport {
    pub queue: String,
    pub workflow_name: String,
    pub entry_point: String,
    pub execution_id: ExecutionId,
    pub execution_arn: String,
}

/// Everything resolved up to the point of invocation.
#[derive(Debug, Clone, Serialize)]
pub struct PreparedSubmission {
    pub queue: String,
    pub entry_point: String,
    pub payload: SubmissionPayload,
}

/// Entry point from `main.rs`.
pub async fn run(cli: Cli) -> Result<()> {
    let file = FileConfig::discover(cli.config.as_deref())?;
    let settings = Settings::resolve(cli, file);

    let template = load_template(&settings.inputs_json_file)?;

    let sdk_config =
        load_sdk_config(settings.profile.as_deref(), settings.region.as_deref()).await;
    let catalog = CloudFormationCatalog::new(&sdk_config);
    let invoker = LambdaInvoker::new(&sdk_config);

    if settings.dry_run {
        let prepared = prepare(&settings, &template, &catalog, &invoker).await?;
        println!("{}", serde_json::to_string_pretty(&prepared)?);
        return Ok(());
    }

    let report = submit(&settings, &template, &catalog, &invoker).await?;

    println!("{}", report.queue);
    println!("{}", report.workflow_name);
    println!("{}", report.execution_id);

    Ok(())
}

pub async fn prepare(
    settings: &Settings,
    template: &str,
    catalog: &dyn StackCatalog,
    invoker: &dyn FunctionInvoker,
) -> Result<PreparedSubmission> {
    let queue = resolve_queue(catalog, &settings.queue_source()).await?;
    let entry_point =
        discover_entry_point(settings.discovery, &settings.marker, catalog, invoker).await?;

    let payload = SubmissionPayload::new(&settings.workflow_name, render_input(template, &queue));

    Ok(PreparedSubmission {
        queue,
        entry_point,
        payload,
    })
}

pub async fn submit(
    settings: &Settings,
    template: &str,
    catalog: &dyn StackCatalog,
    invoker: &dyn FunctionInvoker,
) -> Result<SubmissionReport> {
    let prepared = prepare(settings, template, catalog, invoker).await?;

    tracing::info!(
        workflow = %prepared.payload.workflow_name,
        function = %prepared.entry_point,
        "invoking submission function"
    );

    let output = invoker
        .invoke(&prepared.entry_point, prepared.payload.to_bytes()?)
        .await?;

    let body = String::from_utf8_lossy(&output.payload).into_owned();

    if let Some(kind) = output.function_error {
        return Err(SubmitError::InvocationFailed {
            function: prepared.entry_point,
            message: format!("{}: {}", kind, error_message(&body)),
        }
        .into());
    }

    let started = parse_started(&body)?;
    let execution_id = ExecutionId::from_execution_arn(&started.execution_arn).ok_or_else(|| {
        SubmitError::MalformedResponse(format!("no execution id in {}", started.execution_arn))
    })?;

    Ok(SubmissionReport {
        queue: prepared.queue,
        workflow_name: prepared.payload.workflow_name,
        entry_point: prepared.entry_point,
        execution_id,
        execution_arn: started.execution_arn,
    })
}

fn parse_started(body: &str) -> Result<StartedExecution> {
    serde_json::from_str(body)
        .map_err(|e| SubmitError::MalformedResponse(format!("{}: {}", e, body)))
        .context("Submission function returned an unexpected response")
}

/// Lambda error payloads look like `{"errorType": ..., "errorMessage": ...}`.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("errorMessage").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
