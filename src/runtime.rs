// src/runtime.rs

//! Lambda runtime hosting the submission handler.
//!
//! AWS clients are built once per cold start and shared by every invocation.
//! Errors are reported back to the invoker as function errors carrying the
//! full context chain, which the client surfaces verbatim.

use lambda_runtime::{service_fn, Error, LambdaEvent};

use crate::cloud::aws::{load_sdk_config, StepFunctionsRegistry};
use crate::cloud::StartedExecution;
use crate::config::HandlerSettings;
use crate::handler::handle_submission;
use crate::template::SubmissionPayload;

pub async fn serve() -> Result<(), Error> {
    let settings = HandlerSettings::from_env()?;
    let sdk_config = load_sdk_config(None, None).await;
    let registry = StepFunctionsRegistry::new(&sdk_config);

    tracing::info!(
        max_state_machines = settings.max_state_machines,
        "submission handler ready"
    );

    let registry = &registry;
    let settings = &settings;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SubmissionPayload>| async move {
        invoke(registry, settings, event).await
    }))
    .await
}

async fn invoke(
    registry: &StepFunctionsRegistry,
    settings: &HandlerSettings,
    event: LambdaEvent<SubmissionPayload>,
) -> Result<StartedExecution, Error> {
    let (payload, context) = event.into_parts();
    tracing::info!(request_id = %context.request_id, workflow = %payload.workflow_name, "submission received");

    handle_submission(registry, settings, payload)
        .await
        .map_err(|e| {
            tracing::error!(error = %format!("{e:#}"), "submission failed");
            Error::from(format!("{e:#}"))
        })
}
