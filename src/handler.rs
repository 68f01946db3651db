// src/handler.rs

//! Submission handler.
//!
//! Receives `{workflow_name, input}`, resolves the state machine and starts
//! exactly one execution. Anything that goes wrong before the start call
//! (unknown workflow, malformed input) leaves nothing started.

use anyhow::Result;
use std::collections::HashMap;
use tracing::Instrument;

use crate::cloud::{StartedExecution, StateMachineRegistry};
use crate::config::HandlerSettings;
use crate::error::SubmitError;
use crate::execution_id::ExecutionId;
use crate::inject::prepare_input;
use crate::template::SubmissionPayload;

pub async fn handle_submission(
    registry: &dyn StateMachineRegistry,
    settings: &HandlerSettings,
    event: SubmissionPayload,
) -> Result<StartedExecution> {
    handle_with_id(registry, settings, event, ExecutionId::new()).await
}

pub async fn handle_with_id(
    registry: &dyn StateMachineRegistry,
    settings: &HandlerSettings,
    event: SubmissionPayload,
    execution_id: ExecutionId,
) -> Result<StartedExecution> {
    let span = tracing::info_span!(
        "submission",
        workflow = %event.workflow_name,
        execution_id = %execution_id,
    );

    start(registry, settings, event, execution_id)
        .instrument(span)
        .await
}

async fn start(
    registry: &dyn StateMachineRegistry,
    settings: &HandlerSettings,
    event: SubmissionPayload,
    execution_id: ExecutionId,
) -> Result<StartedExecution> {
    let machines: HashMap<String, String> = registry
        .list_state_machines(settings.max_state_machines)
        .await?
        .into_iter()
        .map(|m| (m.name, m.arn))
        .collect();

    let document = prepare_input(&event.input, &event.workflow_name, &execution_id)?;

    let arn = machines
        .get(&event.workflow_name)
        .ok_or_else(|| SubmitError::UnknownWorkflow(event.workflow_name.clone()))?;

    let input = serde_json::to_string(&document)?;
    let started = registry
        .start_execution(arn, execution_id.as_str(), &input)
        .await?;

    tracing::info!(execution_arn = %started.execution_arn, "execution started");
    Ok(started)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::StateMachine;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRegistry {
        machines: Vec<StateMachine>,
        started: Mutex<Vec<(String, String, String)>>,
        max_results_seen: Mutex<Option<i32>>,
    }

    impl FakeRegistry {
        fn with(names: &[&str]) -> Self {
            Self {
                machines: names
                    .iter()
                    .map(|n| StateMachine {
                        name: n.to_string(),
                        arn: format!("arn:aws:states:us-east-1:1:stateMachine:{}", n),
                    })
                    .collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl StateMachineRegistry for FakeRegistry {
        async fn list_state_machines(&self, max_results: i32) -> Result<Vec<StateMachine>> {
            *self.max_results_seen.lock().unwrap() = Some(max_results);
            Ok(self.machines.clone())
        }

        async fn start_execution(
            &self,
            state_machine_arn: &str,
            name: &str,
            input: &str,
        ) -> Result<StartedExecution> {
            self.started.lock().unwrap().push((
                state_machine_arn.to_string(),
                name.to_string(),
                input.to_string(),
            ));
            Ok(StartedExecution {
                execution_arn: format!(
                    "{}:{}",
                    state_machine_arn.replace("stateMachine", "execution"),
                    name
                ),
                start_date: "2024-01-01 00:00:00 UTC".to_string(),
            })
        }
    }

    fn settings() -> HandlerSettings {
        HandlerSettings {
            max_state_machines: 1000,
        }
    }

    #[tokio::test]
    async fn starts_execution_with_rewritten_input() {
        let registry = FakeRegistry::with(&["wf1", "wf2"]);
        let id = ExecutionId("exec-42".to_string());
        let event = SubmissionPayload::new(
            "wf1",
            r#"{"jobs": [{"resources": {"Vcpus": 4}}], "queue": "default-q"}"#,
        );

        let started = handle_with_id(&registry, &settings(), event, id.clone())
            .await
            .unwrap();

        assert_eq!(
            started.execution_arn,
            "arn:aws:states:us-east-1:1:execution:wf1:exec-42"
        );
        assert_eq!(*registry.max_results_seen.lock().unwrap(), Some(1000));

        let started_calls = registry.started.lock().unwrap();
        assert_eq!(started_calls.len(), 1);
        let (arn, name, input) = &started_calls[0];
        assert_eq!(arn, "arn:aws:states:us-east-1:1:stateMachine:wf1");
        assert_eq!(name, "exec-42");

        let doc: Value = serde_json::from_str(input).unwrap();
        assert_eq!(doc["workflow_name"], "wf1");
        assert_eq!(doc["execution_id"], "exec-42");
        assert_eq!(doc["queue"], "default-q");
        assert_eq!(
            doc["jobs"][0]["resources"]["Environment"],
            json!([
                {"Name": "WORKFLOW_NAME", "Value": "wf1"},
                {"Name": "EXECUTION_ID", "Value": "exec-42"}
            ])
        );
    }

    #[tokio::test]
    async fn unknown_workflow_starts_nothing() {
        let registry = FakeRegistry::with(&["wf1"]);
        let event = SubmissionPayload::new("wf2", "{}");

        let err = handle_submission(&registry, &settings(), event)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SubmitError>(),
            Some(SubmitError::UnknownWorkflow(name)) if name == "wf2"
        ));
        assert!(err.to_string().contains("unknown workflow"));
        assert!(registry.started.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_input_starts_nothing() {
        let registry = FakeRegistry::with(&["wf1"]);
        let event = SubmissionPayload::new("wf1", "{\"resources\": ");

        let err = handle_submission(&registry, &settings(), event)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SubmitError>(),
            Some(SubmitError::InvalidInput(_))
        ));
        assert!(registry.started.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn each_submission_gets_a_fresh_identity() {
        let registry = FakeRegistry::with(&["wf1"]);

        for _ in 0..3 {
            handle_submission(&registry, &settings(), SubmissionPayload::new("wf1", "{}"))
                .await
                .unwrap();
        }

        let started = registry.started.lock().unwrap();
        let names: std::collections::HashSet<&String> = started.iter().map(|(_, n, _)| n).collect();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn started_execution_serializes_camel_case() {
        let started = StartedExecution {
            execution_arn: "arn".to_string(),
            start_date: "2024-01-01 00:00:00 UTC".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&started).unwrap(),
            json!({"executionArn": "arn", "startDate": "2024-01-01 00:00:00 UTC"})
        );
    }
}
