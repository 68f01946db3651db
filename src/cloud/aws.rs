// src/cloud/aws.rs

//! AWS SDK implementations of the cloud seams.
//!
//! Pagination is drained eagerly: every caller wants the complete list and
//! the lists involved are small. State machines are the exception and are
//! read as a single capped page.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use aws_sdk_sfn::primitives::DateTime;

use super::{
    FunctionInvoker, InvocationOutput, StackCatalog, StackExport, StackResource, StartedExecution,
    StateMachine, StateMachineRegistry,
};

/// Load shared SDK configuration, honouring an optional profile and region.
///
/// Without overrides the standard chain applies (env, shared config, IMDS).
pub async fn load_sdk_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }

    loader.load().await
}

// Getter nullability differs between SDK releases for required members, so
// `Option::from` normalises both `&str` and `Option<&str>`.
fn owned(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

/* ---------------- CloudFormation ---------------- */

pub struct CloudFormationCatalog {
    client: aws_sdk_cloudformation::Client,
}

impl CloudFormationCatalog {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudformation::Client::new(config),
        }
    }
}

#[async_trait]
impl StackCatalog for CloudFormationCatalog {
    async fn list_stack_resources(&self, stack_name: &str) -> Result<Vec<StackResource>> {
        let mut pages = self
            .client
            .list_stack_resources()
            .stack_name(stack_name)
            .into_paginator()
            .items()
            .send();

        let mut resources = Vec::new();
        while let Some(item) = pages.next().await {
            let item = item
                .with_context(|| format!("Failed to list resources of stack {}", stack_name))?;

            resources.push(StackResource {
                resource_type: owned(Option::<&str>::from(item.resource_type())),
                physical_resource_id: owned(Option::<&str>::from(item.physical_resource_id())),
            });
        }

        Ok(resources)
    }

    async fn list_exports(&self) -> Result<Vec<StackExport>> {
        let mut exports = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let out = self
                .client
                .list_exports()
                .set_next_token(next_token.take())
                .send()
                .await
                .context("Failed to list stack exports")?;

            exports.extend(out.exports().iter().map(|export| StackExport {
                name: owned(Option::<&str>::from(export.name())),
                value: owned(Option::<&str>::from(export.value())),
            }));

            match out.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(exports)
    }
}

/* ---------------- Lambda ---------------- */

pub struct LambdaInvoker {
    client: aws_sdk_lambda::Client,
}

impl LambdaInvoker {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(config),
        }
    }
}

#[async_trait]
impl FunctionInvoker for LambdaInvoker {
    async fn list_functions(&self) -> Result<Vec<String>> {
        let mut pages = self.client.list_functions().into_paginator().items().send();

        let mut names = Vec::new();
        while let Some(item) = pages.next().await {
            let item = item.context("Failed to list functions")?;
            if let Some(name) = item.function_name() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    async fn invoke(&self, function: &str, payload: Vec<u8>) -> Result<InvocationOutput> {
        let out = self
            .client
            .invoke()
            .function_name(function)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload))
            .send()
            .await
            .with_context(|| format!("Failed to invoke function {}", function))?;

        Ok(InvocationOutput {
            function_error: out.function_error().map(str::to_string),
            payload: out
                .payload()
                .map(|blob| blob.as_ref().to_vec())
                .unwrap_or_default(),
        })
    }
}

/* ---------------- Step Functions ---------------- */

pub struct StepFunctionsRegistry {
    client: aws_sdk_sfn::Client,
}

impl StepFunctionsRegistry {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sfn::Client::new(config),
        }
    }
}

#[async_trait]
impl StateMachineRegistry for StepFunctionsRegistry {
    async fn list_state_machines(&self, max_results: i32) -> Result<Vec<StateMachine>> {
        let out = self
            .client
            .list_state_machines()
            .max_results(max_results)
            .send()
            .await
            .context("Failed to list state machines")?;

        Ok(out
            .state_machines()
            .iter()
            .map(|machine| StateMachine {
                name: owned(Option::<&str>::from(machine.name())),
                arn: owned(Option::<&str>::from(machine.state_machine_arn())),
            })
            .collect())
    }

    async fn start_execution(
        &self,
        state_machine_arn: &str,
        name: &str,
        input: &str,
    ) -> Result<StartedExecution> {
        let out = self
            .client
            .start_execution()
            .state_machine_arn(state_machine_arn)
            .name(name)
            .input(input)
            .send()
            .await
            .with_context(|| format!("Failed to start execution {} of {}", name, state_machine_arn))?;

        let start_date = Option::<&DateTime>::from(out.start_date())
            .map(|date| crate::util::format_utc(date.secs(), date.subsec_nanos()))
            .unwrap_or_default();

        Ok(StartedExecution {
            execution_arn: owned(Option::<&str>::from(out.execution_arn())),
            start_date,
        })
    }
}
