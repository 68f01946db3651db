// src/cloud/mod.rs

//! Seams between the submission logic and the AWS management APIs.
//!
//! Each trait covers exactly the calls one side of the system needs. The
//! AWS-backed implementations live in [`aws`]; tests substitute in-memory
//! fakes.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod aws;

/// CloudFormation resource type of a Batch job queue.
pub const JOB_QUEUE_RESOURCE_TYPE: &str = "AWS::Batch::JobQueue";

/// One resource of a CloudFormation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackResource {
    pub resource_type: String,
    pub physical_resource_id: String,
}

/// One exported CloudFormation output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackExport {
    pub name: String,
    pub value: String,
}

/// A registered state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMachine {
    pub name: String,
    pub arn: String,
}

/// Result of starting an execution, shaped so it serializes straight into
/// the handler response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedExecution {
    pub execution_arn: String,

    /// UTC timestamp rendered as text.
    pub start_date: String,
}

/// Raw result of a synchronous function invocation.
#[derive(Debug, Clone, Default)]
pub struct InvocationOutput {
    /// Set when the function itself failed (`Unhandled`, `Handled`).
    pub function_error: Option<String>,
    pub payload: Vec<u8>,
}

#[async_trait]
pub trait StackCatalog: Send + Sync {
    async fn list_stack_resources(&self, stack_name: &str) -> Result<Vec<StackResource>>;

    async fn list_exports(&self) -> Result<Vec<StackExport>>;
}

#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    async fn list_functions(&self) -> Result<Vec<String>>;

    /// Invoke `function` and wait for its response.
    async fn invoke(&self, function: &str, payload: Vec<u8>) -> Result<InvocationOutput>;
}

#[async_trait]
pub trait StateMachineRegistry: Send + Sync {
    async fn list_state_machines(&self, max_results: i32) -> Result<Vec<StateMachine>>;

    async fn start_execution(
        &self,
        state_machine_arn: &str,
        name: &str,
        input: &str,
    ) -> Result<StartedExecution>;
}
