// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

use crate::resolve::Discovery;

/// Submit a workflow (Step Functions state machine) with inputs.
///
/// The AWS Batch job queue is resolved from the stack unless `--queue`
/// is given, and every `${BatchJobQueue}` in the inputs file is replaced
/// with its name before submission.
///
/// `wfsubmit.yaml` in the working directory (or `--config`) may provide
/// defaults. CLI flags always override config values.
#[derive(Parser, Debug)]
#[command(name = "wfsubmit", version)]
pub struct Cli {
    /// Name of the CloudFormation stack that owns the job queues
    pub stack_name: String,

    /// Name of the workflow (state machine) to execute
    pub workflow_name: String,

    /// Path to inputs.json file to provide to the workflow
    pub inputs_json_file: PathBuf,

    /// AWS profile to use
    #[arg(long)]
    pub profile: Option<String>,

    /// AWS region name to use
    #[arg(long)]
    pub region: Option<String>,

    /// Regex selecting the job queue by name
    ///
    /// Matched from the start of the queue name.
    /// Defaults to `default.*`.
    #[arg(long)]
    pub stack_queue_name: Option<String>,

    /// Use this job queue directly instead of looking it up in the stack
    #[arg(long, conflicts_with = "stack_queue_name")]
    pub queue: Option<String>,

    /// How to locate the submission function
    ///
    /// Defaults to `exports`.
    #[arg(long, value_enum)]
    pub discovery: Option<Discovery>,

    /// Substring identifying the submission function
    ///
    /// Defaults to `WorkflowSubmission`.
    #[arg(long)]
    pub marker: Option<String>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Resolve everything and print the payload without invoking
    #[arg(long)]
    pub dry_run: bool,
}
