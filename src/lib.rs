// src/lib.rs

//! wfsubmit
//!
//! Submission client and Lambda handler for Step Functions workflows whose
//! container steps run on AWS Batch.
//!
//! - [`client`] resolves a job queue and the submission function, then
//!   invokes it with the rendered input template.
//! - [`handler`] starts the execution, injecting the workflow identity into
//!   every container override fragment of the input.

pub mod cli;
pub mod client;
pub mod cloud;
pub mod config;
pub mod error;
pub mod execution_id;
pub mod handler;
pub mod inject;
pub mod logging;
pub mod resolve;
pub mod runtime;
pub mod template;
pub mod util;
