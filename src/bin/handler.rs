// src/bin/handler.rs

//! wfsubmit-handler
//!
//! Lambda entry point for the submission handler. All work happens in
//! `wfsubmit::runtime`.

use wfsubmit::{logging, runtime};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    logging::init_handler();
    runtime::serve().await
}
