// src/main.rs

//! wfsubmit
//!
//! Entry point for the submission CLI.
//!
//! Responsibilities of this file:
//! - Load `.env`
//! - Initialise logging
//! - Parse CLI arguments
//! - Hand off execution to the client
//!
//! There is intentionally *no business logic* here.

use anyhow::Result;
use clap::Parser;

use wfsubmit::{cli, client, logging};

/// Program entry point.
///
/// Uses Tokio because the AWS SDK is async.
#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();
    logging::init_cli();

    let cli = cli::Cli::parse();

    client::run(cli).await
}
