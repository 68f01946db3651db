// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::resolve::{Discovery, QueueSource, DEFAULT_QUEUE_PATTERN, DEFAULT_SUBMISSION_MARKER};
use crate::util::read_to_string;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "wfsubmit.yaml";

/// Page size used when listing state machines.
pub const DEFAULT_MAX_STATE_MACHINES: i32 = 1000;

/// Optional defaults loaded from `wfsubmit.yaml`.
///
/// Example:
///
/// profile: research
/// region: us-west-2
/// stack_queue_name: "priority.*"
/// discovery: exports
/// marker: WorkflowSubmission
///
/// CLI flags always win over values in this file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub stack_queue_name: Option<String>,
    pub discovery: Option<Discovery>,
    pub marker: Option<String>,
}

impl FileConfig {
    /// Load and parse a YAML config from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_to_string(path)?;

        let cfg: FileConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse YAML config {:?}", path))?;

        Ok(cfg)
    }

    /// Load the explicit path if given, else `wfsubmit.yaml` when it exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Fully resolved settings for one client run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub stack_name: String,
    pub workflow_name: String,
    pub inputs_json_file: PathBuf,

    /// AWS credential profile.
    pub profile: Option<String>,

    /// AWS region override.
    pub region: Option<String>,

    /// Regex selecting the job queue within the stack.
    pub stack_queue_name: String,

    /// Explicit queue name; bypasses the stack lookup.
    pub queue: Option<String>,

    pub discovery: Discovery,
    pub marker: String,
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stack_name: String::new(),
            workflow_name: String::new(),
            inputs_json_file: PathBuf::new(),
            profile: None,
            region: None,
            stack_queue_name: DEFAULT_QUEUE_PATTERN.to_string(),
            queue: None,
            discovery: Discovery::default(),
            marker: DEFAULT_SUBMISSION_MARKER.to_string(),
            dry_run: false,
        }
    }
}

impl Settings {
    /// Merge CLI arguments over file defaults over built-in defaults.
    pub fn resolve(cli: Cli, file: FileConfig) -> Self {
        let defaults = Settings::default();

        Self {
            stack_name: cli.stack_name,
            workflow_name: cli.workflow_name,
            inputs_json_file: cli.inputs_json_file,
            profile: cli.profile.or(file.profile),
            region: cli.region.or(file.region),
            stack_queue_name: cli
                .stack_queue_name
                .or(file.stack_queue_name)
                .unwrap_or(defaults.stack_queue_name),
            queue: cli.queue,
            discovery: cli.discovery.or(file.discovery).unwrap_or(defaults.discovery),
            marker: cli.marker.or(file.marker).unwrap_or(defaults.marker),
            dry_run: cli.dry_run,
        }
    }

    pub fn queue_source(&self) -> QueueSource {
        match &self.queue {
            Some(name) => QueueSource::Explicit(name.clone()),
            None => QueueSource::Stack {
                stack_name: self.stack_name.clone(),
                pattern: self.stack_queue_name.clone(),
            },
        }
    }
}

/// Settings for the submission handler, read from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSettings {
    pub max_state_machines: i32,
}

impl HandlerSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let max_state_machines = match lookup("WFSUBMIT_MAX_STATE_MACHINES") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("WFSUBMIT_MAX_STATE_MACHINES is not a number: {}", raw))?,
            None => DEFAULT_MAX_STATE_MACHINES,
        };

        Ok(Self { max_state_machines })
    }
}
