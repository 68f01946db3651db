use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of one workflow execution.
///
/// Doubles as the Step Functions execution name, so it is kept to the plain
/// hyphenated UUID form (36 chars, well under the 80 char name limit).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(pub String);

impl ExecutionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the id from an execution ARN (`arn:...:execution:<machine>:<id>`).
    pub fn from_execution_arn(arn: &str) -> Option<Self> {
        let id = arn.rsplit(':').next()?;
        if id.is_empty() {
            return None;
        }
        Some(Self(id.to_string()))
    }
}

impl Default for ExecutionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
