//! Job lifecycle states.
//!
//! The machine is `waiting -> running -> {completed, cancelled}`, with
//! cancellation legal from any non-terminal state. Terminal states accept
//! no further transition. Stored as TEXT; every literal goes through
//! [`JobState::as_str`] so no query carries a magic string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Result-namespace key reserved for the state machine. Free-form result
/// merges carrying this key are rejected before touching storage; reads
/// merge the protected column back in under this name.
pub const RESERVED_RESULT_KEY: &str = "job_state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Waiting,
    Running,
    Completed,
    Cancelled,
}

impl JobState {
    /// States that accept no further transition.
    pub const TERMINAL: [JobState; 2] = [JobState::Completed, JobState::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Waiting => "waiting",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(JobState::Waiting),
            "running" => Ok(JobState::Running),
            "completed" => Ok(JobState::Completed),
            "cancelled" => Ok(JobState::Cancelled),
            other => Err(format!("unknown job state: {other}")),
        }
    }
}
