//! Profile summaries produced by an external language-model runner.
//!
//! The HTTP layer depends only on [`SummaryGenerator`]; [`CommandSummaryGenerator`] is the
//! production adapter that shells out to `ollama run <model> <prompt>`.

mod command;
pub mod sanitize;

pub use command::CommandSummaryGenerator;
pub use sanitize::sanitize;

use crate::students::Student;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced while generating a profile summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The runner executable could not be started.
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        /// Executable we attempted to launch.
        command: String,
        /// Underlying I/O error from the spawn.
        #[source]
        source: std::io::Error,
    },
    /// The runner exited with a failure status.
    #[error("`{command}` exited with {status}")]
    Failed {
        /// Executable that failed.
        command: String,
        /// Exit status description reported by the OS.
        status: String,
        /// Combined stdout/stderr captured before exit.
        output: String,
    },
    /// The runner did not finish within the configured bound and was killed.
    #[error("`{command}` timed out after {timeout:?}")]
    Timeout {
        /// Executable that was killed.
        command: String,
        /// Bound that was exceeded.
        timeout: Duration,
    },
    /// The runner succeeded but printed nothing usable.
    #[error("empty response from model runner")]
    EmptyResult,
}

impl SummaryError {
    /// Whether the failure came from the external process itself rather than its output.
    pub fn is_external_process_failure(&self) -> bool {
        !matches!(self, Self::EmptyResult)
    }
}

/// Interface implemented by summary backends.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    /// Produce a free-text profile summary for `student`.
    async fn generate(&self, student: &Student) -> Result<String, SummaryError>;
}

/// Build the natural-language prompt handed to the model.
pub fn build_prompt(student: &Student) -> String {
    format!(
        "Generate a detailed profile summary for a student named {}, age {}, and email {}.",
        student.name, student.age, student.email
    )
}
