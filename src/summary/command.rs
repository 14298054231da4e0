use super::{SummaryError, SummaryGenerator, build_prompt, sanitize};
use crate::config::SummaryConfig;
use crate::students::Student;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Summary generator that runs `<command> run <model> <prompt>` as a child process.
#[derive(Debug, Clone)]
pub struct CommandSummaryGenerator {
    config: SummaryConfig,
}

impl CommandSummaryGenerator {
    /// Build a generator from runner settings.
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    fn command(&self, prompt: &str) -> Command {
        let mut command = Command::new(&self.config.command);
        command
            .arg("run")
            .arg(&self.config.model)
            .arg(prompt)
            .env("OLLAMA_API_URL", &self.config.api_url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(home) = &self.config.home {
            command.env("HOME", home);
        }
        command
    }
}

#[async_trait]
impl SummaryGenerator for CommandSummaryGenerator {
    async fn generate(&self, student: &Student) -> Result<String, SummaryError> {
        let prompt = build_prompt(student);
        tracing::debug!(
            command = %self.config.command,
            model = %self.config.model,
            student_id = student.id,
            "Running model runner"
        );

        // Dropping the pending future on timeout kills the child via `kill_on_drop`.
        let output = tokio::time::timeout(self.config.timeout, self.command(&prompt).output())
            .await
            .map_err(|_| SummaryError::Timeout {
                command: self.config.command.clone(),
                timeout: self.config.timeout,
            })?
            .map_err(|source| SummaryError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        // Streams are captured separately, so stderr follows stdout rather than interleaving.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(SummaryError::Failed {
                command: self.config.command.clone(),
                status: output.status.to_string(),
                output: combined,
            });
        }

        let summary = combined.trim();
        if summary.is_empty() {
            return Err(SummaryError::EmptyResult);
        }
        Ok(sanitize(summary))
    }
}
