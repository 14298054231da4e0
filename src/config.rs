use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
const DEFAULT_SERVER_PORT: u16 = 3031;
const DEFAULT_OLLAMA_COMMAND: &str = "ollama";
const DEFAULT_OLLAMA_MODEL: &str = "llama3:latest";
const DEFAULT_OLLAMA_API_URL: &str = "http://localhost:11434";
const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 120;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the student service.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub server_host: String,
    /// Port the HTTP listener binds to.
    pub server_port: u16,
    /// Explicit log file; `None` logs to `logs/student-api.log`.
    pub log_file: Option<PathBuf>,
    /// Settings handed to the summary generator.
    pub summary: SummaryConfig,
}

/// Settings for the external model runner used to produce profile summaries.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Executable invoked to run the model (resolved through `PATH`).
    pub command: String,
    /// Model identifier passed after the `run` subcommand.
    pub model: String,
    /// Model-serving endpoint exported to the runner as `OLLAMA_API_URL`.
    pub api_url: String,
    /// Optional `HOME` override for the runner process.
    pub home: Option<String>,
    /// Upper bound on a single runner invocation.
    pub timeout: Duration,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_OLLAMA_COMMAND.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            api_url: DEFAULT_OLLAMA_API_URL.to_string(),
            home: None,
            timeout: Duration::from_secs(DEFAULT_SUMMARY_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let load = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let timeout_secs = load("SUMMARY_TIMEOUT_SECS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or_else(|| ConfigError::InvalidValue("SUMMARY_TIMEOUT_SECS".into()))
            })
            .transpose()?
            .unwrap_or(DEFAULT_SUMMARY_TIMEOUT_SECS);

        Ok(Self {
            server_host: load("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            server_port: load("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_SERVER_PORT),
            log_file: load("STUDENT_API_LOG_FILE").map(PathBuf::from),
            summary: SummaryConfig {
                command: load("OLLAMA_COMMAND")
                    .unwrap_or_else(|| DEFAULT_OLLAMA_COMMAND.to_string()),
                model: load("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
                api_url: load("OLLAMA_API_URL")
                    .unwrap_or_else(|| DEFAULT_OLLAMA_API_URL.to_string()),
                home: load("OLLAMA_HOME"),
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

/// Load configuration from `.env` and the process environment.
pub fn init_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    Config::from_env()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let config = load(&[]).expect("defaults");
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 3031);
        assert!(config.log_file.is_none());
        assert_eq!(config.summary.command, "ollama");
        assert_eq!(config.summary.model, "llama3:latest");
        assert_eq!(config.summary.api_url, "http://localhost:11434");
        assert!(config.summary.home.is_none());
        assert_eq!(config.summary.timeout, Duration::from_secs(120));
    }

    #[test]
    fn variables_override_every_field() {
        let config = load(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8080"),
            ("STUDENT_API_LOG_FILE", "/tmp/students.log"),
            ("OLLAMA_COMMAND", "/usr/local/bin/ollama"),
            ("OLLAMA_MODEL", "mistral"),
            ("OLLAMA_API_URL", "http://10.0.0.2:11434"),
            ("OLLAMA_HOME", "/srv/ollama"),
            ("SUMMARY_TIMEOUT_SECS", "30"),
        ])
        .expect("config");
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/students.log")));
        assert_eq!(config.summary.command, "/usr/local/bin/ollama");
        assert_eq!(config.summary.model, "mistral");
        assert_eq!(config.summary.api_url, "http://10.0.0.2:11434");
        assert_eq!(config.summary.home.as_deref(), Some("/srv/ollama"));
        assert_eq!(config.summary.timeout, Duration::from_secs(30));
    }

    #[test]
    fn non_numeric_port_is_rejected() {
        let error = load(&[("SERVER_PORT", "http")]).expect_err("invalid port");
        assert!(matches!(error, ConfigError::InvalidValue(key) if key == "SERVER_PORT"));
    }

    #[test]
    fn zero_or_non_numeric_timeout_is_rejected() {
        for value in ["0", "abc"] {
            let error = load(&[("SUMMARY_TIMEOUT_SECS", value)]).expect_err("invalid timeout");
            assert!(
                matches!(&error, ConfigError::InvalidValue(key) if key == "SUMMARY_TIMEOUT_SECS"),
                "{value}: {error:?}"
            );
        }
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let config = load(&[("SERVER_PORT", "  "), ("OLLAMA_HOME", "")]).expect("config");
        assert_eq!(config.server_port, 3031);
        assert!(config.summary.home.is_none());
    }

    #[test]
    fn summary_defaults_target_local_ollama() {
        let summary = SummaryConfig::default();
        assert_eq!(summary.command, "ollama");
        assert_eq!(summary.timeout, Duration::from_secs(120));
    }
}
