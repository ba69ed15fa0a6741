use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Command a prompt is appended to when nothing else is configured.
pub const DEFAULT_PROMPT_COMMAND: &str = "claude -p";
/// Hard wall-clock bound on a single run, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
/// Config-table key holding the user-set runner command. A value stored
/// under this key takes precedence over `[runner] command` in aicron.toml.
pub const PROMPT_COMMAND_KEY: &str = "prompt_command";

/// Top-level config (aicron.toml + AICRON_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AicronConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub crontab: CrontabConfig,
}

impl Default for AicronConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            runner: RunnerConfig::default(),
            crontab: CrontabConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Execution runner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Command the prompt is appended to, e.g. "claude -p" or "opencode run".
    #[serde(default = "default_command")]
    pub command: String,
    /// Runs exceeding this bound are killed and recorded as failed.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrontabConfig {
    /// Path the installed cron line redirects output into. Kept
    /// tilde-relative so the shell expands it under the HOME assignment
    /// written on the same line.
    #[serde(default = "default_log_path")]
    pub log_path: String,
}

impl Default for CrontabConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
        }
    }
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.aicron/aicron.db", home)
}
fn default_command() -> String {
    DEFAULT_PROMPT_COMMAND.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_log_path() -> String {
    "~/.aicron/cron.log".to_string()
}
fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.aicron/aicron.toml", home)
}

impl AicronConfig {
    /// Load config from a TOML file with AICRON_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.aicron/aicron.toml
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: AicronConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("AICRON_").split("_"))
            .extract()
            .map_err(|e| crate::error::AicronError::Config(e.to_string()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_into_aicron_dir() {
        let config = AicronConfig::default();
        assert!(config.database.path.ends_with("/.aicron/aicron.db"));
        assert_eq!(config.crontab.log_path, "~/.aicron/cron.log");
        assert_eq!(config.runner.command, DEFAULT_PROMPT_COMMAND);
        assert_eq!(config.runner.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AicronConfig::load(Some("/nonexistent/aicron.toml")).unwrap();
        assert_eq!(config.runner.command, DEFAULT_PROMPT_COMMAND);
    }
}
