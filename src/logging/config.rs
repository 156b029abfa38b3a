use crate::logging::layers::console::ConsoleOutput;
use crate::Result;
use anyhow::{anyhow, Context};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::filter::Directive;

const DEFAULT_LEVEL: &str = "warn";
const VERBOSE_LEVEL: &str = "debug";
const DEFAULT_LOG_FILE: &str = "n8n-workflow.log";

/// Resolved logging configuration after applying env overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub default_level: String,
    /// File sink target; `None` disables the sink
    pub log_file: Option<PathBuf>,
    pub console_output: ConsoleOutput,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: DEFAULT_LEVEL.to_string(),
            log_file: None,
            console_output: ConsoleOutput::default(),
        }
    }
}

impl LoggingConfig {
    /// Defaults, then `--verbose`, then `N8N_WORKFLOW_LOG_*` variables.
    pub fn load(verbose: bool) -> Result<Self> {
        let mut config = LoggingConfig::default();
        if verbose {
            config.default_level = VERBOSE_LEVEL.to_string();
        }
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(level) = non_empty_var("N8N_WORKFLOW_LOG_LEVEL") {
            self.default_level = level;
        }

        if let Some(file) = non_empty_var("N8N_WORKFLOW_LOG_FILE") {
            self.log_file = match file.trim().to_lowercase().as_str() {
                "0" | "false" | "off" => None,
                "1" | "true" | "on" => Some(default_log_file()?),
                _ => Some(PathBuf::from(file)),
            };
        }

        if let Some(output) = non_empty_var("N8N_WORKFLOW_CONSOLE_OUTPUT") {
            self.console_output = ConsoleOutput::from_str(&output).map_err(|e| anyhow!(e))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        Directive::from_str(&self.default_level)
            .with_context(|| {
                format!(
                    "N8N_WORKFLOW_LOG_LEVEL '{}' is not a valid tracing directive",
                    self.default_level
                )
            })?;
        Ok(())
    }
}

/// `~/.n8n-workflow/logs/n8n-workflow.log`
pub fn default_log_file() -> Result<PathBuf> {
    let home = dirs_next::home_dir().ok_or_else(|| anyhow!("$HOME directory unavailable"))?;
    Ok(home.join(".n8n-workflow").join("logs").join(DEFAULT_LOG_FILE))
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
