#![allow(clippy::result_large_err)]

use super::{AppConfig, ConfigFile, DEFAULT_ENVIRONMENT, DEFAULT_WORKFLOW_FILE};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use crate::utils::serialization::{FileUtils, Serializer, YamlSerializer};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from `path` for the selected environment profile.
    ///
    /// Precedence, lowest first: built-in defaults, the profile in `config.yml`,
    /// environment variables. A missing file is not an error.
    pub fn load(path: &Path, environment: Option<&str>) -> Result<AppConfig, AppError> {
        let file = Self::load_from_file(path)?;
        let environment = Self::select_environment(environment, file.as_ref());

        let mut config = AppConfig {
            environment: environment.clone(),
            ..AppConfig::default()
        };

        if let Some(file) = file {
            Self::apply_file(&mut config, file, &environment, path)?;
        }

        Self::apply_env_overrides(&mut config)?;
        tracing::debug!(
            environment = %config.environment,
            base_url = config.base_url.as_deref().unwrap_or("<unset>"),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parse `config.yml`; returns Ok(None) when the file does not exist.
    pub fn load_from_file(path: &Path) -> Result<Option<ConfigFile>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = FileUtils::read(path).map_err(|e| {
            AppError::with_source(
                ErrorCategory::IoError,
                format!("Failed to read config file {}", path.display()),
                e,
            )
        })?;

        let parsed: ConfigFile = YamlSerializer::deserialize(&content).map_err(|e| {
            AppError::with_source(
                ErrorCategory::SerializationError,
                format!("Failed to parse config file {}", path.display()),
                e,
            )
        })?;

        Ok(Some(parsed))
    }

    /// Workflow file named by `config.yml`, or the built-in default.
    ///
    /// Only the file itself is read. Profiles and environment overrides are
    /// ignored, so offline commands work whatever `--env` or `N8N_*` say.
    pub fn workflow_file(path: &Path) -> Result<PathBuf, AppError> {
        let configured = Self::load_from_file(path)?.and_then(|file| file.default_workflow_file);
        Ok(configured.unwrap_or_else(|| PathBuf::from(DEFAULT_WORKFLOW_FILE)))
    }

    fn select_environment(explicit: Option<&str>, file: Option<&ConfigFile>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| non_empty_var("N8N_ENV"))
            .or_else(|| non_empty_var("NODE_ENV"))
            .or_else(|| file.and_then(|f| f.default_environment.clone()))
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string())
    }

    fn apply_file(
        config: &mut AppConfig,
        file: ConfigFile,
        environment: &str,
        path: &Path,
    ) -> Result<(), AppError> {
        if let Some(workflow_file) = file.default_workflow_file {
            config.default_workflow_file = workflow_file;
        }
        config.default_workflow_pattern = file.default_workflow_pattern;
        config.test_cases = file.test_cases;

        if file.environments.is_empty() {
            return Ok(());
        }

        let Some(profile) = file.environments.get(environment) else {
            let known: Vec<&str> = file.environments.keys().map(String::as_str).collect();
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                format!(
                    "Environment \"{}\" not found in {}",
                    environment,
                    path.display()
                ),
            )
            .with_context("available", known.join(", ")));
        };

        if let Some(base_url) = &profile.base_url {
            config.base_url = Some(base_url.clone());
        }
        if let Some(api_key) = &profile.api_key {
            config.api_key = Some(api_key.clone());
        }
        if let Some(api_path) = &profile.api_path {
            config.api_path = api_path.clone();
        }
        if let Some(prefix) = &profile.webhook_prefix {
            config.webhook_prefix = prefix.clone();
        }
        if let Some(timeout) = &profile.request_timeout {
            config.request_timeout = parse_timeout(timeout, "request_timeout")?;
        }
        Ok(())
    }

    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut AppConfig) -> Result<(), AppError> {
        if let Some(base_url) = non_empty_var("N8N_BASE_URL") {
            config.base_url = Some(base_url);
        }

        if let Some(api_key) = non_empty_var("N8N_API_KEY") {
            config.api_key = Some(api_key);
        }

        if let Some(api_path) = non_empty_var("N8N_API_PATH") {
            config.api_path = api_path;
        }

        if let Some(prefix) = non_empty_var("N8N_WEBHOOK_PREFIX") {
            config.webhook_prefix = prefix;
        }

        if let Some(timeout) = non_empty_var("N8N_REQUEST_TIMEOUT") {
            config.request_timeout = parse_timeout(&timeout, "N8N_REQUEST_TIMEOUT")?;
        }

        Ok(())
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "N8N_BASE_URL - Base URL of the n8n instance (e.g. http://localhost:5678)",
            "N8N_API_KEY - API key sent as X-N8N-API-KEY",
            "N8N_API_PATH - REST API prefix (default: /api/v1)",
            "N8N_WEBHOOK_PREFIX - Webhook path prefix (default: webhook)",
            "N8N_REQUEST_TIMEOUT - Per-request timeout, e.g. 30s (default: 30s)",
            "N8N_ENV - Environment profile from config.yml (falls back to NODE_ENV)",
        ]
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_timeout(raw: &str, field: &str) -> Result<Duration, AppError> {
    humantime::parse_duration(raw.trim()).map_err(|e| {
        AppError::with_source(
            ErrorCategory::ValidationError,
            format!("{} must be a duration such as 30s or 2m, got '{}'", field, raw),
            e,
        )
    })
}
