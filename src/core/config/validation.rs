#![allow(clippy::result_large_err)]

use super::{ApiConfig, AppConfig};
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use url::Url;

pub struct ConfigValidator;

impl ConfigValidator {
    /// Check the connection settings and turn them into an [`ApiConfig`].
    pub fn api_config(config: &AppConfig) -> Result<ApiConfig, AppError> {
        let raw_url = config.base_url.as_deref().ok_or_else(|| {
            AppError::new(ErrorCategory::ConfigError, "N8N base URL is not configured")
                .with_suggestion("Set N8N_BASE_URL in .env or base_url in config.yml")
        })?;

        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AppError::new(ErrorCategory::ConfigError, "N8N API key is not configured")
                    .with_suggestion("Set N8N_API_KEY in .env or api_key in config.yml")
            })?;

        let api_path = Self::normalize_path(&config.api_path);
        let base_url = Self::parse_base_url(raw_url, &api_path)?;

        Ok(ApiConfig {
            base_url,
            api_key: api_key.to_string(),
            api_path,
            webhook_prefix: config.webhook_prefix.trim_matches('/').to_string(),
            request_timeout: config.request_timeout,
        })
    }

    /// Parse the instance URL. A base URL that already ends with the API prefix
    /// (as in `http://host:5678/api/v1`) is reduced to the instance origin.
    pub fn parse_base_url(raw: &str, api_path: &str) -> Result<Url, AppError> {
        let mut url = Url::parse(raw.trim()).map_err(|e| {
            AppError::with_source(
                ErrorCategory::ValidationError,
                format!("Invalid base URL '{}'", raw),
                e,
            )
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!("Base URL '{}' must use http or https", raw),
            ));
        }

        let trimmed = url.path().trim_end_matches('/').to_string();
        let stripped = trimmed
            .strip_suffix(api_path.trim_end_matches('/'))
            .unwrap_or(&trimmed)
            .to_string();
        url.set_path(&format!("{}/", stripped));
        Ok(url)
    }

    fn normalize_path(path: &str) -> String {
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}
