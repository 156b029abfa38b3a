pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENVIRONMENT: &str = "dev";
pub const DEFAULT_API_PATH: &str = "/api/v1";
pub const DEFAULT_WEBHOOK_PREFIX: &str = "webhook";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_WORKFLOW_FILE: &str = "workflow.json";

/// Contents of `config.yml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Profile used when neither `--env` nor `N8N_ENV`/`NODE_ENV` is set
    #[serde(default)]
    pub default_environment: Option<String>,

    /// Workflow file used when `--file` is omitted
    #[serde(default)]
    pub default_workflow_file: Option<PathBuf>,

    /// Pattern suggested for `cleanup`
    #[serde(default)]
    pub default_workflow_pattern: Option<String>,

    /// Connection settings per environment profile
    #[serde(default)]
    pub environments: IndexMap<String, EnvironmentProfile>,

    /// Webhook test cases run by `test --webhook`
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// Connection settings for one environment.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EnvironmentProfile {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_path: Option<String>,
    pub webhook_prefix: Option<String>,
    /// Humantime duration such as `30s` or `2m`
    pub request_timeout: Option<String>,
}

/// A webhook request and the fields expected in its response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub expect: Map<String, Value>,
}

/// Settings after merging defaults, `config.yml` and environment overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_path: String,
    pub webhook_prefix: String,
    pub request_timeout: Duration,
    pub default_workflow_file: PathBuf,
    pub default_workflow_pattern: Option<String>,
    pub test_cases: Vec<TestCase>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            base_url: None,
            api_key: None,
            api_path: DEFAULT_API_PATH.to_string(),
            webhook_prefix: DEFAULT_WEBHOOK_PREFIX.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_workflow_file: PathBuf::from(DEFAULT_WORKFLOW_FILE),
            default_workflow_pattern: None,
            test_cases: Vec::new(),
        }
    }
}

/// Validated connection settings handed to the HTTP client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Instance origin, e.g. `http://localhost:5678/`
    pub base_url: Url,
    pub api_key: String,
    /// Prefix of the REST API below `base_url`, always starting with `/`
    pub api_path: String,
    pub webhook_prefix: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        ApiConfig {
            base_url,
            api_key: api_key.into(),
            api_path: DEFAULT_API_PATH.to_string(),
            webhook_prefix: DEFAULT_WEBHOOK_PREFIX.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
