use crate::cli::GlobalArgs;
use crate::core::{ConfigLoader, ConfigValidator, WorkflowClient, WorkflowManager};
use crate::core::config::AppConfig;
use crate::Result;
use std::path::{Path, PathBuf};

/// Settings shared by every command that talks to n8n.
pub struct CommandContext {
    pub config: AppConfig,
}

impl CommandContext {
    pub fn load(global: &GlobalArgs) -> Result<Self> {
        let config = ConfigLoader::load(&global.config, global.env.as_deref())?;
        Ok(CommandContext { config })
    }

    /// Validate the connection settings and build a manager on top of them.
    pub fn manager(&self) -> Result<WorkflowManager> {
        let api = ConfigValidator::api_config(&self.config)?;
        tracing::debug!(
            environment = %self.config.environment,
            base_url = %api.base_url,
            "connecting to n8n"
        );
        let client = WorkflowClient::new(api)?;
        Ok(WorkflowManager::new(client))
    }

    pub fn workflow_file(&self, file: Option<&Path>) -> PathBuf {
        file.map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.default_workflow_file.clone())
    }
}
