pub mod client;
pub mod config;
pub mod error;
pub mod manager;
pub mod types;
pub mod workflow;

pub use client::{ApiError, WorkflowClient};
pub use config::{ApiConfig, AppConfig, ConfigLoader, ConfigValidator};
pub use error::AppError;
pub use manager::WorkflowManager;
pub use types::ErrorCategory;
