use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use async_trait::async_trait;
use std::io::{self, Write};
use tokio::task::spawn_blocking;

/// Asks the operator before destructive operations.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> Result<bool, AppError>;
}

/// Prompts on stdout and reads the answer from stdin.
#[derive(Debug, Default)]
pub struct ConsoleConfirm;

async fn read_line_blocking() -> Result<Option<String>, AppError> {
    spawn_blocking(|| {
        let mut buffer = String::new();
        let read = io::stdin().read_line(&mut buffer).map_err(|err| {
            AppError::new(
                ErrorCategory::IoError,
                format!("failed to read stdin: {}", err),
            )
        })?;
        Ok((read > 0).then_some(buffer))
    })
    .await
    .map_err(|err| {
        AppError::new(
            ErrorCategory::InternalError,
            format!("console input task cancelled: {}", err),
        )
    })?
}

#[async_trait]
impl Confirm for ConsoleConfirm {
    async fn confirm(&self, prompt: &str) -> Result<bool, AppError> {
        loop {
            print!("{} [y/N]: ", prompt);
            io::stdout().flush().ok();

            // EOF counts as "no"
            let Some(line) = read_line_blocking().await? else {
                return Ok(false);
            };

            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "" | "n" | "no" => return Ok(false),
                _ => println!("Please respond with 'y' or 'n'."),
            }
        }
    }
}

/// Answers every prompt the same way. Used for `--force` and in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

#[async_trait]
impl Confirm for FixedAnswer {
    async fn confirm(&self, prompt: &str) -> Result<bool, AppError> {
        tracing::debug!(prompt, answer = self.0, "confirmation answered without prompting");
        Ok(self.0)
    }
}
