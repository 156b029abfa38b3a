//! Command semantics on top of [`WorkflowClient`].

pub mod confirm;

pub use confirm::{Confirm, ConsoleConfirm, FixedAnswer};

use crate::core::client::WorkflowClient;
use crate::core::config::TestCase;
use crate::core::workflow::{load_workflow, prepare_submission, ResolveDiagnostic};
use anyhow::{anyhow, bail, Context};
use n8n_workflow_types::WorkflowSummary;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct DeployOptions {
    /// Replace a remote workflow with the same name instead of creating a copy
    pub update_existing: bool,
    /// Activate the workflow once it is stored
    pub activate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployAction {
    Created,
    Updated,
}

#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub id: String,
    pub name: String,
    pub action: DeployAction,
    pub activated: bool,
    pub diagnostics: Vec<ResolveDiagnostic>,
}

#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub id: String,
    pub name: String,
    pub diagnostics: Vec<ResolveDiagnostic>,
}

#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub id: String,
    pub name: Option<String>,
    /// The operator declined the prompt; nothing was deleted
    pub cancelled: bool,
}

#[derive(Debug, Clone)]
pub struct ActivationOutcome {
    pub id: String,
    pub name: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub id: String,
    pub result: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseResult {
    pub name: String,
    pub passed: bool,
    /// Why the case failed; `None` when it passed
    pub detail: Option<String>,
    pub response: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TestReport {
    pub cases: Vec<CaseResult>,
}

impl TestReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanupOptions {
    /// Treat the pattern as a regular expression instead of a substring
    pub regex: bool,
    pub dry_run: bool,
    /// Skip the confirmation prompt
    pub force: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CleanupOutcome {
    pub matched: Vec<WorkflowSummary>,
    pub deleted: usize,
    /// `(id, error)` for each deletion that failed
    pub failed: Vec<(String, String)>,
    pub dry_run: bool,
    pub cancelled: bool,
}

pub struct WorkflowManager {
    client: WorkflowClient,
}

impl WorkflowManager {
    pub fn new(client: WorkflowClient) -> Self {
        WorkflowManager { client }
    }

    pub fn client(&self) -> &WorkflowClient {
        &self.client
    }

    /// Upload the workflow in `file`, creating it or replacing a namesake.
    pub async fn deploy(
        &self,
        file: &Path,
        options: DeployOptions,
    ) -> anyhow::Result<DeployOutcome> {
        self.deploy_inner(file, options)
            .await
            .context("Deployment failed")
    }

    async fn deploy_inner(
        &self,
        file: &Path,
        options: DeployOptions,
    ) -> anyhow::Result<DeployOutcome> {
        let document = load_workflow(file)?;
        let prepared = prepare_submission(&document)?;

        let existing = if options.update_existing {
            self.client
                .list_workflows()
                .await?
                .into_iter()
                .find(|w| w.name == prepared.name)
        } else {
            None
        };

        let (id, action) = match existing {
            Some(existing) => {
                tracing::info!(
                    id = %existing.id,
                    name = %prepared.name,
                    "replacing existing workflow"
                );
                self.client
                    .update_workflow(&existing.id, &prepared.payload)
                    .await?;
                (existing.id, DeployAction::Updated)
            }
            None => {
                let created = self.client.create_workflow(&prepared.payload).await?;
                let id = workflow_id(&created).ok_or_else(|| {
                    anyhow!("Workflow creation succeeded but response did not contain an ID.")
                })?;
                tracing::info!(id = %id, name = %prepared.name, "workflow created");
                (id, DeployAction::Created)
            }
        };

        if options.activate {
            self.client.activate_workflow(&id).await?;
        }

        Ok(DeployOutcome {
            id,
            name: prepared.name,
            action,
            activated: options.activate,
            diagnostics: prepared.diagnostics,
        })
    }

    /// Replace the stored workflow `id` with the document in `file`.
    pub async fn update(&self, id: &str, file: &Path) -> anyhow::Result<UpdateOutcome> {
        self.require_existing(id).await?;

        let update = async {
            let document = load_workflow(file)?;
            let prepared = prepare_submission(&document)?;
            self.client.update_workflow(id, &prepared.payload).await?;
            Ok::<_, anyhow::Error>(UpdateOutcome {
                id: id.to_string(),
                name: prepared.name,
                diagnostics: prepared.diagnostics,
            })
        };

        update
            .await
            .with_context(|| format!("Failed to update workflow {}", id))
    }

    pub async fn list(&self) -> anyhow::Result<Vec<WorkflowSummary>> {
        self.client
            .list_workflows()
            .await
            .context("Failed to list workflows")
    }

    /// Delete workflow `id` after confirming with the operator.
    ///
    /// The workflow is fetched first, so an unknown id fails before any prompt
    /// and the prompt can show the workflow's name.
    pub async fn delete(&self, id: &str, confirm: &dyn Confirm) -> anyhow::Result<DeleteOutcome> {
        let existing = self.require_existing(id).await?;
        let name = workflow_name(&existing);

        let prompt = match &name {
            Some(name) => format!("Delete workflow \"{}\" ({})?", name, id),
            None => format!("Delete workflow {}?", id),
        };
        if !confirm.confirm(&prompt).await? {
            return Ok(DeleteOutcome {
                id: id.to_string(),
                name,
                cancelled: true,
            });
        }

        self.client
            .delete_workflow(id)
            .await
            .with_context(|| format!("Failed to delete workflow {}", id))?;

        Ok(DeleteOutcome {
            id: id.to_string(),
            name,
            cancelled: false,
        })
    }

    pub async fn activate(&self, id: &str) -> anyhow::Result<ActivationOutcome> {
        let value = self
            .client
            .activate_workflow(id)
            .await
            .context("Failed to activate workflow")?;
        Ok(activation_outcome(id, &value, true))
    }

    pub async fn deactivate(&self, id: &str) -> anyhow::Result<ActivationOutcome> {
        let value = self
            .client
            .deactivate_workflow(id)
            .await
            .context("Failed to deactivate workflow")?;
        Ok(activation_outcome(id, &value, false))
    }

    pub async fn test(&self, id: &str) -> anyhow::Result<TestOutcome> {
        let result = self
            .client
            .test_workflow(id)
            .await
            .context("Test execution failed")?;
        Ok(TestOutcome {
            id: id.to_string(),
            result,
        })
    }

    /// Send every case to the webhook at `path`. A failing case never stops
    /// the run. Without cases a single empty payload is sent.
    pub async fn run_test_cases(&self, path: &str, cases: &[TestCase]) -> TestReport {
        let fallback = [TestCase {
            name: "default".to_string(),
            payload: json!({}),
            expect: Map::new(),
        }];
        let cases = if cases.is_empty() { &fallback[..] } else { cases };

        let mut report = TestReport::default();
        for case in cases {
            let payload = if case.payload.is_null() {
                json!({})
            } else {
                case.payload.clone()
            };

            let result = match self.client.trigger_webhook(path, &payload).await {
                Ok(response) => {
                    let mismatches = unmet_expectations(&case.expect, &response);
                    CaseResult {
                        name: case.name.clone(),
                        passed: mismatches.is_empty(),
                        detail: (!mismatches.is_empty()).then(|| mismatches.join("; ")),
                        response: Some(response),
                    }
                }
                Err(err) => CaseResult {
                    name: case.name.clone(),
                    passed: false,
                    detail: Some(err.to_string()),
                    response: None,
                },
            };

            if result.passed {
                tracing::info!(case = %result.name, "test case passed");
            } else {
                tracing::warn!(case = %result.name, detail = ?result.detail, "test case failed");
            }
            report.cases.push(result);
        }
        report
    }

    /// Delete every workflow whose name matches `pattern`.
    pub async fn cleanup(
        &self,
        pattern: &str,
        options: CleanupOptions,
        confirm: &dyn Confirm,
    ) -> anyhow::Result<CleanupOutcome> {
        if pattern.trim().is_empty() {
            bail!("Cleanup pattern must not be empty");
        }
        let matcher = NameMatcher::new(pattern, options.regex)?;

        let matched: Vec<WorkflowSummary> = self
            .list()
            .await?
            .into_iter()
            .filter(|w| matcher.is_match(&w.name))
            .collect();

        let mut outcome = CleanupOutcome {
            dry_run: options.dry_run,
            ..CleanupOutcome::default()
        };

        if matched.is_empty() || options.dry_run {
            outcome.matched = matched;
            return Ok(outcome);
        }

        if !options.force {
            let prompt = format!("Delete {} workflow(s) matching '{}'?", matched.len(), pattern);
            if !confirm.confirm(&prompt).await? {
                outcome.matched = matched;
                outcome.cancelled = true;
                return Ok(outcome);
            }
        }

        for workflow in &matched {
            match self.client.delete_workflow(&workflow.id).await {
                Ok(_) => {
                    tracing::info!(id = %workflow.id, name = %workflow.name, "workflow deleted");
                    outcome.deleted += 1;
                }
                Err(err) => {
                    tracing::warn!(id = %workflow.id, error = %err, "failed to delete workflow");
                    outcome.failed.push((workflow.id.clone(), err.to_string()));
                }
            }
        }

        outcome.matched = matched;
        Ok(outcome)
    }

    async fn require_existing(&self, id: &str) -> anyhow::Result<Value> {
        match self.client.get_workflow(id).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_not_found() => bail!("Workflow with ID {} not found", id),
            Err(err) => Err(err).with_context(|| format!("Failed to fetch workflow {}", id)),
        }
    }
}

enum NameMatcher {
    Substring(String),
    Regex(Regex),
}

impl NameMatcher {
    fn new(pattern: &str, regex: bool) -> anyhow::Result<Self> {
        if regex {
            let compiled = Regex::new(pattern)
                .with_context(|| format!("Invalid regular expression '{}'", pattern))?;
            Ok(NameMatcher::Regex(compiled))
        } else {
            Ok(NameMatcher::Substring(pattern.to_string()))
        }
    }

    fn is_match(&self, name: &str) -> bool {
        match self {
            NameMatcher::Substring(needle) => name.contains(needle.as_str()),
            NameMatcher::Regex(re) => re.is_match(name),
        }
    }
}

/// Ids are strings on current servers and numbers on old ones.
fn workflow_id(value: &Value) -> Option<String> {
    match value.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn workflow_name(value: &Value) -> Option<String> {
    value.get("name").and_then(Value::as_str).map(str::to_string)
}

fn activation_outcome(id: &str, value: &Value, requested: bool) -> ActivationOutcome {
    ActivationOutcome {
        id: id.to_string(),
        name: workflow_name(value),
        active: value
            .get("active")
            .and_then(Value::as_bool)
            .unwrap_or(requested),
    }
}

/// Fields of `expect` that are missing from `response` or differ.
fn unmet_expectations(expect: &Map<String, Value>, response: &Value) -> Vec<String> {
    expect
        .iter()
        .filter_map(|(key, expected)| match response.get(key) {
            Some(actual) if actual == expected => None,
            Some(actual) => Some(format!("{}: expected {}, got {}", key, expected, actual)),
            None => Some(format!("{}: missing from response", key)),
        })
        .collect()
}
