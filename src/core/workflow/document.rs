use crate::utils::serialization::{FileUtils, JsonSerializer, Serializer};
use n8n_workflow_types::{Connections, WorkflowNode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Errors raised while reading a workflow definition from disk.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read workflow file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse workflow file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("invalid workflow file {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

/// A workflow definition as stored in a `workflow.json` file or exported by the server.
///
/// Fields the client does not interpret (`id`, `active`, `tags`, `pinData`, ...) are
/// kept in `extra` so the document can be written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub connections: Connections,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_data: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowDocument {
    /// Empty workflow used when scaffolding a new project.
    pub fn empty(name: impl Into<String>, description: Option<String>) -> Self {
        let mut extra = Map::new();
        if let Some(description) = description {
            extra.insert("description".to_string(), Value::String(description));
        }
        WorkflowDocument {
            name: name.into(),
            nodes: Vec::new(),
            connections: Connections::new(),
            settings: Some(default_settings()),
            static_data: None,
            extra,
        }
    }

    /// Returns `true` when every connection reference already names a node id and none
    /// names a display name, i.e. the graph was exported in id-keyed form.
    pub fn is_id_keyed(&self) -> bool {
        let names: HashSet<&str> = self.nodes.iter().map(|node| node.name.as_str()).collect();
        let ids: HashSet<&str> = self.nodes.iter().map(|node| node.id.as_str()).collect();

        let mut references = self.connections.iter().flat_map(|(source, groups)| {
            std::iter::once(source.as_str()).chain(groups.edges().map(|edge| edge.node.as_str()))
        });

        let mut seen_any = false;
        let all_ids = references.all(|reference| {
            seen_any = true;
            ids.contains(reference) && !names.contains(reference)
        });
        seen_any && all_ids
    }
}

/// Settings block applied to documents that do not carry one.
pub fn default_settings() -> Value {
    serde_json::json!({ "executionOrder": "v1" })
}

/// Read and parse a workflow document, rejecting shapes the client cannot submit.
pub fn load_workflow(path: &Path) -> Result<WorkflowDocument, DocumentError> {
    let bytes = FileUtils::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document: WorkflowDocument =
        JsonSerializer::deserialize(&bytes).map_err(|err| DocumentError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    validate(&document).map_err(|message| DocumentError::Invalid {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!(
        path = %path.display(),
        nodes = document.nodes.len(),
        sources = document.connections.len(),
        "loaded workflow document"
    );
    Ok(document)
}

fn validate(document: &WorkflowDocument) -> Result<(), String> {
    if document.name.trim().is_empty() {
        return Err("workflow name must not be empty".to_string());
    }
    let mut ids = HashSet::new();
    for node in &document.nodes {
        if node.id.is_empty() {
            return Err(format!("node '{}' has an empty id", node.name));
        }
        if !ids.insert(node.id.as_str()) {
            return Err(format!("node id '{}' is used more than once", node.id));
        }
    }
    Ok(())
}
