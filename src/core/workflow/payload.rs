use crate::core::workflow::document::{default_settings, WorkflowDocument};
use crate::core::workflow::resolver::{resolve_connections_with_diagnostics, ResolveDiagnostic};
use n8n_workflow_types::Connections;
use serde_json::{Map, Value};

/// Request body ready for the create/update endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedWorkflow {
    pub name: String,
    pub payload: Value,
    pub diagnostics: Vec<ResolveDiagnostic>,
}

/// Resolve the document's connections (unless already id-keyed) and build the body.
pub fn prepare_submission(document: &WorkflowDocument) -> serde_json::Result<PreparedWorkflow> {
    let (connections, diagnostics) = if document.is_id_keyed() {
        tracing::debug!(workflow = %document.name, "connections already keyed by node id");
        (document.connections.clone(), Vec::new())
    } else {
        let resolution =
            resolve_connections_with_diagnostics(&document.nodes, &document.connections);
        (resolution.connections, resolution.diagnostics)
    };

    Ok(PreparedWorkflow {
        name: document.name.clone(),
        payload: submission_payload(document, &connections)?,
        diagnostics,
    })
}

/// Body accepted by the workflow API.
///
/// Only writable properties are sent; read-only ones such as `id`, `active`, `tags`
/// or `versionId` are rejected by the server and therefore left out.
pub fn submission_payload(
    document: &WorkflowDocument,
    connections: &Connections,
) -> serde_json::Result<Value> {
    let mut body = Map::new();
    body.insert("name".to_string(), Value::String(document.name.clone()));
    body.insert("nodes".to_string(), serde_json::to_value(&document.nodes)?);
    body.insert("connections".to_string(), serde_json::to_value(connections)?);
    body.insert(
        "settings".to_string(),
        document.settings.clone().unwrap_or_else(default_settings),
    );
    if let Some(static_data) = &document.static_data {
        body.insert("staticData".to_string(), static_data.clone());
    }
    Ok(Value::Object(body))
}
