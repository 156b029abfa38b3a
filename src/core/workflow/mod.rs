//! Workflow documents and the transforms applied before submission.
pub mod document;
pub mod payload;
pub mod resolver;

pub use document::{load_workflow, DocumentError, WorkflowDocument};
pub use payload::{prepare_submission, submission_payload, PreparedWorkflow};
pub use resolver::{
    resolve_connections, resolve_connections_with_diagnostics, Resolution, ResolveDiagnostic,
};
