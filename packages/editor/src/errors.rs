//! Error types for the editor

use thiserror::Error;

/// Reasons a command can be rejected.
///
/// Rejections never escape the command bus as errors: `execute` absorbs them
/// and reports `false` to the host. The enum exists so rejections carry a
/// precise reason into the log.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("parent not found: {0}")]
    ParentNotFound(String),

    #[error("the root node cannot be removed or reparented")]
    RootProtected,

    #[error("documents carry exactly one root node")]
    RootKindReserved,

    #[error("reparent would create a cycle")]
    CycleDetected,

    #[error("node {0} has no parent edge")]
    MissingParentEdge(String),

    #[error("node {0} already exists")]
    DuplicateNode(String),

    #[error("command is a no-op")]
    NoOp,
}
