use thiserror::Error;

/// Structural problems a graph can report when validated.
///
/// These are advisory: the engine keeps operating on anomalous graphs
/// (degrading per the layout engine's guards) and validation exists so the
/// sync bridge and tests can detect when an external producer handed us a
/// malformed edge set.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("graph has no root node")]
    MissingRoot,

    #[error("graph has {0} root nodes, expected exactly one")]
    MultipleRoots(usize),

    #[error("edge {edge_id} references unknown node {node_id}")]
    DanglingEdge { edge_id: String, node_id: String },

    #[error("node {0} has more than one incoming edge")]
    DuplicateParent(String),

    #[error("node {0} has no incoming edge")]
    Orphan(String),
}
