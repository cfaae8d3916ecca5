//! # Graph Commands
//!
//! Semantic operations on the whiteboard graph, each one a reversible unit.
//!
//! ## Semantics
//!
//! ### AddChild
//! - Creates one node with a freshly generated id plus its incoming edge
//! - Rejected when the parent does not exist
//!
//! ### RemoveSubtree
//! - Removes the node, every reachable descendant, and every edge touching
//!   the removed set
//! - The root is permanently protected
//! - Descendants are collected with a visited set, so a cyclic edge set
//!   cannot hang the traversal
//!
//! ### RenameLabel
//! - Atomic replacement; renaming to the current text is a no-op
//!
//! ### Reparent
//! - Rewrites the node's single incoming edge; same parent and position is a
//!   no-op, moving under the node's own subtree is rejected
//!
//! Every successful apply returns the pair of commands that replay and
//! invert it. Inverses store minimal deltas (the removed snapshot, the old
//! label, the old parent and position) rather than whole-graph copies.

use crate::errors::CommandError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use whiteboard_graph::{Edge, GraphModel, IdGenerator, Node, NodeKind};

/// One reversible graph mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Command {
    /// Create a node under `parent_id`.
    AddChild {
        parent_id: String,
        kind: NodeKind,
        label: String,
    },

    /// Remove a node and everything reachable from it.
    RemoveSubtree { node_id: String },

    /// Replace a node's label.
    RenameLabel {
        node_id: String,
        old_label: String,
        new_label: String,
    },

    /// Move a node under a new parent at a sibling position.
    Reparent {
        node_id: String,
        old_parent_id: String,
        new_parent_id: String,
        index: usize,
    },

    /// Re-insert a previously captured snapshot verbatim. Only ever
    /// constructed internally, to invert `RemoveSubtree` and to replay
    /// `AddChild` with its original id.
    RestoreSubtree { nodes: Vec<Node>, edges: Vec<Edge> },
}

/// A command that ran, paired with what replays and what inverts it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCommand {
    pub redo: Command,
    pub undo: Command,
}

impl Command {
    /// Mutate `graph` in place. On success the returned pair replays and
    /// inverts the mutation exactly; on rejection the graph is untouched.
    pub fn apply(
        &self,
        graph: &mut GraphModel,
        ids: &mut IdGenerator,
    ) -> Result<AppliedCommand, CommandError> {
        match self {
            Command::AddChild {
                parent_id,
                kind,
                label,
            } => Self::apply_add_child(graph, ids, parent_id, *kind, label),
            Command::RemoveSubtree { node_id } => Self::apply_remove_subtree(graph, node_id),
            Command::RenameLabel {
                node_id,
                old_label,
                new_label,
            } => Self::apply_rename(graph, node_id, old_label, new_label),
            Command::Reparent {
                node_id,
                new_parent_id,
                index,
                ..
            } => Self::apply_reparent(graph, node_id, new_parent_id, *index),
            Command::RestoreSubtree { nodes, edges } => {
                Self::apply_restore(graph, nodes, edges)
            }
        }
    }

    fn apply_add_child(
        graph: &mut GraphModel,
        ids: &mut IdGenerator,
        parent_id: &str,
        kind: NodeKind,
        label: &str,
    ) -> Result<AppliedCommand, CommandError> {
        if kind.is_root() {
            return Err(CommandError::RootKindReserved);
        }
        let parent_depth = graph
            .node(parent_id)
            .ok_or_else(|| CommandError::ParentNotFound(parent_id.to_string()))?
            .depth;

        let node_id = ids.new_id();
        let mut node = Node::new(node_id.clone(), kind, label);
        node.depth = parent_depth + 1;
        let edge = Edge::new(ids.new_id(), parent_id, node_id.clone());

        graph.nodes.push(node.clone());
        graph.edges.push(edge.clone());

        Ok(AppliedCommand {
            // replaying must reuse the generated id, so the redo form is the
            // captured snapshot rather than a second AddChild
            redo: Command::RestoreSubtree {
                nodes: vec![node],
                edges: vec![edge],
            },
            undo: Command::RemoveSubtree { node_id },
        })
    }

    fn apply_remove_subtree(
        graph: &mut GraphModel,
        node_id: &str,
    ) -> Result<AppliedCommand, CommandError> {
        let node = graph
            .node(node_id)
            .ok_or_else(|| CommandError::NodeNotFound(node_id.to_string()))?;
        if node.kind.is_root() {
            return Err(CommandError::RootProtected);
        }

        // breadth-first and visited-set guarded; entry node comes first
        let removed_ids = graph.subtree_ids(node_id);
        let removed_set: HashSet<&str> = removed_ids.iter().map(String::as_str).collect();

        let removed_nodes: Vec<Node> = removed_ids
            .iter()
            .filter_map(|id| graph.node(id).cloned())
            .collect();
        let removed_edges: Vec<Edge> = graph
            .edges
            .iter()
            .filter(|e| {
                removed_set.contains(e.source.as_str()) || removed_set.contains(e.target.as_str())
            })
            .cloned()
            .collect();

        graph
            .nodes
            .retain(|n| !removed_set.contains(n.id.as_str()));
        graph.edges.retain(|e| {
            !removed_set.contains(e.source.as_str()) && !removed_set.contains(e.target.as_str())
        });

        Ok(AppliedCommand {
            redo: Command::RemoveSubtree {
                node_id: node_id.to_string(),
            },
            undo: Command::RestoreSubtree {
                nodes: removed_nodes,
                edges: removed_edges,
            },
        })
    }

    fn apply_rename(
        graph: &mut GraphModel,
        node_id: &str,
        old_label: &str,
        new_label: &str,
    ) -> Result<AppliedCommand, CommandError> {
        let node = graph
            .node_mut(node_id)
            .ok_or_else(|| CommandError::NodeNotFound(node_id.to_string()))?;
        if old_label == new_label || node.label == new_label {
            return Err(CommandError::NoOp);
        }

        node.label = new_label.to_string();

        Ok(AppliedCommand {
            redo: Command::RenameLabel {
                node_id: node_id.to_string(),
                old_label: old_label.to_string(),
                new_label: new_label.to_string(),
            },
            undo: Command::RenameLabel {
                node_id: node_id.to_string(),
                old_label: new_label.to_string(),
                new_label: old_label.to_string(),
            },
        })
    }

    fn apply_reparent(
        graph: &mut GraphModel,
        node_id: &str,
        new_parent_id: &str,
        index: usize,
    ) -> Result<AppliedCommand, CommandError> {
        let node = graph
            .node(node_id)
            .ok_or_else(|| CommandError::NodeNotFound(node_id.to_string()))?;
        if node.kind.is_root() {
            return Err(CommandError::RootProtected);
        }
        if !graph.contains(new_parent_id) {
            return Err(CommandError::ParentNotFound(new_parent_id.to_string()));
        }
        // the new parent must not live inside the moved subtree
        if graph
            .subtree_ids(node_id)
            .iter()
            .any(|id| id == new_parent_id)
        {
            return Err(CommandError::CycleDetected);
        }

        let edge_pos = graph
            .edges
            .iter()
            .position(|e| e.target == node_id)
            .ok_or_else(|| CommandError::MissingParentEdge(node_id.to_string()))?;
        let current_parent = graph.edges[edge_pos].source.clone();
        let current_index = graph
            .edges
            .iter()
            .filter(|e| e.source == current_parent)
            .position(|e| e.target == node_id)
            .unwrap_or(0);

        if current_parent == new_parent_id && current_index == index {
            return Err(CommandError::NoOp);
        }

        let mut edge = graph.edges.remove(edge_pos);
        edge.source = new_parent_id.to_string();

        let sibling_positions: Vec<usize> = graph
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.source == new_parent_id)
            .map(|(i, _)| i)
            .collect();
        let insert_at = if index < sibling_positions.len() {
            sibling_positions[index]
        } else {
            sibling_positions
                .last()
                .map(|p| p + 1)
                .unwrap_or(graph.edges.len())
        };
        graph.edges.insert(insert_at, edge);

        Ok(AppliedCommand {
            redo: Command::Reparent {
                node_id: node_id.to_string(),
                old_parent_id: current_parent.clone(),
                new_parent_id: new_parent_id.to_string(),
                index,
            },
            undo: Command::Reparent {
                node_id: node_id.to_string(),
                old_parent_id: new_parent_id.to_string(),
                new_parent_id: current_parent,
                index: current_index,
            },
        })
    }

    fn apply_restore(
        graph: &mut GraphModel,
        nodes: &[Node],
        edges: &[Edge],
    ) -> Result<AppliedCommand, CommandError> {
        let entry = nodes.first().ok_or(CommandError::NoOp)?;
        for node in nodes {
            if graph.contains(&node.id) {
                return Err(CommandError::DuplicateNode(node.id.clone()));
            }
        }

        graph.nodes.extend(nodes.iter().cloned());
        graph.edges.extend(edges.iter().cloned());

        Ok(AppliedCommand {
            redo: Command::RestoreSubtree {
                nodes: nodes.to_vec(),
                edges: edges.to_vec(),
            },
            undo: Command::RemoveSubtree {
                node_id: entry.id.clone(),
            },
        })
    }
}
