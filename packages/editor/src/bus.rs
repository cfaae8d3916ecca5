//! # Command Bus
//!
//! The only sanctioned way to mutate the graph. Every mutation runs as a
//! transaction against a working copy of the host's node/edge state: a
//! rejected command leaves the host untouched and pushes nothing onto
//! history, a successful one writes the new state back through the context
//! sink and fires the layout and text-sync hooks exactly once.

use crate::commands::{AppliedCommand, Command};
use crate::errors::CommandError;
use crate::history::History;
use tracing::{debug, warn};
use whiteboard_graph::{Edge, GraphModel, IdGenerator, Node};

/// The entire surface the core sees of its host: the node/edge state plus
/// the two post-mutation hooks.
pub trait EditContext {
    fn nodes(&self) -> &[Node];
    fn edges(&self) -> &[Edge];
    fn set_nodes(&mut self, nodes: Vec<Node>);
    fn set_edges(&mut self, edges: Vec<Edge>);

    /// Recompute positions for the current graph.
    fn apply_layout(&mut self);

    /// Re-serialize the current graph into the host's text buffer.
    fn sync_to_text(&mut self);
}

/// Executes commands against an [`EditContext`] and keeps their history.
#[derive(Debug)]
pub struct CommandBus {
    history: History,
    ids: IdGenerator,
}

impl CommandBus {
    pub fn new(ids: IdGenerator) -> Self {
        Self {
            history: History::new(),
            ids,
        }
    }

    pub fn with_history_capacity(ids: IdGenerator, capacity: usize) -> Self {
        Self {
            history: History::with_capacity(capacity),
            ids,
        }
    }

    /// Run a fresh command. `true` means the graph changed, history recorded
    /// it, and both hooks fired; `false` means nothing happened at all —
    /// no-ops and invalid targets are absorbed, never raised.
    pub fn execute(&mut self, command: Command, ctx: &mut dyn EditContext) -> bool {
        match self.run(&command, ctx) {
            Ok(applied) => {
                debug!(?command, "command applied");
                self.history.record(applied);
                true
            }
            Err(err) => {
                debug!(%err, ?command, "command rejected");
                false
            }
        }
    }

    /// Revert the most recent command. `false` on an empty stack.
    pub fn undo(&mut self, ctx: &mut dyn EditContext) -> bool {
        let Some(applied) = self.history.pop_undo() else {
            return false;
        };
        match self.run(&applied.undo, ctx) {
            Ok(_) => {
                self.history.stash_redo(applied);
                true
            }
            Err(err) => {
                warn!(%err, "undo failed, keeping history entry");
                self.history.stash_undo(applied);
                false
            }
        }
    }

    /// Re-apply the most recently undone command. `false` on an empty stack.
    pub fn redo(&mut self, ctx: &mut dyn EditContext) -> bool {
        let Some(applied) = self.history.pop_redo() else {
            return false;
        };
        match self.run(&applied.redo, ctx) {
            Ok(_) => {
                self.history.stash_undo(applied);
                true
            }
            Err(err) => {
                warn!(%err, "redo failed, keeping history entry");
                self.history.stash_redo(applied);
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply `command` to a working copy and, on success, commit it through
    /// the sink and fire both hooks.
    fn run(
        &mut self,
        command: &Command,
        ctx: &mut dyn EditContext,
    ) -> Result<AppliedCommand, CommandError> {
        let mut graph = GraphModel::from_parts(ctx.nodes().to_vec(), ctx.edges().to_vec());
        let applied = command.apply(&mut graph, &mut self.ids)?;

        let GraphModel { nodes, edges } = graph;
        ctx.set_nodes(nodes);
        ctx.set_edges(edges);
        ctx.apply_layout();
        ctx.sync_to_text();
        Ok(applied)
    }
}
