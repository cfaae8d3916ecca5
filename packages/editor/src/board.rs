//! # Board State
//!
//! The crate's in-memory implementation of [`EditContext`]: one whiteboard
//! document being edited for the duration of a session. It owns the graph,
//! runs the layout engine behind the `apply_layout` hook, and drives the
//! sync bridge behind `sync_to_text`.
//!
//! Layout is gated twice. It waits until every node has a measured size
//! (sizes arrive asynchronously from the host's resize observation), and it
//! skips the recompute when the graph's structural signature matches the one
//! already laid out — so repeated identical measurement reports cost
//! nothing.

use crate::bus::EditContext;
use crate::sync::SyncBridge;
use tracing::debug;
use whiteboard_graph::{Edge, GraphModel, Node, Size};
use whiteboard_layout::{compute, LayoutConfig};

pub struct BoardState {
    graph: GraphModel,
    layout_config: LayoutConfig,
    bridge: SyncBridge,
    version: u64,
    laid_out_signature: Option<u64>,
}

impl BoardState {
    /// Start from an existing graph (the usual path: the external parser
    /// already produced one). Serializes once so the text buffer is valid
    /// from the start.
    pub fn from_graph(graph: GraphModel, bridge: SyncBridge) -> Self {
        let mut board = Self {
            graph,
            layout_config: LayoutConfig::default(),
            bridge,
            version: 0,
            laid_out_signature: None,
        };
        board.apply_layout();
        board.sync_to_text();
        board
    }

    /// Start from source text: parse, wholesale-replace, lay out.
    pub fn from_text(text: &str, mut bridge: SyncBridge) -> Self {
        let graph = bridge.replace_from_text(text);
        let mut board = Self {
            graph,
            layout_config: LayoutConfig::default(),
            bridge,
            version: 0,
            laid_out_signature: None,
        };
        board.apply_layout();
        board.sync_to_text();
        board
    }

    pub fn with_layout_config(mut self, layout_config: LayoutConfig) -> Self {
        self.layout_config = layout_config;
        self
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    /// Bumped once per successful mutation or text replacement.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn text(&self) -> &str {
        self.bridge.text()
    }

    pub fn bridge(&self) -> &SyncBridge {
        &self.bridge
    }

    /// Take a measurement report from the host. Returns `false` when the
    /// report changed nothing (unknown node or repeated identical size), in
    /// which case no layout runs. Once the last missing size arrives the
    /// whole graph is laid out and re-serialized.
    pub fn apply_measurement(&mut self, id: &str, size: Size) -> bool {
        if !self.graph.apply_measurement(id, size) {
            return false;
        }
        if self.graph.fully_measured() {
            self.apply_layout();
            self.sync_to_text();
        }
        true
    }

    /// The user edited the text directly: rebuild the graph from scratch.
    /// The parser's output replaces everything; nothing is merged.
    pub fn replace_from_text(&mut self, text: &str) {
        self.graph = self.bridge.replace_from_text(text);
        self.version += 1;
        self.laid_out_signature = None;
        self.apply_layout();
        self.sync_to_text();
    }
}

impl EditContext for BoardState {
    fn nodes(&self) -> &[Node] {
        &self.graph.nodes
    }

    fn edges(&self) -> &[Edge] {
        &self.graph.edges
    }

    fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.graph.nodes = nodes;
        self.version += 1;
    }

    fn set_edges(&mut self, edges: Vec<Edge>) {
        self.graph.edges = edges;
    }

    fn apply_layout(&mut self) {
        if !self.graph.fully_measured() {
            debug!("layout deferred: not all nodes measured");
            return;
        }
        let signature = self.graph.signature();
        if self.laid_out_signature == Some(signature) {
            debug!("layout skipped: graph unchanged since last run");
            return;
        }

        let layout = compute(&self.graph, &self.layout_config);
        self.graph.nodes = layout.nodes;
        self.graph.edges = layout.edges;
        self.laid_out_signature = Some(signature);
    }

    fn sync_to_text(&mut self) {
        self.bridge.sync_from_graph(&self.graph);
    }
}
