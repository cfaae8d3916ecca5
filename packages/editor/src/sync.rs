//! # Sync Bridge
//!
//! Keeps the text buffer and the graph telling the same story. The bridge
//! owns the seams to the external serializer and parser: after every
//! successful command (and every layout run) it re-serializes the graph and
//! replaces the text buffer; when the user edits text directly it rebuilds
//! the whole graph from the parser's output. Text-driven updates are always
//! a full replacement — partial parser output is never merged into the
//! existing graph.

use std::collections::BTreeMap;
use tracing::warn;
use whiteboard_graph::{Edge, GraphModel, Node, NodeKind};

/// Document metadata serialized ahead of the body. Ordered so serialization
/// is deterministic.
pub type Frontmatter = BTreeMap<String, String>;

/// What the external parser hands back for a text buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub frontmatter: Frontmatter,
}

/// Graph → text. Implementations walk depth-first from the root and map
/// each node kind to its textual production rule.
pub trait SourceSerializer: Send + Sync {
    fn serialize(&self, nodes: &[Node], edges: &[Edge], frontmatter: &Frontmatter) -> String;
}

/// Text → graph. The parser contract promises at least a root node even for
/// structurally empty input; the bridge enforces that promise anyway.
pub trait SourceParser: Send + Sync {
    fn parse(&self, text: &str) -> ParsedDocument;
}

/// Coordinator between the graph and the externally-held text buffer.
pub struct SyncBridge {
    serializer: Box<dyn SourceSerializer>,
    parser: Box<dyn SourceParser>,
    text: String,
    frontmatter: Frontmatter,
}

impl SyncBridge {
    pub fn new(serializer: Box<dyn SourceSerializer>, parser: Box<dyn SourceParser>) -> Self {
        Self {
            serializer,
            parser,
            text: String::new(),
            frontmatter: Frontmatter::new(),
        }
    }

    pub fn with_frontmatter(mut self, frontmatter: Frontmatter) -> Self {
        self.frontmatter = frontmatter;
        self
    }

    /// The current serialized form of the document.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    /// Re-serialize the graph and replace the text buffer.
    pub fn sync_from_graph(&mut self, graph: &GraphModel) {
        self.text = self
            .serializer
            .serialize(&graph.nodes, &graph.edges, &self.frontmatter);
    }

    /// Parse `text` and return the replacement graph. The old graph plays no
    /// part: whatever the parser produces becomes the whole state. A parser
    /// that breaks its root guarantee gets one synthesized from the title
    /// metadata, so the caller always receives a minimally valid graph.
    pub fn replace_from_text(&mut self, text: &str) -> GraphModel {
        let parsed = self.parser.parse(text);
        self.frontmatter = parsed.frontmatter;
        self.text = text.to_string();

        let mut model = GraphModel::from_parts(parsed.nodes, parsed.edges);
        if model.root().is_none() {
            warn!("parser returned no root node, synthesizing one");
            let label = self
                .frontmatter
                .get("title")
                .cloned()
                .unwrap_or_else(|| "Untitled".to_string());
            model.nodes.insert(0, Node::new("root", NodeKind::Root, label));
        }
        model
    }
}
