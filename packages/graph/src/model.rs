use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node kind tags, matching the textual productions each kind maps to.
///
/// The set is closed: every consumer (layout size fallback, serializer
/// production rules) dispatches with an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Root,
    Section,
    TextItem,
    CodeBlock,
    Table,
    Quote,
    Link,
    Image,
    EmbeddedComponent,
}

impl NodeKind {
    pub fn is_root(&self) -> bool {
        matches!(self, NodeKind::Root)
    }
}

/// Measured box size reported by the host's resize observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of a node's box in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which half of the diagram a node was placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchDirection {
    Root,
    Left,
    Right,
}

/// Named connection point on a node where an edge visually attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Left,
    Right,
}

/// Layout output for a single node: position plus branch tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Point,
    pub direction: BranchDirection,
}

/// A document node.
///
/// `depth` is advisory metadata (kept equal to the structural parent's depth
/// + 1 once laid out); core correctness never depends on it. `custom_props`
/// carries per-kind payload such as `href` for links or the tag name and
/// attributes of an embedded component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_props: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured_size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            depth: 0,
            custom_props: HashMap::new(),
            measured_size: None,
            placement: None,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.measured_size = Some(size);
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.custom_props.insert(key.into(), value);
        self
    }
}

/// "Target is a structural child of source."
///
/// Handles start out in the resting right-to-left orientation; the layout
/// engine rewrites them once it knows which side the target landed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: Handle,
    pub target_handle: Handle,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: Handle::Right,
            target_handle: Handle::Left,
        }
    }
}
