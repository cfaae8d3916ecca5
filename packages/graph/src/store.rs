use crate::error::GraphError;
use crate::model::{Edge, Node, NodeKind, Size};
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashSet, VecDeque};
use std::hash::{Hash, Hasher};

/// Canonical node/edge state for one editing session.
///
/// Storage is flat vectors keyed by id. Under normal operation the edge set
/// forms an in-tree rooted at the single `Root`-kind node, but nothing here
/// assumes that: every traversal carries a visited set so duplicate parents
/// and cycles in externally produced graphs cannot hang the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphModel {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// The first node tagged `Root`, if any.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.kind.is_root())
    }

    /// The edge that makes `id` someone's child. First match wins when an
    /// anomalous graph carries duplicates.
    pub fn parent_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.target == id)
    }

    pub fn parent_edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.target == id)
    }

    /// Outgoing edges of `id` in document order.
    pub fn child_edges<'a, 'b>(&'a self, id: &'b str) -> impl Iterator<Item = &'a Edge> + 'b
    where
        'a: 'b,
    {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// Child ids of `id` in document order.
    pub fn children_of<'a>(&'a self, id: &str) -> Vec<&'a str> {
        self.child_edges(id).map(|e| e.target.as_str()).collect()
    }

    /// Every id reachable from `start` over forward edges, `start` included,
    /// in breadth-first document order. Safe on cyclic or duplicate-parent
    /// edge sets: each id is visited at most once.
    pub fn subtree_ids(&self, start: &str) -> Vec<String> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut order: Vec<String> = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            order.push(current.to_string());
            for edge in self.child_edges(current) {
                if visited.insert(edge.target.as_str()) {
                    queue.push_back(edge.target.as_str());
                }
            }
        }

        order
    }

    /// Record a measurement report. Returns `false` when nothing changed:
    /// unknown node, or a repeat of the size already on record. The caller
    /// uses that to avoid re-triggering layout on duplicate reports.
    pub fn apply_measurement(&mut self, id: &str, size: Size) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                if node.measured_size == Some(size) {
                    return false;
                }
                node.measured_size = Some(size);
                true
            }
            None => {
                tracing::warn!(node = id, "measurement report for unknown node");
                false
            }
        }
    }

    /// Whether every node has a measured size. Layout waits for this.
    pub fn fully_measured(&self) -> bool {
        self.nodes.iter().all(|n| n.measured_size.is_some())
    }

    /// Structural hash over everything layout depends on: node ids, kinds,
    /// labels, measured sizes, and edge endpoints. Placements, depths and
    /// resolved handles are excluded on purpose, so writing a layout result
    /// back does not change the signature and identical re-reports can be
    /// detected before the recompute.
    pub fn signature(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for node in &self.nodes {
            node.id.hash(&mut hasher);
            node.kind.hash(&mut hasher);
            node.label.hash(&mut hasher);
            match node.measured_size {
                Some(size) => {
                    1u8.hash(&mut hasher);
                    size.width.to_bits().hash(&mut hasher);
                    size.height.to_bits().hash(&mut hasher);
                }
                None => 0u8.hash(&mut hasher),
            }
        }
        for edge in &self.edges {
            edge.id.hash(&mut hasher);
            edge.source.hash(&mut hasher);
            edge.target.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Check the in-tree invariants: exactly one root, every edge endpoint
    /// resolvable, every non-root node with exactly one incoming edge.
    pub fn validate(&self) -> Result<(), GraphError> {
        let roots = self
            .nodes
            .iter()
            .filter(|n| n.kind.is_root())
            .count();
        match roots {
            0 => return Err(GraphError::MissingRoot),
            1 => {}
            n => return Err(GraphError::MultipleRoots(n)),
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !self.contains(endpoint) {
                    return Err(GraphError::DanglingEdge {
                        edge_id: edge.id.clone(),
                        node_id: endpoint.clone(),
                    });
                }
            }
        }

        for node in &self.nodes {
            if node.kind.is_root() {
                continue;
            }
            let incoming = self.edges.iter().filter(|e| e.target == node.id).count();
            match incoming {
                0 => return Err(GraphError::Orphan(node.id.clone())),
                1 => {}
                _ => return Err(GraphError::DuplicateParent(node.id.clone())),
            }
        }

        Ok(())
    }
}
