use crate::config::LayoutConfig;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use whiteboard_graph::{
    BranchDirection, Edge, GraphModel, Handle, Node, Placement, Point, Size,
};

/// Positioned copy of the graph, ready to be written back through the
/// command context sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Compute non-overlapping positions for the whole graph.
///
/// Pure: borrows the model, returns fresh vectors, touches nothing else.
/// Three passes. Direct children of the root are first split into a left and
/// a right half by greedy weight balancing; subtree heights are then sized
/// bottom-up; finally every node is placed top-down, vertically centered on
/// the block its children occupy.
///
/// The edge set is user-editable text in disguise, so none of the passes
/// assume a well-formed tree. Cycles are broken with per-path visiting sets,
/// nodes reachable twice keep their first placement, and edges whose
/// endpoints do not exist are dropped from the output.
pub fn compute(model: &GraphModel, config: &LayoutConfig) -> Layout {
    let root = match model.root() {
        Some(root) => root.id.clone(),
        None => {
            warn!("layout skipped: graph has no root node");
            return Layout {
                nodes: model.nodes.clone(),
                edges: model.edges.clone(),
            };
        }
    };

    let mut pass = Pass::new(model, config);
    pass.place_all(&root);
    debug!(
        nodes = model.nodes.len(),
        placed = pass.placements.len(),
        "layout computed"
    );
    pass.into_layout()
}

struct Pass<'a> {
    model: &'a GraphModel,
    config: &'a LayoutConfig,
    /// Child ids per node, document order, dangling targets excluded.
    children: HashMap<String, Vec<String>>,
    /// Completed subtree heights. Degraded (cycle-broken) returns are
    /// deliberately never stored here.
    heights: HashMap<String, f64>,
    placements: HashMap<String, Placement>,
    depths: HashMap<String, u32>,
}

impl<'a> Pass<'a> {
    fn new(model: &'a GraphModel, config: &'a LayoutConfig) -> Self {
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for edge in &model.edges {
            if !model.contains(&edge.source) || !model.contains(&edge.target) {
                warn!(edge = %edge.id, "skipping edge with unknown endpoint");
                continue;
            }
            children
                .entry(edge.source.clone())
                .or_default()
                .push(edge.target.clone());
        }

        Self {
            model,
            config,
            children,
            heights: HashMap::new(),
            placements: HashMap::new(),
            depths: HashMap::new(),
        }
    }

    fn size_of(&self, id: &str) -> Size {
        self.model
            .node(id)
            .and_then(|n| n.measured_size)
            .unwrap_or(self.config.fallback_size)
    }

    fn child_ids(&self, id: &str) -> Vec<String> {
        self.children.get(id).cloned().unwrap_or_default()
    }

    /// Vertical space the subtree at `id` needs: own height for a leaf, else
    /// the larger of own height and the children's stacked total.
    ///
    /// `path` is the current recursion path. A node re-encountered while
    /// still on it means the edge set has a cycle: the revisit returns the
    /// node's own height without descending further, and that degraded value
    /// is not memoized as if it were final.
    fn subtree_height(&mut self, id: &str, path: &mut HashSet<String>) -> f64 {
        if let Some(height) = self.heights.get(id) {
            return *height;
        }

        let own = self.size_of(id).height;
        if !path.insert(id.to_string()) {
            warn!(node = id, "cycle detected while sizing subtree");
            return own;
        }

        let child_ids = self.child_ids(id);
        let height = if child_ids.is_empty() {
            own
        } else {
            let mut stacked = 0.0;
            for child in &child_ids {
                stacked += self.subtree_height(child, path);
            }
            stacked += self.config.sibling_gap * (child_ids.len() - 1) as f64;
            own.max(stacked)
        };

        path.remove(id);
        self.heights.insert(id.to_string(), height);
        height
    }

    /// Completed height if sizing finished for `id`, own height otherwise.
    fn height_of(&self, id: &str) -> f64 {
        self.heights
            .get(id)
            .copied()
            .unwrap_or_else(|| self.size_of(id).height)
    }

    /// Split the root's direct children into halves by always extending the
    /// side whose accumulated height is currently smaller. Children are
    /// considered heaviest-first; ties go right. Returned halves are back in
    /// document order so reading order survives within each side.
    fn assign_branches(&mut self, root: &str) -> (Vec<String>, Vec<String>) {
        let child_ids = self.child_ids(root);
        let mut path = HashSet::new();
        path.insert(root.to_string());

        let mut weighted: Vec<(usize, String, f64)> = child_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (i, id.clone(), self.subtree_height(id, &mut path)))
            .collect();
        weighted.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

        let mut left: Vec<(usize, String)> = Vec::new();
        let mut right: Vec<(usize, String)> = Vec::new();
        let (mut left_total, mut right_total) = (0.0_f64, 0.0_f64);

        for (index, id, height) in weighted {
            if right_total <= left_total {
                right.push((index, id));
                right_total += height + self.config.sibling_gap;
            } else {
                left.push((index, id));
                left_total += height + self.config.sibling_gap;
            }
        }

        left.sort_by_key(|(index, _)| *index);
        right.sort_by_key(|(index, _)| *index);

        (
            left.into_iter().map(|(_, id)| id).collect(),
            right.into_iter().map(|(_, id)| id).collect(),
        )
    }

    fn place_all(&mut self, root: &str) {
        let (left, right) = self.assign_branches(root);

        let root_size = self.size_of(root);
        self.placements.insert(
            root.to_string(),
            Placement {
                position: Point::new(-root_size.width / 2.0, -root_size.height / 2.0),
                direction: BranchDirection::Root,
            },
        );
        self.depths.insert(root.to_string(), 0);

        let mut path = HashSet::new();
        path.insert(root.to_string());

        for (side, branch) in [
            (BranchDirection::Right, right),
            (BranchDirection::Left, left),
        ] {
            let total = self.stacked_total(&branch);
            let mut cursor = -total / 2.0;
            for child in &branch {
                let span = self.height_of(child);
                self.place_subtree(
                    child,
                    side,
                    cursor,
                    -root_size.width / 2.0,
                    root_size.width,
                    1,
                    &mut path,
                );
                cursor += span + self.config.sibling_gap;
            }
        }
    }

    fn stacked_total(&self, ids: &[String]) -> f64 {
        if ids.is_empty() {
            return 0.0;
        }
        let sum: f64 = ids.iter().map(|id| self.height_of(id)).sum();
        sum + self.config.sibling_gap * (ids.len() - 1) as f64
    }

    /// Place `id` centered within the vertical span starting at `span_top`,
    /// then stack its children contiguously around the same center.
    #[allow(clippy::too_many_arguments)]
    fn place_subtree(
        &mut self,
        id: &str,
        side: BranchDirection,
        span_top: f64,
        parent_x: f64,
        parent_width: f64,
        depth: u32,
        path: &mut HashSet<String>,
    ) {
        if self.placements.contains_key(id) {
            warn!(node = id, "node reachable twice, keeping first placement");
            return;
        }
        if !path.insert(id.to_string()) {
            warn!(node = id, "cycle detected while placing subtree");
            return;
        }

        let own = self.size_of(id);
        let span = self.height_of(id);
        let center = span_top + span / 2.0;

        let x = match side {
            BranchDirection::Left => parent_x - self.config.level_gap - own.width,
            _ => parent_x + parent_width + self.config.level_gap,
        };
        let y = center - own.height / 2.0;

        self.placements.insert(
            id.to_string(),
            Placement {
                position: Point::new(x, y),
                direction: side,
            },
        );
        self.depths.insert(id.to_string(), depth);

        let child_ids = self.child_ids(id);
        if !child_ids.is_empty() {
            let block = self.stacked_total(&child_ids);
            let mut cursor = center - block / 2.0;
            for child in &child_ids {
                let child_span = self.height_of(child);
                self.place_subtree(child, side, cursor, x, own.width, depth + 1, path);
                cursor += child_span + self.config.sibling_gap;
            }
        }

        path.remove(id);
    }

    fn into_layout(self) -> Layout {
        let mut nodes = self.model.nodes.clone();
        for node in &mut nodes {
            if let Some(placement) = self.placements.get(&node.id) {
                node.placement = Some(*placement);
                node.depth = self.depths.get(&node.id).copied().unwrap_or(node.depth);
            } else {
                warn!(node = %node.id, "node unreachable from root, left unpositioned");
            }
        }

        let mut edges = Vec::with_capacity(self.model.edges.len());
        for edge in &self.model.edges {
            if !self.model.contains(&edge.source) || !self.model.contains(&edge.target) {
                continue;
            }
            let mut edge = edge.clone();
            let target_side = self
                .placements
                .get(&edge.target)
                .map(|p| p.direction);
            match target_side {
                Some(BranchDirection::Left) => {
                    edge.source_handle = Handle::Left;
                    edge.target_handle = Handle::Right;
                }
                _ => {
                    edge.source_handle = Handle::Right;
                    edge.target_handle = Handle::Left;
                }
            }
            edges.push(edge);
        }

        Layout { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use whiteboard_graph::NodeKind;

    fn node(id: &str, kind: NodeKind, height: f64) -> Node {
        Node::new(id, kind, id).with_size(Size::new(100.0, height))
    }

    fn placement(layout: &Layout, id: &str) -> Placement {
        layout
            .nodes
            .iter()
            .find(|n| n.id == id)
            .and_then(|n| n.placement)
            .unwrap_or_else(|| panic!("node {id} has no placement"))
    }

    #[test]
    fn test_root_alone_sits_centered_on_origin() {
        let model = GraphModel::from_parts(vec![node("r", NodeKind::Root, 40.0)], vec![]);
        let layout = compute(&model, &LayoutConfig::default());

        let p = placement(&layout, "r");
        assert_eq!(p.position, Point::new(-50.0, -20.0));
        assert_eq!(p.direction, BranchDirection::Root);
    }

    #[test]
    fn test_unmeasured_node_uses_fallback_size() {
        let model = GraphModel::from_parts(
            vec![Node::new("r", NodeKind::Root, "r")],
            vec![],
        );
        let config = LayoutConfig::default();
        let layout = compute(&model, &config);

        let p = placement(&layout, "r");
        assert_eq!(p.position.x, -config.fallback_size.width / 2.0);
    }

    #[test]
    fn test_greedy_split_puts_heavy_child_alone() {
        let model = GraphModel::from_parts(
            vec![
                node("r", NodeKind::Root, 40.0),
                node("heavy", NodeKind::Section, 400.0),
                node("light1", NodeKind::Section, 80.0),
                node("light2", NodeKind::Section, 80.0),
                node("light3", NodeKind::Section, 80.0),
            ],
            vec![
                Edge::new("e1", "r", "heavy"),
                Edge::new("e2", "r", "light1"),
                Edge::new("e3", "r", "light2"),
                Edge::new("e4", "r", "light3"),
            ],
        );
        let layout = compute(&model, &LayoutConfig::default());

        let side = |id: &str| placement(&layout, id).direction;
        assert_eq!(side("heavy"), BranchDirection::Right);
        assert_eq!(side("light1"), BranchDirection::Left);
        assert_eq!(side("light2"), BranchDirection::Left);
        assert_eq!(side("light3"), BranchDirection::Left);
    }

    #[test]
    fn test_left_side_grows_leftward() {
        let model = GraphModel::from_parts(
            vec![
                node("r", NodeKind::Root, 40.0),
                node("a", NodeKind::Section, 400.0),
                node("b", NodeKind::Section, 40.0),
                node("c", NodeKind::TextItem, 40.0),
            ],
            vec![
                Edge::new("e1", "r", "a"),
                Edge::new("e2", "r", "b"),
                Edge::new("e3", "b", "c"),
            ],
        );
        let config = LayoutConfig::default();
        let layout = compute(&model, &config);

        // a is heavier so it claims the right side; b and its child c go left
        let b = placement(&layout, "b");
        let c = placement(&layout, "c");
        assert_eq!(b.direction, BranchDirection::Left);
        assert_eq!(b.position.x, -50.0 - config.level_gap - 100.0);
        assert!(c.position.x < b.position.x);
    }

    #[test]
    fn test_handles_follow_target_side() {
        let model = GraphModel::from_parts(
            vec![
                node("r", NodeKind::Root, 40.0),
                node("a", NodeKind::Section, 400.0),
                node("b", NodeKind::Section, 40.0),
            ],
            vec![Edge::new("e1", "r", "a"), Edge::new("e2", "r", "b")],
        );
        let layout = compute(&model, &LayoutConfig::default());

        let edge = |id: &str| layout.edges.iter().find(|e| e.id == id).unwrap();
        // a lands right, b lands left
        assert_eq!(edge("e1").source_handle, Handle::Right);
        assert_eq!(edge("e1").target_handle, Handle::Left);
        assert_eq!(edge("e2").source_handle, Handle::Left);
        assert_eq!(edge("e2").target_handle, Handle::Right);
    }

    #[test]
    fn test_cycle_completes_with_finite_positions() {
        let model = GraphModel::from_parts(
            vec![
                node("r", NodeKind::Root, 40.0),
                node("a", NodeKind::Section, 40.0),
                node("b", NodeKind::TextItem, 40.0),
            ],
            vec![
                Edge::new("e1", "r", "a"),
                Edge::new("e2", "a", "b"),
                Edge::new("e3", "b", "a"),
            ],
        );
        let layout = compute(&model, &LayoutConfig::default());

        for id in ["r", "a", "b"] {
            let p = placement(&layout, id);
            assert!(p.position.x.is_finite() && p.position.y.is_finite());
        }
    }

    #[test]
    fn test_dangling_edge_is_dropped() {
        let model = GraphModel::from_parts(
            vec![node("r", NodeKind::Root, 40.0), node("a", NodeKind::Section, 40.0)],
            vec![Edge::new("e1", "r", "a"), Edge::new("e2", "r", "ghost")],
        );
        let layout = compute(&model, &LayoutConfig::default());

        assert_eq!(layout.edges.len(), 1);
        assert_eq!(layout.edges[0].id, "e1");
    }

    #[test]
    fn test_missing_root_passes_graph_through() {
        let model = GraphModel::from_parts(
            vec![node("a", NodeKind::Section, 40.0)],
            vec![],
        );
        let layout = compute(&model, &LayoutConfig::default());

        assert_eq!(layout.nodes, model.nodes);
        assert!(layout.nodes[0].placement.is_none());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let model = GraphModel::from_parts(
            vec![
                node("r", NodeKind::Root, 40.0),
                node("a", NodeKind::Section, 80.0),
                node("b", NodeKind::Section, 80.0),
                node("c", NodeKind::TextItem, 30.0),
            ],
            vec![
                Edge::new("e1", "r", "a"),
                Edge::new("e2", "r", "b"),
                Edge::new("e3", "a", "c"),
            ],
        );
        let config = LayoutConfig::default();
        assert_eq!(compute(&model, &config), compute(&model, &config));
    }
}
