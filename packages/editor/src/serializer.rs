//! Default graph → markdown serializer.
//!
//! Walks the body depth-first from the root and maps each node kind to a
//! fixed production rule: headings for sections, indented bullets for text
//! items, fenced blocks for code, pipe rows for tables, quote markers for
//! quotes, link/image markup, and component-tag syntax for embedded
//! components. The root contributes no body text, only the frontmatter
//! fence. Hosts with their own source format plug in a different
//! [`SourceSerializer`]; this one keeps the crate usable out of the box.

use crate::sync::{Frontmatter, SourceSerializer};
use std::collections::{HashMap, HashSet};
use tracing::warn;
use whiteboard_graph::{Edge, Node, NodeKind};

pub struct MarkdownSerializer {
    indent: String,
}

impl MarkdownSerializer {
    pub fn new() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent: indent.to_string(),
        }
    }

    fn serialize_frontmatter(&self, frontmatter: &Frontmatter, output: &mut String) {
        if frontmatter.is_empty() {
            return;
        }
        output.push_str("---\n");
        for (key, value) in frontmatter {
            output.push_str(key);
            output.push_str(": ");
            output.push_str(value);
            output.push('\n');
        }
        output.push_str("---\n");
    }

    #[allow(clippy::too_many_arguments)]
    fn serialize_node(
        &self,
        node: &Node,
        nodes: &HashMap<&str, &Node>,
        children: &HashMap<&str, Vec<&str>>,
        depth: usize,
        bullet_depth: usize,
        visited: &mut HashSet<String>,
        output: &mut String,
    ) {
        match node.kind {
            NodeKind::Root => {}
            NodeKind::Section => {
                if !output.is_empty() && !output.ends_with("\n\n") {
                    output.push('\n');
                }
                let level = depth.min(6);
                for _ in 0..level {
                    output.push('#');
                }
                output.push(' ');
                output.push_str(&node.label);
                output.push('\n');
            }
            NodeKind::TextItem => {
                for _ in 0..bullet_depth {
                    output.push_str(&self.indent);
                }
                output.push_str("- ");
                output.push_str(&node.label);
                output.push('\n');
            }
            NodeKind::CodeBlock => {
                output.push_str("```");
                if let Some(lang) = node.custom_props.get("lang").and_then(|v| v.as_str()) {
                    output.push_str(lang);
                }
                output.push('\n');
                output.push_str(&node.label);
                if !node.label.ends_with('\n') {
                    output.push('\n');
                }
                output.push_str("```\n");
            }
            NodeKind::Table => {
                for line in node.label.lines() {
                    if line.trim_start().starts_with('|') {
                        output.push_str(line);
                    } else {
                        output.push_str("| ");
                        output.push_str(line);
                        output.push_str(" |");
                    }
                    output.push('\n');
                }
            }
            NodeKind::Quote => {
                output.push_str("> ");
                output.push_str(&node.label);
                output.push('\n');
            }
            NodeKind::Link => {
                let href = node
                    .custom_props
                    .get("href")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                output.push('[');
                output.push_str(&node.label);
                output.push_str("](");
                output.push_str(href);
                output.push_str(")\n");
            }
            NodeKind::Image => {
                let src = node
                    .custom_props
                    .get("src")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                output.push_str("![");
                output.push_str(&node.label);
                output.push_str("](");
                output.push_str(src);
                output.push_str(")\n");
            }
            NodeKind::EmbeddedComponent => {
                let name = node
                    .custom_props
                    .get("component")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Component");
                output.push('<');
                output.push_str(name);

                let mut attrs: Vec<(&String, &serde_json::Value)> = node
                    .custom_props
                    .iter()
                    .filter(|(key, _)| key.as_str() != "component")
                    .collect();
                attrs.sort_by_key(|(key, _)| key.as_str());
                for (key, value) in attrs {
                    output.push(' ');
                    output.push_str(key);
                    output.push_str("=\"");
                    match value.as_str() {
                        Some(text) => output.push_str(text),
                        None => output.push_str(&value.to_string()),
                    }
                    output.push('"');
                }
                output.push_str(" />\n");
            }
        }

        let next_bullet_depth = match node.kind {
            NodeKind::TextItem => bullet_depth + 1,
            _ => 0,
        };

        if let Some(child_ids) = children.get(node.id.as_str()) {
            for child_id in child_ids {
                if !visited.insert((*child_id).to_string()) {
                    warn!(node = child_id, "serializer revisit skipped");
                    continue;
                }
                if let Some(child) = nodes.get(child_id) {
                    self.serialize_node(
                        child,
                        nodes,
                        children,
                        depth + 1,
                        next_bullet_depth,
                        visited,
                        output,
                    );
                }
            }
        }
    }
}

impl Default for MarkdownSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceSerializer for MarkdownSerializer {
    fn serialize(&self, nodes: &[Node], edges: &[Edge], frontmatter: &Frontmatter) -> String {
        let mut output = String::new();
        self.serialize_frontmatter(frontmatter, &mut output);

        let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
        let root = match nodes.iter().find(|n| n.kind.is_root()) {
            Some(root) => root,
            None => return output,
        };

        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for edge in edges {
            if !by_id.contains_key(edge.source.as_str()) || !by_id.contains_key(edge.target.as_str())
            {
                continue;
            }
            children
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }

        let mut visited = HashSet::new();
        visited.insert(root.id.clone());
        self.serialize_node(root, &by_id, &children, 0, 0, &mut visited, &mut output);
        output
    }
}
