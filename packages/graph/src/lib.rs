//! # Whiteboard Graph
//!
//! Canonical node/edge state for the whiteboard editor.
//!
//! A document body is held as a flat node list plus "target is a child of
//! source" edges. Under normal operation the edges form an in-tree rooted at
//! the single `Root` node, but the graph is rebuilt from user-editable text,
//! so nothing in this crate trusts that shape: traversals are visited-set
//! guarded and validation is advisory rather than enforced.

pub mod error;
pub mod id;
pub mod model;
pub mod store;

pub use error::GraphError;
pub use id::{document_seed, IdGenerator};
pub use model::{BranchDirection, Edge, Handle, Node, NodeKind, Placement, Point, Size};
pub use store::GraphModel;
