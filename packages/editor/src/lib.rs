//! # Whiteboard Editor
//!
//! Mutation front-end for the whiteboard graph.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host UI / text editor                       │
//! └─────────────────────────────────────────────┘
//!                     ↓ commands        ↑ text
//! ┌─────────────────────────────────────────────┐
//! │ editor: CommandBus + History + SyncBridge   │
//! │  - execute/undo/redo with bool results      │
//! │  - layout + text sync after every mutation  │
//! │  - wholesale graph replacement from text    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ layout: graph → positioned graph (pure)     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core principles
//!
//! 1. **The graph is the source of truth**: text and positions are derived
//!    views, recomputed after every successful mutation.
//! 2. **All mutation is message-passed**: hosts construct [`Command`] values
//!    and hand them to the bus; nothing else writes to the graph.
//! 3. **Failures are absorbed**: invalid targets, no-ops and history
//!    underflow all surface as `false`, never as exceptions.
//! 4. **Undo stores deltas**: each history entry carries just enough to
//!    invert itself, not a graph snapshot.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use whiteboard_editor::{BoardState, Command, CommandBus, MarkdownSerializer, SyncBridge};
//! use whiteboard_graph::{IdGenerator, NodeKind};
//!
//! let bridge = SyncBridge::new(Box::new(MarkdownSerializer::new()), Box::new(host_parser));
//! let mut board = BoardState::from_text(&source, bridge);
//! let mut bus = CommandBus::new(IdGenerator::new("/posts/intro.md"));
//!
//! let added = bus.execute(
//!     Command::AddChild {
//!         parent_id: root_id,
//!         kind: NodeKind::TextItem,
//!         label: "New point".to_string(),
//!     },
//!     &mut board,
//! );
//! assert!(added);
//!
//! bus.undo(&mut board);
//! bus.redo(&mut board);
//! ```

mod board;
mod bus;
mod commands;
mod errors;
mod history;
mod serializer;
mod sync;

pub use board::BoardState;
pub use bus::{CommandBus, EditContext};
pub use commands::{AppliedCommand, Command};
pub use errors::CommandError;
pub use history::{History, DEFAULT_HISTORY_CAPACITY};
pub use serializer::MarkdownSerializer;
pub use sync::{Frontmatter, ParsedDocument, SourceParser, SourceSerializer, SyncBridge};

// Re-export the building blocks hosts need alongside the editor
pub use whiteboard_graph::{
    BranchDirection, Edge, GraphModel, Handle, IdGenerator, Node, NodeKind, Placement, Point,
    Size,
};
pub use whiteboard_layout::LayoutConfig;
