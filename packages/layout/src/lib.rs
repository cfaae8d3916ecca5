//! # Whiteboard Layout
//!
//! Pure mindmap layout for the whiteboard graph: the root sits centered
//! between a left-growing and a right-growing half, children stack under
//! their ancestor without overlap, and every run is deterministic for a given
//! graph. The engine is referentially transparent — it reads a `GraphModel`
//! and returns a positioned copy; the editor decides what to do with it.

pub mod config;
pub mod engine;

pub use config::LayoutConfig;
pub use engine::{compute, Layout};
