//! Addressable resume document: node model, action engine, and undo history.
//!
//! A document is an ordered forest of [`node::Node`]s. Producers (a language
//! model, a drag-and-drop handler) refer to nodes by positional address
//! (`"1.0.2"`) and emit [`core::action::AgentAction`]s; the engine resolves
//! those addresses against a freshly computed numbering and returns a new
//! tree, leaving every earlier snapshot intact for undo.
//!
//! - **[`core`]**: Pure, deterministic logic (numbering, validation,
//!   normalization, the engine, batches, history). No I/O.
//! - **[`io`]**: Filesystem access for the `.resume/` workspace.
//!
//! [`session`] ties the engine to history; [`apply`] and [`validate`]
//! implement the CLI commands on top of it.

pub mod apply;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod node;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
