//! Deterministic, pure document logic.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! trees and return new values; every caller-owned tree is left untouched.

pub mod action;
pub mod batch;
pub mod engine;
pub mod error;
pub mod history;
pub mod ids;
pub mod invariants;
pub mod normalize;
pub mod numbering;
pub mod outline;
pub mod query;
pub mod validator;
