//! Stable exit codes for `resume-tree` commands.

/// Command succeeded; every action in an apply batch was applied.
pub const OK: i32 = 0;
/// Command failed: bad workspace, config, document, or actions file.
pub const INVALID: i32 = 1;
/// `apply` finished but at least one action was not applied.
pub const PARTIAL: i32 = 2;
