//! Identifier generation for newly created nodes.

use uuid::Uuid;

/// Source of fresh node ids.
///
/// The engine re-draws when a generated id already exists in the tree, so
/// implementations only need to be unlikely to repeat, not collision-proof.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUID ids, optionally prefixed (`node-6f1c...`).
#[derive(Debug, Clone)]
pub struct UuidIds {
    prefix: String,
}

impl UuidIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for UuidIds {
    fn default() -> Self {
        Self::new("node")
    }
}

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        let id = Uuid::new_v4().simple().to_string();
        if self.prefix.is_empty() {
            id
        } else {
            format!("{}-{}", self.prefix, id)
        }
    }
}

/// Deterministic `{seed}-{n}` ids for reproducible runs and tests.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    seed: String,
    count: u32,
}

impl SequentialIds {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }
}
