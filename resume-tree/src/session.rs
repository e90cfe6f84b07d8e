//! Editing session: the current document, its undo history, and the id source
//! for new nodes.
//!
//! Every successful action becomes one history entry, so a batch of five
//! applied actions is undone one action at a time.

use serde_json::Value;
use tracing::{debug, info};

use crate::core::action::AgentAction;
use crate::core::batch::{BatchOutcome, Entry, raw_entries, run, typed_entries};
use crate::core::engine::{apply_action_with, check_depth};
use crate::core::error::ActionError;
use crate::core::history::{DEFAULT_HISTORY_LIMIT, History, HistoryEntry};
use crate::core::ids::{IdGenerator, UuidIds};
use crate::core::numbering::Numbering;
use crate::core::outline::{DEFAULT_TEXT_LIMIT, render_outline};
use crate::io::config::EditorConfig;
use crate::node::Node;

const INITIAL_DESCRIPTION: &str = "Open document";

pub struct EditorSession {
    history: History,
    ids: Box<dyn IdGenerator>,
    outline_text_limit: usize,
    /// Deepest nesting an edit may produce (0 = no limit).
    max_depth: usize,
}

impl EditorSession {
    /// Session with default limits and random UUID ids.
    ///
    /// History snapshots carry annotated addresses, so after undoing back to
    /// the start `tree()` equals `tree` with every `address` filled in.
    pub fn new(tree: Vec<Node>) -> Self {
        let mut session =
            Self::with_ids(tree, DEFAULT_HISTORY_LIMIT, Box::new(UuidIds::default()));
        session.max_depth = EditorConfig::default().max_depth;
        session
    }

    pub fn from_config(tree: Vec<Node>, config: &EditorConfig) -> Self {
        let mut session = Self::with_ids(
            tree,
            config.history_limit,
            Box::new(UuidIds::new(config.id_prefix.clone())),
        );
        session.outline_text_limit = config.outline_text_limit;
        session.max_depth = config.max_depth;
        session
    }

    pub fn with_ids(tree: Vec<Node>, history_limit: usize, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            history: History::with_limit(tree, INITIAL_DESCRIPTION, history_limit),
            ids,
            outline_text_limit: DEFAULT_TEXT_LIMIT,
            max_depth: 0,
        }
    }

    /// Reject edits that would nest deeper than `max_depth` (0 = no limit).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Apply one action against the current numbering and record it.
    pub fn dispatch(&mut self, action: &AgentAction) -> Result<&HistoryEntry, ActionError> {
        let current = self.history.current();
        let next = apply_action_with(&current.tree, &current.numbering, action, self.ids.as_mut())?;
        check_depth(&next, action.kind(), self.max_depth)?;
        let description = action.describe();
        debug!(%description, "recording history entry");
        Ok(self.history.push(next, description))
    }

    /// Apply typed actions in order; each success is its own history entry.
    pub fn dispatch_batch(&mut self, actions: &[AgentAction]) -> BatchOutcome {
        self.run_entries(typed_entries(actions))
    }

    /// Normalize and apply raw producer output.
    pub fn dispatch_raw_batch(&mut self, raw: &[Value]) -> BatchOutcome {
        self.run_entries(raw_entries(raw))
    }

    fn run_entries(&mut self, entries: Vec<Entry>) -> BatchOutcome {
        let start = self.history.current().tree.clone();
        let history = &mut self.history;
        let outcome = run(&start, entries, self.ids.as_mut(), self.max_depth, |step, tree| {
            history.push(tree.to_vec(), step.action.describe());
        });
        info!(
            applied = outcome.applied.len(),
            failed = outcome.failed.len(),
            history = self.history.len(),
            "batch dispatched"
        );
        outcome
    }

    /// Step back one edit and return the restored document.
    pub fn undo(&mut self) -> Option<&[Node]> {
        self.history.undo().map(|entry| entry.tree.as_slice())
    }

    /// Reapply the most recently undone edit.
    pub fn redo(&mut self) -> Option<&[Node]> {
        self.history.redo().map(|entry| entry.tree.as_slice())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn tree(&self) -> &[Node] {
        &self.history.current().tree
    }

    pub fn numbering(&self) -> &Numbering {
        &self.history.current().numbering
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn outline(&self) -> String {
        render_outline(self.tree(), self.numbering(), self.outline_text_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::SequentialIds;
    use crate::core::numbering::annotate_addresses;
    use crate::core::query::{count_nodes, max_depth};
    use crate::node::NodeDraft;
    use crate::test_support::{child_ids, sample_resume};
    use serde_json::json;

    fn session() -> EditorSession {
        EditorSession::with_ids(sample_resume(), 0, Box::new(SequentialIds::new("n")))
    }

    fn append(parent: &str, title: &str) -> AgentAction {
        AgentAction::AppendChild {
            parent: parent.to_string(),
            node: NodeDraft {
                title: Some(title.to_string()),
                ..NodeDraft::default()
            },
        }
    }

    #[test]
    fn dispatch_records_description_and_fresh_addresses() {
        let mut session = session();
        let entry = session.dispatch(&append("0", "Education")).expect("append");
        assert_eq!(entry.description, "Append \"Education\" at top level");
        assert_eq!(entry.numbering.resolve_address("3"), Some("n-1"));
        assert_eq!(session.tree()[3].address.as_deref(), Some("3"));
        assert!(session.can_undo());
    }

    #[test]
    fn failed_dispatch_leaves_history_alone() {
        let mut session = session();
        let err = session
            .dispatch(&AgentAction::Remove { id: "7".to_string() })
            .expect_err("missing");
        assert_eq!(err.address(), Some("7"));
        assert_eq!(session.history().len(), 1);
        assert!(!session.can_undo());
    }

    #[test]
    fn undo_and_redo_walk_the_history() {
        let mut session = session();
        let original = session.tree().to_vec();
        session.dispatch(&append("2", "Rust")).expect("append");
        let edited = session.tree().to_vec();

        assert_eq!(session.undo().expect("undo"), original.as_slice());
        assert_eq!(session.redo().expect("redo"), edited.as_slice());
        assert!(session.redo().is_none());
    }

    #[test]
    fn new_edit_after_undo_discards_redo() {
        let mut session = session();
        session.dispatch(&append("2", "Rust")).expect("append");
        session.undo();
        session
            .dispatch(&AgentAction::Remove { id: "2".to_string() })
            .expect("remove");
        assert!(!session.can_redo());
        assert_eq!(child_ids(session.tree(), None), vec!["header", "experience"]);
    }

    #[test]
    fn batch_pushes_one_entry_per_applied_action() {
        let mut session = session();
        let outcome = session.dispatch_raw_batch(&[
            json!({ "kind": "appendChild", "parent": "2", "title": "Rust" }),
            json!({ "kind": "remove", "id": "8" }),
            json!({ "kind": "appendChild", "parent": "2", "title": "SQL" }),
        ]);
        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(session.history().len(), 3);
        assert_eq!(child_ids(session.tree(), Some("skills")), vec!["n-1", "n-2"]);
        assert_eq!(child_ids(&outcome.tree, Some("skills")), vec!["n-1", "n-2"]);

        session.undo();
        assert_eq!(child_ids(session.tree(), Some("skills")), vec!["n-1"]);
        session.undo();
        assert_eq!(count_nodes(session.tree()), count_nodes(&sample_resume()));
    }

    #[test]
    fn undo_to_start_restores_the_annotated_input() {
        let mut session = session();
        session.dispatch(&append("0", "Education")).expect("append");
        session.dispatch(&AgentAction::Remove { id: "1".to_string() }).expect("remove");
        while session.undo().is_some() {}

        let mut expected = sample_resume();
        annotate_addresses(&mut expected);
        assert_eq!(session.tree(), expected.as_slice());
        assert_ne!(session.tree(), sample_resume().as_slice());
    }

    #[test]
    fn edits_past_the_depth_limit_are_refused() {
        let mut session = session().with_max_depth(3);
        let err = session
            .dispatch(&append("1.0.0", "Too deep"))
            .expect_err("depth");
        assert!(matches!(err, ActionError::Structural { .. }));
        assert!(err.to_string().contains("nesting exceeds the maximum depth of 3"));
        assert_eq!(session.history().len(), 1);

        let outcome = session.dispatch_batch(&[append("1.0.1", "Too deep"), append("2", "Rust")]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].index, 0);
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(session.history().len(), 2);
        assert_eq!(max_depth(session.tree()), 3);
    }

    #[test]
    fn config_supplies_the_depth_limit() {
        let config = EditorConfig {
            max_depth: 3,
            ..EditorConfig::default()
        };
        let mut session = EditorSession::from_config(sample_resume(), &config);
        session.dispatch(&append("1.0.0", "Too deep")).expect_err("depth");
        session.dispatch(&append("2", "Rust")).expect("second level");
    }

    #[test]
    fn outline_uses_current_numbering() {
        let mut session = session();
        session
            .dispatch(&AgentAction::Reorder {
                id: "0".to_string(),
                order: vec!["2".to_string()],
            })
            .expect("reorder");
        assert!(session.outline().starts_with("0 [heading] Skills\n"));
    }
}
