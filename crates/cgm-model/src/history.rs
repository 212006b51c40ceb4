//! Snapshot-based undo/redo history

use std::collections::VecDeque;

use crate::cgm::LoadedCgm;

/// Model state captured before an edit
#[derive(Debug, Clone)]
pub struct Checkpoint {
    /// Description of the edit that followed this checkpoint
    pub description: String,
    pub cgm: LoadedCgm,
}

/// Bounded undo/redo stacks of whole-model checkpoints
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Checkpoint>,
    redo_stack: VecDeque<Checkpoint>,
    events: Vec<String>,
    max_depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_HISTORY_DEPTH)
    }
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_depth),
            redo_stack: VecDeque::new(),
            events: Vec::new(),
            max_depth,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Record the state before an edit. Clears the redo stack.
    pub fn record(&mut self, description: impl Into<String>, before: LoadedCgm) {
        let description = description.into();
        tracing::info!("Edit: {}", description);
        self.events.push(description.clone());
        push_bounded(
            &mut self.undo_stack,
            Checkpoint {
                description,
                cgm: before,
            },
            self.max_depth,
        );
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Restore the most recent checkpoint into `current`.
    ///
    /// Returns the description of the undone edit, or None if there is
    /// nothing to undo.
    pub fn undo(&mut self, current: &mut LoadedCgm) -> Option<String> {
        let checkpoint = self.undo_stack.pop_back()?;
        let description = checkpoint.description.clone();
        let after = std::mem::replace(current, checkpoint.cgm);
        push_bounded(
            &mut self.redo_stack,
            Checkpoint {
                description: checkpoint.description,
                cgm: after,
            },
            self.max_depth,
        );
        tracing::info!("Undo: {}", description);
        Some(description)
    }

    /// Reapply the most recently undone edit into `current`
    pub fn redo(&mut self, current: &mut LoadedCgm) -> Option<String> {
        let checkpoint = self.redo_stack.pop_back()?;
        let description = checkpoint.description.clone();
        let before = std::mem::replace(current, checkpoint.cgm);
        push_bounded(
            &mut self.undo_stack,
            Checkpoint {
                description: checkpoint.description,
                cgm: before,
            },
            self.max_depth,
        );
        tracing::info!("Redo: {}", description);
        Some(description)
    }

    /// Descriptions of every edit recorded since the last load, oldest first.
    ///
    /// This is a session log. Unlike the undo and redo stacks it is not
    /// bounded by `max_depth` and only [`History::clear`] empties it.
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Description of the edit the next undo would revert
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.description.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.events.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<Checkpoint>, checkpoint: Checkpoint, max_depth: usize) {
    if max_depth == 0 {
        return;
    }
    while stack.len() >= max_depth {
        stack.pop_front();
    }
    stack.push_back(checkpoint);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> LoadedCgm {
        LoadedCgm::new(name, cgm_core::Scene::new("root"))
    }

    fn name_of(cgm: &LoadedCgm) -> &str {
        cgm.name().unwrap_or_default()
    }

    #[test]
    fn test_empty_history_cannot_undo_or_redo() {
        let mut history = History::new(10);
        let mut current = named("a");
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo(&mut current).is_none());
        assert_eq!(name_of(&current), "a");
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::new(10);
        history.record("rename", named("before"));
        let mut current = named("after");

        assert_eq!(history.undo(&mut current).as_deref(), Some("rename"));
        assert_eq!(name_of(&current), "before");
        assert!(history.can_redo());

        assert_eq!(history.redo(&mut current).as_deref(), Some("rename"));
        assert_eq!(name_of(&current), "after");
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_record_clears_redo() {
        let mut history = History::new(10);
        history.record("first", named("a"));
        let mut current = named("b");
        history.undo(&mut current);
        assert!(history.can_redo());

        history.record("second", named("a"));
        assert!(!history.can_redo());
        assert_eq!(history.events(), ["first", "second"]);
    }

    #[test]
    fn test_respects_max_depth() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.record(format!("edit {i}"), named(&i.to_string()));
        }
        let mut current = named("now");
        let mut undone = Vec::new();
        while let Some(description) = history.undo(&mut current) {
            undone.push(description);
        }
        assert_eq!(undone, ["edit 4", "edit 3", "edit 2"]);
        assert_eq!(name_of(&current), "2");
    }

    #[test]
    fn test_event_log_outlives_depth_until_clear() {
        let mut history = History::new(2);
        for i in 0..4 {
            history.record(format!("edit {i}"), named(&i.to_string()));
        }
        assert_eq!(history.events().len(), 4);
        assert_eq!(history.events()[0], "edit 0");

        history.clear();
        assert!(history.events().is_empty());
        assert!(!history.can_undo());
    }
}
