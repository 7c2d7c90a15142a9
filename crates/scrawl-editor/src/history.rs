//! Snapshot undo/redo history.
//!
//! A checkpoint is a deep copy of the whole scene taken *before* a mutating
//! gesture. Undo swaps the live scene with the newest checkpoint and parks
//! the live scene on the redo stack; redo is symmetric. Recording a new
//! checkpoint discards the redo branch.

use scrawl_core::model::Scene;
use std::collections::VecDeque;

pub struct History {
    undo_stack: VecDeque<Scene>,
    redo_stack: Vec<Scene>,
    /// Maximum undo depth. The oldest checkpoint is evicted past this.
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(max_depth + 1),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Snapshot `scene` as the state to return to on the next undo.
    pub fn record_checkpoint(&mut self, scene: &Scene) {
        self.undo_stack.push_back(scene.clone());
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        self.redo_stack.clear();
    }

    /// Restore the newest checkpoint into `scene`. Returns `false` (and
    /// leaves `scene` alone) if there is nothing to undo.
    pub fn undo(&mut self, scene: &mut Scene) -> bool {
        let Some(prev) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(std::mem::replace(scene, prev));
        true
    }

    pub fn redo(&mut self, scene: &mut Scene) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push_back(std::mem::replace(scene, next));
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
        true
    }

    /// Forget both stacks (a different document was opened).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
