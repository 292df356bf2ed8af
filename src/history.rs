//! The history manager: commits, batched edits, and time travel.

use crate::records::Group;
use crate::snapshot::{Snapshot, Step};
use crate::types::Target;
use tracing::{debug, trace};

/// Direction of a time-travel move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Backward,
    Forward,
}

/// Memento-based undo/redo manager.
///
/// Callers mutate entities directly through the record framework's normal
/// setters; the manager only observes before/after state via explicit
/// [`save`](History::save), [`begin`](History::begin) and
/// [`end`](History::end) calls. Each manager instance is independent --
/// any number of them can track disjoint (or overlapping) sets of records
/// without interfering.
///
/// All operations run to completion synchronously; invalid calls (undo on
/// an empty stack, end without begin, ...) are defined no-ops.
#[derive(Debug, Default)]
pub struct History {
    /// The step matching the records' state at the last commit point.
    current: Option<Step>,

    /// Older committed steps, bottom = oldest.
    undo_stack: Vec<Step>,

    /// Undone steps awaiting redo, bottom = oldest.
    redo_stack: Vec<Step>,

    /// Baseline captured by `begin`, pending until `end`.
    previous: Option<Step>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit the operand's current state.
    ///
    /// The previously committed step moves onto the undo stack and redo
    /// history is discarded. An empty list operand still runs the full
    /// commit protocol with an empty step, matching the original
    /// engine's observable behavior.
    pub fn save(&mut self, target: impl Into<Target>) {
        let target = target.into();
        let step = Step::capture(&target);
        debug!(snapshots = step.len(), "save");
        self.store(step);
    }

    /// Commit an already-captured step. Wipes the redo stack.
    pub fn store(&mut self, step: Step) {
        if let Some(current) = self.current.take() {
            self.undo_stack.push(current);
        }
        self.current = Some(step);
        self.redo_stack.clear();
    }

    /// Capture a baseline for a batch of edits.
    ///
    /// The baseline is not pushed anywhere yet; [`end`](History::end)
    /// decides whether anything actually changed. An empty operand is
    /// ignored, and calling `begin` again replaces an unfinished
    /// baseline.
    pub fn begin(&mut self, target: impl Into<Target>) {
        let target = target.into();
        if target.is_empty() {
            return;
        }

        let baseline = Step::capture(&target);
        debug!(snapshots = baseline.len(), "begin");
        self.previous = Some(baseline);
    }

    /// Close the batch opened by [`begin`](History::begin).
    ///
    /// Baseline snapshots whose records did not change are dropped. If
    /// nothing changed, the whole batch is discarded and history is left
    /// untouched -- no commit, no redo wipe. Otherwise the changed
    /// baseline snapshots are folded into the current step and the
    /// records' post-edit state is committed, so N mutations inside one
    /// bracket collapse into exactly one undoable step.
    pub fn end(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };

        let changed: Vec<Snapshot> = previous.into_iter().filter(Snapshot::is_dirty).collect();
        if changed.is_empty() {
            trace!("end: no effective changes, discarding baseline");
            return;
        }

        // Post-edit state of the changed records, captured before the
        // baseline snapshots move into `current`.
        let fresh: Step = changed.iter().filter_map(Snapshot::recapture).collect();

        debug!(changed = changed.len(), "end");
        self.current.get_or_insert_with(Step::new).extend(changed);
        self.store(fresh);
    }

    /// Revert the most recent commit. Returns `false` if there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        self.time_travel(Direction::Backward)
    }

    /// Reapply the most recently undone commit. Returns `false` if there
    /// is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.time_travel(Direction::Forward)
    }

    fn time_travel(&mut self, direction: Direction) -> bool {
        let step = match direction {
            Direction::Backward => self.undo_stack.pop(),
            Direction::Forward => self.redo_stack.pop(),
        };
        let Some(step) = step else {
            return false;
        };

        if let Some(current) = self.current.take() {
            match direction {
                Direction::Backward => self.redo_stack.push(current),
                Direction::Forward => self.undo_stack.push(current),
            }
        }

        let mut restored_groups = Vec::new();
        for snapshot in step.iter() {
            snapshot.restore();

            // A whole-group restore may have re-created members; entity
            // snapshots elsewhere in history must be repointed.
            if let Some(group) = snapshot.group_target() {
                restored_groups.push(group);
            }
        }
        self.current = Some(step);

        for group in &restored_groups {
            self.reconcile(group);
        }

        debug!(?direction, "time travel");
        true
    }

    /// Repoint every stored entity snapshot whose identifier has a live
    /// member in `group`.
    ///
    /// O(stored snapshots x group size); history depth is expected to stay
    /// small in interactive sessions, so correctness wins over cost here.
    pub fn reconcile(&mut self, group: &Group) {
        trace!(members = group.len(), "reconcile");
        for step in self.undo_stack.iter_mut().chain(self.redo_stack.iter_mut()) {
            for snapshot in step.iter_mut() {
                snapshot.reference(group);
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop both history stacks. The current step is kept, so the next
    /// commit still has a predecessor to push.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// The step matching the tracked records' state at the last commit
    /// point.
    pub fn current(&self) -> Option<&Step> {
        self.current.as_ref()
    }

    pub fn undo_stack(&self) -> &[Step] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Step] {
        &self.redo_stack
    }

    /// Whether a `begin`/`end` bracket is open.
    pub fn is_tracking(&self) -> bool {
        self.previous.is_some()
    }
}
