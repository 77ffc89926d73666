//! Undo checkpoint journal

/// A single recorded undo checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub label: String,
}

/// Bounded record of undo checkpoints registered by the group controller.
///
/// Restoring state is the host's job; this only keeps the labels in the
/// order they were registered.
pub struct UndoJournal {
    checkpoints: Vec<Checkpoint>,
    max_depth: usize,
}

impl UndoJournal {
    pub fn new() -> Self {
        Self::with_max_depth(100)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            checkpoints: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a checkpoint, dropping the oldest one past the depth limit
    pub fn record(&mut self, label: impl Into<String>) {
        let label = label.into();
        log::debug!("undo checkpoint: {}", label);
        self.checkpoints.push(Checkpoint { label });
        if self.checkpoints.len() > self.max_depth {
            self.checkpoints.remove(0);
        }
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn last_label(&self) -> Option<&str> {
        self.checkpoints.last().map(|c| c.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn clear(&mut self) {
        self.checkpoints.clear();
    }
}

impl Default for UndoJournal {
    fn default() -> Self {
        Self::new()
    }
}
