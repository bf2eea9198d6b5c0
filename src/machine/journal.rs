//! Transition journal kept by each executor.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One successfully dispatched transition.
///
/// Records carry display names rather than live values, so they stay
/// plain serializable data a host can export (for example as JSON) no
/// matter what the context and state types are.
#[derive(Clone, Debug, Serialize)]
pub struct TransitionRecord {
    /// Display name of the state the machine left.
    pub from: String,
    /// Display name of the state the machine entered. Equals `from` for
    /// a loop.
    pub to: String,
    /// Display name of the event that was dispatched.
    pub event: String,
    /// Name of the winning rule, when one was configured.
    pub rule: Option<String>,
    /// Whether the machine stayed in place (no enter/exit hooks ran).
    pub looped: bool,
    /// When the transition was dispatched.
    pub at: DateTime<Utc>,
}

/// Ordered log of every successful dispatch of one executor.
///
/// Failed dispatches append nothing. The journal lives and dies with
/// its executor; it is observability data, not recoverable state.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Journal {
    records: Vec<TransitionRecord>,
}

impl Journal {
    pub(crate) fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, record: TransitionRecord) {
        self.records.push(record);
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been dispatched yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record, if any.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.last()
    }

    /// The sequence of visited state names: where the machine started,
    /// followed by where each record took it.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            path.push(first.from.as_str());
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }
}
