//! Configuration errors.

use thiserror::Error;

/// Errors raised while registering hooks and rules.
///
/// Configuration errors are fatal to the call that caused them and are
/// never retried; a configuration that produced one should be considered
/// defective rather than partially applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A per-state slot (`name`, `on_enter`, `on_exit`) was set twice
    /// for the same declared state tag, possibly through separately
    /// obtained builder handles.
    #[error("state '{state}': {slot} already defined")]
    DuplicateStateSlot {
        /// Display name of the declared state tag.
        state: String,
        /// The slot that was set twice.
        slot: &'static str,
    },

    /// A slot was set twice on one event rule registration. `goto` and
    /// `stay` share a single slot: a rule decides the next state in at
    /// most one way.
    #[error("rule ({state}, {event}): {slot} already defined")]
    DuplicateRuleSlot {
        /// Display name of the declared state tag.
        state: String,
        /// Display name of the declared event tag.
        event: String,
        /// The slot that was set twice.
        slot: &'static str,
    },
}
