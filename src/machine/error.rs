//! Dispatch errors.

use thiserror::Error;

/// Errors raised while dispatching an event or constructing an executor.
///
/// Dispatch errors abort the failing call and leave the machine's
/// current state untouched; the caller may keep using the executor.
/// They are never retried internally and the engine does no logging of
/// its own; reporting is the host application's responsibility.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No applicable rule carries a transition for the fired event in
    /// the current state: the event is unhandled.
    #[error("unexpected event '{event}' in state '{state}': no transition defined")]
    NoTransition {
        /// Display name of the current state's runtime tag.
        state: String,
        /// Display name of the fired event's runtime tag.
        event: String,
    },

    /// Two or more transition-carrying rules tie at the top specificity
    /// rank. This is a configuration defect surfaced at dispatch time:
    /// at most one most-specific transition is tolerated.
    #[error("ambiguous event '{event}' in state '{state}': conflicting transitions at equal specificity")]
    AmbiguousTransition {
        /// Display name of the current state's runtime tag.
        state: String,
        /// Display name of the fired event's runtime tag.
        event: String,
    },

    /// A distance was requested between unrelated tags. The ancestor
    /// pre-filter makes this unreachable for a validated configuration;
    /// it is propagated rather than panicked on.
    #[error("'{child}' does not derive from '{ancestor}'")]
    UnrelatedTags {
        /// Display name of the runtime tag.
        child: String,
        /// Display name of the declared tag it was measured against.
        ancestor: String,
    },
}
