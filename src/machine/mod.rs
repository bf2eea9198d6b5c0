//! Event dispatch and the live machine.
//!
//! An [`Executor`] binds a frozen rule store to a context value and a
//! current state. Firing an event ranks the applicable rules by how
//! close their declared tags sit to the runtime tags, runs triggers in
//! ascending specificity, and lets the single most specific transition
//! decide the next state, with enter/exit hooks sequenced along the
//! state's ancestry. Every successful dispatch is appended to the
//! executor's [`Journal`].

mod error;
mod executor;
mod journal;
mod ranking;

pub use error::DispatchError;
pub use executor::Executor;
pub use journal::{Journal, TransitionRecord};
