//! Registration of state hooks and event rules.
//!
//! Configuration is a separate phase: a [`Configurator`] collects
//! per-state lifecycle hooks and per-`(state, event)` rules through
//! fluent builder handles, then [`Configurator::freeze`] produces an
//! immutable [`RuleStore`] that executors share read-only.
//!
//! Hooks are unique per declared state tag; rules are additive, with one
//! independent entry per registration. Setting the same slot twice is a
//! [`ConfigError`].

mod configurator;
mod entry;
mod error;
mod store;

pub use configurator::{Configurator, EventConfigurator, StateConfigurator};
pub use entry::{EventRuleEntry, GotoFn, HookFn, StateHookEntry, TriggerFn, WhenFn};
pub use error::ConfigError;
pub use store::RuleStore;

pub(crate) use entry::TransitionEffect;
