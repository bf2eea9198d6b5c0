//! The frozen rule store shared by executors.

use std::sync::Arc;

use crate::config::entry::{EventRuleEntry, StateHookEntry};
use crate::hierarchy::{Ancestry, Tag, Tagged};
use crate::machine::{DispatchError, Executor};

/// Immutable configuration produced by
/// [`Configurator::freeze`](crate::Configurator::freeze).
///
/// A store holds every registered state hook and event rule (in
/// registration order) together with the state and event ancestries, and
/// is shared read-only by any number of executors, typically behind an
/// `Arc`. Executors keep their own mutable context, state and ranking
/// caches; nothing in the store changes after freezing.
#[derive(Debug)]
pub struct RuleStore<C, S, E> {
    states: Arc<Ancestry>,
    events: Arc<Ancestry>,
    state_hooks: Vec<StateHookEntry<C, S>>,
    rules: Vec<EventRuleEntry<C, S, E>>,
}

impl<C, S, E> RuleStore<C, S, E> {
    pub(crate) fn new(
        states: Arc<Ancestry>,
        events: Arc<Ancestry>,
        state_hooks: Vec<StateHookEntry<C, S>>,
        rules: Vec<EventRuleEntry<C, S, E>>,
    ) -> Self {
        Self {
            states,
            events,
            state_hooks,
            rules,
        }
    }

    /// Registered state hook entries, one per declared tag.
    pub fn state_hooks(&self) -> &[StateHookEntry<C, S>] {
        &self.state_hooks
    }

    /// Registered event rules, in declaration order.
    pub fn rules(&self) -> &[EventRuleEntry<C, S, E>] {
        &self.rules
    }

    /// Ancestry of the state hierarchy.
    pub fn state_ancestry(&self) -> &Ancestry {
        &self.states
    }

    /// Ancestry of the event hierarchy.
    pub fn event_ancestry(&self) -> &Ancestry {
        &self.events
    }

    /// Display name for a state tag: the configured hook name when one
    /// was set, otherwise the hierarchy name.
    pub fn state_display(&self, tag: Tag) -> &str {
        self.state_hooks
            .iter()
            .find(|entry| entry.declared_tag() == tag)
            .and_then(|entry| entry.name())
            .unwrap_or_else(|| self.states.graph().name(tag))
    }

    /// Display name for an event tag. Rule names are per-registration,
    /// so this is always the hierarchy name.
    pub fn event_display(&self, tag: Tag) -> &str {
        self.events.graph().name(tag)
    }

    /// Bind a live machine to this store: entry hooks for the initial
    /// state run immediately.
    ///
    /// Takes one handle on the store; clone the `Arc` first to bind
    /// several executors to the same configuration.
    pub fn executor(self: Arc<Self>, context: C, initial: S) -> Result<Executor<C, S, E>, DispatchError>
    where
        S: Tagged,
        E: Tagged,
    {
        Executor::new(self, context, initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configurator;
    use crate::hierarchy::Hierarchy;

    fn store_with_named_state() -> (RuleStore<(), (), ()>, Tag, Tag) {
        let mut states = Hierarchy::new();
        let plain = states.add("Plain", &[]);
        let named = states.add("Named", &[]);
        let mut events = Hierarchy::new();
        let event = events.add("Event", &[]);

        let mut config = Configurator::new(
            Arc::new(Ancestry::new(states)),
            Arc::new(Ancestry::new(events)),
        );
        config.state(named).name("pretty").unwrap();
        config.event(plain, event).stay().unwrap();
        (config.freeze(), plain, named)
    }

    #[test]
    fn display_prefers_configured_name() {
        let (store, plain, named) = store_with_named_state();
        assert_eq!(store.state_display(named), "pretty");
        assert_eq!(store.state_display(plain), "Plain");
    }

    #[test]
    fn freeze_preserves_registration_order() {
        let (store, plain, _) = store_with_named_state();
        assert_eq!(store.state_hooks().len(), 1);
        assert_eq!(store.rules().len(), 1);
        assert_eq!(store.rules()[0].state_tag(), plain);
    }

    #[test]
    fn store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleStore<(), (), ()>>();
    }
}
