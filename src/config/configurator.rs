//! Fluent registration of state hooks and event rules.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::entry::{EventRuleEntry, StateHookEntry, TransitionEffect};
use crate::config::error::ConfigError;
use crate::config::store::RuleStore;
use crate::hierarchy::{Ancestry, Tag};

/// Collects state hooks and event rules, then freezes them into a
/// [`RuleStore`].
///
/// `state(tag)` always addresses the single entry for that declared tag
/// (two handles obtained for the same tag share it), while `event(state,
/// event)` creates a brand-new registration every time: rules are
/// additive, never merged.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use stratum::{Ancestry, Configurator, Hierarchy};
///
/// let mut states = Hierarchy::new();
/// let state = states.add("State", &[]);
/// let idle = states.add("Idle", &[state]);
/// let mut events = Hierarchy::new();
/// let tick = events.add("Tick", &[]);
///
/// let mut config = Configurator::<u32, (), ()>::new(
///     Arc::new(Ancestry::new(states)),
///     Arc::new(Ancestry::new(events)),
/// );
/// config.state(idle).name("idle")?.on_enter(|count, _| *count += 1)?;
/// config.event(idle, tick).stay()?;
///
/// let store = config.freeze();
/// assert_eq!(store.state_hooks().len(), 1);
/// assert_eq!(store.rules().len(), 1);
/// # Ok::<(), stratum::ConfigError>(())
/// ```
pub struct Configurator<C, S, E> {
    states: Arc<Ancestry>,
    events: Arc<Ancestry>,
    state_hooks: Vec<StateHookEntry<C, S>>,
    hook_index: HashMap<Tag, usize>,
    rules: Vec<EventRuleEntry<C, S, E>>,
}

impl<C, S, E> Configurator<C, S, E> {
    /// Start configuring against the given state and event hierarchies.
    pub fn new(states: Arc<Ancestry>, events: Arc<Ancestry>) -> Self {
        Self {
            states,
            events,
            state_hooks: Vec::new(),
            hook_index: HashMap::new(),
            rules: Vec::new(),
        }
    }

    /// Configure the lifecycle hooks of one declared state tag.
    ///
    /// The entry is created on first access and shared by every later
    /// handle for the same tag.
    pub fn state(&mut self, tag: Tag) -> StateConfigurator<'_, C, S, E> {
        let index = match self.hook_index.get(&tag).copied() {
            Some(index) => index,
            None => {
                let index = self.state_hooks.len();
                self.state_hooks.push(StateHookEntry::new(tag));
                self.hook_index.insert(tag, index);
                index
            }
        };
        StateConfigurator {
            owner: self,
            tag,
            index,
        }
    }

    /// Register a new rule for the `(state, event)` declared tag pair.
    pub fn event(&mut self, state: Tag, event: Tag) -> EventConfigurator<'_, C, S, E> {
        let index = self.rules.len();
        self.rules.push(EventRuleEntry::new(state, event));
        EventConfigurator { owner: self, index }
    }

    /// Freeze the collected configuration into an immutable [`RuleStore`].
    pub fn freeze(self) -> RuleStore<C, S, E> {
        RuleStore::new(self.states, self.events, self.state_hooks, self.rules)
    }
}

impl<C, S, E> std::fmt::Debug for Configurator<C, S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configurator")
            .field("state_hooks", &self.state_hooks)
            .field("rules", &self.rules)
            .finish()
    }
}

/// Builder handle for the hooks of one declared state tag.
///
/// Obtained from [`Configurator::state`]; every setter may be called at
/// most once for the declared tag, across all handles.
pub struct StateConfigurator<'a, C, S, E> {
    owner: &'a mut Configurator<C, S, E>,
    tag: Tag,
    index: usize,
}

impl<C, S, E> std::fmt::Debug for StateConfigurator<'_, C, S, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateConfigurator")
            .field("tag", &self.tag)
            .field("index", &self.index)
            .finish()
    }
}

impl<'a, C, S, E> StateConfigurator<'a, C, S, E> {
    fn duplicate(&self, slot: &'static str) -> ConfigError {
        ConfigError::DuplicateStateSlot {
            state: self.owner.states.graph().name(self.tag).to_string(),
            slot,
        }
    }

    /// Set the display name used in journal records and error messages.
    pub fn name(self, text: impl Into<String>) -> Result<Self, ConfigError> {
        if self.owner.state_hooks[self.index].name().is_some() {
            return Err(self.duplicate("name"));
        }
        *self.owner.state_hooks[self.index].name_slot() = Some(text.into());
        Ok(self)
    }

    /// Run `hook` whenever a state deriving from this tag is entered.
    pub fn on_enter<F>(self, hook: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut C, &S) + Send + Sync + 'static,
    {
        if self.owner.state_hooks[self.index].has_enter() {
            return Err(self.duplicate("on_enter"));
        }
        *self.owner.state_hooks[self.index].enter_slot() = Some(Box::new(hook));
        Ok(self)
    }

    /// Run `hook` whenever a state deriving from this tag is left.
    pub fn on_exit<F>(self, hook: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut C, &S) + Send + Sync + 'static,
    {
        if self.owner.state_hooks[self.index].has_exit() {
            return Err(self.duplicate("on_exit"));
        }
        *self.owner.state_hooks[self.index].exit_slot() = Some(Box::new(hook));
        Ok(self)
    }

    /// Chain into a fresh event rule declared on this state tag.
    pub fn on(self, event: Tag) -> EventConfigurator<'a, C, S, E> {
        let Self { owner, tag, .. } = self;
        owner.event(tag, event)
    }
}

/// Builder handle for one event rule registration.
///
/// Obtained from [`Configurator::event`] (or
/// [`StateConfigurator::on`]); every setter may be called at most once
/// on this particular registration. `goto` and `stay` share one slot.
pub struct EventConfigurator<'a, C, S, E> {
    owner: &'a mut Configurator<C, S, E>,
    index: usize,
}

impl<C, S, E> EventConfigurator<'_, C, S, E> {
    fn duplicate(&self, slot: &'static str) -> ConfigError {
        let entry = &self.owner.rules[self.index];
        ConfigError::DuplicateRuleSlot {
            state: self
                .owner
                .states
                .graph()
                .name(entry.state_tag())
                .to_string(),
            event: self
                .owner
                .events
                .graph()
                .name(entry.event_tag())
                .to_string(),
            slot,
        }
    }

    /// Set the display name recorded in the journal when this rule wins.
    pub fn name(self, text: impl Into<String>) -> Result<Self, ConfigError> {
        if self.owner.rules[self.index].name().is_some() {
            return Err(self.duplicate("name"));
        }
        *self.owner.rules[self.index].name_slot() = Some(text.into());
        Ok(self)
    }

    /// Guard this rule behind a predicate; rules without one always
    /// apply but rank below predicate-bearing rules at equal distances.
    pub fn when<F>(self, predicate: F) -> Result<Self, ConfigError>
    where
        F: Fn(&C, &S, &E) -> bool + Send + Sync + 'static,
    {
        if self.owner.rules[self.index].when().is_some() {
            return Err(self.duplicate("when"));
        }
        *self.owner.rules[self.index].when_slot() = Some(Box::new(predicate));
        Ok(self)
    }

    /// Run `action` whenever this rule applies to a dispatched event,
    /// whether or not the rule wins the transition.
    pub fn on_trigger<F>(self, action: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut C, &S, &E) + Send + Sync + 'static,
    {
        if self.owner.rules[self.index].trigger().is_some() {
            return Err(self.duplicate("on_trigger"));
        }
        *self.owner.rules[self.index].trigger_slot() = Some(Box::new(action));
        Ok(self)
    }

    /// Make this rule a transition: `next` computes the state the
    /// machine moves to when the rule wins.
    pub fn goto<F>(self, next: F) -> Result<Self, ConfigError>
    where
        F: Fn(&mut C, &S, &E) -> S + Send + Sync + 'static,
    {
        if self.owner.rules[self.index].is_transition() {
            return Err(self.duplicate("goto/stay"));
        }
        *self.owner.rules[self.index].effect_slot() = Some(TransitionEffect::Goto(Box::new(next)));
        Ok(self)
    }

    /// Make this rule a loop: the event is handled without leaving the
    /// state and without running any enter or exit hook.
    pub fn stay(self) -> Result<Self, ConfigError> {
        if self.owner.rules[self.index].is_transition() {
            return Err(self.duplicate("goto/stay"));
        }
        *self.owner.rules[self.index].effect_slot() = Some(TransitionEffect::Stay);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::Hierarchy;

    struct Fixture {
        state_a: Tag,
        event_a: Tag,
        config: Configurator<String, (), ()>,
    }

    fn fixture() -> Fixture {
        let mut states = Hierarchy::new();
        let state = states.add("State", &[]);
        let state_a = states.add("StateA", &[state]);
        let mut events = Hierarchy::new();
        let event = events.add("Event", &[]);
        let event_a = events.add("EventA", &[event]);
        Fixture {
            state_a,
            event_a,
            config: Configurator::new(
                Arc::new(Ancestry::new(states)),
                Arc::new(Ancestry::new(events)),
            ),
        }
    }

    #[test]
    fn state_slots_can_each_be_set_once() {
        let mut fx = fixture();
        fx.config
            .state(fx.state_a)
            .name("a")
            .unwrap()
            .on_enter(|_, _| ())
            .unwrap()
            .on_exit(|_, _| ())
            .unwrap();
    }

    #[test]
    fn duplicate_state_name_fails() {
        let mut fx = fixture();
        let result = fx.config.state(fx.state_a).name("x").unwrap().name("y");
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateStateSlot { slot: "name", .. })
        ));
    }

    #[test]
    fn duplicate_enter_fails_across_handles() {
        let mut fx = fixture();
        fx.config.state(fx.state_a).on_enter(|_, _| ()).unwrap();
        // a second handle for the same tag addresses the same entry
        let result = fx.config.state(fx.state_a).on_enter(|_, _| ());
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateStateSlot {
                slot: "on_enter",
                ..
            })
        ));
    }

    #[test]
    fn duplicate_exit_fails() {
        let mut fx = fixture();
        let result = fx
            .config
            .state(fx.state_a)
            .on_exit(|_, _| ())
            .unwrap()
            .on_exit(|_, _| ());
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateStateSlot { slot: "on_exit", .. })
        ));
    }

    #[test]
    fn error_message_names_the_state() {
        let mut fx = fixture();
        let error = fx
            .config
            .state(fx.state_a)
            .name("x")
            .unwrap()
            .name("y")
            .unwrap_err();
        assert_eq!(error.to_string(), "state 'StateA': name already defined");
    }

    #[test]
    fn event_registrations_are_additive() {
        let mut fx = fixture();
        fx.config
            .event(fx.state_a, fx.event_a)
            .name("first")
            .unwrap();
        fx.config
            .event(fx.state_a, fx.event_a)
            .name("second")
            .unwrap();

        let store = fx.config.freeze();
        let names: Vec<_> = store.rules().iter().map(|rule| rule.name()).collect();
        assert_eq!(names, vec![Some("first"), Some("second")]);
    }

    #[test]
    fn goto_after_stay_fails() {
        let mut fx = fixture();
        let result = fx
            .config
            .event(fx.state_a, fx.event_a)
            .stay()
            .unwrap()
            .goto(|_, _, _| ());
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateRuleSlot {
                slot: "goto/stay",
                ..
            })
        ));
    }

    #[test]
    fn stay_after_goto_fails() {
        let mut fx = fixture();
        let result = fx
            .config
            .event(fx.state_a, fx.event_a)
            .goto(|_, _, _| ())
            .unwrap()
            .stay();
        assert!(matches!(result, Err(ConfigError::DuplicateRuleSlot { .. })));
    }

    #[test]
    fn duplicate_when_and_trigger_fail() {
        let mut fx = fixture();
        let result = fx
            .config
            .event(fx.state_a, fx.event_a)
            .when(|_, _, _| true)
            .unwrap()
            .when(|_, _, _| false);
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateRuleSlot { slot: "when", .. })
        ));

        let result = fx
            .config
            .event(fx.state_a, fx.event_a)
            .on_trigger(|_, _, _| ())
            .unwrap()
            .on_trigger(|_, _, _| ());
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateRuleSlot {
                slot: "on_trigger",
                ..
            })
        ));
    }

    #[test]
    fn state_handle_chains_into_event_rule() {
        let mut fx = fixture();
        fx.config
            .state(fx.state_a)
            .name("a")
            .unwrap()
            .on(fx.event_a)
            .stay()
            .unwrap();

        let store = fx.config.freeze();
        assert_eq!(store.rules().len(), 1);
        assert_eq!(store.rules()[0].state_tag(), fx.state_a);
        assert_eq!(store.rules()[0].event_tag(), fx.event_a);
        assert!(store.rules()[0].is_loop());
    }
}
