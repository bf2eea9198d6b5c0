//! Registered hook and rule entries.

use std::fmt;

use crate::hierarchy::Tag;

/// Enter or exit hook: observes the live context and the current state.
pub type HookFn<C, S> = Box<dyn Fn(&mut C, &S) + Send + Sync>;

/// Validation predicate: a read-only look at context, state and event.
pub type WhenFn<C, S, E> = Box<dyn Fn(&C, &S, &E) -> bool + Send + Sync>;

/// Trigger: a side effect observing a dispatched event.
pub type TriggerFn<C, S, E> = Box<dyn Fn(&mut C, &S, &E) + Send + Sync>;

/// Transition: computes the next state from context, state and event.
pub type GotoFn<C, S, E> = Box<dyn Fn(&mut C, &S, &E) -> S + Send + Sync>;

/// What a rule decides about the next state, once it wins dispatch.
pub(crate) enum TransitionEffect<C, S, E> {
    /// Compute a new state; exit and enter chains run around it.
    Goto(GotoFn<C, S, E>),
    /// Handle the event without leaving the state; no hooks run.
    Stay,
}

/// Lifecycle hooks registered for one declared state tag.
///
/// At most one entry exists per declared tag, and each of its slots
/// (name, enter, exit) can be filled once.
pub struct StateHookEntry<C, S> {
    tag: Tag,
    name: Option<String>,
    enter: Option<HookFn<C, S>>,
    exit: Option<HookFn<C, S>>,
}

impl<C, S> StateHookEntry<C, S> {
    pub(crate) fn new(tag: Tag) -> Self {
        Self {
            tag,
            name: None,
            enter: None,
            exit: None,
        }
    }

    /// The state tag this entry was registered against.
    pub fn declared_tag(&self) -> Tag {
        self.tag
    }

    /// Configured display name, when one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether an enter hook is present.
    pub fn has_enter(&self) -> bool {
        self.enter.is_some()
    }

    /// Whether an exit hook is present.
    pub fn has_exit(&self) -> bool {
        self.exit.is_some()
    }

    pub(crate) fn enter(&self) -> Option<&HookFn<C, S>> {
        self.enter.as_ref()
    }

    pub(crate) fn exit(&self) -> Option<&HookFn<C, S>> {
        self.exit.as_ref()
    }

    pub(crate) fn name_slot(&mut self) -> &mut Option<String> {
        &mut self.name
    }

    pub(crate) fn enter_slot(&mut self) -> &mut Option<HookFn<C, S>> {
        &mut self.enter
    }

    pub(crate) fn exit_slot(&mut self) -> &mut Option<HookFn<C, S>> {
        &mut self.exit
    }
}

impl<C, S> fmt::Debug for StateHookEntry<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHookEntry")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .field("enter", &self.enter.is_some())
            .field("exit", &self.exit.is_some())
            .finish()
    }
}

/// One `(state, event)` rule registration.
///
/// Registrations are additive: configuring the same `(state, event)`
/// pair again produces a fresh, independent entry, and declaration order
/// is preserved through dispatch.
pub struct EventRuleEntry<C, S, E> {
    state: Tag,
    event: Tag,
    name: Option<String>,
    when: Option<WhenFn<C, S, E>>,
    trigger: Option<TriggerFn<C, S, E>>,
    effect: Option<TransitionEffect<C, S, E>>,
}

impl<C, S, E> EventRuleEntry<C, S, E> {
    pub(crate) fn new(state: Tag, event: Tag) -> Self {
        Self {
            state,
            event,
            name: None,
            when: None,
            trigger: None,
            effect: None,
        }
    }

    /// The state tag this rule was declared for.
    pub fn state_tag(&self) -> Tag {
        self.state
    }

    /// The event tag this rule was declared for.
    pub fn event_tag(&self) -> Tag {
        self.event
    }

    /// Configured display name, when one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// A rule with no validation predicate always applies; at equal
    /// hierarchy distances it ranks below predicate-bearing rules.
    pub fn is_fallback(&self) -> bool {
        self.when.is_none()
    }

    /// Whether this rule can decide the next state (`goto` or `stay`).
    pub fn is_transition(&self) -> bool {
        self.effect.is_some()
    }

    /// Whether this rule keeps the machine in its current state.
    pub fn is_loop(&self) -> bool {
        matches!(self.effect, Some(TransitionEffect::Stay))
    }

    pub(crate) fn when(&self) -> Option<&WhenFn<C, S, E>> {
        self.when.as_ref()
    }

    pub(crate) fn trigger(&self) -> Option<&TriggerFn<C, S, E>> {
        self.trigger.as_ref()
    }

    pub(crate) fn effect(&self) -> Option<&TransitionEffect<C, S, E>> {
        self.effect.as_ref()
    }

    pub(crate) fn name_slot(&mut self) -> &mut Option<String> {
        &mut self.name
    }

    pub(crate) fn when_slot(&mut self) -> &mut Option<WhenFn<C, S, E>> {
        &mut self.when
    }

    pub(crate) fn trigger_slot(&mut self) -> &mut Option<TriggerFn<C, S, E>> {
        &mut self.trigger
    }

    pub(crate) fn effect_slot(&mut self) -> &mut Option<TransitionEffect<C, S, E>> {
        &mut self.effect
    }
}

impl<C, S, E> fmt::Debug for EventRuleEntry<C, S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRuleEntry")
            .field("state", &self.state)
            .field("event", &self.event)
            .field("name", &self.name)
            .field("when", &self.when.is_some())
            .field("trigger", &self.trigger.is_some())
            .field("transition", &self.is_transition())
            .field("loop", &self.is_loop())
            .finish()
    }
}
