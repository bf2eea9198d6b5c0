//! The live machine: event dispatch over a frozen rule store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use crate::config::{RuleStore, TransitionEffect};
use crate::hierarchy::{Tag, Tagged};
use crate::machine::error::DispatchError;
use crate::machine::journal::{Journal, TransitionRecord};
use crate::machine::ranking::{rank_hooks, rank_rules, RankedHook, RankedRule};

/// A live state machine bound to a frozen [`RuleStore`].
///
/// An executor owns the caller's context value and the current state
/// value; the state is replaced wholesale on every transition. Entry
/// hooks for the initial state run during construction.
///
/// Dispatching [`fire`](Self::fire) selects, among all rules applicable
/// to the runtime (state, event) tag pair, the transition closest to
/// the runtime tags; runs every applicable trigger from the most
/// general rule to the most specific; then either stays (loop) or runs
/// the exit chain, computes the next state, and runs the enter chain.
///
/// Applicability and ordering are pure functions of the frozen store
/// and the tag graphs, so each executor caches the ranked rule and hook
/// lists per runtime tag (pair) for its lifetime.
///
/// An executor is single-threaded: one event is fully processed before
/// the next begins, and no internal locking is provided. Several
/// executors may share one store, each with its own context, state and
/// caches.
pub struct Executor<C, S, E> {
    store: Arc<RuleStore<C, S, E>>,
    context: C,
    state: S,
    hook_cache: HashMap<Tag, Arc<[RankedHook]>>,
    rule_cache: HashMap<(Tag, Tag), Arc<[RankedRule]>>,
    journal: Journal,
}

impl<C, S, E> Executor<C, S, E>
where
    S: Tagged,
    E: Tagged,
{
    /// Bind a live machine to `store` and enter `initial`.
    ///
    /// Enter hooks for the initial state run before this returns, most
    /// general ancestor first.
    pub fn new(store: Arc<RuleStore<C, S, E>>, context: C, initial: S) -> Result<Self, DispatchError> {
        let mut executor = Self {
            store,
            context,
            state: initial,
            hook_cache: HashMap::new(),
            rule_cache: HashMap::new(),
            journal: Journal::new(),
        };
        executor.run_enter()?;
        Ok(executor)
    }

    /// The current state value.
    pub fn current_state(&self) -> &S {
        &self.state
    }

    /// The live context value.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Mutable access to the live context value.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// The journal of every successful dispatch so far.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Dispatch one event.
    ///
    /// Rules whose declared tags are ancestors of the runtime tags and
    /// whose predicate (if any) passes take part. Exactly one
    /// most-specific transition must emerge among them: none is
    /// [`DispatchError::NoTransition`], a tie at the top is
    /// [`DispatchError::AmbiguousTransition`]. Both are detected before
    /// any trigger runs, so a failed dispatch leaves context and state
    /// untouched.
    pub fn fire(&mut self, event: E) -> Result<(), DispatchError> {
        let state_tag = self.state.tag();
        let event_tag = event.tag();
        let ranked = self.ranked_rules(state_tag, event_tag)?;
        let store = Arc::clone(&self.store);
        let rules = store.rules();

        // applicable rules whose predicate passes, least specific first
        let passing: Vec<&RankedRule> = ranked
            .iter()
            .filter(|rank| match rules[rank.index].when() {
                Some(when) => when(&self.context, &self.state, &event),
                None => true,
            })
            .collect();

        // the most specific transition wins; a runner-up of equal rank
        // is a configuration bug
        let mut candidates = passing
            .iter()
            .rev()
            .filter_map(|rank| rules[rank.index].effect().map(|effect| (*rank, effect)));
        let Some((winner, effect)) = candidates.next() else {
            return Err(DispatchError::NoTransition {
                state: store.state_display(state_tag).to_string(),
                event: store.event_display(event_tag).to_string(),
            });
        };
        if let Some((runner_up, _)) = candidates.next() {
            if runner_up.key <= winner.key {
                return Err(DispatchError::AmbiguousTransition {
                    state: store.state_display(state_tag).to_string(),
                    event: store.event_display(event_tag).to_string(),
                });
            }
        }

        for rank in &passing {
            if let Some(trigger) = rules[rank.index].trigger() {
                trigger(&mut self.context, &self.state, &event);
            }
        }

        let rule_name = rules[winner.index].name().map(str::to_string);
        match effect {
            TransitionEffect::Stay => {
                let here = store.state_display(state_tag).to_string();
                self.journal.record(TransitionRecord {
                    from: here.clone(),
                    to: here,
                    event: store.event_display(event_tag).to_string(),
                    rule: rule_name,
                    looped: true,
                    at: Utc::now(),
                });
                Ok(())
            }
            TransitionEffect::Goto(next) => {
                self.run_exit()?;
                let next_state = next(&mut self.context, &self.state, &event);
                self.journal.record(TransitionRecord {
                    from: store.state_display(state_tag).to_string(),
                    to: store.state_display(next_state.tag()).to_string(),
                    event: store.event_display(event_tag).to_string(),
                    rule: rule_name,
                    looped: false,
                    at: Utc::now(),
                });
                self.state = next_state;
                self.run_enter()
            }
        }
    }

    /// Run enter hooks for the current state, most general ancestor
    /// first, down to the exact runtime tag.
    fn run_enter(&mut self) -> Result<(), DispatchError> {
        let tag = self.state.tag();
        let hooks = self.ranked_hooks(tag)?;
        for rank in hooks.iter() {
            if let Some(enter) = self.store.state_hooks()[rank.index].enter() {
                enter(&mut self.context, &self.state);
            }
        }
        Ok(())
    }

    /// Run exit hooks for the current state, exact runtime tag first,
    /// up to the most general ancestor.
    fn run_exit(&mut self) -> Result<(), DispatchError> {
        let tag = self.state.tag();
        let hooks = self.ranked_hooks(tag)?;
        for rank in hooks.iter().rev() {
            if let Some(exit) = self.store.state_hooks()[rank.index].exit() {
                exit(&mut self.context, &self.state);
            }
        }
        Ok(())
    }

    fn ranked_hooks(&mut self, state: Tag) -> Result<Arc<[RankedHook]>, DispatchError> {
        if let Some(cached) = self.hook_cache.get(&state) {
            return Ok(Arc::clone(cached));
        }
        let ranked = rank_hooks(self.store.state_hooks(), self.store.state_ancestry(), state)?;
        self.hook_cache.insert(state, Arc::clone(&ranked));
        Ok(ranked)
    }

    fn ranked_rules(&mut self, state: Tag, event: Tag) -> Result<Arc<[RankedRule]>, DispatchError> {
        if let Some(cached) = self.rule_cache.get(&(state, event)) {
            return Ok(Arc::clone(cached));
        }
        let ranked = rank_rules(
            self.store.rules(),
            self.store.state_ancestry(),
            self.store.event_ancestry(),
            state,
            event,
        )?;
        self.rule_cache.insert((state, event), Arc::clone(&ranked));
        Ok(ranked)
    }
}
