//! Ranking of hooks and rules by hierarchy specificity.

use std::sync::Arc;

use crate::config::{EventRuleEntry, StateHookEntry};
use crate::hierarchy::{Ancestry, Tag};
use crate::machine::error::DispatchError;

/// Comparison key ordering rules from most to least specific.
///
/// Lexicographic: state distance, then event distance, then whether the
/// rule is a fallback (no validation predicate). Smaller keys are more
/// specific, so a predicate-bearing rule outranks a fallback at equal
/// distances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Specificity {
    pub state: u32,
    pub event: u32,
    pub fallback: bool,
}

/// A state hook entry positioned relative to a runtime state tag.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RankedHook {
    pub index: usize,
    pub distance: u32,
}

/// An event rule entry positioned relative to a runtime tag pair.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RankedRule {
    pub index: usize,
    pub key: Specificity,
}

fn unrelated(ancestry: &Ancestry, child: Tag, ancestor: Tag) -> DispatchError {
    DispatchError::UnrelatedTags {
        child: ancestry.graph().name(child).to_string(),
        ancestor: ancestry.graph().name(ancestor).to_string(),
    }
}

/// Hooks applicable to `state`, ordered from most general ancestor to
/// the exact tag. The sort is stable, so entries at one distance keep
/// registration order.
pub(crate) fn rank_hooks<C, S>(
    hooks: &[StateHookEntry<C, S>],
    ancestry: &Ancestry,
    state: Tag,
) -> Result<Arc<[RankedHook]>, DispatchError> {
    let mut ranked = Vec::new();
    for (index, entry) in hooks.iter().enumerate() {
        let declared = entry.declared_tag();
        if !ancestry.is_ancestor(state, declared) {
            continue;
        }
        let distance = ancestry
            .distance(state, declared)
            .ok_or_else(|| unrelated(ancestry, state, declared))?;
        ranked.push(RankedHook { index, distance });
    }
    ranked.sort_by(|a, b| b.distance.cmp(&a.distance));
    Ok(ranked.into())
}

/// Rules applicable to the `(state, event)` runtime pair, ordered least
/// specific first (descending key). The sort is stable, so rules with
/// equal keys keep declaration order.
pub(crate) fn rank_rules<C, S, E>(
    rules: &[EventRuleEntry<C, S, E>],
    states: &Ancestry,
    events: &Ancestry,
    state: Tag,
    event: Tag,
) -> Result<Arc<[RankedRule]>, DispatchError> {
    let mut ranked = Vec::new();
    for (index, entry) in rules.iter().enumerate() {
        if !states.is_ancestor(state, entry.state_tag())
            || !events.is_ancestor(event, entry.event_tag())
        {
            continue;
        }
        let state_distance = states
            .distance(state, entry.state_tag())
            .ok_or_else(|| unrelated(states, state, entry.state_tag()))?;
        let event_distance = events
            .distance(event, entry.event_tag())
            .ok_or_else(|| unrelated(events, event, entry.event_tag()))?;
        ranked.push(RankedRule {
            index,
            key: Specificity {
                state: state_distance,
                event: event_distance,
                fallback: entry.is_fallback(),
            },
        });
    }
    ranked.sort_by(|a, b| b.key.cmp(&a.key));
    Ok(ranked.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configurator;
    use crate::hierarchy::Hierarchy;

    #[test]
    fn specificity_orders_distances_lexicographically() {
        let closer = Specificity {
            state: 0,
            event: 1,
            fallback: false,
        };
        let farther = Specificity {
            state: 1,
            event: 0,
            fallback: false,
        };
        assert!(closer < farther);
    }

    #[test]
    fn fallback_ranks_below_predicate_at_equal_distance() {
        let with_predicate = Specificity {
            state: 0,
            event: 0,
            fallback: false,
        };
        let fallback = Specificity {
            state: 0,
            event: 0,
            fallback: true,
        };
        assert!(with_predicate < fallback);
    }

    struct Fixture {
        states: Arc<Ancestry>,
        events: Arc<Ancestry>,
        state_root: Tag,
        state_a: Tag,
        event_root: Tag,
        event_a: Tag,
    }

    fn fixture() -> Fixture {
        let mut states = Hierarchy::new();
        let state_root = states.add("State", &[]);
        let state_a = states.add("StateA", &[state_root]);
        let mut events = Hierarchy::new();
        let event_root = events.add("Event", &[]);
        let event_a = events.add("EventA", &[event_root]);
        Fixture {
            states: Arc::new(Ancestry::new(states)),
            events: Arc::new(Ancestry::new(events)),
            state_root,
            state_a,
            event_root,
            event_a,
        }
    }

    #[test]
    fn hooks_are_ordered_most_general_first() {
        let fx = fixture();
        let mut config =
            Configurator::<(), (), ()>::new(Arc::clone(&fx.states), Arc::clone(&fx.events));
        config.state(fx.state_a).on_enter(|_, _| ()).unwrap();
        config.state(fx.state_root).on_enter(|_, _| ()).unwrap();
        let store = config.freeze();

        let ranked = rank_hooks(store.state_hooks(), &fx.states, fx.state_a).unwrap();
        let order: Vec<_> = ranked.iter().map(|hook| hook.distance).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn hooks_for_unrelated_tags_are_filtered_out() {
        let fx = fixture();
        let mut config =
            Configurator::<(), (), ()>::new(Arc::clone(&fx.states), Arc::clone(&fx.events));
        config.state(fx.state_a).on_enter(|_, _| ()).unwrap();
        let store = config.freeze();

        // StateA derives from State, not the other way round.
        let ranked = rank_hooks(store.state_hooks(), &fx.states, fx.state_root).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn rules_are_ordered_least_specific_first() {
        let fx = fixture();
        let mut config =
            Configurator::<(), (), ()>::new(Arc::clone(&fx.states), Arc::clone(&fx.events));
        config.event(fx.state_a, fx.event_a).name("exact").unwrap();
        config
            .event(fx.state_root, fx.event_root)
            .name("general")
            .unwrap();
        config
            .event(fx.state_a, fx.event_root)
            .name("mixed")
            .unwrap();
        let store = config.freeze();

        let ranked = rank_rules(
            store.rules(),
            &fx.states,
            &fx.events,
            fx.state_a,
            fx.event_a,
        )
        .unwrap();
        let names: Vec<_> = ranked
            .iter()
            .map(|rule| store.rules()[rule.index].name().unwrap())
            .collect();
        assert_eq!(names, vec!["general", "mixed", "exact"]);
    }

    #[test]
    fn equal_keys_keep_declaration_order() {
        let fx = fixture();
        let mut config =
            Configurator::<(), (), ()>::new(Arc::clone(&fx.states), Arc::clone(&fx.events));
        config.event(fx.state_a, fx.event_a).name("first").unwrap();
        config.event(fx.state_a, fx.event_a).name("second").unwrap();
        config.event(fx.state_a, fx.event_a).name("third").unwrap();
        let store = config.freeze();

        let ranked = rank_rules(
            store.rules(),
            &fx.states,
            &fx.events,
            fx.state_a,
            fx.event_a,
        )
        .unwrap();
        let names: Vec<_> = ranked
            .iter()
            .map(|rule| store.rules()[rule.index].name().unwrap())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn predicate_bearing_rule_sorts_after_fallback() {
        let fx = fixture();
        let mut config =
            Configurator::<(), (), ()>::new(Arc::clone(&fx.states), Arc::clone(&fx.events));
        config
            .event(fx.state_a, fx.event_a)
            .name("guarded")
            .unwrap()
            .when(|_, _, _| true)
            .unwrap();
        config
            .event(fx.state_a, fx.event_a)
            .name("fallback")
            .unwrap();
        let store = config.freeze();

        let ranked = rank_rules(
            store.rules(),
            &fx.states,
            &fx.events,
            fx.state_a,
            fx.event_a,
        )
        .unwrap();
        let names: Vec<_> = ranked
            .iter()
            .map(|rule| store.rules()[rule.index].name().unwrap())
            .collect();
        // least specific first: the fallback comes before the guarded rule
        assert_eq!(names, vec!["fallback", "guarded"]);
    }
}
