//! Stratum: a hierarchical state machine engine
//!
//! Stratum dispatches events over *hierarchies* of state and event
//! types. A rule or hook can be declared against a general tag and
//! still apply to every more specific one; when several rules apply,
//! the engine ranks them by how close their declared tags sit to the
//! runtime tags and lets the single closest transition decide the next
//! state, while every applicable trigger observes the event.
//!
//! # Core Concepts
//!
//! - **Tags and hierarchies**: state and event types are explicit
//!   [`Tag`]s in a [`Hierarchy`]; [`Ancestry`] measures derivation
//!   distance between them
//! - **Configuration**: a [`Configurator`] registers per-state
//!   enter/exit hooks and per-`(state, event)` rules, then freezes into
//!   a shared, immutable [`RuleStore`]
//! - **Dispatch**: an [`Executor`] owns the live context and current
//!   state, fires events synchronously, and journals every transition
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, OnceLock};
//! use stratum::{Ancestry, Configurator, Hierarchy, Tag, Tagged};
//!
//! struct Tags {
//!     door: Tag,
//!     open: Tag,
//!     closed: Tag,
//!     knock: Tag,
//!     states: Arc<Ancestry>,
//!     events: Arc<Ancestry>,
//! }
//!
//! fn tags() -> &'static Tags {
//!     static TAGS: OnceLock<Tags> = OnceLock::new();
//!     TAGS.get_or_init(|| {
//!         let mut states = Hierarchy::new();
//!         let door = states.add("Door", &[]);
//!         let open = states.add("Open", &[door]);
//!         let closed = states.add("Closed", &[door]);
//!         let mut events = Hierarchy::new();
//!         let knock = events.add("Knock", &[]);
//!         Tags {
//!             door,
//!             open,
//!             closed,
//!             knock,
//!             states: Arc::new(Ancestry::new(states)),
//!             events: Arc::new(Ancestry::new(events)),
//!         }
//!     })
//! }
//!
//! #[derive(Debug, PartialEq)]
//! enum Door {
//!     Open,
//!     Closed,
//! }
//!
//! impl Tagged for Door {
//!     fn tag(&self) -> Tag {
//!         match self {
//!             Self::Open => tags().open,
//!             Self::Closed => tags().closed,
//!         }
//!     }
//! }
//!
//! struct Knock;
//!
//! impl Tagged for Knock {
//!     fn tag(&self) -> Tag {
//!         tags().knock
//!     }
//! }
//!
//! // count every state entered through the shared Door hook
//! let mut config = Configurator::<u32, Door, Knock>::new(
//!     tags().states.clone(),
//!     tags().events.clone(),
//! );
//! config.state(tags().door).on_enter(|entered, _| *entered += 1)?;
//! config.event(tags().closed, tags().knock).goto(|_, _, _| Door::Open)?;
//!
//! let store = Arc::new(config.freeze());
//! let mut door = store.executor(0u32, Door::Closed)?;
//! door.fire(Knock)?;
//!
//! assert_eq!(door.current_state(), &Door::Open);
//! assert_eq!(*door.context(), 2); // entered Closed, then Open
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod hierarchy;
pub mod machine;

// Re-export commonly used types
pub use config::{
    ConfigError, Configurator, EventConfigurator, EventRuleEntry, RuleStore, StateConfigurator,
    StateHookEntry,
};
pub use hierarchy::{Ancestry, Hierarchy, Tag, Tagged};
pub use machine::{DispatchError, Executor, Journal, TransitionRecord};
