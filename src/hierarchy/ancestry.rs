//! Derivation queries over a frozen hierarchy.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::graph::Hierarchy;
use super::tag::Tag;

/// Answers derivation questions over a frozen [`Hierarchy`].
///
/// An `Ancestry` takes ownership of the graph once configuration is done
/// and memoizes distance results. One instance is shared (behind an
/// `Arc`) by every rule store and executor built over the same graph, so
/// the memo table is guarded for concurrent readers; the graph itself is
/// immutable and needs no synchronization.
///
/// # Example
///
/// ```rust
/// use stratum::{Ancestry, Hierarchy};
///
/// let mut graph = Hierarchy::new();
/// let animal = graph.add("Animal", &[]);
/// let mammal = graph.add("Mammal", &[animal]);
/// let cat = graph.add("Cat", &[mammal]);
/// let rock = graph.add("Rock", &[]);
///
/// let ancestry = Ancestry::new(graph);
/// assert_eq!(ancestry.distance(cat, cat), Some(0));
/// assert_eq!(ancestry.distance(cat, animal), Some(2));
/// assert_eq!(ancestry.distance(cat, rock), None);
/// assert!(ancestry.is_ancestor(cat, mammal));
/// assert!(!ancestry.is_ancestor(mammal, cat));
/// ```
#[derive(Debug)]
pub struct Ancestry {
    graph: Hierarchy,
    distances: RwLock<HashMap<(Tag, Tag), Option<u32>>>,
}

impl Ancestry {
    /// Freeze `graph` and start answering queries over it.
    pub fn new(graph: Hierarchy) -> Self {
        Self {
            graph,
            distances: RwLock::new(HashMap::new()),
        }
    }

    /// The underlying tag graph.
    pub fn graph(&self) -> &Hierarchy {
        &self.graph
    }

    /// Whether `child` is `ancestor` or derives from it through any path.
    ///
    /// Cheaper than [`distance`](Self::distance); dispatch uses it as a
    /// pre-filter before measuring exact distances.
    pub fn is_ancestor(&self, child: Tag, ancestor: Tag) -> bool {
        child == ancestor
            || self
                .graph
                .parents(child)
                .iter()
                .any(|&parent| self.is_ancestor(parent, ancestor))
    }

    /// Minimum number of derivation edges from `child` up to `ancestor`.
    ///
    /// Returns `Some(0)` when the tags are equal and `None` when `child`
    /// does not derive from `ancestor` at all: unrelated tags are "not
    /// applicable", never infinitely far.
    ///
    /// With multiple ancestry the shortest path over all qualifying
    /// parents wins; see [`is_ancestor`](Self::is_ancestor) for the
    /// relation itself. Results are memoized per `(child, ancestor)`
    /// pair.
    pub fn distance(&self, child: Tag, ancestor: Tag) -> Option<u32> {
        if child == ancestor {
            return Some(0);
        }
        let key = (child, ancestor);
        if let Some(&cached) = self.read_memo().get(&key) {
            return cached;
        }
        let result = self.measure(child, ancestor);
        self.write_memo().insert(key, result);
        result
    }

    fn measure(&self, child: Tag, ancestor: Tag) -> Option<u32> {
        if !self.is_ancestor(child, ancestor) {
            return None;
        }
        self.qualifying_parents(child, ancestor)
            .into_iter()
            .filter_map(|parent| self.distance(parent, ancestor))
            .min()
            .map(|distance| distance + 1)
    }

    /// Immediate parents a derivation path towards `ancestor` may start
    /// with.
    ///
    /// A parent is skipped when a sibling parent derives from it: the
    /// more specific sibling reaches it anyway, and counting both would
    /// double the shared edge of a diamond.
    fn qualifying_parents(&self, child: Tag, ancestor: Tag) -> Vec<Tag> {
        let parents = self.graph.parents(child);
        parents
            .iter()
            .copied()
            .filter(|&parent| {
                self.is_ancestor(parent, ancestor)
                    && !parents
                        .iter()
                        .any(|&sibling| sibling != parent && self.is_ancestor(sibling, parent))
            })
            .collect()
    }

    fn read_memo(&self) -> std::sync::RwLockReadGuard<'_, HashMap<(Tag, Tag), Option<u32>>> {
        self.distances.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_memo(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<(Tag, Tag), Option<u32>>> {
        self.distances.write().unwrap_or_else(PoisonError::into_inner)
    }
}
