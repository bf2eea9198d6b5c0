//! The declared type graph for states or events.

use super::tag::Tag;

/// Append-only registry of type tags and their declared parents.
///
/// A `Hierarchy` plays the role a host language's inheritance tree would:
/// each tag names a state or event type and lists the tags it directly
/// derives from. A tag may declare several parents (interface-style
/// multiple ancestry). Parents must already exist when a child is added,
/// so the graph is acyclic by construction.
///
/// # Example
///
/// ```rust
/// use stratum::Hierarchy;
///
/// let mut states = Hierarchy::new();
/// let state = states.add("State", &[]);
/// let state_a = states.add("StateA", &[state]);
///
/// assert_eq!(states.name(state_a), "StateA");
/// assert_eq!(states.parents(state_a), &[state]);
/// assert_eq!(states.parents(state), &[]);
/// assert_eq!(states.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Hierarchy {
    tags: Vec<TagInfo>,
}

#[derive(Debug)]
struct TagInfo {
    name: String,
    parents: Vec<Tag>,
}

impl Hierarchy {
    /// Create an empty hierarchy.
    pub fn new() -> Self {
        Self { tags: Vec::new() }
    }

    /// Register a new tag deriving from `parents`.
    ///
    /// Root tags pass an empty parent list. Parent order is preserved and
    /// visible through [`parents`](Self::parents).
    ///
    /// # Panics
    ///
    /// Panics if a parent tag was not allocated by this hierarchy.
    pub fn add(&mut self, name: impl Into<String>, parents: &[Tag]) -> Tag {
        for parent in parents {
            assert!(
                parent.index() < self.tags.len(),
                "parent tag does not belong to this hierarchy"
            );
        }
        let tag = Tag(self.tags.len() as u32);
        self.tags.push(TagInfo {
            name: name.into(),
            parents: parents.to_vec(),
        });
        tag
    }

    /// Display name the tag was registered with.
    pub fn name(&self, tag: Tag) -> &str {
        &self.tags[tag.index()].name
    }

    /// Declared immediate parents of `tag`, in declaration order.
    pub fn parents(&self, tag: Tag) -> &[Tag] {
        &self.tags[tag.index()].parents
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether no tags have been registered yet.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
