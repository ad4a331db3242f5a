//! Outcome reports for save and load.

use std::fmt;

/// Which member collection of an entity a record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Components,
    Controls,
}

impl Category {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Components => "components",
            Self::Controls => "controls",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A member slot: category plus type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    pub category: Category,
    pub type_tag: String,
}

impl MemberRef {
    pub fn new(category: Category, type_tag: impl Into<String>) -> Self {
        Self {
            category,
            type_tag: type_tag.into(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.type_tag)
    }
}

/// Why a live member could not be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriftKind {
    /// The category bundle exists but has no instance bundle for the tag.
    MissingInstance,
    /// The whole category bundle is absent from the root.
    MissingCategory,
}

/// A live serializable member whose state was not in the saved bundle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaDrift {
    pub member: MemberRef,
    pub kind: DriftKind,
}

/// Result of [`save`](crate::EntityStateSerializer::save).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Members written, in traversal order.
    pub written: Vec<MemberRef>,
    /// Tags written more than once within a category. Only the last member
    /// with each tag is kept in the bundle.
    pub collisions: Vec<MemberRef>,
}

impl SaveReport {
    /// Number of members written in `category`.
    #[must_use]
    pub fn written_in(&self, category: Category) -> usize {
        self.written
            .iter()
            .filter(|m| m.category == category)
            .count()
    }
}

/// Result of [`load`](crate::EntityStateSerializer::load).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Members whose `read` was invoked, in traversal order.
    pub restored: Vec<MemberRef>,
    /// Live members left untouched because no saved state was found.
    pub drift: Vec<SchemaDrift>,
    /// Saved instance bundles with no live member to read them, sorted.
    pub orphaned: Vec<MemberRef>,
}

impl LoadReport {
    /// True when every live serializable member was restored.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.drift.is_empty()
    }

    /// Check whether the member with `type_tag` in `category` was restored.
    #[must_use]
    pub fn was_restored(&self, category: Category, type_tag: &str) -> bool {
        self.restored
            .iter()
            .any(|m| m.category == category && m.type_tag == type_tag)
    }
}
