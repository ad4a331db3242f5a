//! Entity state serialization.
//!
//! Saves and restores the state of an entity's serializable components and
//! controls through a [`Bundle`] tree:
//!
//! ```text
//! root
//! ├── "components"            category bundle
//! │   ├── <type tag>          instance bundle, written by the member
//! │   └── ...
//! └── "controls"
//!     └── <type tag>
//! ```
//!
//! Members opt in by implementing [`Serializable`] (by hand or with
//! `#[derive(Serializable)]`) and exposing it through
//! [`Component::as_serializable`] / [`Control::as_serializable`].
//!
//! Loading is best-effort: a live member with no saved instance bundle is
//! logged as a warning, recorded in the [`LoadReport`], and skipped.
//!
//! # Usage
//!
//! ```ignore
//! use rgb_entity_state::{Bundle, Entity, Serializable};
//!
//! #[derive(Default, Serializable)]
//! struct Position { x: f64, y: f64 }
//! rgb_entity_state::impl_serializable_component!(Position);
//!
//! let mut entity = Entity::new();
//! entity.add_component(Position { x: 3.0, y: 4.0 })?;
//!
//! let mut root = Bundle::new("entity");
//! rgb_entity_state::save(&entity, &mut root);
//!
//! // ... later, on an entity with the same members
//! let report = rgb_entity_state::load(&mut entity, &root);
//! assert!(report.is_complete());
//! ```
//!
//! # Type tags
//!
//! A member's instance bundle is keyed by [`Serializable::type_tag`]. The
//! default is the full Rust type name, which changes when a type is renamed
//! or moved and then shows up as schema drift. Override it (or use
//! `#[serializable(tag = "...")]`) with an explicit, versioned tag for data
//! that must outlive refactors.
//!
//! Only one member per type tag and category round-trips. See
//! [`SaveReport::collisions`].

mod entity;
mod error;
mod report;
mod serializable;
mod serializer;

pub use entity::{Component, Control, Entity, EntityMembers};
pub use error::{EntityError, EntityResult};
pub use report::{Category, DriftKind, LoadReport, MemberRef, SaveReport, SchemaDrift};
pub use rgb_bundle::{Bundle, BundleError, BundleValue, Value, ValueKind};
pub use rgb_bundle_derive::Serializable;
pub use serializable::Serializable;
pub use serializer::{EntityStateSerializer, SerializerConfig, load, save};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Bundle, Component, Control, Entity, EntityMembers, EntityStateSerializer, Serializable,
    };
}
