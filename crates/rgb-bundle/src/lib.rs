//! Named, nested key-value bundles.
//!
//! A [`Bundle`] is the unit of state serialization: a named map from string
//! keys to [`Value`]s, where a value is either a scalar or another bundle.
//! Bundles own their children by value, so the structure is always a tree.
//!
//! # Typed access
//!
//! Values go in through [`Bundle::put`] and come back out through
//! [`Bundle::get`], which checks the stored [`ValueKind`] against the
//! requested type:
//!
//! ```ignore
//! use rgb_bundle::Bundle;
//!
//! let mut position = Bundle::new("Position");
//! position.put("x", 3.0_f64);
//! position.put("y", 4.0_f64);
//!
//! assert_eq!(position.get::<f64>("x"), Some(3.0));
//! assert_eq!(position.get::<i32>("x"), None); // kind mismatch
//! assert_eq!(position.get::<f64>("z"), None); // missing key
//! ```
//!
//! Use [`Bundle::try_get`] when the caller needs to tell a missing key apart
//! from a kind mismatch.
//!
//! # Persistence
//!
//! This crate does not pick a byte format. `Bundle` and `Value` implement
//! `serde::Serialize` and `serde::Deserialize`; the host chooses the encoder.

mod bundle;
mod error;
mod value;

pub use bundle::Bundle;
pub use error::{BundleError, BundleResult};
pub use value::{BundleValue, Value, ValueKind};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Bundle, BundleValue, Value, ValueKind};
}
