//! The `Serializable` capability.

use rgb_bundle::Bundle;

/// State that can be written to and read from a [`Bundle`].
///
/// The serializer treats `write` and `read` as opaque: what goes into the
/// instance bundle is entirely up to the implementor.
///
/// Usually derived:
///
/// ```ignore
/// #[derive(Serializable)]
/// #[serializable(tag = "rgb.health.v1")]
/// pub struct Health {
///     current: u32,
///     max: u32,
/// }
/// ```
pub trait Serializable {
    /// Key of this member's instance bundle inside its category bundle.
    ///
    /// Defaults to the full Rust type name. Must be stable across saves and
    /// loads, and distinct between types sharing a category.
    fn type_tag(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Write state into a fresh instance bundle.
    fn write(&self, bundle: &mut Bundle);

    /// Restore state from a previously written instance bundle.
    ///
    /// Entries may be missing or of another kind if the data was written by a
    /// different version of the type; implementations should keep their
    /// current value for those.
    fn read(&mut self, bundle: &Bundle);
}

/// Implement [`Component`](crate::Component) for types that implement
/// [`Serializable`], exposing the capability to the serializer.
///
/// ```ignore
/// rgb_entity_state::impl_serializable_component!(Position, Health);
/// ```
#[macro_export]
macro_rules! impl_serializable_component {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Component for $ty {
                fn as_serializable(&self) -> ::core::option::Option<&dyn $crate::Serializable> {
                    ::core::option::Option::Some(self)
                }

                fn as_serializable_mut(
                    &mut self,
                ) -> ::core::option::Option<&mut dyn $crate::Serializable> {
                    ::core::option::Option::Some(self)
                }
            }
        )+
    };
}

/// Implement [`Control`](crate::Control) for types that implement
/// [`Serializable`] and have no per-tick behaviour.
///
/// Controls with an `on_update` body implement `Control` by hand and return
/// `Some(self)` from `as_serializable` / `as_serializable_mut`.
#[macro_export]
macro_rules! impl_serializable_control {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Control for $ty {
                fn as_serializable(&self) -> ::core::option::Option<&dyn $crate::Serializable> {
                    ::core::option::Option::Some(self)
                }

                fn as_serializable_mut(
                    &mut self,
                ) -> ::core::option::Option<&mut dyn $crate::Serializable> {
                    ::core::option::Option::Some(self)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        count: u32,
    }

    impl Serializable for Counter {
        fn write(&self, bundle: &mut Bundle) {
            bundle.put("count", self.count);
        }

        fn read(&mut self, bundle: &Bundle) {
            if let Some(count) = bundle.get("count") {
                self.count = count;
            }
        }
    }

    struct Tagged;

    impl Serializable for Tagged {
        fn type_tag(&self) -> &'static str {
            "rgb.tagged.v2"
        }

        fn write(&self, _bundle: &mut Bundle) {}

        fn read(&mut self, _bundle: &Bundle) {}
    }

    #[test]
    fn test_default_type_tag_is_type_name() {
        let counter = Counter { count: 0 };
        assert_eq!(counter.type_tag(), std::any::type_name::<Counter>());
        assert!(counter.type_tag().ends_with("::Counter"));

        let erased: &dyn Serializable = &counter;
        assert_eq!(erased.type_tag(), std::any::type_name::<Counter>());
    }

    #[test]
    fn test_explicit_type_tag() {
        let erased: &dyn Serializable = &Tagged;
        assert_eq!(erased.type_tag(), "rgb.tagged.v2");
    }

    #[test]
    fn test_read_keeps_missing_fields() {
        let mut counter = Counter { count: 9 };
        counter.read(&Bundle::new("empty"));
        assert_eq!(counter.count, 9);

        let mut saved = Bundle::new("saved");
        Counter { count: 2 }.write(&mut saved);
        counter.read(&saved);
        assert_eq!(counter.count, 2);
    }
}
