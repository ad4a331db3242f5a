//! Entity members and a reference entity container.
//!
//! Components hold data, controls hold per-tick behaviour. Both are stored as
//! trait objects of a common base trait; a member opts into persistence by
//! returning itself from `as_serializable`.

use std::{any::Any, fmt};

use crate::{EntityError, EntityResult, Serializable};

/// Base trait for data attached to an entity.
///
/// ```ignore
/// // Not persisted.
/// impl Component for Velocity {}
///
/// // Persisted.
/// rgb_entity_state::impl_serializable_component!(Position);
/// ```
pub trait Component: Any {
    /// Diagnostic name of the concrete type.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The serializable capability of this component, if it has one.
    fn as_serializable(&self) -> Option<&dyn Serializable> {
        None
    }

    /// Mutable access to the serializable capability.
    ///
    /// Must agree with [`as_serializable`](Self::as_serializable).
    fn as_serializable_mut(&mut self) -> Option<&mut dyn Serializable> {
        None
    }
}

/// Base trait for behaviour attached to an entity.
pub trait Control: Any {
    /// Diagnostic name of the concrete type.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Called once per tick with the time per frame in seconds.
    fn on_update(&mut self, _tpf: f64) {}

    /// The serializable capability of this control, if it has one.
    fn as_serializable(&self) -> Option<&dyn Serializable> {
        None
    }

    /// Mutable access to the serializable capability.
    fn as_serializable_mut(&mut self) -> Option<&mut dyn Serializable> {
        None
    }
}

/// What the state serializer needs from an entity: its members, in order.
pub trait EntityMembers {
    fn components(&self) -> &[Box<dyn Component>];
    fn components_mut(&mut self) -> &mut [Box<dyn Component>];
    fn controls(&self) -> &[Box<dyn Control>];
    fn controls_mut(&mut self) -> &mut [Box<dyn Control>];
}

/// An ordered set of components and controls, at most one of each type.
#[derive(Default)]
pub struct Entity {
    components: Vec<Box<dyn Component>>,
    controls: Vec<Box<dyn Control>>,
}

impl Entity {
    /// Create an entity with no members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Components ====================

    /// Attach a component.
    ///
    /// Fails if a component of the same type is already attached.
    pub fn add_component<C: Component>(&mut self, component: C) -> EntityResult<()> {
        if self.has_component::<C>() {
            return Err(EntityError::DuplicateComponent(std::any::type_name::<C>()));
        }
        self.components.push(Box::new(component));
        Ok(())
    }

    /// Check whether a component of type `C` is attached.
    #[must_use]
    pub fn has_component<C: Component>(&self) -> bool {
        self.component_index::<C>().is_some()
    }

    /// Borrow the component of type `C`.
    #[must_use]
    pub fn get_component<C: Component>(&self) -> Option<&C> {
        self.components
            .iter()
            .find_map(|c| (&**c as &dyn Any).downcast_ref::<C>())
    }

    /// Mutably borrow the component of type `C`.
    pub fn get_component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components
            .iter_mut()
            .find_map(|c| (&mut **c as &mut dyn Any).downcast_mut::<C>())
    }

    /// Detach and return the component of type `C`.
    ///
    /// The relative order of the remaining components is preserved.
    pub fn remove_component<C: Component>(&mut self) -> Option<C> {
        let index = self.component_index::<C>()?;
        let boxed: Box<dyn Any> = self.components.remove(index);
        boxed.downcast::<C>().ok().map(|c| *c)
    }

    fn component_index<C: Component>(&self) -> Option<usize> {
        self.components
            .iter()
            .position(|c| (&**c as &dyn Any).is::<C>())
    }

    // ==================== Controls ====================

    /// Attach a control.
    ///
    /// Fails if a control of the same type is already attached.
    pub fn add_control<C: Control>(&mut self, control: C) -> EntityResult<()> {
        if self.has_control::<C>() {
            return Err(EntityError::DuplicateControl(std::any::type_name::<C>()));
        }
        self.controls.push(Box::new(control));
        Ok(())
    }

    /// Check whether a control of type `C` is attached.
    #[must_use]
    pub fn has_control<C: Control>(&self) -> bool {
        self.control_index::<C>().is_some()
    }

    /// Borrow the control of type `C`.
    #[must_use]
    pub fn get_control<C: Control>(&self) -> Option<&C> {
        self.controls
            .iter()
            .find_map(|c| (&**c as &dyn Any).downcast_ref::<C>())
    }

    /// Mutably borrow the control of type `C`.
    pub fn get_control_mut<C: Control>(&mut self) -> Option<&mut C> {
        self.controls
            .iter_mut()
            .find_map(|c| (&mut **c as &mut dyn Any).downcast_mut::<C>())
    }

    /// Detach and return the control of type `C`.
    pub fn remove_control<C: Control>(&mut self) -> Option<C> {
        let index = self.control_index::<C>()?;
        let boxed: Box<dyn Any> = self.controls.remove(index);
        boxed.downcast::<C>().ok().map(|c| *c)
    }

    fn control_index<C: Control>(&self) -> Option<usize> {
        self.controls
            .iter()
            .position(|c| (&**c as &dyn Any).is::<C>())
    }

    /// Run `on_update` on every control, in attach order.
    pub fn update(&mut self, tpf: f64) {
        for control in &mut self.controls {
            control.on_update(tpf);
        }
    }
}

impl EntityMembers for Entity {
    fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    fn components_mut(&mut self) -> &mut [Box<dyn Component>] {
        &mut self.components
    }

    fn controls(&self) -> &[Box<dyn Control>] {
        &self.controls
    }

    fn controls_mut(&mut self) -> &mut [Box<dyn Control>] {
        &mut self.controls
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let components: Vec<_> = self.components.iter().map(|c| c.type_name()).collect();
        let controls: Vec<_> = self.controls.iter().map(|c| c.type_name()).collect();

        f.debug_struct("Entity")
            .field("components", &components)
            .field("controls", &controls)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rgb_bundle::Bundle;

    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position {
        x: f64,
        y: f64,
    }

    impl Component for Position {}

    #[derive(Debug, PartialEq)]
    struct Velocity {
        x: f64,
        y: f64,
    }

    impl Component for Velocity {}

    struct Spin {
        angle: f64,
        speed: f64,
    }

    impl Control for Spin {
        fn on_update(&mut self, tpf: f64) {
            self.angle += self.speed * tpf;
        }
    }

    struct Score(u32);

    impl Serializable for Score {
        fn write(&self, bundle: &mut Bundle) {
            bundle.put("score", self.0);
        }

        fn read(&mut self, bundle: &Bundle) {
            if let Some(score) = bundle.get("score") {
                self.0 = score;
            }
        }
    }

    crate::impl_serializable_component!(Score);

    #[test]
    fn test_add_and_get_component() {
        let mut entity = Entity::new();
        entity.add_component(Position { x: 1.0, y: 2.0 }).unwrap();
        entity.add_component(Velocity { x: 0.5, y: 0.0 }).unwrap();

        assert!(entity.has_component::<Position>());
        assert_eq!(
            entity.get_component::<Position>(),
            Some(&Position { x: 1.0, y: 2.0 })
        );
        assert_eq!(
            entity.get_component::<Velocity>(),
            Some(&Velocity { x: 0.5, y: 0.0 })
        );
        assert!(entity.get_component::<Score>().is_none());
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let mut entity = Entity::new();
        entity.add_component(Position { x: 1.0, y: 2.0 }).unwrap();

        let err = entity
            .add_component(Position { x: 9.0, y: 9.0 })
            .unwrap_err();

        assert_eq!(
            err,
            EntityError::DuplicateComponent(std::any::type_name::<Position>())
        );
        assert_eq!(entity.components().len(), 1);
        assert_eq!(entity.get_component::<Position>().map(|p| p.x), Some(1.0));
    }

    #[test]
    fn test_get_component_mut() {
        let mut entity = Entity::new();
        entity.add_component(Position { x: 1.0, y: 2.0 }).unwrap();

        entity.get_component_mut::<Position>().unwrap().x = 5.0;

        assert_eq!(entity.get_component::<Position>().map(|p| p.x), Some(5.0));
    }

    #[test]
    fn test_remove_component_keeps_order() {
        let mut entity = Entity::new();
        entity.add_component(Position { x: 1.0, y: 2.0 }).unwrap();
        entity.add_component(Score(3)).unwrap();
        entity.add_component(Velocity { x: 0.0, y: 1.0 }).unwrap();

        let removed = entity.remove_component::<Score>();

        assert_eq!(removed.map(|s| s.0), Some(3));
        assert!(!entity.has_component::<Score>());
        let names: Vec<_> = entity.components().iter().map(|c| c.type_name()).collect();
        assert_eq!(
            names,
            vec![
                std::any::type_name::<Position>(),
                std::any::type_name::<Velocity>()
            ]
        );
        assert!(entity.remove_component::<Score>().is_none());
    }

    #[test]
    fn test_serializable_capability_query() {
        let mut entity = Entity::new();
        entity.add_component(Position { x: 1.0, y: 2.0 }).unwrap();
        entity.add_component(Score(7)).unwrap();

        let serializable: Vec<_> = entity
            .components()
            .iter()
            .filter_map(|c| c.as_serializable())
            .map(|s| s.type_tag())
            .collect();

        assert_eq!(serializable, vec![std::any::type_name::<Score>()]);
    }

    #[test]
    fn test_controls_update_in_order() {
        let mut entity = Entity::new();
        entity
            .add_control(Spin {
                angle: 0.0,
                speed: 2.0,
            })
            .unwrap();

        entity.update(0.5);
        entity.update(0.25);

        assert_eq!(entity.get_control::<Spin>().map(|s| s.angle), Some(1.5));
        assert!(matches!(
            entity.add_control(Spin {
                angle: 0.0,
                speed: 0.0
            }),
            Err(EntityError::DuplicateControl(_))
        ));

        entity.get_control_mut::<Spin>().unwrap().speed = 0.0;
        assert!(entity.remove_control::<Spin>().is_some());
        assert!(!entity.has_control::<Spin>());
    }

    #[test]
    fn test_debug_lists_members() {
        let mut entity = Entity::new();
        entity.add_component(Position { x: 0.0, y: 0.0 }).unwrap();

        let debug = format!("{entity:?}");
        assert!(debug.contains("Position"));
    }
}
