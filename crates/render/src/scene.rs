use graphon_common::{Color, ObjectId, Transform};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a scene object.
///
/// Owners of dynamic objects keep a clone and mutate the object between
/// frames; the scene reads it at render time.
pub type ObjectRef = Rc<RefCell<Object3D>>;

/// A renderable box: a unit cube placed by its transform.
#[derive(Debug, Clone)]
pub struct Object3D {
    pub id: ObjectId,
    pub transform: Transform,
    pub color: Color,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Object3D {
    pub fn new(transform: Transform, color: Color) -> Self {
        Self {
            id: ObjectId::new(),
            transform,
            color,
            visible: true,
            cast_shadow: true,
            receive_shadow: true,
        }
    }

    /// Wrap into a shared handle.
    pub fn into_ref(self) -> ObjectRef {
        Rc::new(RefCell::new(self))
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self::new(Transform::default(), Color::WHITE)
    }
}

/// Flat, append-only list of objects drawn each frame in insertion order.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<ObjectRef>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: ObjectRef) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// True if this exact handle was added to the scene.
    pub fn contains(&self, object: &ObjectRef) -> bool {
        self.objects.iter().any(|o| Rc::ptr_eq(o, object))
    }

    pub fn objects(&self) -> &[ObjectRef] {
        &self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert!(scene.is_empty());
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn add_keeps_insertion_order() {
        let mut scene = Scene::new();
        let a = Object3D::default().into_ref();
        let b = Object3D::default().into_ref();
        scene.add(a.clone());
        scene.add(b.clone());

        assert_eq!(scene.len(), 2);
        assert!(Rc::ptr_eq(&scene.objects()[0], &a));
        assert!(Rc::ptr_eq(&scene.objects()[1], &b));
    }

    #[test]
    fn contains_matches_handles_not_values() {
        let mut scene = Scene::new();
        let a = Object3D::default().into_ref();
        let lookalike = Rc::new(RefCell::new(a.borrow().clone()));
        scene.add(a.clone());

        assert!(scene.contains(&a));
        assert!(!scene.contains(&lookalike));
    }

    #[test]
    fn mutations_through_handle_are_visible_to_scene() {
        let mut scene = Scene::new();
        let a = Object3D::default().into_ref();
        scene.add(a.clone());

        a.borrow_mut().transform.position = Vec3::new(4.0, 5.0, 6.0);
        let seen = scene.objects()[0].borrow().transform.position;
        assert_eq!(seen, Vec3::new(4.0, 5.0, 6.0));
    }
}
