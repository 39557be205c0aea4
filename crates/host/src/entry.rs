use graphon_render::ObjectRef;

/// A scene object that changes every frame.
pub trait DynamicEntry {
    /// Handle inserted into the scene.
    fn scene_object(&self) -> ObjectRef;

    /// Called once per frame, before the frame is rendered.
    fn on_scene_update(&mut self);
}

/// Dynamic entry built from an object and a per-frame closure.
pub struct FnEntry<F> {
    object: ObjectRef,
    on_update: F,
}

impl<F: FnMut()> FnEntry<F> {
    pub fn new(object: ObjectRef, on_update: F) -> Self {
        Self { object, on_update }
    }
}

impl<F: FnMut()> DynamicEntry for FnEntry<F> {
    fn scene_object(&self) -> ObjectRef {
        self.object.clone()
    }

    fn on_scene_update(&mut self) {
        (self.on_update)()
    }
}
