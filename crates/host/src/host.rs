use crate::config::HostConfig;
use crate::entry::DynamicEntry;
use crate::error::HostError;
use crate::sizer::Sizer;
use crate::state::PlayerState;
use crate::window::HostWindow;
use graphon_common::ScreenSize;
use graphon_render::{
    ObjectRef, OutputSurface, PerspectiveCamera, RendererFactory, RendererSettings, Scene,
    SceneRenderer,
};
use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

/// Per-frame hook registered by a dynamic entry.
pub type UpdateCallback = Box<dyn FnMut()>;

/// Resources that exist only once the host is initialized.
///
/// Shared with the resize handler through a weak reference, so a handler
/// outliving its host does nothing.
struct Graphics<R> {
    renderer: R,
    camera: PerspectiveCamera,
    scene: Scene,
}

impl<R: SceneRenderer> Graphics<R> {
    /// Apply a new screen size to the surface, the renderer and the camera
    /// in one step.
    fn resize(&mut self, size: ScreenSize) {
        if size.is_empty() {
            tracing::warn!(
                width = size.width,
                height = size.height,
                "empty screen size, clamping to 1x1 minimum"
            );
        }
        let size = size.clamped();

        let surface = self.renderer.surface_mut();
        surface.width = size.width;
        surface.height = size.height;

        self.renderer.set_size(size);
        self.camera.aspect = size.aspect();
        self.camera.update_projection_matrix();

        tracing::debug!(
            width = size.width,
            height = size.height,
            aspect = self.camera.aspect,
            "graphics resized"
        );
    }
}

/// Target of the host's single resize subscription.
///
/// `initialize` points it at the current graphics. A resize that finds the
/// graphics borrowed is marked pending and applied at the start of the next
/// frame.
struct ResizeTarget<R> {
    graphics: RefCell<Weak<RefCell<Graphics<R>>>>,
    pending: Cell<bool>,
}

impl<R: SceneRenderer> ResizeTarget<R> {
    fn new() -> Self {
        Self {
            graphics: RefCell::new(Weak::new()),
            pending: Cell::new(false),
        }
    }

    fn attach(&self, graphics: &Rc<RefCell<Graphics<R>>>) {
        *self.graphics.borrow_mut() = Rc::downgrade(graphics);
        self.pending.set(false);
    }

    fn on_resize(&self, size: ScreenSize) {
        let Some(graphics) = self.graphics.borrow().upgrade() else {
            return;
        };
        match graphics.try_borrow_mut() {
            Ok(mut graphics) => {
                graphics.resize(size);
                self.pending.set(false);
            }
            Err(_) => {
                tracing::warn!(
                    width = size.width,
                    height = size.height,
                    "resize dispatched while graphics are in use, deferred to next frame"
                );
                self.pending.set(true);
            }
        }
    }
}

/// Owns the renderer, camera and scene for one window, and drives them once
/// per frame.
///
/// The host starts uninitialized. [`initialize`](Self::initialize) builds
/// the renderer, camera and scene and attaches the output surface to the
/// window; every other operation fails with [`HostError::NotInitialized`]
/// until then.
pub struct GraphicsHost<R> {
    window: Box<dyn HostWindow>,
    sizer: Rc<dyn Sizer>,
    player: Rc<dyn PlayerState>,
    config: HostConfig,
    graphics: Option<Rc<RefCell<Graphics<R>>>>,
    resize_target: Rc<ResizeTarget<R>>,
    resize_subscribed: Cell<bool>,
    update_callbacks: Vec<UpdateCallback>,
}

impl<R: SceneRenderer + 'static> GraphicsHost<R> {
    pub fn new(
        window: impl HostWindow + 'static,
        sizer: Rc<dyn Sizer>,
        player: Rc<dyn PlayerState>,
        config: HostConfig,
    ) -> Self {
        Self {
            window: Box::new(window),
            sizer,
            player,
            config,
            graphics: None,
            resize_target: Rc::new(ResizeTarget::new()),
            resize_subscribed: Cell::new(false),
            update_callbacks: Vec::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.graphics.is_some()
    }

    /// Build the renderer, camera and scene, subscribe to resize events and
    /// attach the renderer's surface to the window.
    ///
    /// Fails with [`HostError::AlreadyInitialized`] on a second call, leaving
    /// the existing resources in place. On any other failure the host stays
    /// uninitialized.
    pub fn initialize<F>(&mut self, factory: &mut F) -> Result<(), HostError>
    where
        F: RendererFactory<Renderer = R>,
    {
        if self.graphics.is_some() {
            return Err(HostError::AlreadyInitialized);
        }
        self.config.validate()?;

        let size = self.sizer.screen_size();
        if size.is_empty() {
            return Err(HostError::InvalidScreenSize {
                width: size.width,
                height: size.height,
            });
        }

        let renderer = factory.create(&RendererSettings {
            clear_color: self.config.renderer.clear_color(),
            antialias: self.config.renderer.antialias,
            shadow_map: self.config.renderer.shadow_map,
            size,
        })?;

        let cam = &self.config.camera;
        let mut camera = PerspectiveCamera::new(cam.fov_degrees, size.aspect(), cam.near, cam.far);
        camera.position.z = cam.depth_offset;

        let graphics = Rc::new(RefCell::new(Graphics {
            renderer,
            camera,
            scene: Scene::new(),
        }));
        self.subscribe_resize();
        self.resize_target.attach(&graphics);

        self.window
            .append_surface(graphics.borrow().renderer.surface())?;

        tracing::info!(
            width = size.width,
            height = size.height,
            fov = cam.fov_degrees,
            antialias = self.config.renderer.antialias,
            shadow_map = self.config.renderer.shadow_map,
            "graphics host initialized"
        );
        self.graphics = Some(graphics);
        Ok(())
    }

    /// Register the host's resize handler with the sizer, once per host.
    fn subscribe_resize(&self) {
        if self.resize_subscribed.get() {
            return;
        }
        let target = Rc::downgrade(&self.resize_target);
        let sizer = Rc::downgrade(&self.sizer);
        self.sizer.add_on_resize(Rc::new(move || {
            let (Some(target), Some(sizer)) = (target.upgrade(), sizer.upgrade()) else {
                return;
            };
            target.on_resize(sizer.screen_size());
        }));
        self.resize_subscribed.set(true);
    }

    fn graphics(&self) -> Result<&Rc<RefCell<Graphics<R>>>, HostError> {
        self.graphics.as_ref().ok_or(HostError::NotInitialized)
    }

    /// Add an object that changes every frame: its scene object joins the
    /// scene and its update hook runs on every [`update`](Self::update).
    pub fn add_dynamic<E>(&mut self, mut entry: E) -> Result<(), HostError>
    where
        E: DynamicEntry + 'static,
    {
        self.graphics()?
            .borrow_mut()
            .scene
            .add(entry.scene_object());
        self.update_callbacks
            .push(Box::new(move || entry.on_scene_update()));
        tracing::debug!(callbacks = self.update_callbacks.len(), "dynamic object added");
        Ok(())
    }

    /// Add an object with no per-frame hook.
    pub fn add_static(&mut self, object: ObjectRef) -> Result<(), HostError> {
        self.graphics()?.borrow_mut().scene.add(object);
        tracing::debug!("static object added");
        Ok(())
    }

    /// Advance one frame: apply a deferred resize, move the camera over the
    /// player, run every update hook in registration order, then render.
    pub fn update(&mut self) -> Result<(), HostError> {
        let graphics = self.graphics.as_ref().ok_or(HostError::NotInitialized)?;

        if self.resize_target.pending.replace(false) {
            graphics.borrow_mut().resize(self.sizer.screen_size());
        }

        let player = self.player.position();
        {
            let mut graphics = graphics.borrow_mut();
            graphics.camera.position.x = player.x;
            graphics.camera.position.y = player.y;
        }

        for callback in &mut self.update_callbacks {
            callback();
        }

        let mut graphics = graphics.borrow_mut();
        let Graphics {
            renderer,
            camera,
            scene,
        } = &mut *graphics;
        renderer.render(scene, camera)?;

        tracing::trace!(
            x = player.x,
            y = player.y,
            callbacks = self.update_callbacks.len(),
            "frame rendered"
        );
        Ok(())
    }

    pub fn camera(&self) -> Result<Ref<'_, PerspectiveCamera>, HostError> {
        Ok(Ref::map(self.graphics()?.borrow(), |g| &g.camera))
    }

    pub fn renderer(&self) -> Result<Ref<'_, R>, HostError> {
        Ok(Ref::map(self.graphics()?.borrow(), |g| &g.renderer))
    }

    /// The renderer's output surface attached to the window.
    pub fn surface(&self) -> Result<Ref<'_, OutputSurface>, HostError> {
        Ok(Ref::map(self.graphics()?.borrow(), |g| g.renderer.surface()))
    }

    pub fn scene_len(&self) -> Result<usize, HostError> {
        Ok(self.graphics()?.borrow().scene.len())
    }

    /// True if `object` was added to the scene.
    pub fn scene_contains(&self, object: &ObjectRef) -> Result<bool, HostError> {
        Ok(self.graphics()?.borrow().scene.contains(object))
    }

    pub fn callback_count(&self) -> usize {
        self.update_callbacks.len()
    }

    pub fn sizer(&self) -> &Rc<dyn Sizer> {
        &self.sizer
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::FnEntry;
    use crate::sizer::WindowSizer;
    use crate::state::SharedPlayerState;
    use glam::Vec3;
    use graphon_common::{Color, PlayerPosition, Transform};
    use graphon_render::{DebugTextRenderer, Object3D, RenderError};
    use std::cell::Cell;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Debug renderer that also logs each render call.
    struct RecordingRenderer {
        inner: DebugTextRenderer,
        log: Log,
        fail: bool,
    }

    impl SceneRenderer for RecordingRenderer {
        fn surface(&self) -> &OutputSurface {
            self.inner.surface()
        }

        fn surface_mut(&mut self) -> &mut OutputSurface {
            self.inner.surface_mut()
        }

        fn size(&self) -> ScreenSize {
            self.inner.size()
        }

        fn set_size(&mut self, size: ScreenSize) {
            self.inner.set_size(size)
        }

        fn settings(&self) -> &RendererSettings {
            self.inner.settings()
        }

        fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
            if self.fail {
                return Err(RenderError::SurfaceUnavailable);
            }
            self.log.borrow_mut().push("render".into());
            self.inner.render(scene, camera)
        }
    }

    #[derive(Default)]
    struct RecordingFactory {
        log: Log,
        created: usize,
        fail_render: bool,
    }

    impl RendererFactory for RecordingFactory {
        type Renderer = RecordingRenderer;

        fn create(&mut self, settings: &RendererSettings) -> Result<RecordingRenderer, RenderError> {
            self.created += 1;
            Ok(RecordingRenderer {
                inner: DebugTextRenderer::new(settings.clone()),
                log: self.log.clone(),
                fail: self.fail_render,
            })
        }
    }

    #[derive(Default)]
    struct TestWindow {
        attached: Rc<RefCell<Vec<OutputSurface>>>,
        fail: Rc<Cell<bool>>,
    }

    impl HostWindow for TestWindow {
        fn append_surface(&mut self, surface: &OutputSurface) -> Result<(), HostError> {
            if self.fail.get() {
                return Err(HostError::Window("no document body".into()));
            }
            self.attached.borrow_mut().push(surface.clone());
            Ok(())
        }
    }

    struct Fixture {
        host: GraphicsHost<RecordingRenderer>,
        sizer: Rc<WindowSizer>,
        player: Rc<SharedPlayerState>,
        attached: Rc<RefCell<Vec<OutputSurface>>>,
        window_fails: Rc<Cell<bool>>,
        factory: RecordingFactory,
    }

    fn fixture(width: u32, height: u32) -> Fixture {
        let sizer = Rc::new(WindowSizer::new(ScreenSize::new(width, height)));
        let player = Rc::new(SharedPlayerState::default());
        let window = TestWindow::default();
        let attached = window.attached.clone();
        let window_fails = window.fail.clone();
        let host = GraphicsHost::new(window, sizer.clone(), player.clone(), HostConfig::default());
        Fixture {
            host,
            sizer,
            player,
            attached,
            window_fails,
            factory: RecordingFactory::default(),
        }
    }

    fn initialized(width: u32, height: u32) -> Fixture {
        let mut f = fixture(width, height);
        f.host.initialize(&mut f.factory).unwrap();
        f
    }

    fn counter_entry(counter: Rc<Cell<u32>>) -> FnEntry<impl FnMut()> {
        FnEntry::new(Object3D::default().into_ref(), move || {
            counter.set(counter.get() + 1)
        })
    }

    #[test]
    fn initialize_800x600_configures_camera() {
        let f = initialized(800, 600);
        let camera = f.host.camera().unwrap();

        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 5000.0);
        assert_eq!(camera.fov_degrees, 35.0);
        assert_eq!(camera.position.z, 1500.0);
    }

    #[test]
    fn initialize_configures_renderer() {
        let f = initialized(800, 600);
        let renderer = f.host.renderer().unwrap();

        assert_eq!(renderer.size(), ScreenSize::new(800, 600));
        assert_eq!(renderer.settings().clear_color, Color::from_hex(0xdddddd, 1.0));
        assert!(renderer.settings().antialias);
        assert!(renderer.settings().shadow_map);
        assert_eq!(f.host.scene_len().unwrap(), 0);
    }

    #[test]
    fn initialize_attaches_surface_to_window() {
        let f = initialized(800, 600);
        let attached = f.attached.borrow();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0], *f.host.surface().unwrap());
    }

    #[test]
    fn second_initialize_is_rejected() {
        let mut f = initialized(800, 600);
        let surface_id = f.host.surface().unwrap().id;

        let err = f.host.initialize(&mut f.factory).unwrap_err();
        assert!(matches!(err, HostError::AlreadyInitialized));
        assert_eq!(f.factory.created, 1);
        assert_eq!(f.attached.borrow().len(), 1);
        assert_eq!(f.host.surface().unwrap().id, surface_id);
        assert_eq!(f.sizer.listener_count(), 1);
    }

    #[test]
    fn operations_before_initialize_fail() {
        let mut f = fixture(800, 600);
        let counter = Rc::new(Cell::new(0));

        assert!(!f.host.is_initialized());
        assert!(matches!(f.host.update(), Err(HostError::NotInitialized)));
        assert!(matches!(
            f.host.add_static(Object3D::default().into_ref()),
            Err(HostError::NotInitialized)
        ));
        assert!(matches!(
            f.host.add_dynamic(counter_entry(counter.clone())),
            Err(HostError::NotInitialized)
        ));
        assert!(f.host.camera().is_err());
        assert_eq!(f.host.callback_count(), 0);
    }

    #[test]
    fn zero_size_sizer_is_rejected() {
        let mut f = fixture(0, 600);
        let err = f.host.initialize(&mut f.factory).unwrap_err();
        assert!(matches!(
            err,
            HostError::InvalidScreenSize { width: 0, height: 600 }
        ));
        assert!(!f.host.is_initialized());
        assert_eq!(f.factory.created, 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let sizer = Rc::new(WindowSizer::new(ScreenSize::new(800, 600)));
        let mut config = HostConfig::default();
        config.camera.near = 0.0;
        let mut host: GraphicsHost<RecordingRenderer> = GraphicsHost::new(
            TestWindow::default(),
            sizer,
            Rc::new(SharedPlayerState::default()),
            config,
        );

        let err = host.initialize(&mut RecordingFactory::default()).unwrap_err();
        assert!(matches!(err, HostError::InvalidConfig(_)));
    }

    #[test]
    fn failed_attach_leaves_host_uninitialized() {
        let mut f = fixture(800, 600);
        f.window_fails.set(true);

        let err = f.host.initialize(&mut f.factory).unwrap_err();
        assert!(matches!(err, HostError::Window(_)));
        assert!(!f.host.is_initialized());
        assert_eq!(f.sizer.listener_count(), 1);

        f.sizer.resize(ScreenSize::new(1024, 768));
        assert!(!f.host.is_initialized());
        assert!(!f.host.resize_target.pending.get());
        assert!(matches!(f.host.update(), Err(HostError::NotInitialized)));
    }

    #[test]
    fn retried_initialize_subscribes_once() {
        let mut f = fixture(800, 600);
        f.window_fails.set(true);
        for _ in 0..3 {
            let err = f.host.initialize(&mut f.factory).unwrap_err();
            assert!(matches!(err, HostError::Window(_)));
        }
        assert_eq!(f.sizer.listener_count(), 1);

        f.window_fails.set(false);
        f.host.initialize(&mut f.factory).unwrap();
        assert_eq!(f.sizer.listener_count(), 1);
        assert_eq!(f.factory.created, 4);

        f.sizer.resize(ScreenSize::new(1024, 768));
        assert_eq!(f.host.renderer().unwrap().size(), ScreenSize::new(1024, 768));
    }

    #[test]
    fn add_dynamic_registers_object_and_callback() {
        let mut f = initialized(800, 600);
        let counter = Rc::new(Cell::new(0));
        let entry = counter_entry(counter.clone());
        let object = entry.scene_object();

        f.host.add_dynamic(entry).unwrap();

        assert!(f.host.scene_contains(&object).unwrap());
        assert_eq!(f.host.scene_len().unwrap(), 1);
        assert_eq!(f.host.callback_count(), 1);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn add_static_has_no_callback() {
        let mut f = initialized(800, 600);
        let object = Object3D::default().into_ref();

        f.host.add_static(object.clone()).unwrap();

        assert!(f.host.scene_contains(&object).unwrap());
        assert_eq!(f.host.callback_count(), 0);
    }

    #[test]
    fn update_twice_invokes_callback_twice() {
        let mut f = initialized(800, 600);
        let counter = Rc::new(Cell::new(0));
        f.host.add_dynamic(counter_entry(counter.clone())).unwrap();

        f.host.update().unwrap();
        f.host.update().unwrap();

        assert_eq!(counter.get(), 2);
        assert_eq!(f.host.renderer().unwrap().inner.frame_count(), 2);
    }

    #[test]
    fn callbacks_run_in_order_before_render() {
        let mut f = initialized(800, 600);
        let log = f.factory.log.clone();
        for name in ["first", "second", "third"] {
            let log = log.clone();
            let entry = FnEntry::new(Object3D::default().into_ref(), move || {
                log.borrow_mut().push(name.to_string())
            });
            f.host.add_dynamic(entry).unwrap();
        }

        for _ in 0..3 {
            f.host.update().unwrap();
        }

        let frame = ["first", "second", "third", "render"];
        let expected: Vec<String> = frame
            .iter()
            .cycle()
            .take(frame.len() * 3)
            .map(|s| s.to_string())
            .collect();
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn camera_follows_latest_player_position() {
        let mut f = initialized(800, 600);

        f.player.set(PlayerPosition::new(10.0, -20.0));
        f.host.update().unwrap();
        {
            let camera = f.host.camera().unwrap();
            assert_eq!(camera.position, Vec3::new(10.0, -20.0, 1500.0));
        }

        f.player.set(PlayerPosition::new(11.5, 3.0));
        f.host.update().unwrap();
        let camera = f.host.camera().unwrap();
        assert_eq!(camera.position.x, 11.5);
        assert_eq!(camera.position.y, 3.0);
    }

    #[test]
    fn dynamic_changes_appear_in_rendered_frame() {
        let mut f = initialized(800, 600);
        f.player.set(PlayerPosition::new(7.0, 8.0));

        let object = Object3D::default().into_ref();
        let handle = object.clone();
        f.host
            .add_dynamic(FnEntry::new(object, move || {
                handle.borrow_mut().transform.position.x += 42.0;
            }))
            .unwrap();
        f.host.update().unwrap();

        let renderer = f.host.renderer().unwrap();
        assert!(renderer.inner.last_frame().contains("pos=(7.0, 8.0, 1500.0)"));
        assert!(renderer.inner.last_frame().contains("pos=(42.00, 0.00, 0.00)"));
    }

    #[test]
    fn resize_updates_surface_renderer_and_camera() {
        let f = initialized(800, 600);

        f.sizer.resize(ScreenSize::new(1024, 768));

        let surface = f.host.surface().unwrap();
        assert_eq!(surface.width, 1024);
        assert_eq!(surface.height, 768);
        drop(surface);

        assert_eq!(f.host.renderer().unwrap().size(), ScreenSize::new(1024, 768));

        let camera = f.host.camera().unwrap();
        assert!((camera.aspect - 1024.0 / 768.0).abs() < 1e-6);
        let expected = PerspectiveCamera::new(35.0, 1024.0 / 768.0, 0.1, 5000.0);
        assert_eq!(camera.projection_matrix(), expected.projection_matrix());
    }

    #[test]
    fn resize_changes_aspect() {
        let f = initialized(800, 600);
        f.sizer.resize(ScreenSize::new(1920, 600));

        let camera = f.host.camera().unwrap();
        assert!((camera.aspect - 3.2).abs() < 1e-6);
    }

    #[test]
    fn resize_to_zero_clamps() {
        let f = initialized(800, 600);
        f.sizer.resize(ScreenSize::new(0, 0));

        assert_eq!(f.host.surface().unwrap().size(), ScreenSize::new(1, 1));
        assert_eq!(f.host.renderer().unwrap().size(), ScreenSize::new(1, 1));
        let camera = f.host.camera().unwrap();
        assert_eq!(camera.aspect, 1.0);
        assert!(!camera.projection_matrix().col(0).x.is_nan());
    }

    #[test]
    fn resize_while_borrowed_applies_on_next_update() {
        let mut f = initialized(800, 600);
        {
            let camera = f.host.camera().unwrap();
            f.sizer.resize(ScreenSize::new(1024, 768));
            assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        }
        assert_eq!(f.host.renderer().unwrap().size(), ScreenSize::new(800, 600));

        f.host.update().unwrap();

        assert_eq!(f.host.renderer().unwrap().size(), f.sizer.screen_size());
        assert_eq!(f.host.surface().unwrap().size(), ScreenSize::new(1024, 768));
        let camera = f.host.camera().unwrap();
        assert!((camera.aspect - 1024.0 / 768.0).abs() < 1e-6);
        let expected = PerspectiveCamera::new(35.0, 1024.0 / 768.0, 0.1, 5000.0);
        assert_eq!(camera.projection_matrix(), expected.projection_matrix());
        assert!(
            f.host
                .renderer()
                .unwrap()
                .inner
                .last_frame()
                .contains("(1024x768)")
        );
    }

    #[test]
    fn later_resize_clears_deferred_resize() {
        let mut f = initialized(800, 600);
        {
            let _camera = f.host.camera().unwrap();
            f.sizer.resize(ScreenSize::new(1024, 768));
        }
        f.sizer.resize(ScreenSize::new(640, 480));
        assert!(!f.host.resize_target.pending.get());

        f.host.update().unwrap();
        assert_eq!(f.host.renderer().unwrap().size(), ScreenSize::new(640, 480));
    }

    #[test]
    fn render_errors_propagate() {
        let mut f = fixture(800, 600);
        f.factory.fail_render = true;
        f.host.initialize(&mut f.factory).unwrap();

        let err = f.host.update().unwrap_err();
        assert!(matches!(
            err,
            HostError::Render(RenderError::SurfaceUnavailable)
        ));
    }

    #[test]
    fn static_transform_is_rendered() {
        let mut f = initialized(800, 600);
        let object = Object3D::new(
            Transform {
                position: Vec3::new(1.0, 2.0, 3.0),
                ..Transform::default()
            },
            Color::WHITE,
        );
        f.host.add_static(object.into_ref()).unwrap();
        f.host.update().unwrap();

        let renderer = f.host.renderer().unwrap();
        assert!(renderer.inner.last_frame().contains("Objects: 1"));
        assert!(renderer.inner.last_frame().contains("pos=(1.00, 2.00, 3.00)"));
    }
}
