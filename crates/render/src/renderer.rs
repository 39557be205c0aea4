use crate::camera::PerspectiveCamera;
use crate::error::RenderError;
use crate::scene::Scene;
use graphon_common::{Color, ScreenSize, SurfaceId};
use std::fmt::Write as _;

/// The element a renderer draws into.
///
/// Its dimensions are owned by whoever embeds the renderer; the renderer's
/// internal size is set separately through [`SceneRenderer::set_size`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSurface {
    pub id: SurfaceId,
    pub width: u32,
    pub height: u32,
}

impl OutputSurface {
    pub fn new(size: ScreenSize) -> Self {
        Self {
            id: SurfaceId::new(),
            width: size.width,
            height: size.height,
        }
    }

    pub fn size(&self) -> ScreenSize {
        ScreenSize::new(self.width, self.height)
    }
}

/// Construction parameters shared by all renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererSettings {
    pub clear_color: Color,
    pub antialias: bool,
    pub shadow_map: bool,
    pub size: ScreenSize,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            clear_color: Color::from_hex(0xdddddd, 1.0),
            antialias: true,
            shadow_map: true,
            size: ScreenSize::new(1, 1),
        }
    }
}

/// Renderer-agnostic interface. All backends implement this trait.
///
/// A renderer reads the scene and camera and never mutates either.
pub trait SceneRenderer {
    /// The element the renderer presents into.
    fn surface(&self) -> &OutputSurface;

    fn surface_mut(&mut self) -> &mut OutputSurface;

    /// Internal drawing buffer size.
    fn size(&self) -> ScreenSize;

    /// Resize internal drawing buffers.
    fn set_size(&mut self, size: ScreenSize);

    fn settings(&self) -> &RendererSettings;

    /// Draw one frame of `scene` as seen through `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError>;
}

/// Builds a renderer once the host knows its settings.
pub trait RendererFactory {
    type Renderer: SceneRenderer;

    fn create(&mut self, settings: &RendererSettings) -> Result<Self::Renderer, RenderError>;
}

/// Debug text renderer, the headless backend.
///
/// Produces a human-readable description of each frame. Useful for CLI
/// output, logging, and testing the render interface.
#[derive(Debug)]
pub struct DebugTextRenderer {
    surface: OutputSurface,
    size: ScreenSize,
    settings: RendererSettings,
    frames: u64,
    last_frame: String,
}

impl DebugTextRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self {
            surface: OutputSurface::new(settings.size),
            size: settings.size,
            settings,
            frames: 0,
            last_frame: String::new(),
        }
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Text of the most recent frame, empty before the first render.
    pub fn last_frame(&self) -> &str {
        &self.last_frame
    }
}

impl SceneRenderer for DebugTextRenderer {
    fn surface(&self) -> &OutputSurface {
        &self.surface
    }

    fn surface_mut(&mut self) -> &mut OutputSurface {
        &mut self.surface
    }

    fn size(&self) -> ScreenSize {
        self.size
    }

    fn set_size(&mut self, size: ScreenSize) {
        self.size = size;
    }

    fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        self.frames += 1;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({}x{}) ===",
            self.frames, self.size.width, self.size.height
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.3} near={} far={}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.fov_degrees,
            camera.aspect,
            camera.near,
            camera.far
        );
        let _ = writeln!(out, "Objects: {}", scene.len());

        for object in scene.objects() {
            let object = object.borrow();
            if !object.visible {
                continue;
            }
            let p = object.transform.position;
            let _ = writeln!(
                out,
                "  [{:.8}] pos=({:.2}, {:.2}, {:.2})",
                &object.id.0.to_string()[..8],
                p.x,
                p.y,
                p.z
            );
        }

        tracing::trace!(frame = self.frames, objects = scene.len(), "debug frame rendered");
        self.last_frame = out;
        Ok(())
    }
}

/// Factory for [`DebugTextRenderer`].
#[derive(Debug, Default)]
pub struct DebugTextFactory;

impl RendererFactory for DebugTextFactory {
    type Renderer = DebugTextRenderer;

    fn create(&mut self, settings: &RendererSettings) -> Result<DebugTextRenderer, RenderError> {
        if settings.size.is_empty() {
            return Err(RenderError::InvalidSize {
                width: settings.size.width,
                height: settings.size.height,
            });
        }
        Ok(DebugTextRenderer::new(settings.clone()))
    }
}
