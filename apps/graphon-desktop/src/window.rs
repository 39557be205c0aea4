use graphon_host::{HostError, HostWindow};
use graphon_render::OutputSurface;
use std::sync::Arc;
use winit::window::Window;

/// A winit window hosting the wgpu surface.
///
/// The window is created hidden; attaching the renderer's surface shows it.
pub struct WinitHostWindow {
    window: Arc<Window>,
}

impl WinitHostWindow {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl HostWindow for WinitHostWindow {
    fn append_surface(&mut self, surface: &OutputSurface) -> Result<(), HostError> {
        let inner = self.window.inner_size();
        if inner.width != surface.width || inner.height != surface.height {
            tracing::warn!(
                window_width = inner.width,
                window_height = inner.height,
                surface_width = surface.width,
                surface_height = surface.height,
                "surface size differs from window, waiting for resize"
            );
        }
        self.window.set_visible(true);
        self.window.request_redraw();
        tracing::info!(width = surface.width, height = surface.height, "surface attached to window");
        Ok(())
    }
}
