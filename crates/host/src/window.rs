use crate::error::HostError;
use graphon_render::OutputSurface;

/// The page or window that displays the renderer's output surface.
pub trait HostWindow {
    /// Attach `surface` so it becomes visible to the user.
    fn append_surface(&mut self, surface: &OutputSurface) -> Result<(), HostError>;
}

/// Window with no display, used for headless runs.
#[derive(Debug, Default)]
pub struct HeadlessWindow {
    attached: Vec<OutputSurface>,
}

impl HeadlessWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surfaces attached so far, in attach order.
    pub fn attached(&self) -> &[OutputSurface] {
        &self.attached
    }
}

impl HostWindow for HeadlessWindow {
    fn append_surface(&mut self, surface: &OutputSurface) -> Result<(), HostError> {
        tracing::debug!(
            width = surface.width,
            height = surface.height,
            "surface attached to headless window"
        );
        self.attached.push(surface.clone());
        Ok(())
    }
}
