/// Errors raised by render backends.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("no output surface available")]
    SurfaceUnavailable,
    #[error("no suitable graphics adapter found")]
    AdapterNotFound,
    #[error("device request failed: {0}")]
    DeviceRequest(String),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("invalid render size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}
