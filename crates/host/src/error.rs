use graphon_render::RenderError;

/// Errors from graphics host operations.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("graphics host is not initialized")]
    NotInitialized,
    #[error("graphics host is already initialized")]
    AlreadyInitialized,
    #[error("sizer reported an unusable screen size {width}x{height}")]
    InvalidScreenSize { width: u32, height: u32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("window error: {0}")]
    Window(String),
    #[error("render error: {0}")]
    Render(#[from] RenderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
