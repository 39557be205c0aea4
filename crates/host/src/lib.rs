//! Graphics host: wires a renderer, a camera and a scene to a window and a
//! sizer, and drives them once per frame.
//!
//! # Invariants
//! - Renderer, camera and scene exist only after `initialize` succeeds, and
//!   `initialize` succeeds at most once.
//! - Update hooks run in registration order, exactly once per frame, before
//!   the frame is rendered.
//! - A resize updates surface dimensions, renderer size, camera aspect and
//!   projection together.
//! - The scene and the hook list are append-only.

mod config;
mod entry;
mod error;
mod host;
mod sizer;
mod state;
mod window;

pub use config::{CameraConfig, HostConfig, RendererConfig};
pub use entry::{DynamicEntry, FnEntry};
pub use error::HostError;
pub use host::{GraphicsHost, UpdateCallback};
pub use sizer::{ResizeCallback, Sizer, WindowSizer};
pub use state::{PlayerState, SharedPlayerState};
pub use window::{HeadlessWindow, HostWindow};
