//! Rendering interface: scene, perspective camera, renderer traits.
//!
//! # Invariants
//! - Renderers never mutate the scene or the camera.
//! - The camera projection only changes through `update_projection_matrix`.
//! - The scene is append-only and draws objects in insertion order.

mod camera;
mod error;
mod renderer;
mod scene;

pub use camera::PerspectiveCamera;
pub use error::RenderError;
pub use renderer::{
    DebugTextFactory, DebugTextRenderer, OutputSurface, RendererFactory, RendererSettings,
    SceneRenderer,
};
pub use scene::{Object3D, ObjectRef, Scene};
