//! wgpu render backend for the graphon graphics host.
//!
//! Draws every scene object as an instanced, lit unit box. Antialiasing uses
//! 4x MSAA; shadow mapping renders casters from a directional light into a
//! depth map sampled by receivers.
//!
//! # Invariants
//! - Renderer never mutates the scene or the camera.
//! - Size-dependent targets are recreated on every `set_size`.

mod factory;
mod gpu;
mod shaders;

pub use factory::WgpuRendererFactory;
pub use gpu::WgpuRenderer;
