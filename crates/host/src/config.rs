use crate::error::HostError;
use graphon_common::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Camera parameters applied at initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial distance of the camera from the playing field along +Z.
    pub depth_offset: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 35.0,
            near: 0.1,
            far: 5000.0,
            depth_offset: 1500.0,
        }
    }
}

/// Renderer parameters applied at initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Packed `0xRRGGBB` clear color.
    pub clear_color: u32,
    pub clear_alpha: f32,
    pub antialias: bool,
    pub shadow_map: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: 0xdddddd,
            clear_alpha: 1.0,
            antialias: true,
            shadow_map: true,
        }
    }
}

impl RendererConfig {
    pub fn clear_color(&self) -> Color {
        Color::from_hex(self.clear_color, self.clear_alpha)
    }
}

/// Graphics host configuration.
///
/// Every field has a default, so a YAML file only needs the keys it changes:
///
/// ```yaml
/// camera:
///   fov_degrees: 45
/// renderer:
///   shadow_map: false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub camera: CameraConfig,
    pub renderer: RendererConfig,
}

impl HostConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, HostError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    pub fn validate(&self) -> Result<(), HostError> {
        let cam = &self.camera;
        if !(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0) {
            return Err(HostError::InvalidConfig(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                cam.fov_degrees
            )));
        }
        if !(cam.near > 0.0) {
            return Err(HostError::InvalidConfig(format!(
                "camera.near must be positive, got {}",
                cam.near
            )));
        }
        if !(cam.far > cam.near) {
            return Err(HostError::InvalidConfig(format!(
                "camera.far ({}) must exceed camera.near ({})",
                cam.far, cam.near
            )));
        }
        if !(0.0..=1.0).contains(&self.renderer.clear_alpha) {
            return Err(HostError::InvalidConfig(format!(
                "renderer.clear_alpha must be in [0, 1], got {}",
                self.renderer.clear_alpha
            )));
        }
        Ok(())
    }
}
