//! Demo content: a ground slab, a ring of pillars and a spinning crate.

use glam::{Quat, Vec3};
use graphon_common::{Color, PlayerPosition, Transform};
use graphon_host::{FnEntry, GraphicsHost, HostError};
use graphon_render::{Object3D, SceneRenderer};

const PILLAR_COUNT: usize = 8;
const PILLAR_RING_RADIUS: f32 = 600.0;
const SPIN_PER_FRAME: f32 = 0.02;

/// Fill the scene with static scenery and one animated object.
pub fn populate<R: SceneRenderer + 'static>(host: &mut GraphicsHost<R>) -> Result<(), HostError> {
    let mut ground = Object3D::new(
        Transform {
            position: Vec3::new(0.0, 0.0, -10.0),
            scale: Vec3::new(4000.0, 4000.0, 20.0),
            ..Transform::default()
        },
        Color::from_hex(0x9aab7f, 1.0),
    );
    ground.cast_shadow = false;
    host.add_static(ground.into_ref())?;

    for i in 0..PILLAR_COUNT {
        let angle = i as f32 / PILLAR_COUNT as f32 * std::f32::consts::TAU;
        let pillar = Object3D::new(
            Transform {
                position: Vec3::new(
                    angle.cos() * PILLAR_RING_RADIUS,
                    angle.sin() * PILLAR_RING_RADIUS,
                    100.0,
                ),
                scale: Vec3::new(60.0, 60.0, 200.0),
                ..Transform::default()
            },
            Color::from_hex(0x7f8c8d, 1.0),
        );
        host.add_static(pillar.into_ref())?;
    }

    let crate_box = Object3D::new(
        Transform {
            position: Vec3::new(0.0, 0.0, 80.0),
            scale: Vec3::splat(120.0),
            ..Transform::default()
        },
        Color::from_hex(0xc0392b, 1.0),
    )
    .into_ref();
    let handle = crate_box.clone();
    let mut angle = 0.0_f32;
    host.add_dynamic(FnEntry::new(crate_box, move || {
        angle += SPIN_PER_FRAME;
        handle.borrow_mut().transform.rotation =
            Quat::from_rotation_z(angle) * Quat::from_rotation_x(0.4);
    }))?;

    tracing::info!(statics = PILLAR_COUNT + 1, dynamics = 1, "demo scene populated");
    Ok(())
}

/// Moves the player slowly around a circle so the camera has something to
/// follow without any input handling.
#[derive(Debug, Clone, Copy)]
pub struct PlayerDrift {
    pub radius: f32,
    /// Seconds per full revolution.
    pub period: f32,
}

impl Default for PlayerDrift {
    fn default() -> Self {
        Self {
            radius: 300.0,
            period: 20.0,
        }
    }
}

impl PlayerDrift {
    pub fn position_at(&self, elapsed_secs: f32) -> PlayerPosition {
        let angle = elapsed_secs / self.period * std::f32::consts::TAU;
        PlayerPosition::new(angle.cos() * self.radius, angle.sin() * self.radius)
    }
}
