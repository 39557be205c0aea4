//! Shared value types for the graphon graphics host.

mod types;

pub use types::{Color, ObjectId, PlayerPosition, ScreenSize, SurfaceId, Transform};
