use super::config_engine::{DEFAULT_LIGHT_INTENSITY, DEFAULT_SPOT_ANGLE_DEGREES};
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Light kinds, numbered the way kernels decode them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightKind {
    Spot,
    Directional,
    Point,
    Area,
}

impl LightKind {
    pub fn kind_code(&self) -> i32 {
        match *self {
            Self::Spot => 0,
            Self::Directional => 1,
            Self::Point => 2,
            Self::Area => 3,
        }
    }
}

/// A light as the host sees it. Flattened into `lightsBuffer` every frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightDescriptor {
    pub position: Vec3,
    /// Forward direction, expected to be normalized
    pub direction: Vec3,
    /// RGBA
    pub color: Vec4,
    pub intensity: f32,
    pub kind: LightKind,
    /// Full cone angle in degrees. Only meaningful for [`LightKind::Spot`].
    pub spot_angle: f32,
}

impl LightDescriptor {
    pub fn directional(direction: Vec3) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            ..Default::default()
        }
    }

    pub fn point(position: Vec3, color: Vec4, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity,
            kind: LightKind::Point,
            ..Default::default()
        }
    }
}

impl Default for LightDescriptor {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Y,
            color: Vec4::ONE,
            intensity: DEFAULT_LIGHT_INTENSITY,
            kind: LightKind::Directional,
            spot_angle: DEFAULT_SPOT_ANGLE_DEGREES,
        }
    }
}
