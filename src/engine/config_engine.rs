use glam::Vec3;

pub const DEFAULT_POSITION: Vec3 = Vec3::ZERO;
pub const DEFAULT_SCALE: Vec3 = Vec3::ONE;
pub const DEFAULT_COLOR: Vec3 = Vec3::ONE;
pub const DEFAULT_BLEND_STRENGTH: f32 = 0.;

/// The blend strength authored on a primitive is in [0, 1]; kernels expect it pre-scaled.
pub const BLEND_STRENGTH_KERNEL_FACTOR: f32 = 3.;

pub mod primitive_names {
    pub const SPHERE: &str = "Sphere";
    pub const CUBE: &str = "Cube";
    pub const TORUS: &str = "Torus";
}

pub const DEFAULT_LIGHT_INTENSITY: f32 = 1.;
pub const DEFAULT_SPOT_ANGLE_DEGREES: f32 = 30.;

pub const LOCAL_STORAGE_DIR: &str = ".heliodor";
pub const SAVE_STATE_FILENAME_CAMERA: &str = "camera.hsave";
pub const SAVE_STATE_FILENAME_PRIMITIVES: &str = "primitives.hsave";
