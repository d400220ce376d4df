use crate::helper::angle::Angle;

/// Limits how close camera vertical direction can get to world space up
pub const VERTICAL_ANGLE_CLAMP: Angle = Angle::Degrees(1.);

pub const FIELD_OF_VIEW: Angle = Angle::Degrees(60.);
pub const CAMERA_NEAR_PLANE: f64 = 0.1;
pub const CAMERA_FAR_PLANE: f64 = 1000.;
pub const CAMERA_MIN_TARGET_DISTANCE: f64 = 0.5;
pub const CAMERA_MAX_TARGET_DISTANCE: f64 = 500.;

/// Mandelbrot explorer navigation
pub const EXPLORER_SMOOTHING: f32 = 0.03;
pub const EXPLORER_ZOOM_IN_FACTOR: f32 = 0.99;
pub const EXPLORER_ZOOM_OUT_FACTOR: f32 = 1.01;
pub const EXPLORER_ROTATE_STEP: f32 = 0.01;
pub const EXPLORER_MOVE_STEP: f32 = 0.01;
pub const EXPLORER_DEFAULT_SCALE: f32 = 4.;
