use super::config_ui;
use crate::{config, helper::angle::Angle};
use glam::{DMat3, DMat4, DVec3, Mat4, Vec3};
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};

/// Size of the surface being rendered, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height. 1 for an empty viewport.
    pub fn aspect_ratio(&self) -> f64 {
        if self.is_empty() {
            1.
        } else {
            self.width as f64 / self.height as f64
        }
    }
}

/// Read-only camera snapshot consumed by the renderer for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub camera_to_world: Mat4,
    pub inverse_projection: Mat4,
    pub position: Vec3,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LookMode {
    /// Look in a given direction
    Direction,
    /// Lock on to a target position
    Target(DVec3),
}

/// Describes the orientation and properties of a camera that can be used for perspective rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    position: DVec3,
    look_mode: LookMode,
    direction: DVec3,
    fov: Angle,
    near_plane: f64,
    far_plane: f64,
}

// Public functions
impl Camera {
    /// Camera at `position` locked on to `target`
    pub fn looking_at(position: DVec3, target: DVec3) -> Self {
        let direction = (target - position).try_normalize().unwrap_or(DVec3::NEG_Z);
        Self {
            position,
            look_mode: LookMode::Target(target),
            direction,
            fov: config_ui::FIELD_OF_VIEW,
            near_plane: config_ui::CAMERA_NEAR_PLANE,
            far_plane: config_ui::CAMERA_FAR_PLANE,
        }
    }

    /// Rotates the camera. In direction mode the view direction turns in place, in target mode the
    /// camera position orbits the target.
    pub fn rotate(&mut self, delta_h: Angle, delta_v: Angle) {
        match self.look_mode {
            LookMode::Direction => self.rotate_fixed_pos(delta_h, delta_v),
            LookMode::Target(target_pos) => self.arcball(target_pos, delta_h, delta_v),
        }
    }

    /// Move camera position forwards/backwards. `scroll_delta` is number of scroll clicks.
    pub fn scroll_zoom(&mut self, scroll_delta: f64) {
        match self.look_mode {
            LookMode::Direction => {
                self.set_position(self.position + scroll_delta * self.direction);
            }
            LookMode::Target(target_pos) => self.scroll_zoom_target(scroll_delta, target_pos),
        }
    }

    pub fn set_lock_on_target(&mut self, target_pos: DVec3) {
        self.look_mode = LookMode::Target(target_pos);
        self.set_direction(target_pos);
    }

    pub fn unset_lock_on_target(&mut self) {
        if let LookMode::Target(target_pos) = self.look_mode {
            self.set_direction(target_pos);
            self.look_mode = LookMode::Direction;
        }
    }

    pub fn set_fov(&mut self, fov: Angle) {
        self.fov = fov;
    }

    pub fn view_matrix(&self) -> DMat4 {
        let target_pos = match self.look_mode {
            LookMode::Direction => self.position + self.direction,
            LookMode::Target(target_pos) => target_pos,
        };
        DMat4::look_at_rh(self.position, target_pos, config::WORLD_SPACE_UP)
    }

    pub fn proj_matrix(&self, viewport: Viewport) -> DMat4 {
        DMat4::perspective_rh(
            self.fov.radians(),
            viewport.aspect_ratio(),
            self.near_plane,
            self.far_plane,
        )
    }

    /// Snapshot for the renderer. Matrices are computed in double precision then narrowed.
    pub fn state(&self, viewport: Viewport) -> CameraState {
        CameraState {
            camera_to_world: self.view_matrix().inverse().as_mat4(),
            inverse_projection: self.proj_matrix(viewport).inverse().as_mat4(),
            position: self.position.as_vec3(),
            viewport,
        }
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn look_mode(&self) -> LookMode {
        self.look_mode
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at(DVec3::new(0., 1., -5.), DVec3::ZERO)
    }
}

// Private functions

impl Camera {
    fn normal(&self) -> DVec3 {
        config::WORLD_SPACE_UP
            .cross(self.direction)
            .try_normalize()
            .unwrap_or(DVec3::X)
    }

    /// Sets the camera position if `new_pos` doesn't contain NaN or +-inf
    fn set_position(&mut self, new_pos: DVec3) {
        if new_pos.is_finite() {
            self.position = new_pos;
        }
    }

    fn set_direction(&mut self, target_pos: DVec3) {
        if let Some(direction) = (target_pos - self.position).try_normalize() {
            self.direction = direction;
        }
    }

    fn rotate_fixed_pos(&mut self, delta_h: Angle, delta_v: Angle) {
        let delta_v_clamped = self.clamp_vertical_angle_delta(delta_v.invert());

        let rotation_matrix = DMat3::from_axis_angle(self.normal(), delta_v_clamped.radians())
            * DMat3::from_axis_angle(config::WORLD_SPACE_UP, delta_h.radians());
        self.direction = (rotation_matrix * self.direction).normalize();
    }

    fn arcball(&mut self, target_pos: DVec3, delta_h: Angle, delta_v: Angle) {
        let delta_v_clamped = self.clamp_vertical_angle_delta(delta_v);

        // lock on target stays the same but camera position rotates around it
        let rotation_matrix = DMat3::from_axis_angle(self.normal(), delta_v_clamped.radians())
            * DMat3::from_axis_angle(config::WORLD_SPACE_UP, -delta_h.radians());

        self.set_position(rotation_matrix * (self.position - target_pos) + target_pos);
        self.set_direction(target_pos);
    }

    /// Limits how close camera vertical direction can get to world space up.
    /// Also prevents camera angle from crossing over world space up and doing a disorienting flip.
    fn clamp_vertical_angle_delta(&self, delta_v: Angle) -> Angle {
        let current_v_radians = config::WORLD_SPACE_UP.angle_between(self.direction);
        let final_v_radians = current_v_radians + delta_v.radians();

        let min_radians = config_ui::VERTICAL_ANGLE_CLAMP.radians();
        if final_v_radians < min_radians {
            return Angle::from_radians(min_radians - current_v_radians);
        }

        let max_radians = std::f64::consts::PI - config_ui::VERTICAL_ANGLE_CLAMP.radians();
        if final_v_radians > max_radians {
            return Angle::from_radians(max_radians - current_v_radians);
        }

        delta_v
    }

    fn scroll_zoom_target(&mut self, scroll_delta: f64, target_pos: DVec3) {
        if scroll_delta == 0. {
            return;
        }

        let target_vector = target_pos - self.position;
        let target_vector_length = target_vector.length();
        if target_vector_length == 0. {
            return;
        }

        // how far along that vector we want to travel, clamped to the allowed distance range
        let max_travel_factor = 1. - config_ui::CAMERA_MIN_TARGET_DISTANCE / target_vector_length;
        let min_travel_factor = 1. - config_ui::CAMERA_MAX_TARGET_DISTANCE / target_vector_length;
        let travel_factor = dual_asymptote(scroll_delta).clamp(min_travel_factor, max_travel_factor);

        self.set_position(self.position + target_vector * travel_factor);
    }
}

/// (2^x - 1) / (2^x + 1)
///
/// Has asymptote at y = 1 when x = +∞ and another at y = -1 when x = -∞.
/// Gradient is 1 at x = 0.
fn dual_asymptote(x: f64) -> f64 {
    (2_f64.powf(x) - 1.) / (2_f64.powf(x) + 1.)
}
