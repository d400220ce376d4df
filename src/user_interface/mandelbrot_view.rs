use super::{
    camera::Viewport,
    config_ui::{
        EXPLORER_DEFAULT_SCALE, EXPLORER_MOVE_STEP, EXPLORER_ROTATE_STEP, EXPLORER_SMOOTHING,
        EXPLORER_ZOOM_IN_FACTOR, EXPLORER_ZOOM_OUT_FACTOR,
    },
    input::InputState,
};
use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Pan/zoom/rotate state of the fractal explorer.
///
/// Input moves the target values; the smoothed values chase them a fixed fraction per step and
/// are what the kernel sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MandelbrotView {
    position: Vec2,
    scale: f32,
    angle: f32,
    smooth_position: Vec2,
    smooth_scale: f32,
    smooth_angle: f32,
}

impl MandelbrotView {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: EXPLORER_DEFAULT_SCALE,
            angle: 0.,
            smooth_position: Vec2::ZERO,
            smooth_scale: EXPLORER_DEFAULT_SCALE,
            smooth_angle: 0.,
        }
    }

    /// One fixed-rate step: smooth towards the targets, then apply held input.
    pub fn fixed_update(&mut self, input: &InputState) {
        self.smooth_position = self.smooth_position.lerp(self.position, EXPLORER_SMOOTHING);
        self.smooth_scale = lerp(self.smooth_scale, self.scale, EXPLORER_SMOOTHING);
        self.smooth_angle = lerp(self.smooth_angle, self.angle, EXPLORER_SMOOTHING);

        if let Some(zoom) = input.zoom.read() {
            self.zoom(zoom);
        }
        if let Some(rotation) = input.rotation.read() {
            self.rotate(rotation);
        }
        if let Some(movement) = input.movement.read() {
            self.pan(movement);
        }
    }

    /// Positive zooms in
    pub fn zoom(&mut self, zoom_value: f32) {
        if zoom_value > 0. {
            self.scale *= EXPLORER_ZOOM_IN_FACTOR;
        } else {
            self.scale *= EXPLORER_ZOOM_OUT_FACTOR;
        }
    }

    /// Positive rotates clockwise
    pub fn rotate(&mut self, direction: f32) {
        if direction > 0. {
            self.angle -= EXPLORER_ROTATE_STEP;
        } else {
            self.angle += EXPLORER_ROTATE_STEP;
        }
    }

    /// Steps one unit along each non-zero axis of `movement`, in the rotated view frame
    pub fn pan(&mut self, movement: Vec2) {
        let step_x = Vec2::from_angle(self.angle).rotate(Vec2::new(EXPLORER_MOVE_STEP * self.scale, 0.));
        self.position += step_x * axis_sign(movement.x);

        let step_y = step_x.perp();
        self.position += step_y * axis_sign(movement.y);
    }

    /// `(center.x, center.y, extent.x, extent.y)` with the extent corrected for the viewport's
    /// aspect ratio so the fractal isn't stretched
    pub fn area(&self, viewport: Viewport) -> Vec4 {
        let mut scale_x = self.smooth_scale;
        let mut scale_y = self.smooth_scale;
        let aspect_ratio = viewport.aspect_ratio() as f32;
        if aspect_ratio > 1. {
            scale_y /= aspect_ratio;
        } else {
            scale_x *= aspect_ratio;
        }
        Vec4::new(
            self.smooth_position.x,
            self.smooth_position.y,
            scale_x,
            scale_y,
        )
    }

    pub fn smooth_angle(&self) -> f32 {
        self.smooth_angle
    }

    pub fn target_scale(&self) -> f32 {
        self.scale
    }

    pub fn target_position(&self) -> Vec2 {
        self.position
    }

    pub fn target_angle(&self) -> f32 {
        self.angle
    }
}

impl Default for MandelbrotView {
    fn default() -> Self {
        Self::new()
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

fn axis_sign(value: f32) -> f32 {
    if value > 0. {
        1.
    } else if value < 0. {
        -1.
    } else {
        0.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_and_rotate_steps() {
        let mut view = MandelbrotView::new();
        view.zoom(1.);
        assert!((view.target_scale() - 4. * 0.99).abs() < 1e-6);
        view.zoom(-1.);
        assert!((view.target_scale() - 4. * 0.99 * 1.01).abs() < 1e-6);

        view.rotate(1.);
        assert!((view.target_angle() + 0.01).abs() < 1e-6);
        view.rotate(0.);
        assert!(view.target_angle().abs() < 1e-6);
    }

    #[test]
    fn pan_follows_rotation() {
        let mut view = MandelbrotView::new();
        view.pan(Vec2::new(1., 0.));
        assert!(view.target_position().abs_diff_eq(Vec2::new(0.04, 0.), 1e-6));

        let mut rotated = MandelbrotView::new();
        rotated.angle = std::f32::consts::FRAC_PI_2;
        rotated.pan(Vec2::new(0.3, 0.));
        assert!(rotated.target_position().abs_diff_eq(Vec2::new(0., 0.04), 1e-6));
        rotated.pan(Vec2::new(0., -2.));
        assert!(rotated.target_position().abs_diff_eq(Vec2::new(0.04, 0.04), 1e-6));
    }

    #[test]
    fn smoothing_chases_target() {
        let mut view = MandelbrotView::new();
        let mut input = InputState::default();
        input.zoom.performed(1.);
        view.fixed_update(&input);
        // smoothing happens before input is applied
        assert_eq!(view.area(Viewport::new(100, 100)).z, 4.);
        view.fixed_update(&input);
        assert!(view.area(Viewport::new(100, 100)).z < 4.);

        input.zoom.canceled();
        let held_scale = view.target_scale();
        view.fixed_update(&input);
        assert_eq!(view.target_scale(), held_scale);
    }

    #[test]
    fn area_is_aspect_corrected() {
        let view = MandelbrotView::new();
        assert_eq!(view.area(Viewport::new(200, 100)), Vec4::new(0., 0., 4., 2.));
        assert_eq!(view.area(Viewport::new(100, 200)), Vec4::new(0., 0., 2., 4.));
    }
}
