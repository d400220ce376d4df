use super::{
    compute_device::{ComputeDevice, DeviceError},
    render_target::{RenderTarget, RenderTargetManager, TargetStatus},
};
use crate::user_interface::camera::CameraState;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

/// Exact bit pattern of the camera transforms. Any change, however small, counts as movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraFingerprint {
    camera_to_world: [u32; 16],
    inverse_projection: [u32; 16],
}

impl CameraFingerprint {
    pub fn new(camera: &CameraState) -> Self {
        Self {
            camera_to_world: camera.camera_to_world.to_cols_array().map(f32::to_bits),
            inverse_projection: camera.inverse_projection.to_cols_array().map(f32::to_bits),
        }
    }
}

/// What one frame contributes to the running average
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccumulationFrame {
    /// Zero based index of this sample since the last reset
    pub sample: u32,
    /// `1 / (sample + 1)`
    pub weight: f32,
    fingerprint: CameraFingerprint,
}

/// Progressive accumulation: averages successive jittered frames while the camera holds still.
///
/// The sample counter only advances through [`AccumulationState::commit`], so a frame that fails
/// part way leaves the counter untouched.
#[derive(Debug)]
pub struct AccumulationState {
    sample_count: u32,
    fingerprint: Option<CameraFingerprint>,
    buffer: RenderTargetManager,
}

impl AccumulationState {
    pub fn new() -> Self {
        Self {
            sample_count: 0,
            fingerprint: None,
            buffer: RenderTargetManager::new("accumulation buffer"),
        }
    }

    /// Works out this frame's sample index and blend weight without changing any state.
    /// Starts over at sample 0 if the camera moved or a target the average depends on was
    /// reallocated.
    pub fn begin_frame(&self, camera: &CameraState, targets_recreated: bool) -> AccumulationFrame {
        let fingerprint = CameraFingerprint::new(camera);
        let camera_moved = self.fingerprint != Some(fingerprint);
        let sample = if camera_moved || targets_recreated {
            0
        } else {
            self.sample_count
        };
        AccumulationFrame {
            sample,
            weight: 1. / (sample as f32 + 1.),
            fingerprint,
        }
    }

    /// Records a frame whose sample has been blended into the accumulation buffer
    pub fn commit(&mut self, frame: AccumulationFrame) {
        if frame.sample == 0 && self.sample_count != 0 {
            trace!("accumulation reset after {} samples", self.sample_count);
        }
        self.sample_count = frame.sample.saturating_add(1);
        self.fingerprint = Some(frame.fingerprint);
    }

    /// Forces the next frame to start a fresh average
    pub fn reset(&mut self) {
        self.sample_count = 0;
        self.fingerprint = None;
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn ensure_buffer<D: ComputeDevice + ?Sized>(
        &mut self,
        device: &mut D,
        width: u32,
        height: u32,
    ) -> Result<(RenderTarget, TargetStatus), DeviceError> {
        let ensured = self.buffer.ensure_target(device, width, height);
        if ensured.is_err() {
            self.reset();
        }
        ensured
    }

    pub fn release<D: ComputeDevice + ?Sized>(&mut self, device: &mut D) {
        self.buffer.release(device);
        self.reset();
    }
}

impl Default for AccumulationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user_interface::camera::{Camera, Viewport};
    use glam::DVec3;

    fn camera_at(z: f64) -> CameraState {
        Camera::looking_at(DVec3::new(0., 0., z), DVec3::ZERO).state(Viewport::new(16, 16))
    }

    #[test]
    fn weights_follow_sample_count() {
        let mut accumulation = AccumulationState::new();
        let camera = camera_at(5.);
        let mut weights = Vec::new();
        for _ in 0..4 {
            let frame = accumulation.begin_frame(&camera, false);
            weights.push(frame.weight);
            accumulation.commit(frame);
        }
        assert_eq!(weights, vec![1., 0.5, 1. / 3., 0.25]);
        assert_eq!(accumulation.sample_count(), 4);
    }

    #[test]
    fn camera_motion_resets() {
        let mut accumulation = AccumulationState::new();
        for _ in 0..3 {
            let frame = accumulation.begin_frame(&camera_at(5.), false);
            accumulation.commit(frame);
        }
        let moved = accumulation.begin_frame(&camera_at(5.0001), false);
        assert_eq!(moved.sample, 0);
        assert_eq!(moved.weight, 1.);
        accumulation.commit(moved);
        assert_eq!(accumulation.sample_count(), 1);

        // holding still at the new spot continues from there
        let next = accumulation.begin_frame(&camera_at(5.0001), false);
        assert_eq!(next.sample, 1);
    }

    #[test]
    fn uncommitted_frame_does_not_advance() {
        let mut accumulation = AccumulationState::new();
        let camera = camera_at(5.);
        let first = accumulation.begin_frame(&camera, false);
        accumulation.commit(first);

        let failed = accumulation.begin_frame(&camera, false);
        assert_eq!(failed.sample, 1);
        // frame failed, never committed
        let retry = accumulation.begin_frame(&camera, false);
        assert_eq!(retry.sample, 1);
    }

    #[test]
    fn target_recreation_resets() {
        let mut accumulation = AccumulationState::new();
        let camera = camera_at(5.);
        for _ in 0..5 {
            let frame = accumulation.begin_frame(&camera, false);
            accumulation.commit(frame);
        }
        let frame = accumulation.begin_frame(&camera, true);
        assert_eq!(frame.sample, 0);
    }
}
