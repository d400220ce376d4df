use super::{
    compute_device::{ComputeDevice, DeviceError, ImageHandle, RenderTargetDesc},
    config_renderer::RENDER_TARGET_FORMAT,
};
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    pub image: ImageHandle,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetStatus {
    /// The existing target already matched
    Reused,
    /// A new target was allocated. Anything derived from the old contents is invalid.
    Created,
}

/// Owns one kernel-writable image that survives across frames and follows the viewport size.
#[derive(Debug)]
pub struct RenderTargetManager {
    label: &'static str,
    target: Option<RenderTarget>,
}

impl RenderTargetManager {
    pub const fn new(label: &'static str) -> Self {
        Self {
            label,
            target: None,
        }
    }

    /// Returns a target of exactly `width` x `height`, reallocating if the size changed. The old
    /// target is released before the new one is requested, so a failed allocation leaves the
    /// manager empty rather than holding a target of the wrong size.
    pub fn ensure_target<D: ComputeDevice + ?Sized>(
        &mut self,
        device: &mut D,
        width: u32,
        height: u32,
    ) -> Result<(RenderTarget, TargetStatus), DeviceError> {
        if let Some(target) = self.target {
            if target.width == width && target.height == height {
                return Ok((target, TargetStatus::Reused));
            }
        }

        self.release(device);

        let image = device.create_render_target(RenderTargetDesc {
            width,
            height,
            format: RENDER_TARGET_FORMAT,
        })?;
        debug!("allocated {} {}x{}", self.label, width, height);

        let target = RenderTarget {
            image,
            width,
            height,
        };
        self.target = Some(target);
        Ok((target, TargetStatus::Created))
    }

    pub fn release<D: ComputeDevice + ?Sized>(&mut self, device: &mut D) {
        if let Some(old_target) = self.target.take() {
            trace!(
                "releasing {} {}x{}",
                self.label,
                old_target.width,
                old_target.height
            );
            device.release_render_target(old_target.image);
        }
    }

    pub fn current(&self) -> Option<RenderTarget> {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::test_device::{DeviceCall, RecordingDevice};

    #[test]
    fn same_size_is_reused() {
        let mut device = RecordingDevice::with_kernels(&[]);
        let mut manager = RenderTargetManager::new("test target");

        let (first, status) = manager.ensure_target(&mut device, 64, 32).unwrap();
        assert_eq!(status, TargetStatus::Created);
        let (second, status) = manager.ensure_target(&mut device, 64, 32).unwrap();
        assert_eq!(status, TargetStatus::Reused);
        assert_eq!(first, second);
        assert_eq!(device.created_target_count(), 1);
    }

    #[test]
    fn resize_releases_before_allocating() {
        let mut device = RecordingDevice::with_kernels(&[]);
        let mut manager = RenderTargetManager::new("test target");

        let (first, _) = manager.ensure_target(&mut device, 64, 32).unwrap();
        device.clear_calls();
        let (second, status) = manager.ensure_target(&mut device, 65, 32).unwrap();

        assert_eq!(status, TargetStatus::Created);
        assert_eq!((second.width, second.height), (65, 32));
        assert_eq!(
            device.calls,
            vec![
                DeviceCall::ReleaseTarget(first.image),
                DeviceCall::CreateTarget {
                    width: 65,
                    height: 32
                },
            ]
        );
        assert_eq!(device.targets.len(), 1);
    }

    #[test]
    fn failed_allocation_leaves_manager_empty() {
        let mut device = RecordingDevice::with_kernels(&[]);
        let mut manager = RenderTargetManager::new("test target");
        manager.ensure_target(&mut device, 8, 8).unwrap();

        device.fail_target_allocation = true;
        assert!(manager.ensure_target(&mut device, 16, 16).is_err());
        assert_eq!(manager.current(), None);
        assert!(device.targets.is_empty());

        device.fail_target_allocation = false;
        let (_, status) = manager.ensure_target(&mut device, 16, 16).unwrap();
        assert_eq!(status, TargetStatus::Created);
    }
}
