//! In-memory [`ComputeDevice`] that records every call. Test only.

use super::{
    compute_device::{
        BufferHandle, ComputeDevice, DeviceError, ImageHandle, KernelHandle, RenderTargetDesc,
    },
    shader_interfaces::kernel_params::KernelParam,
};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    FindKernel(String),
    CreateBuffer { name: String, stride: usize, count: usize },
    ReleaseBuffer(BufferHandle),
    CreateTarget { width: u32, height: u32 },
    ReleaseTarget(ImageHandle),
    Dispatch { thread_groups: [u32; 3] },
    Blit { source: ImageHandle, destination: ImageHandle },
    Blend { source: ImageHandle, destination: ImageHandle, weight: f32 },
}

#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub calls: Vec<DeviceCall>,
    pub kernels: Vec<String>,
    /// Bytes of every live buffer, keyed by handle
    pub buffers: BTreeMap<u64, (String, Vec<u8>)>,
    pub targets: BTreeMap<u64, RenderTargetDesc>,
    /// Parameters of the most recent dispatch
    pub last_params: Vec<KernelParam>,
    pub fail_buffer_named: Option<String>,
    pub fail_target_allocation: bool,
    pub fail_dispatch: bool,
    pub fail_blit: bool,
    next_handle: u64,
}

impl RecordingDevice {
    /// Device exposing the given kernel entry points
    pub fn with_kernels(kernels: &[&str]) -> Self {
        Self {
            kernels: kernels.iter().map(|k| k.to_string()).collect(),
            next_handle: 1,
            ..Default::default()
        }
    }

    pub fn dispatch_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::Dispatch { .. }))
            .count()
    }

    pub fn created_buffer_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::CreateBuffer { .. }))
            .count()
    }

    pub fn released_buffer_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::ReleaseBuffer(_)))
            .count()
    }

    pub fn created_target_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DeviceCall::CreateTarget { .. }))
            .count()
    }

    pub fn blend_weights(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::Blend { weight, .. } => Some(*weight),
                _ => None,
            })
            .collect()
    }

    /// Folds `samples` through the recorded blend weights the way the accumulation buffer would
    pub fn running_average(&self, samples: &[f32]) -> f32 {
        self.blend_weights()
            .iter()
            .zip(samples)
            .fold(0., |average, (weight, sample)| {
                average + (sample - average) * weight
            })
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// A destination image owned by the host, not by any renderer
    pub fn host_image(&mut self) -> ImageHandle {
        ImageHandle(self.next_handle())
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle.max(1);
        self.next_handle = handle + 1;
        handle
    }
}

impl ComputeDevice for RecordingDevice {
    fn find_kernel(&mut self, entry_point: &str) -> Result<KernelHandle, DeviceError> {
        self.calls.push(DeviceCall::FindKernel(entry_point.to_string()));
        self.kernels
            .iter()
            .position(|k| k == entry_point)
            .map(|index| KernelHandle(index as u64))
            .ok_or_else(|| DeviceError::KernelNotFound(entry_point.to_string()))
    }

    fn create_storage_buffer(
        &mut self,
        name: &str,
        stride: usize,
        count: usize,
        bytes: &[u8],
    ) -> Result<BufferHandle, DeviceError> {
        self.calls.push(DeviceCall::CreateBuffer {
            name: name.to_string(),
            stride,
            count,
        });
        if self.fail_buffer_named.as_deref() == Some(name) {
            return Err(DeviceError::AllocationFailed {
                name: name.to_string(),
                size: bytes.len(),
            });
        }
        let handle = self.next_handle();
        self.buffers
            .insert(handle, (name.to_string(), bytes.to_vec()));
        Ok(BufferHandle(handle))
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        self.calls.push(DeviceCall::ReleaseBuffer(buffer));
        self.buffers.remove(&buffer.0);
    }

    fn create_render_target(&mut self, desc: RenderTargetDesc) -> Result<ImageHandle, DeviceError> {
        self.calls.push(DeviceCall::CreateTarget {
            width: desc.width,
            height: desc.height,
        });
        if self.fail_target_allocation {
            return Err(DeviceError::AllocationFailed {
                name: "render target".to_string(),
                size: desc.width as usize * desc.height as usize * desc.format.bytes_per_pixel(),
            });
        }
        let handle = self.next_handle();
        self.targets.insert(handle, desc);
        Ok(ImageHandle(handle))
    }

    fn release_render_target(&mut self, image: ImageHandle) {
        self.calls.push(DeviceCall::ReleaseTarget(image));
        self.targets.remove(&image.0);
    }

    fn dispatch(
        &mut self,
        _kernel: KernelHandle,
        params: &[KernelParam],
        thread_groups: [u32; 3],
    ) -> Result<(), DeviceError> {
        self.calls.push(DeviceCall::Dispatch { thread_groups });
        self.last_params = params.to_vec();
        if self.fail_dispatch {
            return Err(DeviceError::DispatchFailed("injected failure".to_string()));
        }
        Ok(())
    }

    fn blit(&mut self, source: ImageHandle, destination: ImageHandle) -> Result<(), DeviceError> {
        self.calls.push(DeviceCall::Blit {
            source,
            destination,
        });
        if self.fail_blit {
            return Err(DeviceError::DispatchFailed("injected blit failure".to_string()));
        }
        Ok(())
    }

    fn blend(
        &mut self,
        source: ImageHandle,
        destination: ImageHandle,
        weight: f32,
    ) -> Result<(), DeviceError> {
        self.calls.push(DeviceCall::Blend {
            source,
            destination,
            weight,
        });
        Ok(())
    }
}
