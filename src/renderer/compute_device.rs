use super::shader_interfaces::kernel_params::KernelParam;
use std::{error, fmt};

// ~~ Handles ~~

/// Opaque reference to a compiled kernel entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelHandle(pub u64);

/// Opaque reference to a device storage buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Opaque reference to a device image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    /// 4x32-bit float, linear color space
    Rgba32Float,
}

impl TargetFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match *self {
            Self::Rgba32Float => 16,
        }
    }
}

/// Describes a render target allocation. Targets are always writable from kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetDesc {
    pub width: u32,
    pub height: u32,
    pub format: TargetFormat,
}

// ~~ Compute Device ~~

/// The GPU as seen by the frame orchestration. Everything behind this trait is opaque: kernels
/// are addressed by entry point name and resources by handle.
pub trait ComputeDevice {
    /// Resolves a kernel entry point. Called once when a renderer is set up, never per frame.
    fn find_kernel(&mut self, entry_point: &str) -> Result<KernelHandle, DeviceError>;

    /// Allocates a storage buffer holding `count` elements of `stride` bytes initialized from
    /// `bytes`. `count` may be zero.
    fn create_storage_buffer(
        &mut self,
        name: &str,
        stride: usize,
        count: usize,
        bytes: &[u8],
    ) -> Result<BufferHandle, DeviceError>;

    fn release_buffer(&mut self, buffer: BufferHandle);

    fn create_render_target(&mut self, desc: RenderTargetDesc) -> Result<ImageHandle, DeviceError>;

    fn release_render_target(&mut self, image: ImageHandle);

    /// Runs `kernel` over `thread_groups` workgroups with the named parameters bound. Returns once
    /// the writes to `Result` are visible to [`ComputeDevice::blit`] and [`ComputeDevice::blend`].
    fn dispatch(
        &mut self,
        kernel: KernelHandle,
        params: &[KernelParam],
        thread_groups: [u32; 3],
    ) -> Result<(), DeviceError>;

    /// Copies `source` into `destination`
    fn blit(&mut self, source: ImageHandle, destination: ImageHandle) -> Result<(), DeviceError>;

    /// `destination = mix(destination, source, weight)` per pixel
    fn blend(
        &mut self,
        source: ImageHandle,
        destination: ImageHandle,
        weight: f32,
    ) -> Result<(), DeviceError>;
}

// ~~ Errors ~~

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceError {
    KernelNotFound(String),
    AllocationFailed { name: String, size: usize },
    DispatchFailed(String),
    InvalidHandle(u64),
    /// Device can't perform the requested operation
    Unsupported(&'static str),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KernelNotFound(entry_point) => {
                write!(f, "kernel entry point `{}` not found", entry_point)
            }
            Self::AllocationFailed { name, size } => {
                write!(f, "failed to allocate {} bytes for {}", size, name)
            }
            Self::DispatchFailed(reason) => write!(f, "kernel dispatch failed: {}", reason),
            Self::InvalidHandle(raw) => write!(f, "invalid device handle {}", raw),
            Self::Unsupported(what) => write!(f, "device does not support {}", what),
        }
    }
}

impl error::Error for DeviceError {}

/// Problems with how a renderer is set up rather than with the device. Skips the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    KernelMissing { entry_point: String, reason: String },
    /// A resource the renderer profile needs was never provided
    ReferenceUnset(&'static str),
    UnsupportedViewport { width: u32, height: u32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KernelMissing {
                entry_point,
                reason,
            } => write!(f, "kernel `{}` unavailable: {}", entry_point, reason),
            Self::ReferenceUnset(name) => write!(f, "required reference `{}` is unset", name),
            Self::UnsupportedViewport { width, height } => {
                write!(f, "viewport {}x{} can't be rendered", width, height)
            }
        }
    }
}

impl error::Error for ConfigError {}
