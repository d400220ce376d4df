//! Headless Vulkan implementation of [`ComputeDevice`](super::compute_device::ComputeDevice).
//!
//! Kernels are SPIR-V compute shaders sharing one descriptor set layout:
//!
//! | binding | type           | parameter                                  |
//! |---------|----------------|--------------------------------------------|
//! | 0       | uniform buffer | scalars, vectors and matrices, in order    |
//! | 1       | storage buffer | `shapesBuffer`                             |
//! | 2       | storage buffer | `lightsBuffer`                             |
//! | 3       | storage image  | `Result` (`Accumulation` for blending)     |
//! | 4       | storage image  | `Source`                                   |
//! | 5       | storage image  | `_SkyboxTexture` or `ColorGradients`       |
//!
//! Bindings a frame doesn't provide are filled with small placeholders so every kernel sees a
//! complete set.

pub mod kernel_source;
mod resources;
mod vulkan_device;
pub mod vulkan_init;

pub use vulkan_device::VulkanComputeDevice;

use crate::renderer::shader_interfaces::kernel_params::param_names;

pub(crate) mod bindings {
    pub const UNIFORMS: u32 = 0;
    pub const SHAPES: u32 = 1;
    pub const LIGHTS: u32 = 2;
    pub const RESULT: u32 = 3;
    pub const SOURCE: u32 = 4;
    pub const AUX_IMAGE: u32 = 5;
}

/// Binding slot for a named buffer or image parameter
pub(crate) fn binding_for(name: &str) -> Option<u32> {
    match name {
        param_names::SHAPES_BUFFER => Some(bindings::SHAPES),
        param_names::LIGHTS_BUFFER => Some(bindings::LIGHTS),
        param_names::RESULT | param_names::ACCUMULATION => Some(bindings::RESULT),
        param_names::SOURCE => Some(bindings::SOURCE),
        param_names::SKYBOX_TEXTURE | param_names::COLOR_GRADIENTS => Some(bindings::AUX_IMAGE),
        _ => None,
    }
}
