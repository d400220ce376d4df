pub mod accumulation;
pub mod compute_device;
pub mod config_renderer;
pub mod dispatch;
pub mod frame_params;
pub mod render_target;
pub mod shader_interfaces;
#[cfg(feature = "vulkan")]
pub mod vulkan;

#[cfg(test)]
mod test_device;
