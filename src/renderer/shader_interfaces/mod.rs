pub mod kernel_params;
pub mod light_buffer;
pub mod shape_buffer;
