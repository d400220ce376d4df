//! Host-side orchestration for compute-kernel renderers: a primitive registry flattened into
//! kernel buffers every frame, per-profile parameter marshalling, render target lifetime and
//! progressive accumulation, behind an opaque [`renderer::compute_device::ComputeDevice`].

pub mod config;
pub mod engine;
pub mod helper;
pub mod renderer;
pub mod user_interface;
