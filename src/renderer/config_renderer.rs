use super::compute_device::TargetFormat;

/// Name of the kernel entry point looked up on every compute device
pub const KERNEL_ENTRY_POINT: &str = "CSMain";
/// Name of the entry point of the accumulation blend kernel
pub const BLEND_ENTRY_POINT: &str = "CSMain";

/// Kernels are compiled with an 8x8x1 local workgroup
pub const THREAD_GROUP_SIZE: [u32; 3] = [8, 8, 1];

/// Matches the 4x32-bit float random-write texture the kernels expect
pub const RENDER_TARGET_FORMAT: TargetFormat = TargetFormat::Rgba32Float;

/// Vulkan API version requested by the compute backend
pub const VULKAN_VER_MAJ: u32 = 1;
pub const VULKAN_VER_MIN: u32 = 2;
/// If true the compute backend will attempt to enable the khronos validation layer
pub const ENABLE_VULKAN_VALIDATION: bool = cfg!(debug_assertions);
/// 1 second
pub const TIMEOUT_NANOSECS: u64 = 1_000_000_000;

/// Uniform block slot sizes in bytes
pub const UNIFORM_SLOT_SIZE: usize = 16;
pub const UNIFORM_MATRIX_SIZE: usize = 64;

/// Fractal defaults
pub const DEFAULT_FRACTAL_GLOSS: f32 = 0.5;
pub const DEFAULT_FRACTAL_SCALE: f32 = 2.;
pub const DEFAULT_FRACTAL_BLEND_STRENGTH: f32 = 1.;
pub const DEFAULT_FRACTAL_ITERATIONS: u32 = 10;

/// Mandelbrot defaults
pub const DEFAULT_MANDELBROT_COLOR: f32 = 0.;
pub const DEFAULT_MANDELBROT_REPEAT: f32 = 1.;
pub const DEFAULT_MANDELBROT_SPEED: f32 = 0.;
pub const DEFAULT_MANDELBROT_SYMMETRY: f32 = 0.;
