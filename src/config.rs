use glam::DVec3;
use log::LevelFilter;

pub const ENGINE_NAME: &str = "Heliodor";
pub const ENGINE_VERSION: [u8; 3] = [0, 1, 0];

/// Environment variables that can be used to configure the engine
#[allow(non_snake_case)]
pub mod ENV {
    /// Log level filter name, e.g. `trace` or `warn`
    pub const LOG_LEVEL: &str = "HELIODOR_LOG_LEVEL";
    /// Path to the SPIR-V module holding the scene kernel
    pub const KERNEL_PATH: &str = "HELIODOR_KERNEL_PATH";
    /// Path to the SPIR-V module holding the accumulation blend kernel
    pub const BLEND_KERNEL_PATH: &str = "HELIODOR_BLEND_KERNEL_PATH";
}

/// Log level filter. Log messages with lower levels than this will not be displayed.
#[cfg(debug_assertions)]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;
#[cfg(not(debug_assertions))]
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Viewport used by the headless demo when nothing else is configured
pub const DEFAULT_VIEWPORT: [u32; 2] = [640, 360];

/// Describes which direction is up in the world space coordinate system
pub const WORLD_SPACE_UP: DVec3 = DVec3::Y;

/// Written at the start of every save file: engine name then version
pub const PRECURSOR_BYTES: [u8; PRECURSOR_BYTE_COUNT] = [
    b'H',
    b'e',
    b'l',
    b'i',
    b'o',
    b'd',
    b'o',
    b'r',
    ENGINE_VERSION[0],
    ENGINE_VERSION[1],
    ENGINE_VERSION[2],
];
pub const PRECURSOR_BYTE_COUNT: usize = 11;
