pub mod config_engine;
pub mod frame_clock;
pub mod light;
pub mod operation;
pub mod primitives;
pub mod save_states;
pub mod scene_linearizer;
