pub mod camera;
pub mod config_ui;
pub mod input;
pub mod mandelbrot_view;
