use crate::{
    engine::config_engine::primitive_names,
    renderer::shader_interfaces::shape_buffer::{shape_codes, ShapeDataUnit},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum ShapeKind {
    Sphere,
    Cube,
    Torus,
}

impl ShapeKind {
    pub const VARIANTS: &'static [ShapeKind] = &[Self::Sphere, Self::Cube, Self::Torus];

    pub fn shape_code(&self) -> ShapeDataUnit {
        match *self {
            Self::Sphere => shape_codes::SPHERE,
            Self::Cube => shape_codes::CUBE,
            Self::Torus => shape_codes::TORUS,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Self::Sphere => primitive_names::SPHERE,
            Self::Cube => primitive_names::CUBE,
            Self::Torus => primitive_names::TORUS,
        }
    }
}

impl Default for ShapeKind {
    fn default() -> Self {
        Self::Sphere
    }
}
