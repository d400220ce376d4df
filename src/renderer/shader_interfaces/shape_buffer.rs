use crate::engine::{config_engine::BLEND_STRENGTH_KERNEL_FACTOR, primitives::primitive::Primitive};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

pub type ShapeDataUnit = i32;

#[rustfmt::skip]
pub mod op_codes {
    use super::ShapeDataUnit;
    pub const UNION:               ShapeDataUnit = 0;
    pub const SUBTRACTION:         ShapeDataUnit = 1;
    pub const INTERSECTION:        ShapeDataUnit = 2;
    pub const SMOOTH_UNION:        ShapeDataUnit = 3;
    pub const SMOOTH_SUBTRACTION:  ShapeDataUnit = 4;
    pub const SMOOTH_INTERSECTION: ShapeDataUnit = 5;
}

#[rustfmt::skip]
pub mod shape_codes {
    use super::ShapeDataUnit;
    pub const SPHERE: ShapeDataUnit = 0;
    pub const CUBE:   ShapeDataUnit = 1;
    pub const TORUS:  ShapeDataUnit = 2;
}

/// One entry of `shapesBuffer`. Packed without padding: kernels read it as a
/// 52 byte structured buffer element.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct ShapeData {
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub colour: [f32; 3],
    pub shape_type: ShapeDataUnit,
    pub operation: ShapeDataUnit,
    pub blend_strength: f32,
    pub num_children: ShapeDataUnit,
}

impl ShapeData {
    pub const STRIDE: usize = std::mem::size_of::<Self>();

    /// `effective_scale` is the primitive's local scale multiplied through its ancestors.
    pub fn new(primitive: &Primitive, effective_scale: Vec3, num_children: usize) -> Self {
        Self {
            position: primitive.position.to_array(),
            scale: effective_scale.to_array(),
            colour: primitive.color.to_array(),
            shape_type: primitive.shape.shape_code(),
            operation: primitive.op.op_code(),
            blend_strength: primitive.blend_strength() * BLEND_STRENGTH_KERNEL_FACTOR,
            num_children: ShapeDataUnit::try_from(num_children).unwrap_or(ShapeDataUnit::MAX),
        }
    }
}
