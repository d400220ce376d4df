use crate::renderer::{
    compute_device::{BufferHandle, ImageHandle},
    config_renderer::{UNIFORM_MATRIX_SIZE, UNIFORM_SLOT_SIZE},
};
use glam::{Mat4, Vec4};

/// Names kernels look their inputs up by
#[rustfmt::skip]
pub mod param_names {
    pub const CAMERA_TO_WORLD:           &str = "_CameraToWorld";
    pub const CAMERA_INVERSE_PROJECTION: &str = "_CameraInverseProjection";
    pub const WORLD_SPACE_CAMERA_POS:    &str = "_WorldSpaceCameraPos";
    pub const SOURCE:                    &str = "Source";
    pub const RESULT:                    &str = "Result";
    pub const SHAPES_BUFFER:             &str = "shapesBuffer";
    pub const LIGHTS_BUFFER:             &str = "lightsBuffer";
    pub const NUM_SHAPES:                &str = "numShapes";
    pub const GLOSS:                     &str = "_Gloss";
    pub const SCALE:                     &str = "_Scale";
    pub const BLEND_STRENGTH:            &str = "_BlendStrength";
    pub const ITERATIONS:                &str = "_Iterations";
    pub const PIXEL_OFFSET:              &str = "_PixelOffset";
    pub const SKYBOX_TEXTURE:            &str = "_SkyboxTexture";
    pub const TEX_RESOLUTION:            &str = "texResolution";
    pub const AREA:                      &str = "area";
    pub const ANGLE:                     &str = "angle";
    pub const COLOR_GRADIENTS:           &str = "ColorGradients";
    pub const COLOR:                     &str = "color";
    pub const REPEAT:                    &str = "repeat";
    pub const TIME:                      &str = "time";
    pub const SPEED:                     &str = "speed";
    pub const SYMMETRY:                  &str = "symmetry";
    /// Blend kernel inputs
    pub const BLEND_WEIGHT:              &str = "_Weight";
    pub const ACCUMULATION:              &str = "Accumulation";
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Int(i32),
    Float(f32),
    /// Two and three component vectors are zero extended
    Vector(Vec4),
    Matrix(Mat4),
    Buffer(BufferHandle),
    Image(ImageHandle),
}

impl ParamValue {
    /// Resources are bound separately from the uniform block
    pub fn is_resource(&self) -> bool {
        matches!(self, Self::Buffer(_) | Self::Image(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelParam {
    pub name: &'static str,
    pub value: ParamValue,
}

impl KernelParam {
    pub const fn new(name: &'static str, value: ParamValue) -> Self {
        Self { name, value }
    }
}

/// Looks up a parameter by name. Later entries win.
pub fn find_param<'a>(params: &'a [KernelParam], name: &str) -> Option<&'a ParamValue> {
    params
        .iter()
        .rev()
        .find(|param| param.name == name)
        .map(|param| &param.value)
}

/// Packs the non-resource parameters, in order, into a uniform block. Scalars and vectors each
/// take a 16 byte slot, matrices take 64 bytes in column major order.
pub fn pack_uniform_block(params: &[KernelParam]) -> Vec<u8> {
    let mut block = Vec::new();
    for param in params {
        match param.value {
            ParamValue::Int(v) => push_slot(&mut block, &v.to_ne_bytes()),
            ParamValue::Float(v) => push_slot(&mut block, &v.to_ne_bytes()),
            ParamValue::Vector(v) => {
                let components = v.to_array();
                push_slot(&mut block, bytemuck::cast_slice(&components));
            }
            ParamValue::Matrix(m) => {
                let cols = m.to_cols_array();
                let bytes: &[u8] = bytemuck::cast_slice(&cols);
                debug_assert_eq!(bytes.len(), UNIFORM_MATRIX_SIZE);
                block.extend_from_slice(bytes);
            }
            ParamValue::Buffer(_) | ParamValue::Image(_) => (),
        }
    }
    block
}

fn push_slot(block: &mut Vec<u8>, bytes: &[u8]) {
    let start = block.len();
    block.extend_from_slice(bytes);
    block.resize(start + UNIFORM_SLOT_SIZE, 0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_skips_resources() {
        let params = [
            KernelParam::new(param_names::NUM_SHAPES, ParamValue::Int(3)),
            KernelParam::new(param_names::SHAPES_BUFFER, ParamValue::Buffer(BufferHandle(9))),
            KernelParam::new(param_names::CAMERA_TO_WORLD, ParamValue::Matrix(Mat4::IDENTITY)),
            KernelParam::new(param_names::TIME, ParamValue::Float(1.5)),
        ];
        let block = pack_uniform_block(&params);
        assert_eq!(block.len(), 16 + 64 + 16);
        assert_eq!(&block[0..4], &3i32.to_ne_bytes());
        assert!(block[4..16].iter().all(|b| *b == 0));
        assert_eq!(&block[16..20], &1f32.to_ne_bytes());
        assert_eq!(&block[80..84], &1.5f32.to_ne_bytes());
    }

    #[test]
    fn find_param_prefers_latest() {
        let params = [
            KernelParam::new(param_names::TIME, ParamValue::Float(1.)),
            KernelParam::new(param_names::TIME, ParamValue::Float(2.)),
        ];
        assert_eq!(
            find_param(&params, param_names::TIME),
            Some(&ParamValue::Float(2.))
        );
        assert_eq!(find_param(&params, param_names::AREA), None);
    }
}
