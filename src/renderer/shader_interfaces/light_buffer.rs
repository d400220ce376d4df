use crate::engine::light::LightDescriptor;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Which `lightsBuffer` element layout a renderer profile's kernel was compiled against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LightLayout {
    /// [`LightData`]
    #[default]
    Full,
    /// [`LightDataReduced`]
    Reduced,
}

impl LightLayout {
    pub fn stride(&self) -> usize {
        match *self {
            Self::Full => LightData::STRIDE,
            Self::Reduced => LightDataReduced::STRIDE,
        }
    }

    pub fn pack(&self, lights: &[LightDescriptor]) -> Vec<u8> {
        match *self {
            Self::Full => {
                let data: Vec<LightData> = lights.iter().map(LightData::from).collect();
                bytemuck::cast_slice(&data).to_vec()
            }
            Self::Reduced => {
                let data: Vec<LightDataReduced> =
                    lights.iter().map(LightDataReduced::from).collect();
                bytemuck::cast_slice(&data).to_vec()
            }
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct LightData {
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub color: [f32; 4],
    pub intensity: f32,
    pub spot_angle: f32,
    pub light_type: i32,
}

impl LightData {
    pub const STRIDE: usize = std::mem::size_of::<Self>();
}

impl From<&LightDescriptor> for LightData {
    fn from(light: &LightDescriptor) -> Self {
        Self {
            position: light.position.to_array(),
            direction: light.direction.to_array(),
            color: light.color.to_array(),
            intensity: light.intensity,
            spot_angle: light.spot_angle,
            light_type: light.kind.kind_code(),
        }
    }
}

/// For kernels that don't shade spot cones
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Zeroable, Pod)]
pub struct LightDataReduced {
    pub position: [f32; 3],
    pub direction: [f32; 3],
    pub color: [f32; 4],
    pub intensity: f32,
    pub light_type: i32,
}

impl LightDataReduced {
    pub const STRIDE: usize = std::mem::size_of::<Self>();
}

impl From<&LightDescriptor> for LightDataReduced {
    fn from(light: &LightDescriptor) -> Self {
        Self {
            position: light.position.to_array(),
            direction: light.direction.to_array(),
            color: light.color.to_array(),
            intensity: light.intensity,
            light_type: light.kind.kind_code(),
        }
    }
}
