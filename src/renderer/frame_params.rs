use super::{
    compute_device::{ConfigError, ImageHandle},
    config_renderer::{
        DEFAULT_FRACTAL_BLEND_STRENGTH, DEFAULT_FRACTAL_GLOSS, DEFAULT_FRACTAL_ITERATIONS,
        DEFAULT_FRACTAL_SCALE, DEFAULT_MANDELBROT_COLOR, DEFAULT_MANDELBROT_REPEAT,
        DEFAULT_MANDELBROT_SPEED, DEFAULT_MANDELBROT_SYMMETRY,
    },
    shader_interfaces::{
        kernel_params::{param_names, KernelParam, ParamValue},
        light_buffer::LightLayout,
        shape_buffer::ShapeData,
    },
};
use crate::{
    engine::{
        frame_clock::FrameTiming, light::LightDescriptor, primitives::primitive_registry::PrimitiveRegistry,
        scene_linearizer::linearize,
    },
    user_interface::{camera::CameraState, mandelbrot_view::MandelbrotView},
};
use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

// ~~ Renderer Profiles ~~

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayMarchingSettings {
    pub light_layout: LightLayout,
}

impl Default for RayMarchingSettings {
    fn default() -> Self {
        Self {
            light_layout: LightLayout::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractalSettings {
    pub gloss: f32,
    pub scale: f32,
    pub blend_strength: f32,
    pub iterations: u32,
    pub light_layout: LightLayout,
}

impl Default for FractalSettings {
    fn default() -> Self {
        Self {
            gloss: DEFAULT_FRACTAL_GLOSS,
            scale: DEFAULT_FRACTAL_SCALE,
            blend_strength: DEFAULT_FRACTAL_BLEND_STRENGTH,
            iterations: DEFAULT_FRACTAL_ITERATIONS,
            light_layout: LightLayout::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PathTracingSettings {
    /// Environment image sampled by rays that escape the scene. Required.
    #[serde(skip)]
    pub skybox: Option<ImageHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MandelbrotSettings {
    /// 1D colour ramp sampled by escape time. Required.
    #[serde(skip)]
    pub color_gradients: Option<ImageHandle>,
    /// Position along the colour ramp in [0, 1]
    pub color: f32,
    pub repeat: f32,
    /// Colour cycling speed, multiplied by `time` in the kernel
    pub speed: f32,
    /// Mirror blend in [0, 1]
    pub symmetry: f32,
}

impl Default for MandelbrotSettings {
    fn default() -> Self {
        Self {
            color_gradients: None,
            color: DEFAULT_MANDELBROT_COLOR,
            repeat: DEFAULT_MANDELBROT_REPEAT,
            speed: DEFAULT_MANDELBROT_SPEED,
            symmetry: DEFAULT_MANDELBROT_SYMMETRY,
        }
    }
}

/// Each profile is one kernel family and the parameter set it expects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RendererProfile {
    /// Signed distance scene with lights
    RayMarching(RayMarchingSettings),
    /// Camera matrices and `Source` only
    CameraOnly,
    Fractal(FractalSettings),
    /// Progressive, accumulates jittered samples while the camera holds still
    PathTracing(PathTracingSettings),
    Mandelbrot(MandelbrotSettings),
}

impl RendererProfile {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RayMarching(_) => "Ray Marching",
            Self::CameraOnly => "Camera Only",
            Self::Fractal(_) => "Fractal",
            Self::PathTracing(_) => "Path Tracing",
            Self::Mandelbrot(_) => "Mandelbrot",
        }
    }

    pub fn uses_accumulation(&self) -> bool {
        matches!(self, Self::PathTracing(_))
    }

    /// Checks that every reference the profile's kernel reads has been provided
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::PathTracing(settings) if settings.skybox.is_none() => {
                Err(ConfigError::ReferenceUnset(param_names::SKYBOX_TEXTURE))
            }
            Self::Mandelbrot(settings) if settings.color_gradients.is_none() => {
                Err(ConfigError::ReferenceUnset(param_names::COLOR_GRADIENTS))
            }
            _ => Ok(()),
        }
    }
}

impl Default for RendererProfile {
    fn default() -> Self {
        Self::RayMarching(RayMarchingSettings::default())
    }
}

// ~~ Frame Packet ~~

/// Everything the host hands over for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    pub camera: &'a CameraState,
    pub lights: &'a [LightDescriptor],
    /// Previous composited frame, for kernels that read back
    pub source: Option<ImageHandle>,
    pub timing: FrameTiming,
    /// Explorer navigation, only read by the mandelbrot profile
    pub mandelbrot_view: Option<&'a MandelbrotView>,
}

/// Host-side bytes for one transient storage buffer
#[derive(Debug, Clone, PartialEq)]
pub struct PackedBuffer {
    pub name: &'static str,
    pub stride: usize,
    pub count: usize,
    pub bytes: Vec<u8>,
}

/// Parameters and buffer contents for one dispatch, before anything touches the device.
/// Buffers are bound by name once uploaded, the render target is bound as `Result`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FramePacket {
    pub params: Vec<KernelParam>,
    pub buffers: Vec<PackedBuffer>,
}

impl FramePacket {
    fn push(&mut self, name: &'static str, value: ParamValue) {
        self.params.push(KernelParam::new(name, value));
    }

    fn push_buffer(&mut self, name: &'static str, stride: usize, count: usize, bytes: Vec<u8>) {
        self.buffers.push(PackedBuffer {
            name,
            stride,
            count,
            bytes,
        });
    }
}

/// Builds the parameter set for `profile`. Pure: reads the registry's current active set, never
/// touches the device. Profile references are assumed to be validated.
pub fn pack_frame(
    profile: &RendererProfile,
    registry: &PrimitiveRegistry,
    inputs: &FrameInputs,
) -> FramePacket {
    let mut packet = FramePacket::default();

    match profile {
        RendererProfile::RayMarching(settings) => {
            push_camera(&mut packet, inputs.camera, true);
            push_source(&mut packet, inputs.source);
            push_lights(&mut packet, inputs.lights, settings.light_layout);

            let scene = linearize(registry);
            packet.push_buffer(
                param_names::SHAPES_BUFFER,
                ShapeData::STRIDE,
                scene.len(),
                scene.as_bytes().to_vec(),
            );
            packet.push(
                param_names::NUM_SHAPES,
                ParamValue::Int(i32::try_from(scene.len()).unwrap_or(i32::MAX)),
            );
        }

        RendererProfile::CameraOnly => {
            push_camera(&mut packet, inputs.camera, true);
            push_source(&mut packet, inputs.source);
        }

        RendererProfile::Fractal(settings) => {
            push_camera(&mut packet, inputs.camera, true);
            packet.push(param_names::GLOSS, ParamValue::Float(settings.gloss));
            packet.push(param_names::SCALE, ParamValue::Float(settings.scale));
            packet.push(
                param_names::BLEND_STRENGTH,
                ParamValue::Float(settings.blend_strength),
            );
            packet.push(
                param_names::ITERATIONS,
                ParamValue::Int(i32::try_from(settings.iterations).unwrap_or(i32::MAX)),
            );
            push_source(&mut packet, inputs.source);
            push_lights(&mut packet, inputs.lights, settings.light_layout);
        }

        RendererProfile::PathTracing(settings) => {
            push_camera(&mut packet, inputs.camera, false);
            let offset = pixel_offset(inputs.timing.frame_number);
            packet.push(
                param_names::PIXEL_OFFSET,
                ParamValue::Vector(offset.extend(0.).extend(0.)),
            );
            if let Some(skybox) = settings.skybox {
                packet.push(param_names::SKYBOX_TEXTURE, ParamValue::Image(skybox));
            }
        }

        RendererProfile::Mandelbrot(settings) => {
            let viewport = inputs.camera.viewport;
            let view = inputs.mandelbrot_view.copied().unwrap_or_default();
            packet.push(
                param_names::TEX_RESOLUTION,
                ParamValue::Vector(Vec4::new(
                    viewport.width as f32,
                    viewport.height as f32,
                    0.,
                    0.,
                )),
            );
            packet.push(param_names::AREA, ParamValue::Vector(view.area(viewport)));
            packet.push(param_names::ANGLE, ParamValue::Float(view.smooth_angle()));
            if let Some(gradients) = settings.color_gradients {
                packet.push(param_names::COLOR_GRADIENTS, ParamValue::Image(gradients));
            }
            packet.push(param_names::COLOR, ParamValue::Float(settings.color));
            packet.push(param_names::REPEAT, ParamValue::Float(settings.repeat));
            packet.push(
                param_names::TIME,
                ParamValue::Float(inputs.timing.elapsed_seconds),
            );
            packet.push(param_names::SPEED, ParamValue::Float(settings.speed));
            packet.push(param_names::SYMMETRY, ParamValue::Float(settings.symmetry));
        }
    }

    packet
}

/// Sub-pixel jitter in [0, 1)^2 from the base 2 and 3 Halton sequences. Successive frames cover
/// the pixel evenly.
pub fn pixel_offset(frame_number: u64) -> Vec2 {
    // skip index 0 which is always (0, 0)
    let index = frame_number.wrapping_add(1);
    Vec2::new(radical_inverse(index, 2), radical_inverse(index, 3))
}

fn radical_inverse(mut index: u64, base: u64) -> f32 {
    let inv_base = 1. / base as f64;
    let mut fraction = inv_base;
    let mut result = 0_f64;
    while index > 0 {
        result += (index % base) as f64 * fraction;
        index /= base;
        fraction *= inv_base;
    }
    // f64 -> f32 rounding could otherwise land on 1.0
    (result as f32).min(1. - f32::EPSILON)
}

fn push_camera(packet: &mut FramePacket, camera: &CameraState, with_position: bool) {
    packet.push(
        param_names::CAMERA_TO_WORLD,
        ParamValue::Matrix(camera.camera_to_world),
    );
    packet.push(
        param_names::CAMERA_INVERSE_PROJECTION,
        ParamValue::Matrix(camera.inverse_projection),
    );
    if with_position {
        packet.push(
            param_names::WORLD_SPACE_CAMERA_POS,
            ParamValue::Vector(camera.position.extend(1.)),
        );
    }
}

fn push_source(packet: &mut FramePacket, source: Option<ImageHandle>) {
    if let Some(source) = source {
        packet.push(param_names::SOURCE, ParamValue::Image(source));
    }
}

fn push_lights(packet: &mut FramePacket, lights: &[LightDescriptor], layout: LightLayout) {
    packet.push_buffer(
        param_names::LIGHTS_BUFFER,
        layout.stride(),
        lights.len(),
        layout.pack(lights),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{
            operation::Operation,
            primitives::{primitive::Primitive, shape_kind::ShapeKind},
        },
        renderer::shader_interfaces::kernel_params::find_param,
        user_interface::camera::{Camera, Viewport},
    };
    use glam::DVec3;

    fn camera_state() -> CameraState {
        Camera::looking_at(DVec3::new(0., 2., -6.), DVec3::ZERO).state(Viewport::new(320, 160))
    }

    fn inputs<'a>(camera: &'a CameraState, lights: &'a [LightDescriptor]) -> FrameInputs<'a> {
        FrameInputs {
            camera,
            lights,
            source: Some(ImageHandle(77)),
            timing: FrameTiming {
                frame_number: 4,
                elapsed_seconds: 2.5,
            },
            mandelbrot_view: None,
        }
    }

    fn names(packet: &FramePacket) -> Vec<&'static str> {
        packet.params.iter().map(|p| p.name).collect()
    }

    #[test]
    fn ray_marching_packs_scene_and_lights() {
        let mut registry = PrimitiveRegistry::new();
        registry
            .spawn(Primitive::new(ShapeKind::Sphere, Operation::Union))
            .unwrap();
        registry
            .spawn(Primitive::new(ShapeKind::Cube, Operation::Subtraction))
            .unwrap();
        registry.apply_pending_changes();

        let camera = camera_state();
        let lights = [LightDescriptor::default()];
        let packet = pack_frame(
            &RendererProfile::default(),
            &registry,
            &inputs(&camera, &lights),
        );

        assert_eq!(
            names(&packet),
            vec![
                param_names::CAMERA_TO_WORLD,
                param_names::CAMERA_INVERSE_PROJECTION,
                param_names::WORLD_SPACE_CAMERA_POS,
                param_names::SOURCE,
                param_names::NUM_SHAPES,
            ]
        );
        assert_eq!(
            find_param(&packet.params, param_names::NUM_SHAPES),
            Some(&ParamValue::Int(2))
        );

        let lights_buffer = &packet.buffers[0];
        assert_eq!(lights_buffer.name, param_names::LIGHTS_BUFFER);
        assert_eq!((lights_buffer.stride, lights_buffer.count), (52, 1));
        let shapes_buffer = &packet.buffers[1];
        assert_eq!(shapes_buffer.name, param_names::SHAPES_BUFFER);
        assert_eq!(shapes_buffer.bytes.len(), 2 * ShapeData::STRIDE);
    }

    #[test]
    fn empty_scene_still_binds_shapes() {
        let camera = camera_state();
        let packet = pack_frame(
            &RendererProfile::default(),
            &PrimitiveRegistry::new(),
            &inputs(&camera, &[]),
        );
        assert_eq!(
            find_param(&packet.params, param_names::NUM_SHAPES),
            Some(&ParamValue::Int(0))
        );
        assert!(packet.buffers.iter().all(|b| b.count == 0 && b.bytes.is_empty()));
        assert_eq!(packet.buffers.len(), 2);
    }

    #[test]
    fn fractal_uses_documented_defaults() {
        let camera = camera_state();
        let profile = RendererProfile::Fractal(FractalSettings {
            light_layout: LightLayout::Reduced,
            ..Default::default()
        });
        let lights = [LightDescriptor::default(), LightDescriptor::default()];
        let packet = pack_frame(&profile, &PrimitiveRegistry::new(), &inputs(&camera, &lights));

        assert_eq!(
            find_param(&packet.params, param_names::GLOSS),
            Some(&ParamValue::Float(0.5))
        );
        assert_eq!(
            find_param(&packet.params, param_names::SCALE),
            Some(&ParamValue::Float(2.))
        );
        assert_eq!(
            find_param(&packet.params, param_names::BLEND_STRENGTH),
            Some(&ParamValue::Float(1.))
        );
        assert_eq!(
            find_param(&packet.params, param_names::ITERATIONS),
            Some(&ParamValue::Int(10))
        );
        assert_eq!(packet.buffers.len(), 1);
        assert_eq!(packet.buffers[0].bytes.len(), 2 * 48);
    }

    #[test]
    fn camera_only_has_no_buffers() {
        let camera = camera_state();
        let packet = pack_frame(
            &RendererProfile::CameraOnly,
            &PrimitiveRegistry::new(),
            &inputs(&camera, &[LightDescriptor::default()]),
        );
        assert!(packet.buffers.is_empty());
        assert_eq!(packet.params.len(), 4);
    }

    #[test]
    fn path_tracing_needs_skybox() {
        let unset = RendererProfile::PathTracing(PathTracingSettings::default());
        assert_eq!(
            unset.validate(),
            Err(ConfigError::ReferenceUnset(param_names::SKYBOX_TEXTURE))
        );

        let profile = RendererProfile::PathTracing(PathTracingSettings {
            skybox: Some(ImageHandle(5)),
        });
        assert_eq!(profile.validate(), Ok(()));

        let camera = camera_state();
        let packet = pack_frame(&profile, &PrimitiveRegistry::new(), &inputs(&camera, &[]));
        assert_eq!(
            find_param(&packet.params, param_names::SKYBOX_TEXTURE),
            Some(&ParamValue::Image(ImageHandle(5)))
        );
        assert_eq!(
            find_param(&packet.params, param_names::PIXEL_OFFSET),
            Some(&ParamValue::Vector(pixel_offset(4).extend(0.).extend(0.)))
        );
        assert_eq!(find_param(&packet.params, param_names::WORLD_SPACE_CAMERA_POS), None);
    }

    #[test]
    fn mandelbrot_reads_view_and_time() {
        let camera = camera_state();
        let profile = RendererProfile::Mandelbrot(MandelbrotSettings {
            color_gradients: Some(ImageHandle(3)),
            ..Default::default()
        });
        let packet = pack_frame(&profile, &PrimitiveRegistry::new(), &inputs(&camera, &[]));

        assert_eq!(
            find_param(&packet.params, param_names::TEX_RESOLUTION),
            Some(&ParamValue::Vector(Vec4::new(320., 160., 0., 0.)))
        );
        // default view, 2:1 viewport
        assert_eq!(
            find_param(&packet.params, param_names::AREA),
            Some(&ParamValue::Vector(Vec4::new(0., 0., 4., 2.)))
        );
        assert_eq!(
            find_param(&packet.params, param_names::TIME),
            Some(&ParamValue::Float(2.5))
        );
        assert_eq!(
            find_param(&packet.params, param_names::REPEAT),
            Some(&ParamValue::Float(1.))
        );
    }

    #[test]
    fn pixel_offsets_stay_in_unit_square() {
        let offsets: Vec<Vec2> = (0..64).map(pixel_offset).collect();
        for offset in &offsets {
            assert!(offset.x >= 0. && offset.x < 1.);
            assert!(offset.y >= 0. && offset.y < 1.);
        }
        assert_eq!(offsets[0], Vec2::new(0.5, 1. / 3.));
        assert_ne!(offsets[0], offsets[1]);
    }
}
