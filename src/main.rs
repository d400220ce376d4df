//! Headless demo: renders a small scene through the Vulkan compute device for a fixed number of
//! frames while orbiting the camera, then saves the scene and camera.
//!
//! Usage: `heliodor [ray-marching | camera-only | fractal | path-tracing | mandelbrot]`
//!
//! The scene kernel is read from `HELIODOR_KERNEL_PATH`. `HELIODOR_BLEND_KERNEL_PATH` optionally
//! provides the accumulation blend kernel.

use anyhow::Context;
use glam::{Vec3, Vec4};
use heliodor::{
    config::{self, ENV},
    engine::{
        config_engine::LOCAL_STORAGE_DIR,
        frame_clock::FrameClock,
        light::LightDescriptor,
        operation::Operation,
        primitives::{primitive::Primitive, primitive_registry::PrimitiveRegistry, shape_kind::ShapeKind},
        save_states::{load_state_camera, save_primitives, save_state_camera},
    },
    helper::{
        angle::Angle,
        error_reporting::{report_error, unwrap_or_report},
        logger::init_logger,
    },
    renderer::{
        compute_device::{ComputeDevice, RenderTargetDesc},
        config_renderer::RENDER_TARGET_FORMAT,
        dispatch::{DispatchCoordinator, FrameOutcome},
        frame_params::{FrameInputs, FractalSettings, RendererProfile},
        vulkan::{kernel_source::KernelSource, VulkanComputeDevice},
    },
    user_interface::camera::{Camera, Viewport},
};
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::path::{Path, PathBuf};

const DEMO_FRAME_COUNT: u64 = 240;
/// The camera orbits for this many frames then holds still
const ORBIT_FRAME_COUNT: u64 = 120;
const ORBIT_STEP_DEGREES: f64 = 1.5;

fn main() {
    if let Err(e) = init_logger() {
        eprintln!("failed to initialize logger: {}", e);
    }
    info!("starting {} headless demo...", config::ENGINE_NAME);

    unwrap_or_report(run(), "run headless demo");
}

fn run() -> anyhow::Result<()> {
    let profile = profile_from_args()?;
    let kernel = load_kernel(ENV::KERNEL_PATH)?;
    let blend_kernel = match std::env::var_os(ENV::BLEND_KERNEL_PATH) {
        Some(_) => Some(load_kernel(ENV::BLEND_KERNEL_PATH)?),
        None => None,
    };

    let mut device = VulkanComputeDevice::new(kernel, blend_kernel)?;

    let storage_dir = Path::new(LOCAL_STORAGE_DIR);
    let mut camera = match load_state_camera(storage_dir) {
        Ok(camera) => {
            debug!("restored camera from previous session");
            camera
        }
        Err(e) => {
            debug!("using default camera: {}", e);
            Camera::default()
        }
    };
    let mut registry = demo_scene()?;
    let lights = [
        LightDescriptor::directional(Vec3::new(-0.3, -1., 0.4)),
        LightDescriptor::point(Vec3::new(2., 3., -2.), Vec4::new(1., 0.9, 0.8, 1.), 2.),
    ];

    let viewport = Viewport::new(config::DEFAULT_VIEWPORT[0], config::DEFAULT_VIEWPORT[1]);
    let destination = device
        .create_render_target(RenderTargetDesc {
            width: viewport.width,
            height: viewport.height,
            format: RENDER_TARGET_FORMAT,
        })
        .context("creating presentation image")?;

    let mut coordinator = DispatchCoordinator::new(&mut device, profile);
    let mut clock = FrameClock::new();

    while clock.frames_ticked() < DEMO_FRAME_COUNT {
        if clock.frames_ticked() < ORBIT_FRAME_COUNT {
            camera.rotate(
                Angle::from_degrees(ORBIT_STEP_DEGREES),
                Angle::from_radians(0.),
            );
        }
        let camera_state = camera.state(viewport);
        let inputs = FrameInputs {
            camera: &camera_state,
            lights: &lights,
            source: Some(destination),
            timing: clock.tick(),
            mandelbrot_view: None,
        };

        match coordinator.render_frame(&mut device, &mut registry, &inputs, destination) {
            FrameOutcome::Presented {
                thread_groups,
                accumulated_sample,
            } => trace!(
                "frame {} presented. thread groups = {:?}, sample = {:?}",
                inputs.timing.frame_number,
                thread_groups,
                accumulated_sample
            ),
            // logged by the coordinator
            FrameOutcome::Skipped(_) => (),
            FrameOutcome::Failed(e) => warn!("frame {} failed: {}", inputs.timing.frame_number, e),
        }
    }

    info!(
        "{} of {} frames presented",
        coordinator.frames_presented(),
        DEMO_FRAME_COUNT
    );
    if let Some(samples) = coordinator.accumulated_samples() {
        info!("accumulated {} samples", samples);
    }

    coordinator.release_resources(&mut device);
    device.release_render_target(destination);

    if let Err(e) = save_state_camera(storage_dir, &camera)
        .and_then(|()| save_primitives(storage_dir, &registry))
    {
        report_error(&e, "save demo state");
    }

    Ok(())
}

fn profile_from_args() -> anyhow::Result<RendererProfile> {
    let profile = match std::env::args().nth(1).as_deref() {
        None | Some("ray-marching") => RendererProfile::default(),
        Some("camera-only") => RendererProfile::CameraOnly,
        Some("fractal") => RendererProfile::Fractal(FractalSettings::default()),
        // needs image assets, frames are skipped with a diagnostic
        Some("path-tracing") => RendererProfile::PathTracing(Default::default()),
        Some("mandelbrot") => RendererProfile::Mandelbrot(Default::default()),
        Some(other) => anyhow::bail!("unknown renderer profile `{}`", other),
    };
    info!("renderer profile: {}", profile.name());
    Ok(profile)
}

fn load_kernel(env_var: &str) -> anyhow::Result<KernelSource> {
    let path = std::env::var_os(env_var)
        .map(PathBuf::from)
        .with_context(|| format!("{} must point to a SPIR-V module", env_var))?;
    let source = KernelSource::from_file(&path)
        .with_context(|| format!("loading kernel from {}", path.display()))?;
    debug!(
        "loaded {} with compute entry points {:?}",
        path.display(),
        source.compute_entry_points()
    );
    Ok(source)
}

/// A smooth-unioned group on a ground cube, with a sphere carved out of the cube
fn demo_scene() -> anyhow::Result<PrimitiveRegistry> {
    let mut registry = PrimitiveRegistry::new();

    registry.spawn(
        Primitive::new(ShapeKind::Cube, Operation::Union)
            .with_position(Vec3::new(0., -1., 0.))
            .with_scale(Vec3::new(4., 0.2, 4.))
            .with_color(Vec3::new(0.6, 0.6, 0.65)),
    )?;
    registry.spawn(
        Primitive::new(ShapeKind::Sphere, Operation::Subtraction)
            .with_position(Vec3::new(1.5, -1., 1.5))
            .with_scale(Vec3::splat(0.8)),
    )?;

    let torus = registry.spawn(
        Primitive::new(ShapeKind::Torus, Operation::SmoothUnion)
            .with_scale(Vec3::splat(1.2))
            .with_color(Vec3::new(0.9, 0.4, 0.2))
            .with_blend_strength(0.4),
    )?;
    for x in [-0.8_f32, 0.8] {
        registry.spawn(
            Primitive::new(ShapeKind::Sphere, Operation::SmoothUnion)
                .with_position(Vec3::new(x, 0.5, 0.))
                .with_scale(Vec3::splat(0.4))
                .with_color(Vec3::new(0.2, 0.5, 0.9))
                .with_blend_strength(0.6)
                .with_parent(torus),
        )?;
    }

    Ok(registry)
}
