use super::{
    accumulation::AccumulationState,
    compute_device::{
        BufferHandle, ComputeDevice, ConfigError, DeviceError, ImageHandle, KernelHandle,
    },
    config_renderer::{KERNEL_ENTRY_POINT, THREAD_GROUP_SIZE},
    frame_params::{pack_frame, FrameInputs, FramePacket, RendererProfile},
    render_target::{RenderTargetManager, TargetStatus},
    shader_interfaces::kernel_params::{param_names, KernelParam, ParamValue},
};
use crate::engine::primitives::primitive_registry::PrimitiveRegistry;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

/// Where the coordinator is within a frame. Always `Idle` between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    ParamsReady,
    TargetReady,
    Dispatched,
    Composited,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Presented {
        thread_groups: [u32; 3],
        /// Sample index composited this frame, for accumulating profiles
        accumulated_sample: Option<u32>,
    },
    /// Nothing was drawn because the renderer isn't set up right. The destination is untouched.
    Skipped(ConfigError),
    /// The device reported an error part way through. Transient buffers were still released.
    Failed(DeviceError),
}

/// Workgroup counts covering a `width` x `height` image with 8x8 tiles
pub fn thread_groups(width: u32, height: u32) -> [u32; 3] {
    [
        width.div_ceil(THREAD_GROUP_SIZE[0]),
        height.div_ceil(THREAD_GROUP_SIZE[1]),
        1,
    ]
}

/// Buffers created for a single dispatch. Never outlive the frame that made them.
#[derive(Debug, Default)]
struct TransientBuffers {
    buffers: Vec<BufferHandle>,
}

impl TransientBuffers {
    fn upload<D: ComputeDevice + ?Sized>(
        &mut self,
        device: &mut D,
        packet: &FramePacket,
        params: &mut Vec<KernelParam>,
    ) -> Result<(), DeviceError> {
        for packed in &packet.buffers {
            let buffer =
                device.create_storage_buffer(packed.name, packed.stride, packed.count, &packed.bytes)?;
            self.buffers.push(buffer);
            params.push(KernelParam::new(packed.name, ParamValue::Buffer(buffer)));
        }
        Ok(())
    }

    fn release_all<D: ComputeDevice + ?Sized>(&mut self, device: &mut D) {
        for buffer in self.buffers.drain(..) {
            device.release_buffer(buffer);
        }
    }
}

/// Drives one kernel through a frame: marshal parameters, make sure the output target fits the
/// viewport, dispatch, composite into the destination, release per-frame buffers.
///
/// The kernel entry point is resolved once in [`DispatchCoordinator::new`]. If that fails every
/// frame is skipped with the stored diagnostic instead of retrying the lookup.
#[derive(Debug)]
pub struct DispatchCoordinator {
    profile: RendererProfile,
    kernel: Result<KernelHandle, ConfigError>,
    state: DispatchState,
    render_target: RenderTargetManager,
    accumulation: Option<AccumulationState>,
    last_diagnostic: Option<ConfigError>,
    frames_presented: u64,
}

impl DispatchCoordinator {
    pub fn new<D: ComputeDevice + ?Sized>(device: &mut D, profile: RendererProfile) -> Self {
        let kernel = device
            .find_kernel(KERNEL_ENTRY_POINT)
            .map_err(|e| ConfigError::KernelMissing {
                entry_point: KERNEL_ENTRY_POINT.to_string(),
                reason: e.to_string(),
            });
        match &kernel {
            Ok(_) => debug!("{} renderer ready", profile.name()),
            Err(e) => error!("{} renderer disabled: {}", profile.name(), e),
        }

        Self {
            accumulation: profile.uses_accumulation().then(AccumulationState::new),
            profile,
            kernel,
            state: DispatchState::Idle,
            render_target: RenderTargetManager::new("render target"),
            last_diagnostic: None,
            frames_presented: 0,
        }
    }

    /// Renders one frame into `destination`.
    ///
    /// Queued registry changes are applied first, so primitives activated or removed during the
    /// previous frame take effect here and not part way through.
    pub fn render_frame<D: ComputeDevice + ?Sized>(
        &mut self,
        device: &mut D,
        registry: &mut PrimitiveRegistry,
        inputs: &FrameInputs,
        destination: ImageHandle,
    ) -> FrameOutcome {
        debug_assert_eq!(self.state, DispatchState::Idle);

        let kernel = match &self.kernel {
            Ok(kernel) => *kernel,
            Err(e) => {
                let e = e.clone();
                return self.skip(e);
            }
        };
        if let Err(e) = self.profile.validate() {
            return self.skip(e);
        }
        let viewport = inputs.camera.viewport;
        if viewport.is_empty() {
            trace!("skipping frame for {}x{} viewport", viewport.width, viewport.height);
            return FrameOutcome::Skipped(ConfigError::UnsupportedViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let applied = registry.apply_pending_changes();
        if applied > 0 {
            trace!("applied {} registry changes", applied);
        }

        let packet = pack_frame(&self.profile, registry, inputs);

        let mut transient = TransientBuffers::default();
        let result = self.execute(device, kernel, packet, inputs, destination, &mut transient);
        // released whether or not the frame made it through
        transient.release_all(device);
        self.state = DispatchState::Idle;

        match result {
            Ok(outcome) => {
                self.last_diagnostic = None;
                self.frames_presented += 1;
                outcome
            }
            Err(e) => {
                warn!("{} frame failed: {}", self.profile.name(), e);
                FrameOutcome::Failed(e)
            }
        }
    }

    /// Frees the render target and accumulation buffer. The coordinator can keep rendering
    /// afterwards; targets are reallocated on demand.
    pub fn release_resources<D: ComputeDevice + ?Sized>(&mut self, device: &mut D) {
        self.render_target.release(device);
        if let Some(accumulation) = &mut self.accumulation {
            accumulation.release(device);
        }
    }

    /// Swaps the profile. Accumulation restarts from scratch.
    pub fn set_profile<D: ComputeDevice + ?Sized>(&mut self, device: &mut D, profile: RendererProfile) {
        if let Some(mut accumulation) = self.accumulation.take() {
            accumulation.release(device);
        }
        self.accumulation = profile.uses_accumulation().then(AccumulationState::new);
        self.profile = profile;
        self.last_diagnostic = None;
    }

    pub fn profile(&self) -> &RendererProfile {
        &self.profile
    }

    /// Settings edits apply from the next frame
    pub fn profile_mut(&mut self) -> &mut RendererProfile {
        &mut self.profile
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// The configuration problem that made the most recent frame skip, if any
    pub fn last_diagnostic(&self) -> Option<&ConfigError> {
        self.last_diagnostic.as_ref()
    }

    pub fn accumulated_samples(&self) -> Option<u32> {
        self.accumulation.as_ref().map(AccumulationState::sample_count)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

// ~~ Private Functions ~~

impl DispatchCoordinator {
    fn execute<D: ComputeDevice + ?Sized>(
        &mut self,
        device: &mut D,
        kernel: KernelHandle,
        packet: FramePacket,
        inputs: &FrameInputs,
        destination: ImageHandle,
        transient: &mut TransientBuffers,
    ) -> Result<FrameOutcome, DeviceError> {
        let viewport = inputs.camera.viewport;

        let mut params = packet.params.clone();
        transient.upload(device, &packet, &mut params)?;
        self.state = DispatchState::ParamsReady;

        let (target, target_status) =
            self.render_target
                .ensure_target(device, viewport.width, viewport.height)?;
        params.push(KernelParam::new(
            param_names::RESULT,
            ParamValue::Image(target.image),
        ));
        self.state = DispatchState::TargetReady;

        let groups = thread_groups(viewport.width, viewport.height);
        device.dispatch(kernel, &params, groups)?;
        self.state = DispatchState::Dispatched;

        let accumulated_sample = match &mut self.accumulation {
            None => {
                device.blit(target.image, destination)?;
                None
            }
            Some(accumulation) => {
                let (accumulation_target, accumulation_status) =
                    accumulation.ensure_buffer(device, viewport.width, viewport.height)?;
                let recreated = target_status == TargetStatus::Created
                    || accumulation_status == TargetStatus::Created;
                let frame = accumulation.begin_frame(inputs.camera, recreated);

                device.blend(target.image, accumulation_target.image, frame.weight)?;
                // the buffer now holds this sample whether or not presenting it works
                accumulation.commit(frame);
                device.blit(accumulation_target.image, destination)?;
                Some(frame.sample)
            }
        };
        self.state = DispatchState::Composited;

        Ok(FrameOutcome::Presented {
            thread_groups: groups,
            accumulated_sample,
        })
    }

    /// Logs `error` loudly the first time in a row it occurs, quietly after that
    fn skip(&mut self, error: ConfigError) -> FrameOutcome {
        if self.last_diagnostic.as_ref() == Some(&error) {
            trace!("{} frame skipped: {}", self.profile.name(), error);
        } else {
            error!("{} frame skipped: {}", self.profile.name(), error);
            self.last_diagnostic = Some(error.clone());
        }
        FrameOutcome::Skipped(error)
    }
}
