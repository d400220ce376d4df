use super::{
    binding_for, bindings,
    kernel_source::KernelSource,
    resources::{color_subresource_range, HostBuffer, StorageImage},
    vulkan_init::{choose_physical_device, create_device, create_entry, create_instance},
};
use crate::{
    helper::error_reporting::report_anyhow,
    renderer::{
        compute_device::{
            BufferHandle, ComputeDevice, DeviceError, ImageHandle, KernelHandle, RenderTargetDesc,
        },
        config_renderer::{BLEND_ENTRY_POINT, TIMEOUT_NANOSECS},
        dispatch::thread_groups,
        shader_interfaces::kernel_params::{
            pack_uniform_block, param_names, KernelParam, ParamValue,
        },
    },
};
use ahash::{HashMap, HashMapExt};
use anyhow::Context;
use ash::vk;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::ffi::CString;

struct Kernel {
    entry_point: String,
    module: vk::ShaderModule,
    pipeline: vk::Pipeline,
}

/// Descriptor contents for one dispatch, before the uniform block is uploaded
#[derive(Default)]
struct BoundResources {
    shapes: Option<vk::Buffer>,
    lights: Option<vk::Buffer>,
    result: Option<vk::ImageView>,
    source: Option<vk::ImageView>,
    aux_image: Option<vk::ImageView>,
}

/// Synchronous compute device: every call that records gpu work submits it and waits for the
/// fence before returning, so releasing a resource right after use is always safe.
pub struct VulkanComputeDevice {
    _entry: ash::Entry,
    instance: ash::Instance,
    device: ash::Device,
    queue: vk::Queue,
    memory_properties: vk::PhysicalDeviceMemoryProperties,

    command_pool: vk::CommandPool,
    command_buffer: vk::CommandBuffer,
    fence: vk::Fence,
    descriptor_set_layout: vk::DescriptorSetLayout,
    pipeline_layout: vk::PipelineLayout,
    descriptor_pool: vk::DescriptorPool,

    kernel_source: KernelSource,
    blend_source: Option<KernelSource>,
    kernels: Vec<Kernel>,
    blend_kernel: Option<Kernel>,

    buffers: HashMap<u64, HostBuffer>,
    images: HashMap<u64, StorageImage>,
    placeholder_buffer: Option<HostBuffer>,
    placeholder_image: Option<StorageImage>,
    next_handle: u64,
}

impl VulkanComputeDevice {
    /// `blend_source` provides the accumulation blend kernel. Without it, [`ComputeDevice::blend`]
    /// reports [`DeviceError::Unsupported`].
    pub fn new(
        kernel_source: KernelSource,
        blend_source: Option<KernelSource>,
    ) -> anyhow::Result<Self> {
        let entry = create_entry()?;
        let instance = create_instance(&entry)?;

        let chosen = match choose_physical_device(&instance) {
            Ok(chosen) => chosen,
            Err(e) => {
                unsafe { instance.destroy_instance(None) };
                return Err(e);
            }
        };
        let (device, queue) = match create_device(&instance, &chosen) {
            Ok(created) => created,
            Err(e) => {
                unsafe { instance.destroy_instance(None) };
                return Err(e);
            }
        };
        let memory_properties =
            unsafe { instance.get_physical_device_memory_properties(chosen.physical_device) };

        // from here on `Drop` cleans up whatever was created; destroying null handles is a no-op
        let mut compute_device = Self {
            _entry: entry,
            instance,
            device,
            queue,
            memory_properties,
            command_pool: vk::CommandPool::null(),
            command_buffer: vk::CommandBuffer::null(),
            fence: vk::Fence::null(),
            descriptor_set_layout: vk::DescriptorSetLayout::null(),
            pipeline_layout: vk::PipelineLayout::null(),
            descriptor_pool: vk::DescriptorPool::null(),
            kernel_source,
            blend_source,
            kernels: Vec::new(),
            blend_kernel: None,
            buffers: HashMap::new(),
            images: HashMap::new(),
            placeholder_buffer: None,
            placeholder_image: None,
            next_handle: 1,
        };
        compute_device.init_resources(chosen.compute_queue_family_index)?;
        Ok(compute_device)
    }

    pub fn kernel_source(&self) -> &KernelSource {
        &self.kernel_source
    }
}

impl ComputeDevice for VulkanComputeDevice {
    fn find_kernel(&mut self, entry_point: &str) -> Result<KernelHandle, DeviceError> {
        if let Some(index) = self.kernels.iter().position(|k| k.entry_point == entry_point) {
            return Ok(KernelHandle(index as u64));
        }
        if !self.kernel_source.has_compute_entry_point(entry_point) {
            return Err(DeviceError::KernelNotFound(entry_point.to_string()));
        }

        let kernel = self
            .create_kernel(&self.kernel_source, entry_point)
            .map_err(|e| device_error(e, "create compute pipeline"))?;
        debug!("created compute pipeline for `{}`", entry_point);
        self.kernels.push(kernel);
        Ok(KernelHandle((self.kernels.len() - 1) as u64))
    }

    fn create_storage_buffer(
        &mut self,
        name: &str,
        stride: usize,
        count: usize,
        bytes: &[u8],
    ) -> Result<BufferHandle, DeviceError> {
        debug_assert_eq!(bytes.len(), stride * count);
        let buffer = HostBuffer::new(
            &self.device,
            &self.memory_properties,
            vk::BufferUsageFlags::STORAGE_BUFFER,
            bytes,
        )
        .map_err(|e| {
            report_anyhow(&e, "create storage buffer");
            DeviceError::AllocationFailed {
                name: name.to_string(),
                size: bytes.len(),
            }
        })?;
        let handle = self.next_handle();
        self.buffers.insert(handle, buffer);
        Ok(BufferHandle(handle))
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        match self.buffers.remove(&buffer.0) {
            // all submitted work has completed by the time a call returns
            Some(host_buffer) => unsafe { host_buffer.destroy(&self.device) },
            None => warn!("release of unknown buffer handle {}", buffer.0),
        }
    }

    fn create_render_target(&mut self, desc: RenderTargetDesc) -> Result<ImageHandle, DeviceError> {
        let allocation_failed = |e: anyhow::Error| {
            report_anyhow(&e, "create render target");
            DeviceError::AllocationFailed {
                name: format!("{}x{} render target", desc.width, desc.height),
                size: desc.width as usize * desc.height as usize * desc.format.bytes_per_pixel(),
            }
        };
        let image = StorageImage::new(&self.device, &self.memory_properties, desc.width, desc.height)
            .map_err(allocation_failed)?;
        if let Err(e) = self.transition_to_general(&[image.image]) {
            unsafe { image.destroy(&self.device) };
            return Err(allocation_failed(e));
        }

        let handle = self.next_handle();
        self.images.insert(handle, image);
        Ok(ImageHandle(handle))
    }

    fn release_render_target(&mut self, image: ImageHandle) {
        match self.images.remove(&image.0) {
            Some(storage_image) => unsafe { storage_image.destroy(&self.device) },
            None => warn!("release of unknown image handle {}", image.0),
        }
    }

    fn dispatch(
        &mut self,
        kernel: KernelHandle,
        params: &[KernelParam],
        thread_groups: [u32; 3],
    ) -> Result<(), DeviceError> {
        let pipeline = self
            .kernels
            .get(kernel.0 as usize)
            .map(|k| k.pipeline)
            .ok_or(DeviceError::InvalidHandle(kernel.0))?;
        self.run_kernel(pipeline, params, thread_groups)
    }

    fn blit(&mut self, source: ImageHandle, destination: ImageHandle) -> Result<(), DeviceError> {
        let src = self.image(source)?;
        let dst = self.image(destination)?;
        let (src_image, src_extent) = (src.image, (src.width, src.height));
        let (dst_image, dst_extent) = (dst.image, (dst.width, dst.height));

        let region = vk::ImageBlit {
            src_subresource: color_subresource_layers(),
            src_offsets: [vk::Offset3D::default(), far_corner(src_extent)],
            dst_subresource: color_subresource_layers(),
            dst_offsets: [vk::Offset3D::default(), far_corner(dst_extent)],
        };
        self.submit_and_wait(|device, command_buffer| unsafe {
            device.cmd_blit_image(
                command_buffer,
                src_image,
                vk::ImageLayout::GENERAL,
                dst_image,
                vk::ImageLayout::GENERAL,
                &[region],
                vk::Filter::NEAREST,
            );
        })
        .map_err(|e| device_error(e, "blit image"))
    }

    fn blend(
        &mut self,
        source: ImageHandle,
        destination: ImageHandle,
        weight: f32,
    ) -> Result<(), DeviceError> {
        let pipeline = self.blend_pipeline()?;
        let dst = self.image(destination)?;
        let groups = thread_groups(dst.width, dst.height);
        let params = [
            KernelParam::new(param_names::BLEND_WEIGHT, ParamValue::Float(weight)),
            KernelParam::new(param_names::SOURCE, ParamValue::Image(source)),
            KernelParam::new(param_names::ACCUMULATION, ParamValue::Image(destination)),
        ];
        self.run_kernel(pipeline, &params, groups)
    }
}

// ~~ Private Functions ~~

impl VulkanComputeDevice {
    fn init_resources(&mut self, queue_family_index: u32) -> anyhow::Result<()> {
        let device = &self.device;

        let pool_info = vk::CommandPoolCreateInfo::builder()
            .queue_family_index(queue_family_index)
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);
        self.command_pool = unsafe { device.create_command_pool(&pool_info, None) }
            .context("creating command pool")?;

        let allocate_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(self.command_pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);
        self.command_buffer = unsafe { device.allocate_command_buffers(&allocate_info) }
            .context("allocating command buffer")?[0];

        self.fence = unsafe { device.create_fence(&vk::FenceCreateInfo::default(), None) }
            .context("creating fence")?;

        let layout_bindings = [
            layout_binding(bindings::UNIFORMS, vk::DescriptorType::UNIFORM_BUFFER),
            layout_binding(bindings::SHAPES, vk::DescriptorType::STORAGE_BUFFER),
            layout_binding(bindings::LIGHTS, vk::DescriptorType::STORAGE_BUFFER),
            layout_binding(bindings::RESULT, vk::DescriptorType::STORAGE_IMAGE),
            layout_binding(bindings::SOURCE, vk::DescriptorType::STORAGE_IMAGE),
            layout_binding(bindings::AUX_IMAGE, vk::DescriptorType::STORAGE_IMAGE),
        ];
        let set_layout_info = vk::DescriptorSetLayoutCreateInfo::builder().bindings(&layout_bindings);
        self.descriptor_set_layout =
            unsafe { device.create_descriptor_set_layout(&set_layout_info, None) }
                .context("creating descriptor set layout")?;

        let set_layouts = [self.descriptor_set_layout];
        let pipeline_layout_info = vk::PipelineLayoutCreateInfo::builder().set_layouts(&set_layouts);
        self.pipeline_layout = unsafe { device.create_pipeline_layout(&pipeline_layout_info, None) }
            .context("creating pipeline layout")?;

        let pool_sizes = [
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::UNIFORM_BUFFER,
                descriptor_count: 1,
            },
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::STORAGE_BUFFER,
                descriptor_count: 2,
            },
            vk::DescriptorPoolSize {
                ty: vk::DescriptorType::STORAGE_IMAGE,
                descriptor_count: 3,
            },
        ];
        let descriptor_pool_info = vk::DescriptorPoolCreateInfo::builder()
            .max_sets(1)
            .pool_sizes(&pool_sizes);
        self.descriptor_pool = unsafe { device.create_descriptor_pool(&descriptor_pool_info, None) }
            .context("creating descriptor pool")?;

        self.placeholder_buffer = Some(
            HostBuffer::new(
                &self.device,
                &self.memory_properties,
                vk::BufferUsageFlags::STORAGE_BUFFER,
                &[],
            )
            .context("creating placeholder buffer")?,
        );
        let placeholder_image = StorageImage::new(&self.device, &self.memory_properties, 1, 1)
            .context("creating placeholder image")?;
        let placeholder_vk_image = placeholder_image.image;
        self.placeholder_image = Some(placeholder_image);
        self.transition_to_general(&[placeholder_vk_image])
            .context("initializing placeholder image")?;

        Ok(())
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn image(&self, handle: ImageHandle) -> Result<&StorageImage, DeviceError> {
        self.images
            .get(&handle.0)
            .ok_or(DeviceError::InvalidHandle(handle.0))
    }

    fn create_kernel(&self, source: &KernelSource, entry_point: &str) -> anyhow::Result<Kernel> {
        let name = CString::new(entry_point)?;
        let module_info = vk::ShaderModuleCreateInfo::builder().code(source.words());
        let module = unsafe { self.device.create_shader_module(&module_info, None) }
            .context("creating shader module")?;

        let stage = vk::PipelineShaderStageCreateInfo::builder()
            .stage(vk::ShaderStageFlags::COMPUTE)
            .module(module)
            .name(&name);
        let create_info = vk::ComputePipelineCreateInfo::builder()
            .stage(stage.build())
            .layout(self.pipeline_layout);
        let pipelines = unsafe {
            self.device.create_compute_pipelines(
                vk::PipelineCache::null(),
                &[create_info.build()],
                None,
            )
        };
        match pipelines {
            Ok(pipelines) => Ok(Kernel {
                entry_point: entry_point.to_string(),
                module,
                pipeline: pipelines[0],
            }),
            Err((_, e)) => {
                unsafe { self.device.destroy_shader_module(module, None) };
                Err(e).context("creating compute pipeline")
            }
        }
    }

    fn blend_pipeline(&mut self) -> Result<vk::Pipeline, DeviceError> {
        if let Some(kernel) = &self.blend_kernel {
            return Ok(kernel.pipeline);
        }
        let source = self
            .blend_source
            .as_ref()
            .ok_or(DeviceError::Unsupported("accumulation blending without a blend kernel"))?;
        if !source.has_compute_entry_point(BLEND_ENTRY_POINT) {
            return Err(DeviceError::KernelNotFound(BLEND_ENTRY_POINT.to_string()));
        }
        let kernel = self
            .create_kernel(source, BLEND_ENTRY_POINT)
            .map_err(|e| device_error(e, "create blend pipeline"))?;
        let pipeline = kernel.pipeline;
        self.blend_kernel = Some(kernel);
        Ok(pipeline)
    }

    fn bound_resources(&self, params: &[KernelParam]) -> Result<BoundResources, DeviceError> {
        let mut bound = BoundResources::default();
        for param in params {
            let Some(binding) = binding_for(param.name) else {
                if param.value.is_resource() {
                    trace!("no binding for resource parameter `{}`", param.name);
                }
                continue;
            };
            match param.value {
                ParamValue::Buffer(handle) => {
                    let buffer = self
                        .buffers
                        .get(&handle.0)
                        .ok_or(DeviceError::InvalidHandle(handle.0))?
                        .buffer;
                    match binding {
                        bindings::SHAPES => bound.shapes = Some(buffer),
                        _ => bound.lights = Some(buffer),
                    }
                }
                ParamValue::Image(handle) => {
                    let view = self.image(handle)?.view;
                    match binding {
                        bindings::RESULT => bound.result = Some(view),
                        bindings::SOURCE => bound.source = Some(view),
                        _ => bound.aux_image = Some(view),
                    }
                }
                _ => (),
            }
        }
        Ok(bound)
    }

    fn run_kernel(
        &mut self,
        pipeline: vk::Pipeline,
        params: &[KernelParam],
        thread_groups: [u32; 3],
    ) -> Result<(), DeviceError> {
        let bound = self.bound_resources(params)?;
        let uniform_block = pack_uniform_block(params);
        let uniforms = HostBuffer::new(
            &self.device,
            &self.memory_properties,
            vk::BufferUsageFlags::UNIFORM_BUFFER,
            &uniform_block,
        )
        .map_err(|e| {
            report_anyhow(&e, "create uniform buffer");
            DeviceError::AllocationFailed {
                name: "uniform block".to_string(),
                size: uniform_block.len(),
            }
        })?;

        let result = self
            .record_dispatch(pipeline, &bound, uniforms.buffer, thread_groups)
            .map_err(|e| device_error(e, "dispatch kernel"));
        // the submission has been waited on, or never happened
        unsafe { uniforms.destroy(&self.device) };
        result
    }

    fn record_dispatch(
        &self,
        pipeline: vk::Pipeline,
        bound: &BoundResources,
        uniform_buffer: vk::Buffer,
        thread_groups: [u32; 3],
    ) -> anyhow::Result<()> {
        let placeholder_buffer = self
            .placeholder_buffer
            .as_ref()
            .context("placeholder buffer missing")?
            .buffer;
        let placeholder_view = self
            .placeholder_image
            .as_ref()
            .context("placeholder image missing")?
            .view;

        unsafe {
            self.device
                .reset_descriptor_pool(self.descriptor_pool, vk::DescriptorPoolResetFlags::empty())
        }
        .context("resetting descriptor pool")?;
        let set_layouts = [self.descriptor_set_layout];
        let allocate_info = vk::DescriptorSetAllocateInfo::builder()
            .descriptor_pool(self.descriptor_pool)
            .set_layouts(&set_layouts);
        let descriptor_set = unsafe { self.device.allocate_descriptor_sets(&allocate_info) }
            .context("allocating descriptor set")?[0];

        let buffer_infos = [
            uniform_buffer,
            bound.shapes.unwrap_or(placeholder_buffer),
            bound.lights.unwrap_or(placeholder_buffer),
        ]
        .map(|buffer| vk::DescriptorBufferInfo {
            buffer,
            offset: 0,
            range: vk::WHOLE_SIZE,
        });
        let image_infos = [bound.result, bound.source, bound.aux_image].map(|view| {
            vk::DescriptorImageInfo {
                sampler: vk::Sampler::null(),
                image_view: view.unwrap_or(placeholder_view),
                image_layout: vk::ImageLayout::GENERAL,
            }
        });

        let mut writes = Vec::with_capacity(buffer_infos.len() + image_infos.len());
        for (binding, info) in buffer_infos.iter().enumerate() {
            let descriptor_type = if binding as u32 == bindings::UNIFORMS {
                vk::DescriptorType::UNIFORM_BUFFER
            } else {
                vk::DescriptorType::STORAGE_BUFFER
            };
            writes.push(
                vk::WriteDescriptorSet::builder()
                    .dst_set(descriptor_set)
                    .dst_binding(binding as u32)
                    .descriptor_type(descriptor_type)
                    .buffer_info(std::slice::from_ref(info))
                    .build(),
            );
        }
        for (offset, info) in image_infos.iter().enumerate() {
            writes.push(
                vk::WriteDescriptorSet::builder()
                    .dst_set(descriptor_set)
                    .dst_binding(bindings::RESULT + offset as u32)
                    .descriptor_type(vk::DescriptorType::STORAGE_IMAGE)
                    .image_info(std::slice::from_ref(info))
                    .build(),
            );
        }
        unsafe { self.device.update_descriptor_sets(&writes, &[]) };

        let pipeline_layout = self.pipeline_layout;
        self.submit_and_wait(|device, command_buffer| unsafe {
            device.cmd_bind_pipeline(command_buffer, vk::PipelineBindPoint::COMPUTE, pipeline);
            device.cmd_bind_descriptor_sets(
                command_buffer,
                vk::PipelineBindPoint::COMPUTE,
                pipeline_layout,
                0,
                &[descriptor_set],
                &[],
            );
            device.cmd_dispatch(
                command_buffer,
                thread_groups[0],
                thread_groups[1],
                thread_groups[2],
            );
        })
    }

    fn transition_to_general(&self, images: &[vk::Image]) -> anyhow::Result<()> {
        let barriers: Vec<vk::ImageMemoryBarrier> = images
            .iter()
            .map(|&image| {
                vk::ImageMemoryBarrier::builder()
                    .old_layout(vk::ImageLayout::UNDEFINED)
                    .new_layout(vk::ImageLayout::GENERAL)
                    .src_access_mask(vk::AccessFlags::empty())
                    .dst_access_mask(vk::AccessFlags::MEMORY_READ | vk::AccessFlags::MEMORY_WRITE)
                    .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                    .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
                    .image(image)
                    .subresource_range(color_subresource_range())
                    .build()
            })
            .collect();
        self.submit_and_wait(|device, command_buffer| unsafe {
            device.cmd_pipeline_barrier(
                command_buffer,
                vk::PipelineStageFlags::TOP_OF_PIPE,
                vk::PipelineStageFlags::ALL_COMMANDS,
                vk::DependencyFlags::empty(),
                &[],
                &[],
                &barriers,
            );
        })
    }

    /// Records through `record`, submits and blocks until the gpu is done. A global barrier at
    /// the start makes writes from earlier submissions visible.
    fn submit_and_wait(
        &self,
        record: impl FnOnce(&ash::Device, vk::CommandBuffer),
    ) -> anyhow::Result<()> {
        let device = &self.device;
        let command_buffer = self.command_buffer;

        unsafe {
            device
                .reset_command_buffer(command_buffer, vk::CommandBufferResetFlags::empty())
                .context("resetting command buffer")?;
            let begin_info = vk::CommandBufferBeginInfo::builder()
                .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
            device
                .begin_command_buffer(command_buffer, &begin_info)
                .context("beginning command buffer")?;

            let memory_barrier = vk::MemoryBarrier::builder()
                .src_access_mask(vk::AccessFlags::MEMORY_WRITE)
                .dst_access_mask(vk::AccessFlags::MEMORY_READ | vk::AccessFlags::MEMORY_WRITE)
                .build();
            device.cmd_pipeline_barrier(
                command_buffer,
                vk::PipelineStageFlags::ALL_COMMANDS,
                vk::PipelineStageFlags::ALL_COMMANDS,
                vk::DependencyFlags::empty(),
                &[memory_barrier],
                &[],
                &[],
            );
        }

        record(device, command_buffer);

        unsafe {
            device
                .end_command_buffer(command_buffer)
                .context("ending command buffer")?;
            let command_buffers = [command_buffer];
            let submit_info = vk::SubmitInfo::builder()
                .command_buffers(&command_buffers)
                .build();
            device
                .queue_submit(self.queue, &[submit_info], self.fence)
                .context("submitting command buffer")?;
        }

        // a stalled kernel stalls the frame; keep waiting but say so
        loop {
            match unsafe { device.wait_for_fences(&[self.fence], true, TIMEOUT_NANOSECS) } {
                Ok(()) => break,
                Err(vk::Result::TIMEOUT) => warn!("still waiting for gpu work to finish..."),
                Err(e) => return Err(e).context("waiting for fence"),
            }
        }
        unsafe { device.reset_fences(&[self.fence]) }.context("resetting fence")?;
        Ok(())
    }
}

impl Drop for VulkanComputeDevice {
    fn drop(&mut self) {
        unsafe {
            if let Err(e) = self.device.device_wait_idle() {
                error!("device_wait_idle failed during shutdown: {}", e);
            }
            for (_, buffer) in self.buffers.drain() {
                buffer.destroy(&self.device);
            }
            for (_, image) in self.images.drain() {
                image.destroy(&self.device);
            }
            if let Some(buffer) = self.placeholder_buffer.take() {
                buffer.destroy(&self.device);
            }
            if let Some(image) = self.placeholder_image.take() {
                image.destroy(&self.device);
            }
            for kernel in self.kernels.drain(..).chain(self.blend_kernel.take()) {
                self.device.destroy_pipeline(kernel.pipeline, None);
                self.device.destroy_shader_module(kernel.module, None);
            }
            self.device
                .destroy_descriptor_pool(self.descriptor_pool, None);
            self.device
                .destroy_pipeline_layout(self.pipeline_layout, None);
            self.device
                .destroy_descriptor_set_layout(self.descriptor_set_layout, None);
            self.device.destroy_fence(self.fence, None);
            self.device.destroy_command_pool(self.command_pool, None);
            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
        debug!("vulkan compute device destroyed");
    }
}

fn layout_binding(
    binding: u32,
    descriptor_type: vk::DescriptorType,
) -> vk::DescriptorSetLayoutBinding {
    vk::DescriptorSetLayoutBinding::builder()
        .binding(binding)
        .descriptor_type(descriptor_type)
        .descriptor_count(1)
        .stage_flags(vk::ShaderStageFlags::COMPUTE)
        .build()
}

fn color_subresource_layers() -> vk::ImageSubresourceLayers {
    vk::ImageSubresourceLayers {
        aspect_mask: vk::ImageAspectFlags::COLOR,
        mip_level: 0,
        base_array_layer: 0,
        layer_count: 1,
    }
}

fn far_corner((width, height): (u32, u32)) -> vk::Offset3D {
    vk::Offset3D {
        x: width as i32,
        y: height as i32,
        z: 1,
    }
}

fn device_error(e: anyhow::Error, failed_to: &str) -> DeviceError {
    report_anyhow(&e, failed_to);
    DeviceError::DispatchFailed(format!("failed to {}: {:#}", failed_to, e))
}
