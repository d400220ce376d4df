use super::vulkan_init::find_memory_type;
use crate::renderer::config_renderer::RENDER_TARGET_FORMAT;
use crate::renderer::compute_device::TargetFormat;
use anyhow::Context;
use ash::vk;

/// Vulkan doesn't allow empty buffers
const MIN_BUFFER_SIZE: vk::DeviceSize = 16;

pub fn vk_format(format: TargetFormat) -> vk::Format {
    match format {
        TargetFormat::Rgba32Float => vk::Format::R32G32B32A32_SFLOAT,
    }
}

pub fn color_subresource_range() -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange {
        aspect_mask: vk::ImageAspectFlags::COLOR,
        base_mip_level: 0,
        level_count: 1,
        base_array_layer: 0,
        layer_count: 1,
    }
}

// ~~ Host Buffer ~~

/// Host visible, coherent buffer written once at creation
pub struct HostBuffer {
    pub buffer: vk::Buffer,
    pub memory: vk::DeviceMemory,
    pub size: vk::DeviceSize,
}

impl HostBuffer {
    pub fn new(
        device: &ash::Device,
        memory_properties: &vk::PhysicalDeviceMemoryProperties,
        usage: vk::BufferUsageFlags,
        bytes: &[u8],
    ) -> anyhow::Result<Self> {
        let size = (bytes.len() as vk::DeviceSize).max(MIN_BUFFER_SIZE);
        let create_info = vk::BufferCreateInfo::builder()
            .size(size)
            .usage(usage)
            .sharing_mode(vk::SharingMode::EXCLUSIVE);
        let buffer =
            unsafe { device.create_buffer(&create_info, None) }.context("creating buffer")?;

        let memory = match allocate_for_buffer(device, memory_properties, buffer) {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { device.destroy_buffer(buffer, None) };
                return Err(e);
            }
        };
        let host_buffer = Self {
            buffer,
            memory,
            size,
        };

        if let Err(e) = host_buffer.write(device, bytes) {
            unsafe { host_buffer.destroy(device) };
            return Err(e);
        }
        Ok(host_buffer)
    }

    fn write(&self, device: &ash::Device, bytes: &[u8]) -> anyhow::Result<()> {
        let mapped = unsafe {
            device.map_memory(self.memory, 0, self.size, vk::MemoryMapFlags::empty())
        }
        .context("mapping buffer memory")?;
        unsafe {
            let dst = std::slice::from_raw_parts_mut(mapped as *mut u8, self.size as usize);
            dst.fill(0);
            dst[..bytes.len()].copy_from_slice(bytes);
            device.unmap_memory(self.memory);
        }
        Ok(())
    }

    /// # Safety
    /// The buffer must not be in use by the gpu
    pub unsafe fn destroy(&self, device: &ash::Device) {
        device.destroy_buffer(self.buffer, None);
        device.free_memory(self.memory, None);
    }
}

fn allocate_for_buffer(
    device: &ash::Device,
    memory_properties: &vk::PhysicalDeviceMemoryProperties,
    buffer: vk::Buffer,
) -> anyhow::Result<vk::DeviceMemory> {
    let requirements = unsafe { device.get_buffer_memory_requirements(buffer) };
    let memory_type_index = find_memory_type(
        memory_properties,
        requirements.memory_type_bits,
        vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT,
    )
    .context("no host visible memory type for buffer")?;

    let allocate_info = vk::MemoryAllocateInfo::builder()
        .allocation_size(requirements.size)
        .memory_type_index(memory_type_index);
    let memory = unsafe { device.allocate_memory(&allocate_info, None) }
        .context("allocating buffer memory")?;
    if let Err(e) = unsafe { device.bind_buffer_memory(buffer, memory, 0) } {
        unsafe { device.free_memory(memory, None) };
        return Err(e).context("binding buffer memory");
    }
    Ok(memory)
}

// ~~ Storage Image ~~

/// Device local image usable as a storage image and as a blit source/destination. Kept in
/// `GENERAL` layout for its whole life.
pub struct StorageImage {
    pub image: vk::Image,
    pub memory: vk::DeviceMemory,
    pub view: vk::ImageView,
    pub width: u32,
    pub height: u32,
}

impl StorageImage {
    /// The image is left in `UNDEFINED` layout; the caller transitions it before first use.
    pub fn new(
        device: &ash::Device,
        memory_properties: &vk::PhysicalDeviceMemoryProperties,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Self> {
        let format = vk_format(RENDER_TARGET_FORMAT);
        let create_info = vk::ImageCreateInfo::builder()
            .image_type(vk::ImageType::TYPE_2D)
            .format(format)
            .extent(vk::Extent3D {
                width,
                height,
                depth: 1,
            })
            .mip_levels(1)
            .array_layers(1)
            .samples(vk::SampleCountFlags::TYPE_1)
            .tiling(vk::ImageTiling::OPTIMAL)
            .usage(
                vk::ImageUsageFlags::STORAGE
                    | vk::ImageUsageFlags::TRANSFER_SRC
                    | vk::ImageUsageFlags::TRANSFER_DST,
            )
            .sharing_mode(vk::SharingMode::EXCLUSIVE)
            .initial_layout(vk::ImageLayout::UNDEFINED);
        let image = unsafe { device.create_image(&create_info, None) }.context("creating image")?;

        let requirements = unsafe { device.get_image_memory_requirements(image) };
        let memory_type_index = match find_memory_type(
            memory_properties,
            requirements.memory_type_bits,
            vk::MemoryPropertyFlags::DEVICE_LOCAL,
        ) {
            Some(index) => index,
            None => {
                unsafe { device.destroy_image(image, None) };
                anyhow::bail!("no device local memory type for image");
            }
        };
        let allocate_info = vk::MemoryAllocateInfo::builder()
            .allocation_size(requirements.size)
            .memory_type_index(memory_type_index);
        let memory = match unsafe { device.allocate_memory(&allocate_info, None) } {
            Ok(memory) => memory,
            Err(e) => {
                unsafe { device.destroy_image(image, None) };
                return Err(e).context("allocating image memory");
            }
        };

        let view_result = unsafe { device.bind_image_memory(image, memory, 0) }
            .context("binding image memory")
            .and_then(|()| {
                let view_info = vk::ImageViewCreateInfo::builder()
                    .image(image)
                    .view_type(vk::ImageViewType::TYPE_2D)
                    .format(format)
                    .subresource_range(color_subresource_range());
                unsafe { device.create_image_view(&view_info, None) }.context("creating image view")
            });
        let view = match view_result {
            Ok(view) => view,
            Err(e) => {
                unsafe {
                    device.destroy_image(image, None);
                    device.free_memory(memory, None);
                }
                return Err(e);
            }
        };

        Ok(Self {
            image,
            memory,
            view,
            width,
            height,
        })
    }

    /// # Safety
    /// The image must not be in use by the gpu
    pub unsafe fn destroy(&self, device: &ash::Device) {
        device.destroy_image_view(self.view, None);
        device.destroy_image(self.image, None);
        device.free_memory(self.memory, None);
    }
}
