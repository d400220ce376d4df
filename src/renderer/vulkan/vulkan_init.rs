use crate::{
    config::ENGINE_NAME,
    renderer::config_renderer::{ENABLE_VULKAN_VALIDATION, VULKAN_VER_MAJ, VULKAN_VER_MIN},
};
use anyhow::Context;
use ash::vk;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use std::ffi::{CStr, CString};

const VALIDATION_LAYER_NAME: &str = "VK_LAYER_KHRONOS_validation";

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub fn create_entry() -> anyhow::Result<ash::Entry> {
    unsafe { ash::Entry::load() }
        .context("loading vulkan dynamic library. please install vulkan on your system...")
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub fn create_entry() -> anyhow::Result<ash::Entry> {
    Ok(ash_molten::load())
}

pub fn api_version() -> u32 {
    vk::make_api_version(0, VULKAN_VER_MAJ, VULKAN_VER_MIN, 0)
}

/// Headless instance: no surface extensions. Enables the khronos validation layer in debug
/// builds when it's installed.
pub fn create_instance(entry: &ash::Entry) -> anyhow::Result<ash::Instance> {
    let mut layer_names = Vec::<CString>::new();
    if ENABLE_VULKAN_VALIDATION {
        let layer_properties = entry
            .enumerate_instance_layer_properties()
            .context("enumerating instance layer properties")?;

        for layer_prop in layer_properties {
            let layer_name = unsafe { CStr::from_ptr(layer_prop.layer_name.as_ptr()) }
                .to_str()
                .context("decoding installed layer names")?;

            if layer_name == VALIDATION_LAYER_NAME {
                debug!("enabling vulkan layer: {}", VALIDATION_LAYER_NAME);
                layer_names.push(CString::new(VALIDATION_LAYER_NAME)?);
                break;
            }
        }
    }
    let layer_name_ptrs: Vec<*const std::ffi::c_char> =
        layer_names.iter().map(|name| name.as_ptr()).collect();

    let app_name = CString::new(ENGINE_NAME)?;
    let app_info = vk::ApplicationInfo::builder()
        .application_name(&app_name)
        .engine_name(&app_name)
        .api_version(api_version());
    let create_info = vk::InstanceCreateInfo::builder()
        .application_info(&app_info)
        .enabled_layer_names(&layer_name_ptrs);

    let instance =
        unsafe { entry.create_instance(&create_info, None) }.context("creating vulkan instance")?;
    info!(
        "created vulkan instance. api version = {}.{}",
        VULKAN_VER_MAJ, VULKAN_VER_MIN
    );
    Ok(instance)
}

pub struct ChosenPhysicalDevice {
    pub physical_device: vk::PhysicalDevice,
    pub compute_queue_family_index: u32,
    pub name: String,
}

/// Picks the most capable device with a compute queue, preferring discrete gpus
pub fn choose_physical_device(instance: &ash::Instance) -> anyhow::Result<ChosenPhysicalDevice> {
    let physical_devices = unsafe { instance.enumerate_physical_devices() }
        .context("enumerating physical devices")?;

    debug!("available vulkan physical devices:");
    let chosen = physical_devices
        .into_iter()
        .filter_map(|physical_device| {
            let properties = unsafe { instance.get_physical_device_properties(physical_device) };
            let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
                .to_string_lossy()
                .into_owned();
            debug!("\t{}", name);

            if properties.api_version < api_version() {
                return None;
            }
            let compute_queue_family_index = compute_queue_family(instance, physical_device)?;
            let score = match properties.device_type {
                vk::PhysicalDeviceType::DISCRETE_GPU => 4,
                vk::PhysicalDeviceType::INTEGRATED_GPU => 3,
                vk::PhysicalDeviceType::VIRTUAL_GPU => 2,
                vk::PhysicalDeviceType::CPU => 1,
                _ => 0,
            };
            Some((
                score,
                ChosenPhysicalDevice {
                    physical_device,
                    compute_queue_family_index,
                    name,
                },
            ))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, chosen)| chosen);

    chosen.with_context(|| {
        format!(
            "could not find a suitable vulkan implimentation (device and driver). requirements:\n
            \t- must contain a queue family supporting compute operations\n
            \t- must support api version {}.{}",
            VULKAN_VER_MAJ, VULKAN_VER_MIN
        )
    })
}

/// First queue family with compute support
fn compute_queue_family(
    instance: &ash::Instance,
    physical_device: vk::PhysicalDevice,
) -> Option<u32> {
    let families =
        unsafe { instance.get_physical_device_queue_family_properties(physical_device) };
    families
        .iter()
        .position(|family| family.queue_flags.contains(vk::QueueFlags::COMPUTE))
        .map(|index| index as u32)
}

pub fn create_device(
    instance: &ash::Instance,
    chosen: &ChosenPhysicalDevice,
) -> anyhow::Result<(ash::Device, vk::Queue)> {
    let queue_priorities = [1.0_f32];
    let queue_create_info = vk::DeviceQueueCreateInfo::builder()
        .queue_family_index(chosen.compute_queue_family_index)
        .queue_priorities(&queue_priorities);
    let queue_create_infos = [queue_create_info.build()];
    let create_info = vk::DeviceCreateInfo::builder().queue_create_infos(&queue_create_infos);

    let device = unsafe { instance.create_device(chosen.physical_device, &create_info, None) }
        .context("creating vulkan device")?;
    let queue = unsafe { device.get_device_queue(chosen.compute_queue_family_index, 0) };
    info!("using vulkan device {}", chosen.name);
    Ok((device, queue))
}

pub fn find_memory_type(
    memory_properties: &vk::PhysicalDeviceMemoryProperties,
    type_bits: u32,
    required: vk::MemoryPropertyFlags,
) -> Option<u32> {
    (0..memory_properties.memory_type_count).find(|&index| {
        let supported = type_bits & (1 << index) != 0;
        supported
            && memory_properties.memory_types[index as usize]
                .property_flags
                .contains(required)
    })
}
