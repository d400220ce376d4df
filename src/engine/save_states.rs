use super::{
    config_engine::{SAVE_STATE_FILENAME_CAMERA, SAVE_STATE_FILENAME_PRIMITIVES},
    primitives::{
        primitive::Primitive,
        primitive_registry::{PrimitiveId, PrimitiveRegistry},
    },
};
use crate::{
    config::{PRECURSOR_BYTES, PRECURSOR_BYTE_COUNT},
    helper::more_errors::{CollectionError, IoError},
    user_interface::camera::Camera,
};
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A primitive as written to disk. Parent links become indices into the saved list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SavedPrimitive {
    primitive: Primitive,
    parent_index: Option<usize>,
    /// Position in the active list, which decides ordering among equal operations
    activation_index: Option<usize>,
}

// ~~ Public ~~

pub fn save_state_camera(dir: &Path, camera: &Camera) -> Result<(), IoError> {
    save_state(dir, camera, SAVE_STATE_FILENAME_CAMERA)
}

pub fn load_state_camera(dir: &Path) -> Result<Camera, IoError> {
    load_state::<Camera>(dir, SAVE_STATE_FILENAME_CAMERA)
}

/// Saves every primitive in the registry, including inactive ones. Pending changes that haven't
/// reached a frame boundary yet are not included.
pub fn save_primitives(dir: &Path, registry: &PrimitiveRegistry) -> Result<(), IoError> {
    let ids: Vec<PrimitiveId> = registry.primitives().keys().copied().collect();
    let saved: Vec<SavedPrimitive> = registry
        .primitives()
        .iter()
        .map(|(id, primitive)| SavedPrimitive {
            primitive: primitive.clone(),
            parent_index: primitive
                .parent()
                .and_then(|parent| ids.iter().position(|candidate| *candidate == parent)),
            activation_index: registry
                .active_ids()
                .iter()
                .position(|active_id| active_id == id),
        })
        .collect();
    save_state(dir, &saved, SAVE_STATE_FILENAME_PRIMITIVES)
}

/// Rebuilds a registry from a save. Saved active primitives are queued for activation, so they
/// appear from the first frame rendered with the returned registry.
pub fn load_primitives(dir: &Path) -> Result<PrimitiveRegistry, IoError> {
    let saved = load_state::<Vec<SavedPrimitive>>(dir, SAVE_STATE_FILENAME_PRIMITIVES)?;

    let mut registry = PrimitiveRegistry::new();
    let mut ids = Vec::with_capacity(saved.len());
    for entry in &saved {
        let id = registry.insert(entry.primitive.clone()).map_err(|e| {
            IoError::UnrecognizedFile(format!("{} ({})", SAVE_STATE_FILENAME_PRIMITIVES, e))
        })?;
        ids.push(id);
    }

    let unrecognized = |e: CollectionError| {
        IoError::UnrecognizedFile(format!("{} ({})", SAVE_STATE_FILENAME_PRIMITIVES, e))
    };
    let mut activations = Vec::new();
    for (entry, &id) in saved.iter().zip(&ids) {
        let parent = entry.parent_index.and_then(|index| ids.get(index).copied());
        registry.set_parent(id, parent).map_err(unrecognized)?;
        if let Some(activation_index) = entry.activation_index {
            activations.push((activation_index, id));
        }
    }
    activations.sort_unstable_by_key(|(activation_index, _)| *activation_index);
    for (_, id) in activations {
        registry.register(id).map_err(unrecognized)?;
    }
    debug!("loaded {} primitives", ids.len());
    Ok(registry)
}

// ~~ Private ~~

fn save_state(dir: &Path, to_serialize: &impl Serialize, file_name: &str) -> Result<(), IoError> {
    let encoded_bytes = bincode::serialize(to_serialize).map_err(IoError::SerializeFailed)?;
    save_state_bytes(dir, file_name, encoded_bytes)
}

fn save_state_bytes(dir: &Path, file_name: &str, mut encoded_bytes: Vec<u8>) -> Result<(), IoError> {
    // prepend encoded bytes with engine info
    let mut write_bytes = PRECURSOR_BYTES.to_vec();
    write_bytes.append(&mut encoded_bytes);

    let file_path = validated_file_path(dir, file_name)?;
    fs::write(&file_path, write_bytes)
        .map_err(|e| IoError::WriteFileFailed(file_path.display().to_string(), e))?;
    Ok(())
}

fn load_state<T>(dir: &Path, file_name: &str) -> Result<T, IoError>
where
    T: DeserializeOwned,
{
    let encoded_bytes = load_state_bytes(dir, file_name)?;
    bincode::deserialize::<T>(&encoded_bytes).map_err(IoError::DeserializeFailed)
}

fn load_state_bytes(dir: &Path, file_name: &str) -> Result<Vec<u8>, IoError> {
    let file_path = dir.join(file_name);
    let file_path_string = file_path.display().to_string();
    let mut read_bytes = fs::read(&file_path)
        .map_err(|io_error| IoError::read_file_error(io_error, file_path_string.clone()))?;

    // only the engine name is checked, saves from other versions are attempted anyway
    let name_len = PRECURSOR_BYTE_COUNT - 3;
    if read_bytes.len() < PRECURSOR_BYTE_COUNT || read_bytes[..name_len] != PRECURSOR_BYTES[..name_len]
    {
        return Err(IoError::UnrecognizedFile(file_path_string));
    }
    if read_bytes[name_len..PRECURSOR_BYTE_COUNT] != PRECURSOR_BYTES[name_len..] {
        warn!(
            "{} was saved by engine version {:?}",
            file_path_string,
            &read_bytes[name_len..PRECURSOR_BYTE_COUNT]
        );
    }
    read_bytes.drain(0..PRECURSOR_BYTE_COUNT);
    Ok(read_bytes)
}

/// Ensures containing directories exist, but not the actual file
fn validated_file_path(dir: &Path, file_name: &str) -> Result<PathBuf, IoError> {
    fs::create_dir_all(dir)
        .map_err(|e| IoError::CreateDirectoryFailed(dir.display().to_string(), e))?;
    Ok(dir.join(file_name))
}

// ~~ Tests ~~

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{
        operation::Operation, primitives::shape_kind::ShapeKind, scene_linearizer::linearize,
    };
    use glam::{DVec3, Vec3};

    #[test]
    fn camera_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let saved_camera = Camera::looking_at(DVec3::new(1., 2., 3.), DVec3::ZERO);
        save_state_camera(dir.path(), &saved_camera).unwrap();
        let loaded_camera = load_state_camera(dir.path()).unwrap();
        assert_eq!(saved_camera, loaded_camera);
    }

    #[test]
    fn primitives_keep_parents_and_activation() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = PrimitiveRegistry::new();
        let parent = registry
            .spawn(Primitive::new(ShapeKind::Torus, Operation::SmoothUnion).with_blend_strength(0.4))
            .unwrap();
        let _child = registry
            .spawn(
                Primitive::new(ShapeKind::Cube, Operation::Subtraction)
                    .with_scale(Vec3::splat(0.5))
                    .with_parent(parent),
            )
            .unwrap();
        let _hidden = registry
            .insert(Primitive::new(ShapeKind::Sphere, Operation::Union))
            .unwrap();
        registry.apply_pending_changes();
        save_primitives(dir.path(), &registry).unwrap();

        let mut loaded = load_primitives(dir.path()).unwrap();
        loaded.apply_pending_changes();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.active_ids().len(), 2);

        let loaded_parent = loaded.active_ids()[0];
        let loaded_child = loaded.active_ids()[1];
        assert_eq!(loaded.get(loaded_parent).unwrap().shape, ShapeKind::Torus);
        assert_eq!(loaded.get(loaded_parent).unwrap().blend_strength(), 0.4);
        assert_eq!(loaded.get(loaded_child).unwrap().parent(), Some(loaded_parent));
    }

    #[test]
    fn activation_order_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = PrimitiveRegistry::new();
        let red = registry
            .insert(Primitive::new(ShapeKind::Sphere, Operation::Union).with_color(Vec3::X))
            .unwrap();
        let green = registry
            .insert(Primitive::new(ShapeKind::Cube, Operation::Union).with_color(Vec3::Y))
            .unwrap();
        registry.register(green).unwrap();
        registry.register(red).unwrap();
        registry.apply_pending_changes();
        save_primitives(dir.path(), &registry).unwrap();

        let mut loaded = load_primitives(dir.path()).unwrap();
        loaded.apply_pending_changes();
        assert_eq!(
            linearize(&loaded).as_bytes(),
            linearize(&registry).as_bytes()
        );
        assert_eq!(loaded.get(loaded.active_ids()[0]).unwrap().shape, ShapeKind::Cube);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_state_camera(dir.path()),
            Err(IoError::FileNotFound(_))
        ));
    }

    #[test]
    fn foreign_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SAVE_STATE_FILENAME_CAMERA), b"not a save").unwrap();
        assert!(matches!(
            load_state_camera(dir.path()),
            Err(IoError::UnrecognizedFile(_))
        ));
    }
}
