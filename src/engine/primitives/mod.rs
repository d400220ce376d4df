pub mod primitive;
pub mod primitive_registry;
pub mod shape_kind;
