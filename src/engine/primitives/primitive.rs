use crate::engine::{
    config_engine::{DEFAULT_BLEND_STRENGTH, DEFAULT_COLOR, DEFAULT_POSITION, DEFAULT_SCALE},
    operation::Operation,
    primitives::{primitive_registry::PrimitiveId, shape_kind::ShapeKind},
};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A signed distance field shape and the way it combines with the rest of the scene.
///
/// `scale` is local. The scale sent to kernels is multiplied through the parent chain, see
/// [`PrimitiveRegistry::effective_scale`](super::primitive_registry::PrimitiveRegistry::effective_scale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: ShapeKind,
    pub op: Operation,
    pub position: Vec3,
    pub scale: Vec3,
    pub color: Vec3,
    /// Always within [0, 1]
    blend_strength: f32,
    /// Optional parent. A handle that no longer resolves to an active primitive is ignored.
    #[serde(skip)]
    parent: Option<PrimitiveId>,
}

impl Primitive {
    pub fn new(shape: ShapeKind, op: Operation) -> Self {
        Self {
            shape,
            op,
            position: DEFAULT_POSITION,
            scale: DEFAULT_SCALE,
            color: DEFAULT_COLOR,
            blend_strength: DEFAULT_BLEND_STRENGTH,
            parent: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_blend_strength(mut self, blend_strength: f32) -> Self {
        self.set_blend_strength(blend_strength);
        self
    }

    pub fn with_parent(mut self, parent: PrimitiveId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[inline]
    pub fn blend_strength(&self) -> f32 {
        self.blend_strength
    }

    /// Clamps to [0, 1]. NaN becomes 0.
    pub fn set_blend_strength(&mut self, blend_strength: f32) {
        self.blend_strength = if blend_strength.is_nan() {
            0.
        } else {
            blend_strength.clamp(0., 1.)
        };
    }

    #[inline]
    pub fn parent(&self) -> Option<PrimitiveId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<PrimitiveId>) {
        self.parent = parent;
    }
}

impl Default for Primitive {
    fn default() -> Self {
        Self::new(ShapeKind::default(), Operation::default())
    }
}
