use crate::renderer::shader_interfaces::shape_buffer::{op_codes, ShapeDataUnit};
use serde::{Deserialize, Serialize};

/// How a primitive combines with the shape accumulated so far
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Operation {
    /// Combination of this primitive and current shape. Equivalent to OR.
    Union,
    /// Subtract this primitive from current shape.
    Subtraction,
    /// Intersection of this primitive with current shape. Equivalent to AND.
    Intersection,
    SmoothUnion,
    SmoothSubtraction,
    SmoothIntersection,
}

static VARIANTS: &[Operation] = &[
    Operation::Union,
    Operation::Subtraction,
    Operation::Intersection,
    Operation::SmoothUnion,
    Operation::SmoothSubtraction,
    Operation::SmoothIntersection,
];

impl Operation {
    pub fn op_code(&self) -> ShapeDataUnit {
        match *self {
            Self::Union => op_codes::UNION,
            Self::Subtraction => op_codes::SUBTRACTION,
            Self::Intersection => op_codes::INTERSECTION,
            Self::SmoothUnion => op_codes::SMOOTH_UNION,
            Self::SmoothSubtraction => op_codes::SMOOTH_SUBTRACTION,
            Self::SmoothIntersection => op_codes::SMOOTH_INTERSECTION,
        }
    }

    pub fn from_op_code(op_code: ShapeDataUnit) -> Option<Self> {
        VARIANTS.iter().copied().find(|op| op.op_code() == op_code)
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Self::Union => "Union",
            Self::Subtraction => "Subtraction",
            Self::Intersection => "Intersection",
            Self::SmoothUnion => "Smooth Union",
            Self::SmoothSubtraction => "Smooth Subtraction",
            Self::SmoothIntersection => "Smooth Intersection",
        }
    }

    pub fn variant_names() -> Vec<(Self, &'static str)> {
        VARIANTS
            .iter()
            .map(|op| (*op, op.name()))
            .collect::<Vec<(Self, &'static str)>>()
    }
}

impl Default for Operation {
    fn default() -> Self {
        Self::Union
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_codes_are_dense_and_ordered() {
        for (expected_code, (op, _)) in Operation::variant_names().into_iter().enumerate() {
            assert_eq!(op.op_code(), expected_code as ShapeDataUnit);
            assert_eq!(Operation::from_op_code(op.op_code()), Some(op));
        }
        assert_eq!(Operation::from_op_code(6), None);
    }
}
