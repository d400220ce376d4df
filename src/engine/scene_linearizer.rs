use super::primitives::{
    primitive::Primitive,
    primitive_registry::{PrimitiveId, PrimitiveRegistry},
};
use crate::renderer::shader_interfaces::shape_buffer::ShapeData;
use ahash::{HashMap, HashMapExt};

/// The active scene flattened into the order kernels walk it: each top-level primitive followed
/// by its direct children. `ids[i]` produced `records[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearizedScene {
    ids: Vec<PrimitiveId>,
    records: Vec<ShapeData>,
}

impl LinearizedScene {
    pub fn ids(&self) -> &[PrimitiveId] {
        &self.ids
    }

    pub fn records(&self) -> &[ShapeData] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records as tightly packed bytes, ready for `shapesBuffer`
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.records)
    }

    fn push(&mut self, id: PrimitiveId, record: ShapeData) {
        self.ids.push(id);
        self.records.push(record);
    }
}

/// Flattens the active primitives of `registry`.
///
/// Primitives are stably sorted by operation code. A primitive whose parent resolves to another
/// active primitive is never emitted at top level; it is emitted once, directly after its parent,
/// with a child count of zero. Grandchildren are therefore not emitted at all, and primitives
/// caught in a parent cycle are dropped.
pub fn linearize(registry: &PrimitiveRegistry) -> LinearizedScene {
    let mut sorted: Vec<(PrimitiveId, &Primitive)> = registry.active_primitives().collect();
    sorted.sort_by_key(|(_, primitive)| primitive.op.op_code());

    // direct children in sorted order
    let mut children: HashMap<PrimitiveId, Vec<(PrimitiveId, &Primitive)>> = HashMap::new();
    for &(id, primitive) in &sorted {
        if let Some(parent_id) = registry.resolved_parent(id, primitive) {
            children.entry(parent_id).or_default().push((id, primitive));
        }
    }

    let mut scene = LinearizedScene::default();
    for &(id, primitive) in &sorted {
        if registry.resolved_parent(id, primitive).is_some() {
            continue;
        }

        let direct_children = children.get(&id).map(Vec::as_slice).unwrap_or_default();
        scene.push(id, record(registry, id, primitive, direct_children.len()));

        for &(child_id, child) in direct_children {
            scene.push(child_id, record(registry, child_id, child, 0));
        }
    }
    scene
}

fn record(
    registry: &PrimitiveRegistry,
    id: PrimitiveId,
    primitive: &Primitive,
    num_children: usize,
) -> ShapeData {
    let scale = registry
        .effective_scale(id)
        .unwrap_or(primitive.scale);
    ShapeData::new(primitive, scale, num_children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{operation::Operation, primitives::shape_kind::ShapeKind};
    use glam::Vec3;

    fn spawn(registry: &mut PrimitiveRegistry, op: Operation) -> PrimitiveId {
        registry
            .spawn(Primitive::new(ShapeKind::Sphere, op))
            .unwrap()
    }

    fn spawn_child(
        registry: &mut PrimitiveRegistry,
        op: Operation,
        parent: PrimitiveId,
    ) -> PrimitiveId {
        registry
            .spawn(Primitive::new(ShapeKind::Cube, op).with_parent(parent))
            .unwrap()
    }

    fn num_children(scene: &LinearizedScene) -> Vec<i32> {
        scene.records().iter().map(|r| r.num_children).collect()
    }

    #[test]
    fn empty_registry_gives_empty_scene() {
        let scene = linearize(&PrimitiveRegistry::new());
        assert!(scene.is_empty());
        assert!(scene.as_bytes().is_empty());
    }

    #[test]
    fn sort_is_by_op_code_and_stable() {
        let mut registry = PrimitiveRegistry::new();
        let smooth = spawn(&mut registry, Operation::SmoothUnion);
        let union_a = spawn(&mut registry, Operation::Union);
        let subtract = spawn(&mut registry, Operation::Subtraction);
        let union_b = spawn(&mut registry, Operation::Union);
        registry.apply_pending_changes();

        let scene = linearize(&registry);
        assert_eq!(scene.ids(), &[union_a, union_b, subtract, smooth]);
        assert_eq!(num_children(&scene), vec![0, 0, 0, 0]);
    }

    #[test]
    fn children_follow_their_parent() {
        let mut registry = PrimitiveRegistry::new();
        let parent = spawn(&mut registry, Operation::Subtraction);
        let child_smooth = spawn_child(&mut registry, Operation::SmoothUnion, parent);
        let loner = spawn(&mut registry, Operation::Union);
        let child_union = spawn_child(&mut registry, Operation::Union, parent);
        registry.apply_pending_changes();

        let scene = linearize(&registry);
        assert_eq!(scene.ids(), &[loner, parent, child_union, child_smooth]);
        assert_eq!(num_children(&scene), vec![0, 2, 0, 0]);
        assert_eq!(scene.as_bytes().len(), 4 * ShapeData::STRIDE);
    }

    #[test]
    fn parent_group_precedes_later_operations() {
        let mut registry = PrimitiveRegistry::new();
        let a = spawn(&mut registry, Operation::Union);
        let b = spawn_child(&mut registry, Operation::Union, a);
        let c = spawn(&mut registry, Operation::Subtraction);
        registry.apply_pending_changes();

        let scene = linearize(&registry);
        assert_eq!(scene.ids(), &[a, b, c]);
        assert_eq!(num_children(&scene), vec![1, 0, 0]);
    }

    #[test]
    fn repeated_linearization_is_byte_identical() {
        let mut registry = PrimitiveRegistry::new();
        let parent = spawn(&mut registry, Operation::SmoothUnion);
        spawn_child(&mut registry, Operation::Intersection, parent);
        spawn(&mut registry, Operation::Union);
        spawn(&mut registry, Operation::SmoothUnion);
        registry.apply_pending_changes();

        let first = linearize(&registry);
        let second = linearize(&registry);
        assert_eq!(first.ids(), second.ids());
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn parent_cycle_is_dropped() {
        let mut registry = PrimitiveRegistry::new();
        let a = spawn(&mut registry, Operation::Union);
        let b = spawn(&mut registry, Operation::Union);
        let c = spawn(&mut registry, Operation::Subtraction);
        registry.set_parent(a, Some(b)).unwrap();
        registry.set_parent(b, Some(a)).unwrap();
        registry.apply_pending_changes();

        let scene = linearize(&registry);
        assert_eq!(scene.ids(), &[c]);
        assert_eq!(num_children(&scene), vec![0]);
    }

    #[test]
    fn child_of_inactive_parent_is_top_level() {
        let mut registry = PrimitiveRegistry::new();
        let parent = registry
            .insert(Primitive::new(ShapeKind::Sphere, Operation::Union))
            .unwrap();
        let child = spawn_child(&mut registry, Operation::Union, parent);
        registry.apply_pending_changes();

        let scene = linearize(&registry);
        assert_eq!(scene.ids(), &[child]);
        assert_eq!(num_children(&scene), vec![0]);
    }

    #[test]
    fn grandchildren_are_not_emitted() {
        let mut registry = PrimitiveRegistry::new();
        let root = spawn(&mut registry, Operation::Union);
        let child = spawn_child(&mut registry, Operation::Union, root);
        let _grandchild = spawn_child(&mut registry, Operation::Union, child);
        registry.apply_pending_changes();

        let scene = linearize(&registry);
        assert_eq!(scene.ids(), &[root, child]);
        assert_eq!(num_children(&scene), vec![1, 0]);
    }

    #[test]
    fn removed_parent_releases_children() {
        let mut registry = PrimitiveRegistry::new();
        let parent = spawn(&mut registry, Operation::Union);
        let child = spawn_child(&mut registry, Operation::Union, parent);
        registry.apply_pending_changes();

        registry.remove(parent).unwrap();
        // slot reuse must not adopt the orphan
        registry.apply_pending_changes();
        let replacement = spawn(&mut registry, Operation::Union);
        registry.apply_pending_changes();

        let scene = linearize(&registry);
        assert_eq!(scene.ids(), &[child, replacement]);
        assert_eq!(num_children(&scene), vec![0, 0]);
    }

    #[test]
    fn child_records_carry_effective_scale() {
        let mut registry = PrimitiveRegistry::new();
        let parent = registry
            .spawn(Primitive::new(ShapeKind::Sphere, Operation::Union).with_scale(Vec3::splat(2.)))
            .unwrap();
        let _child = registry
            .spawn(
                Primitive::new(ShapeKind::Cube, Operation::Union)
                    .with_scale(Vec3::splat(0.5))
                    .with_parent(parent),
            )
            .unwrap();
        registry.apply_pending_changes();

        let scene = linearize(&registry);
        assert_eq!(scene.records()[1].scale, [1., 1., 1.]);
    }
}
