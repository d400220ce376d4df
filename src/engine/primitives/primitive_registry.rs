use super::primitive::Primitive;
use crate::helper::{
    more_errors::CollectionError,
    unique_id_gen::{GenerationalId, UniqueId, UniqueIdError, UniqueIdGen},
};
use glam::Vec3;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

// ~~ Primitive Id ~~

/// Generational handle to a primitive owned by a [`PrimitiveRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrimitiveId {
    raw_id: UniqueId,
    generation: u32,
}

impl GenerationalId for PrimitiveId {
    fn from_parts(raw_id: UniqueId, generation: u32) -> Self {
        Self { raw_id, generation }
    }

    fn raw_id(&self) -> UniqueId {
        self.raw_id
    }

    fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.raw_id, self.generation)
    }
}

// ~~ Pending Changes ~~

/// Registry mutations requested mid-frame. Applied in request order by
/// [`PrimitiveRegistry::apply_pending_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingChange {
    Register(PrimitiveId),
    Unregister(PrimitiveId),
    Remove(PrimitiveId),
}

// ~~ Primitive Registry ~~

/// Owns every primitive in the scene and the ordered set of active ones.
///
/// Activation, deactivation and removal requests are queued and only take effect at the next
/// frame boundary, so a frame in flight always sees one consistent active set. Attribute edits
/// through [`PrimitiveRegistry::get_mut`] apply immediately; borrowing rules keep them from
/// overlapping a linearization pass.
#[derive(Debug, Default)]
pub struct PrimitiveRegistry {
    unique_id_gen: UniqueIdGen<PrimitiveId>,
    primitives: BTreeMap<PrimitiveId, Primitive>,
    /// In activation order
    active: Vec<PrimitiveId>,
    pending: Vec<PendingChange>,
}

impl PrimitiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a primitive without activating it.
    pub fn insert(&mut self, primitive: Primitive) -> Result<PrimitiveId, UniqueIdError> {
        let id = self.unique_id_gen.new_id()?;
        self.primitives.insert(id, primitive);
        Ok(id)
    }

    /// Adds a primitive and queues its activation.
    pub fn spawn(&mut self, primitive: Primitive) -> Result<PrimitiveId, UniqueIdError> {
        let id = self.insert(primitive)?;
        self.pending.push(PendingChange::Register(id));
        Ok(id)
    }

    /// Queues `id` to join the active set at the next frame boundary.
    pub fn register(&mut self, id: PrimitiveId) -> Result<(), CollectionError> {
        self.check_id(id)?;
        self.pending.push(PendingChange::Register(id));
        Ok(())
    }

    /// Queues `id` to leave the active set at the next frame boundary.
    pub fn unregister(&mut self, id: PrimitiveId) -> Result<(), CollectionError> {
        self.check_id(id)?;
        self.pending.push(PendingChange::Unregister(id));
        Ok(())
    }

    pub fn set_active(&mut self, id: PrimitiveId, active: bool) -> Result<(), CollectionError> {
        if active {
            self.register(id)
        } else {
            self.unregister(id)
        }
    }

    /// Queues removal. The primitive stays readable until the next frame boundary.
    pub fn remove(&mut self, id: PrimitiveId) -> Result<(), CollectionError> {
        self.check_id(id)?;
        self.pending.push(PendingChange::Remove(id));
        Ok(())
    }

    /// Applies queued changes in request order. Call once per frame before linearizing.
    /// Returns the number of changes processed.
    pub fn apply_pending_changes(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let change_count = pending.len();
        for change in pending {
            match change {
                PendingChange::Register(id) => self.register_now(id),
                PendingChange::Unregister(id) => self.unregister_now(id),
                PendingChange::Remove(id) => self.remove_now(id),
            }
        }
        change_count
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(&id)
    }

    pub fn get_mut(&mut self, id: PrimitiveId) -> Result<&mut Primitive, CollectionError> {
        let raw_id = id.raw_id();
        self.primitives
            .get_mut(&id)
            .ok_or(CollectionError::InvalidId { raw_id })
    }

    pub fn set_parent(
        &mut self,
        id: PrimitiveId,
        parent: Option<PrimitiveId>,
    ) -> Result<(), CollectionError> {
        self.get_mut(id)?.set_parent(parent);
        Ok(())
    }

    /// Active ids in activation order
    pub fn active_ids(&self) -> &[PrimitiveId] {
        &self.active
    }

    pub fn is_active(&self, id: PrimitiveId) -> bool {
        self.active.contains(&id)
    }

    /// Active primitives in activation order
    pub fn active_primitives(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> + '_ {
        self.active
            .iter()
            .filter_map(|id| self.primitives.get(id).map(|primitive| (*id, primitive)))
    }

    /// All primitives, active or not, in id order
    pub fn primitives(&self) -> &BTreeMap<PrimitiveId, Primitive> {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// The parent of `primitive` if it names another active primitive. Parent handles that are
    /// stale, inactive or self-referencing resolve to `None`.
    pub fn resolved_parent(&self, id: PrimitiveId, primitive: &Primitive) -> Option<PrimitiveId> {
        primitive
            .parent()
            .filter(|parent_id| *parent_id != id && self.is_active(*parent_id))
    }

    /// Local scale multiplied by the scale of every resolvable ancestor. The walk is bounded by
    /// the active set size so a parent cycle can't loop forever.
    pub fn effective_scale(&self, id: PrimitiveId) -> Option<Vec3> {
        let primitive = self.primitives.get(&id)?;
        let mut scale = primitive.scale;

        let mut current = (id, primitive);
        for _ in 0..self.active.len() {
            let Some(parent_id) = self.resolved_parent(current.0, current.1) else {
                break;
            };
            if parent_id == id {
                break;
            }
            let Some(parent) = self.primitives.get(&parent_id) else {
                break;
            };
            scale *= parent.scale;
            current = (parent_id, parent);
        }
        Some(scale)
    }
}

// ~~ Private Functions ~~

impl PrimitiveRegistry {
    fn check_id(&self, id: PrimitiveId) -> Result<(), CollectionError> {
        if self.primitives.contains_key(&id) {
            return Ok(());
        }
        if self.unique_id_gen.is_live(id) {
            Err(CollectionError::InvalidId { raw_id: id.raw_id() })
        } else {
            Err(CollectionError::StaleId {
                raw_id: id.raw_id(),
                generation: id.generation(),
            })
        }
    }

    fn register_now(&mut self, id: PrimitiveId) {
        if !self.primitives.contains_key(&id) {
            trace!("skipping registration of removed primitive {}", id);
            return;
        }
        if !self.active.contains(&id) {
            self.active.push(id);
        }
    }

    fn unregister_now(&mut self, id: PrimitiveId) {
        self.active.retain(|active_id| *active_id != id);
    }

    fn remove_now(&mut self, id: PrimitiveId) {
        self.unregister_now(id);
        if self.primitives.remove(&id).is_none() {
            return;
        }
        // tell id generator it can reuse the slot now
        if let Err(e) = self.unique_id_gen.recycle_id(id) {
            info!("{}", e);
        }
    }
}

// ~~ Tests ~~
