use std::{collections::BTreeSet, error, fmt, marker::PhantomData};

pub type UniqueId = u32;

/// Handle types produced by [`UniqueIdGen`]. A handle is a slot index plus the generation the
/// slot was on when the handle was issued, so a handle kept after its slot was recycled can be
/// told apart from the slot's new owner.
pub trait GenerationalId: Copy + Eq + Ord + fmt::Debug {
    fn from_parts(raw_id: UniqueId, generation: u32) -> Self;
    fn raw_id(&self) -> UniqueId;
    fn generation(&self) -> u32;
}

#[derive(Debug, Clone)]
pub struct UniqueIdGen<T: GenerationalId> {
    /// Current generation of every slot ever handed out
    generations: Vec<u32>,
    recycled_ids: BTreeSet<UniqueId>,
    phantom: PhantomData<T>,
}

impl<T: GenerationalId> UniqueIdGen<T> {
    pub const fn new() -> Self {
        Self {
            generations: Vec::new(),
            recycled_ids: BTreeSet::new(),
            phantom: PhantomData,
        }
    }

    pub fn new_id(&mut self) -> Result<T, UniqueIdError> {
        // prefer recycling ids
        if let Some(raw_id) = self.recycled_ids.pop_first() {
            let generation = self.generations[raw_id as usize];
            return Ok(T::from_parts(raw_id, generation));
        }

        let raw_id = self.generations.len();
        if raw_id >= UniqueId::MAX as usize {
            return Err(UniqueIdError::MaxReached);
        }
        self.generations.push(0);
        Ok(T::from_parts(raw_id as UniqueId, 0))
    }

    /// Returns the slot of `old_id` to the pool and bumps its generation.
    pub fn recycle_id(&mut self, old_id: T) -> Result<(), UniqueIdError> {
        if !self.is_live(old_id) {
            return Err(UniqueIdError::NotLive(old_id.raw_id()));
        }
        let raw_id = old_id.raw_id();
        self.recycled_ids.insert(raw_id);
        let generation = &mut self.generations[raw_id as usize];
        *generation = generation.wrapping_add(1);
        Ok(())
    }

    /// True if `id` was issued by this generator and its slot hasn't been recycled since.
    pub fn is_live(&self, id: T) -> bool {
        let raw_id = id.raw_id();
        match self.generations.get(raw_id as usize) {
            Some(generation) => {
                *generation == id.generation() && !self.recycled_ids.contains(&raw_id)
            }
            None => false,
        }
    }
}

impl<T: GenerationalId> Default for UniqueIdGen<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueIdError {
    /// Means that no more unique ids can be generated from this instance.
    MaxReached,
    /// Id was never issued or belongs to an older generation of its slot.
    NotLive(UniqueId),
}
impl fmt::Display for UniqueIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxReached => {
                write!(f, "maximum id value reached in unique id generator")
            }
            Self::NotLive(raw_id) => {
                write!(f, "id {} is not live in this generator", raw_id)
            }
        }
    }
}
impl error::Error for UniqueIdError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    struct TestId(UniqueId, u32);

    impl GenerationalId for TestId {
        fn from_parts(raw_id: UniqueId, generation: u32) -> Self {
            Self(raw_id, generation)
        }
        fn raw_id(&self) -> UniqueId {
            self.0
        }
        fn generation(&self) -> u32 {
            self.1
        }
    }

    #[test]
    fn recycled_slot_gets_new_generation() {
        let mut id_gen = UniqueIdGen::<TestId>::new();
        let a = id_gen.new_id().unwrap();
        let b = id_gen.new_id().unwrap();
        assert_eq!(a, TestId(0, 0));
        assert_eq!(b, TestId(1, 0));

        id_gen.recycle_id(a).unwrap();
        assert!(!id_gen.is_live(a));

        let c = id_gen.new_id().unwrap();
        assert_eq!(c, TestId(0, 1));
        assert!(id_gen.is_live(c));
        assert!(!id_gen.is_live(a));
    }

    #[test]
    fn double_recycle_is_rejected() {
        let mut id_gen = UniqueIdGen::<TestId>::new();
        let a = id_gen.new_id().unwrap();
        id_gen.recycle_id(a).unwrap();
        assert_eq!(id_gen.recycle_id(a), Err(UniqueIdError::NotLive(0)));
        assert_eq!(
            id_gen.recycle_id(TestId(7, 0)),
            Err(UniqueIdError::NotLive(7))
        );
    }
}
