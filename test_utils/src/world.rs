//! Spatial query double with hand-placed quarries.

use std::cell::Cell;

use glam::Vec3;
use stalker::{EntityRef, LayerMask, SpatialQuery};

/// World whose contents tests place by hand.
///
/// The radius and mask of each query are honoured. Sight is clear unless
/// [`ScriptedWorld::block_sight`] was called.
#[derive(Debug, Clone, Default)]
pub struct ScriptedWorld {
    quarries: Vec<EntityRef>,
    sight_blocked: bool,
    queries: Cell<usize>,
}

impl ScriptedWorld {
    /// Empty world with clear sight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a quarry.
    #[must_use]
    pub fn with_quarry(mut self, id: u64, position: Vec3) -> Self {
        self.place(id, position);
        self
    }

    /// Moves an existing quarry or adds a new one.
    pub fn place(&mut self, id: u64, position: Vec3) {
        match self.quarries.iter_mut().find(|quarry| quarry.id == id) {
            Some(quarry) => quarry.position = position,
            None => self.quarries.push(EntityRef { id, position }),
        }
    }

    /// Removes a quarry.
    pub fn remove(&mut self, id: u64) {
        self.quarries.retain(|quarry| quarry.id != id);
    }

    /// Makes every line-of-sight test fail (`true`) or pass (`false`).
    pub fn block_sight(&mut self, blocked: bool) {
        self.sight_blocked = blocked;
    }

    /// Number of broad queries answered so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.get()
    }
}

impl SpatialQuery for ScriptedWorld {
    fn find_entities_in_radius(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<EntityRef> {
        self.queries.set(self.queries.get() + 1);
        if mask == LayerMask::NONE {
            return Vec::new();
        }
        self.quarries
            .iter()
            .filter(|quarry| quarry.position.distance(center) <= radius)
            .copied()
            .collect()
    }

    fn has_clear_path(&self, _from: Vec3, _to: Vec3, _occluders: LayerMask) -> bool {
        !self.sight_blocked
    }
}
