//! Lookup table for live generators, keyed by small integer ids.

use std::collections::BTreeMap;

use crate::mapgen::DungeonGenerator;
use crate::types::TilePalette;

#[derive(Default)]
pub struct GeneratorRegistry {
    generators: BTreeMap<u32, DungeonGenerator>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator under one more than the highest id in use, starting at 1. Once the
    /// highest id is `u32::MAX`, the lowest free id is reused instead.
    pub fn spawn(&mut self, seed: u64, palette: TilePalette) -> u32 {
        let id = match self.generators.last_key_value() {
            None => 1,
            Some((&last, _)) => last.checked_add(1).unwrap_or_else(|| self.lowest_free_id()),
        };
        self.generators.insert(id, DungeonGenerator::new(id, seed, palette));
        log::debug!("registered generator {id}");
        id
    }

    fn lowest_free_id(&self) -> u32 {
        let mut candidate = 1;
        for &id in self.generators.keys() {
            if id != candidate {
                break;
            }
            candidate = candidate.saturating_add(1);
        }
        candidate
    }

    pub fn get(&self, id: u32) -> Option<&DungeonGenerator> {
        self.generators.get(&id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut DungeonGenerator> {
        self.generators.get_mut(&id)
    }

    /// Unregisters the generator and hands it back, or `None` if the id was not registered.
    pub fn remove(&mut self, id: u32) -> Option<DungeonGenerator> {
        let generator = self.generators.remove(&id)?;
        log::debug!("unregistered generator {id}");
        Some(generator)
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.generators.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileId;

    const PALETTE: TilePalette = TilePalette { corridor: TileId(1), door: TileId(2) };

    #[test]
    fn ids_start_at_one_and_follow_the_highest() {
        let mut registry = GeneratorRegistry::new();
        assert_eq!(registry.spawn(1, PALETTE), 1);
        assert_eq!(registry.spawn(2, PALETTE), 2);
        assert_eq!(registry.spawn(3, PALETTE), 3);

        assert!(registry.remove(2).is_some());
        assert_eq!(registry.spawn(4, PALETTE), 4);
        assert!(registry.remove(4).is_some());
        assert!(registry.remove(3).is_some());
        assert_eq!(registry.spawn(5, PALETTE), 2);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn lookups_return_the_generator_with_that_id() {
        let mut registry = GeneratorRegistry::new();
        let first = registry.spawn(10, PALETTE);
        let second = registry.spawn(20, PALETTE);

        assert_eq!(registry.get(first).map(DungeonGenerator::seed), Some(10));
        assert_eq!(registry.get(second).map(DungeonGenerator::id), Some(second));
        registry
            .get_mut(second)
            .expect("registered")
            .set_map_size(8, 8)
            .expect("valid size");
        assert!(registry.get(second).and_then(DungeonGenerator::bounds).is_some());
        assert!(registry.get(99).is_none());
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let mut registry = GeneratorRegistry::new();
        registry.spawn(1, PALETTE);
        assert!(registry.remove(7).is_none());
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn removed_generator_is_handed_back() {
        let mut registry = GeneratorRegistry::new();
        let id = registry.spawn(42, PALETTE);
        let removed = registry.remove(id).expect("registered");
        assert_eq!((removed.id(), removed.seed()), (id, 42));
        assert!(registry.get(id).is_none());
        assert!(registry.remove(id).is_none());
    }

    #[test]
    fn spawning_past_the_largest_id_reuses_a_free_one() {
        let mut registry = GeneratorRegistry::new();
        registry.spawn(1, PALETTE);
        registry.generators.insert(u32::MAX, DungeonGenerator::new(u32::MAX, 2, PALETTE));

        assert_eq!(registry.spawn(3, PALETTE), 2);
        assert_eq!(registry.spawn(4, PALETTE), 3);
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.get(u32::MAX).map(DungeonGenerator::seed), Some(2));
    }
}
