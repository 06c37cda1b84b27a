use ai_core::DeterministicRng;

use crate::config::Persona;
use crate::shelf::ShelfType;

impl Persona {
    /// Shelf type drawn by the persona's weights; all-zero weights fall back to
    /// general merchandise.
    pub fn pick_shelf_type(&self, rng: &mut impl DeterministicRng) -> ShelfType {
        let weights = ShelfType::ALL.map(|kind| self.shelf_weights.weight(kind));
        rng.weighted_index(&weights)
            .map_or(ShelfType::General, |idx| ShelfType::ALL[idx])
    }

    /// Inclusive draw from `min_list_size..=max_list_size`.
    pub fn list_size(&self, rng: &mut impl DeterministicRng) -> usize {
        let min = self.min_list_size as usize;
        let max = self.max_list_size.max(self.min_list_size) as usize;
        rng.range_usize(min, max + 1)
    }

    pub fn shopping_list(&self, rng: &mut impl DeterministicRng) -> Vec<ShelfType> {
        let mut size = self.list_size(rng);
        if size == 0 && self.browses {
            size = rng.range_usize(1, 4);
        }
        (0..size).map(|_| self.pick_shelf_type(rng)).collect()
    }
}
