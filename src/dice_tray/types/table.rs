//! Table context: the dice and wall collections plus the shared RNG
//!
//! Systems never scan the world for dice in arbitrary order; they walk
//! [`DiceTable::dice`], which keeps spawn order stable.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Resource owning the entities that make up the table
#[derive(Resource, Debug, Default)]
pub struct DiceTable {
    /// Physics entities of the dice, in spawn order
    pub dice: Vec<Entity>,
    /// Current tray walls; rebuilt as a batch on resize
    pub walls: Vec<Entity>,
}

impl DiceTable {
    pub fn register_die(&mut self, die: Entity) {
        if !self.dice.contains(&die) {
            self.dice.push(die);
        }
    }

    /// Forget a die; returns whether it was on the table.
    pub fn remove_die(&mut self, die: Entity) -> bool {
        let before = self.dice.len();
        self.dice.retain(|e| *e != die);
        self.dice.len() != before
    }

    /// Hand over the current walls, leaving the collection empty.
    pub fn take_walls(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.walls)
    }
}

/// Seeded RNG shared by every random roll, throw and float phase
#[derive(Resource)]
pub struct TableRng(pub StdRng);

impl TableRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::from_entropy()),
        }
    }
}

impl Default for TableRng {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_register_and_remove() {
        let mut world = World::new();
        let mut table = DiceTable::default();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        table.register_die(a);
        table.register_die(b);
        table.register_die(a);
        assert_eq!(table.dice, vec![a, b]);

        assert!(table.remove_die(a));
        assert!(!table.remove_die(a));
        assert_eq!(table.dice, vec![b]);
    }

    #[test]
    fn test_take_walls_empties_collection() {
        let mut table = DiceTable::default();
        table.walls.push(Entity::PLACEHOLDER);
        let walls = table.take_walls();
        assert_eq!(walls.len(), 1);
        assert!(table.walls.is_empty());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut a = TableRng::new(Some(42));
        let mut b = TableRng::new(Some(42));
        let xs: Vec<u32> = (0..4).map(|_| a.0.gen()).collect();
        let ys: Vec<u32> = (0..4).map(|_| b.0.gen()).collect();
        assert_eq!(xs, ys);
    }
}
