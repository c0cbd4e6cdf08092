//! Seeded board layouts: mud zones and initial blocked cells.
//!
//! Layouts are a pure function of the level (and match index for blocks), so
//! the same level always produces the same board.

use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::{from_index, to_index, Coord, CELL_COUNT};

/// Mud zone coordinates for a level, in generation order.
pub fn mud_zones(level: u32, count: usize) -> Vec<Coord> {
    if count == 0 {
        return Vec::new();
    }
    let mut rng = ChaCha8Rng::seed_from_u64(level as u64);
    sample(&mut rng, CELL_COUNT, count.min(CELL_COUNT))
        .into_iter()
        .map(from_index)
        .collect()
}

/// Initial blocked cells for a (level, match index), avoiding `reserved`
/// cells (the mud zones). Returns coordinates in row-major order.
pub fn initial_blocks(level: u32, match_index: u32, count: usize, reserved: &[Coord]) -> Vec<Coord> {
    if count == 0 {
        return Vec::new();
    }
    let free: Vec<usize> = (0..CELL_COUNT)
        .filter(|i| !reserved.iter().any(|&c| to_index(c) == *i))
        .collect();
    let mut rng = ChaCha8Rng::seed_from_u64(layout_seed(level, match_index));
    let mut picked: Vec<Coord> = sample(&mut rng, free.len(), count.min(free.len()))
        .into_iter()
        .map(|i| from_index(free[i]))
        .collect();
    picked.sort_unstable();
    picked
}

fn layout_seed(level: u32, match_index: u32) -> u64 {
    ((level as u64) << 8) ^ 0x5EED_0000 ^ match_index as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mud_zones_are_deterministic() {
        assert_eq!(mud_zones(200, 5), mud_zones(200, 5));
        assert_eq!(mud_zones(200, 5).len(), 5);
        assert!(mud_zones(400, 0).is_empty());
    }

    #[test]
    fn test_mud_zones_are_distinct() {
        let zones = mud_zones(1800, 5);
        for (i, a) in zones.iter().enumerate() {
            for b in &zones[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_initial_blocks_avoid_reserved() {
        let mud = mud_zones(600, 5);
        let blocks = initial_blocks(600, 0, 10, &mud);
        assert_eq!(blocks.len(), 10);
        assert!(blocks.iter().all(|b| !mud.contains(b)));
    }

    #[test]
    fn test_initial_blocks_depend_on_match_index() {
        let first = initial_blocks(150, 0, 10, &[]);
        assert_eq!(first, initial_blocks(150, 0, 10, &[]));
        assert_ne!(first, initial_blocks(150, 1, 10, &[]));
    }
}
