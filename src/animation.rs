//! Falling-leaf decoration. Purely visual: nothing here feeds back into task state.

use crate::ticker::frames_for;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Leaves dropped when the projected finish time moves
pub const BURST_SIZE: usize = 5;

const SWIRL_SPAWN_MS: u64 = 400;
const YELLOW_LEAF_DELAY_MS: u64 = 2000;
const GREEN_FALL_MS: (u64, u64) = (5000, 10000);
const YELLOW_FALL_MS: u64 = 12000;

/// A single leaf, positioned in unit coordinates (0.0 = left/top, 1.0 = right/bottom)
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub yellow: bool,
    start_x: f32,
    drift: f32,
    age: u32,
    lifetime: u32,
}

impl Leaf {
    /// Fraction of the fall completed
    pub fn progress(&self) -> f32 {
        self.age as f32 / self.lifetime.max(1) as f32
    }

    pub fn x(&self) -> f32 {
        let p = self.progress();
        // Gentle side-to-side sway on top of the drift
        let sway = (p * std::f32::consts::TAU * 2.0).sin() * 0.03;
        (self.start_x + self.drift * p + sway).clamp(0.0, 1.0)
    }

    pub fn y(&self) -> f32 {
        self.progress().clamp(0.0, 1.0)
    }

    /// Map onto a `width` x `height` grid of cells
    pub fn cell(&self, width: u16, height: u16) -> (u16, u16) {
        let col = (self.x() * width.saturating_sub(1) as f32).round() as u16;
        let row = (self.y() * height.saturating_sub(1) as f32).round() as u16;
        (col, row)
    }

    /// Rotation frame for ASCII rendering
    pub fn spin(&self) -> usize {
        (self.age / 2) as usize % 4
    }

    fn is_done(&self) -> bool {
        self.age >= self.lifetime
    }
}

#[derive(Debug, Clone, Copy)]
struct Swirl {
    frames: u32,
    yellow_dropped: bool,
}

/// Every leaf currently in the air, advanced once per UI frame
pub struct LeafField {
    leaves: Vec<Leaf>,
    swirl: Option<Swirl>,
    rng: StdRng,
}

impl LeafField {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            leaves: Vec::new(),
            swirl: None,
            rng,
        }
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn is_swirling(&self) -> bool {
        self.swirl.is_some()
    }

    pub fn drop_leaf(&mut self, yellow: bool) {
        let lifetime = if yellow {
            frames_for(YELLOW_FALL_MS)
        } else {
            frames_for(self.rng.gen_range(GREEN_FALL_MS.0..=GREEN_FALL_MS.1))
        };
        let leaf = Leaf {
            yellow,
            start_x: self.rng.gen_range(0.2..0.8),
            drift: self.rng.gen_range(-0.2..0.2),
            age: 0,
            lifetime,
        };
        self.leaves.push(leaf);
    }

    pub fn drop_burst(&mut self, count: usize) {
        for i in 0..count {
            self.drop_leaf(false);
            // Stagger so the burst reads as a shake rather than a single clump
            if let Some(leaf) = self.leaves.last_mut() {
                leaf.age = (i as u32).min(leaf.lifetime.saturating_sub(1));
            }
        }
    }

    /// Continuous shower for the mindful break overlay
    pub fn begin_swirl(&mut self) {
        self.swirl = Some(Swirl {
            frames: 0,
            yellow_dropped: false,
        });
    }

    /// Stop the shower and clear whatever is still falling
    pub fn end_swirl(&mut self) {
        self.swirl = None;
        self.leaves.clear();
    }

    pub fn clear(&mut self) {
        self.leaves.clear();
    }

    /// Advance one frame: spawn swirl leaves, age everything, drop finished leaves
    pub fn step(&mut self) {
        if let Some(mut swirl) = self.swirl {
            swirl.frames += 1;
            if swirl.frames % frames_for(SWIRL_SPAWN_MS) == 0 {
                self.drop_leaf(false);
            }
            if !swirl.yellow_dropped && swirl.frames >= frames_for(YELLOW_LEAF_DELAY_MS) {
                self.drop_leaf(true);
                swirl.yellow_dropped = true;
            }
            self.swirl = Some(swirl);
        }

        for leaf in &mut self.leaves {
            leaf.age += 1;
        }
        self.leaves.retain(|leaf| !leaf.is_done());
    }
}

impl Default for LeafField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_drops_five_green_leaves() {
        let mut field = LeafField::seeded(7);
        field.drop_burst(BURST_SIZE);
        assert_eq!(field.leaves().len(), 5);
        assert!(field.leaves().iter().all(|leaf| !leaf.yellow));
    }

    #[test]
    fn test_leaves_fall_and_disappear() {
        let mut field = LeafField::seeded(1);
        field.drop_leaf(false);
        let start = field.leaves()[0].y();

        field.step();
        assert!(field.leaves()[0].y() > start);

        for _ in 0..frames_for(GREEN_FALL_MS.1) {
            field.step();
        }
        assert!(field.leaves().is_empty());
    }

    #[test]
    fn test_swirl_drops_yellow_leaf_after_delay() {
        let mut field = LeafField::seeded(3);
        field.begin_swirl();

        for _ in 0..frames_for(YELLOW_LEAF_DELAY_MS) - 1 {
            field.step();
        }
        assert!(!field.leaves().iter().any(|leaf| leaf.yellow));
        assert!(!field.leaves().is_empty());

        field.step();
        let yellow = field.leaves().iter().filter(|leaf| leaf.yellow).count();
        assert_eq!(yellow, 1);

        // Only ever one yellow leaf per break
        for _ in 0..10 {
            field.step();
        }
        let yellow = field.leaves().iter().filter(|leaf| leaf.yellow).count();
        assert_eq!(yellow, 1);
    }

    #[test]
    fn test_end_swirl_clears() {
        let mut field = LeafField::seeded(5);
        field.begin_swirl();
        for _ in 0..4 {
            field.step();
        }
        field.end_swirl();
        assert!(!field.is_swirling());
        assert!(field.leaves().is_empty());

        field.step();
        assert!(field.leaves().is_empty());
    }

    #[test]
    fn test_cell_stays_inside_grid() {
        let mut field = LeafField::seeded(11);
        field.drop_burst(BURST_SIZE);
        for _ in 0..20 {
            field.step();
            for leaf in field.leaves() {
                let (col, row) = leaf.cell(40, 10);
                assert!(col < 40);
                assert!(row < 10);
            }
        }
    }
}
