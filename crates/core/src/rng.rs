//! RNG module - piece sequencing
//!
//! Two strategies feed a fixed-depth lookahead queue:
//! - **7-bag**: each bag holds one of each piece (I, O, T, S, Z, J, L),
//!   shuffled; a fresh bag is generated once the current one is empty.
//! - **Random**: uniform draws with replacement.
//!
//! Also provides a simple LCG so that a seed fully determines the sequence.

use std::collections::VecDeque;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}

/// How new pieces are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencerStrategy {
    #[default]
    SevenBag,
    Random,
}

/// Piece generator with a lookahead queue of fixed depth.
#[derive(Debug, Clone)]
pub struct PieceSequencer {
    strategy: SequencerStrategy,
    /// Current bag of pieces (7-bag only)
    bag: [PieceKind; 7],
    /// Index into current bag
    bag_index: usize,
    rng: SimpleRng,
    lookahead: VecDeque<PieceKind>,
    depth: usize,
}

impl PieceSequencer {
    /// Create a sequencer and fill the lookahead to `depth` (at least 1).
    pub fn new(strategy: SequencerStrategy, seed: u32, depth: usize) -> Self {
        let depth = depth.max(1);
        let mut sequencer = Self {
            strategy,
            bag: PieceKind::ALL,
            // Forces a shuffle on the first bag draw.
            bag_index: PieceKind::ALL.len(),
            rng: SimpleRng::new(seed),
            lookahead: VecDeque::with_capacity(depth + 1),
            depth,
        };
        while sequencer.lookahead.len() < depth {
            let piece = sequencer.generate();
            sequencer.lookahead.push_back(piece);
        }
        sequencer
    }

    /// 7-bag sequencer with the default lookahead depth.
    pub fn seven_bag(seed: u32) -> Self {
        Self::new(
            SequencerStrategy::SevenBag,
            seed,
            crate::types::DEFAULT_PREVIEW_DEPTH,
        )
    }

    fn refill_bag(&mut self) {
        self.bag = PieceKind::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    fn generate(&mut self) -> PieceKind {
        match self.strategy {
            SequencerStrategy::SevenBag => {
                if self.bag_index >= self.bag.len() {
                    self.refill_bag();
                }
                let piece = self.bag[self.bag_index];
                self.bag_index += 1;
                piece
            }
            SequencerStrategy::Random => {
                let i = self.rng.next_range(PieceKind::ALL.len() as u32) as usize;
                PieceKind::ALL[i]
            }
        }
    }

    /// Consume the head of the queue and top it back up to `depth`.
    pub fn draw(&mut self) -> PieceKind {
        let piece = self
            .lookahead
            .pop_front()
            .unwrap_or_else(|| self.generate());
        while self.lookahead.len() < self.depth {
            let next = self.generate();
            self.lookahead.push_back(next);
        }
        piece
    }

    /// The piece the next `draw` returns.
    pub fn peek(&self) -> Option<PieceKind> {
        self.lookahead.front().copied()
    }

    /// Upcoming pieces, head first.
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.lookahead.iter().copied()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn strategy(&self) -> SequencerStrategy {
        self.strategy
    }

    /// Get the current RNG state (for restarting game with a fresh sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for PieceSequencer {
    fn default() -> Self {
        Self::seven_bag(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..20 {
            for _ in 0..50 {
                assert!(rng.next_range(max) < max);
            }
        }
    }

    #[test]
    fn test_bags_contain_each_piece_once() {
        for seed in [0, 1, 42, 0xdead_beef] {
            let mut seq = PieceSequencer::new(SequencerStrategy::SevenBag, seed, 5);
            for bag in 0..10 {
                let mut drawn: Vec<PieceKind> = (0..7).map(|_| seq.draw()).collect();
                drawn.sort_by_key(|k| k.tag());
                assert_eq!(drawn, PieceKind::ALL.to_vec(), "seed {} bag {}", seed, bag);
            }
        }
    }

    #[test]
    fn test_lookahead_depth_is_kept() {
        for depth in [1, 3, 7] {
            let mut seq = PieceSequencer::new(SequencerStrategy::SevenBag, 9, depth);
            assert_eq!(seq.preview().count(), depth);
            for _ in 0..20 {
                seq.draw();
                assert_eq!(seq.preview().count(), depth);
            }
        }
        // Depth 0 is raised to 1.
        let seq = PieceSequencer::new(SequencerStrategy::Random, 9, 0);
        assert_eq!(seq.depth(), 1);
    }

    #[test]
    fn test_preview_matches_draws() {
        let mut seq = PieceSequencer::seven_bag(3);
        let preview: Vec<PieceKind> = seq.preview().collect();
        assert_eq!(seq.peek(), Some(preview[0]));
        let drawn: Vec<PieceKind> = (0..preview.len()).map(|_| seq.draw()).collect();
        assert_eq!(preview, drawn);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        for strategy in [SequencerStrategy::SevenBag, SequencerStrategy::Random] {
            let mut a = PieceSequencer::new(strategy, 555, 5);
            let mut b = PieceSequencer::new(strategy, 555, 2);
            for _ in 0..50 {
                assert_eq!(a.draw(), b.draw());
            }
        }
    }

    #[test]
    fn test_random_strategy_covers_all_kinds() {
        let mut seq = PieceSequencer::new(SequencerStrategy::Random, 2024, 5);
        let mut seen = [false; 7];
        for _ in 0..500 {
            seen[seq.draw().tag() as usize - 1] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
