// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Silicon Thermal Simulation Suite ("The Die") - Injected Randomness
//
// Every stochastic term in the engine draws from one injected generator so a
// seeded run can be replayed exactly.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default production generator: ChaCha8 seeded from a `u64`.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Uniform draw in `[0, 1)`.
pub fn unit<R: RngCore>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Uniform draw in `[lo, hi)`, computed as `lo + unit * (hi - lo)` so every
/// call consumes exactly one sample regardless of bounds.
pub fn uniform<R: RngCore>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + unit(rng) * (hi - lo)
}

/// Bernoulli trial with probability `p` (values outside `[0, 1]` saturate).
pub fn chance<R: RngCore>(rng: &mut R, p: f64) -> bool {
    unit(rng) < p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = seeded_rng(7);
        let mut b = seeded_rng(7);
        for _ in 0..32 {
            assert_eq!(unit(&mut a).to_bits(), unit(&mut b).to_bits());
        }
    }

    #[test]
    fn uniform_respects_bounds() {
        let mut rng = seeded_rng(1);
        for _ in 0..1000 {
            let v = uniform(&mut rng, -2.5, 2.5);
            assert!((-2.5..2.5).contains(&v), "{v} out of range");
        }
    }

    #[test]
    fn chance_saturates() {
        let mut rng = seeded_rng(3);
        assert!((0..100).all(|_| chance(&mut rng, 1.0)));
        assert!((0..100).all(|_| !chance(&mut rng, 0.0)));
    }
}
