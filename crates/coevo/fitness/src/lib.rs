#![deny(unsafe_code)]
//! # coevo-fitness
//!
//! The synthetic stand-in for a fitness function. There is no training or
//! evaluation anywhere in this system; every fitness number is drawn here, so
//! all of that randomness lives behind one seedable type and tests can pin
//! the exact bounds.

use coevo_types::FunctionPair;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound for sampled accuracy and F1 of derived candidates.
pub const ACCURACY_CAP: f64 = 0.98;
/// Lower bound for sampled epochs-to-converge.
pub const CONVERGENCE_FLOOR: f64 = 10.0;

/// One sampled fitness triple.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitnessSample {
    pub accuracy: f64,
    pub f1: f64,
    pub convergence: f64,
}

/// Draws synthetic fitness triples from a dedicated rng.
///
/// Seeded runs replay the exact same fitness trajectory, which the engine
/// tests rely on.
#[derive(Debug)]
pub struct FitnessSampler {
    rng: StdRng,
}

impl FitnessSampler {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fitness for a member of the initial population: modest accuracy and
    /// slow convergence, leaving room for the later generations to improve.
    pub fn initial(&mut self) -> FitnessSample {
        FitnessSample {
            accuracy: 0.5 + self.rng.gen_range(0.0..0.1),
            f1: 0.4 + self.rng.gen_range(0.0..0.1),
            convergence: 80.0 + self.rng.gen_range(0.0..20.0),
        }
    }

    /// Fitness for a derived candidate: the elite leader's triple scaled by a
    /// bounded perturbation, so children cluster near the leader with noise.
    ///
    /// Accuracy and F1 scale by a factor in [0.98, 1.03) and cap at
    /// [`ACCURACY_CAP`]; convergence scales by a factor in (0.9, 1.0] and
    /// floors at [`CONVERGENCE_FLOOR`].
    pub fn offspring(&mut self, leader: &FunctionPair) -> FitnessSample {
        FitnessSample {
            accuracy: (leader.accuracy * (0.98 + self.rng.gen_range(0.0..0.05)))
                .min(ACCURACY_CAP),
            f1: (leader.f1 * (0.98 + self.rng.gen_range(0.0..0.05))).min(ACCURACY_CAP),
            convergence: (leader.convergence * (1.0 - self.rng.gen_range(0.0..0.1)))
                .max(CONVERGENCE_FLOOR),
        }
    }
}
