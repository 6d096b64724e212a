//! Per-execution pseudo-random generator seeding.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

/// How to seed a run when the caller gives no seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Draw a `u64` from OS entropy and seed from it; the seed is recorded.
    #[default]
    Recoverable,
    /// Seed straight from OS entropy; the effective seed is unknown.
    Opaque,
}

/// A freshly seeded generator and the seed it was derived from.
pub struct SeededRng {
    pub rng: StdRng,
    /// `None` only when the seed cannot be recovered
    pub effective_seed: Option<u64>,
}

/// Hands out one independent generator per execution.
///
/// No generator state is shared between calls, so concurrent executions
/// never observe each other's draws.
#[derive(Debug, Default)]
pub struct PrngManager {
    policy: SeedPolicy,
    seedings: AtomicU64,
}

impl PrngManager {
    pub fn new(policy: SeedPolicy) -> Self {
        PrngManager {
            policy,
            seedings: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> SeedPolicy {
        self.policy
    }

    /// Create the generator for one run.
    ///
    /// A given seed is applied unchanged and returned as the effective seed.
    pub fn seed(&self, value: Option<u64>) -> SeededRng {
        self.seedings.fetch_add(1, Ordering::SeqCst);
        let seeded = match (value, self.policy) {
            (Some(seed), _) => SeededRng {
                rng: StdRng::seed_from_u64(seed),
                effective_seed: Some(seed),
            },
            (None, SeedPolicy::Recoverable) => {
                let seed = StdRng::from_os_rng().next_u64();
                SeededRng {
                    rng: StdRng::seed_from_u64(seed),
                    effective_seed: Some(seed),
                }
            }
            (None, SeedPolicy::Opaque) => SeededRng {
                rng: StdRng::from_os_rng(),
                effective_seed: None,
            },
        };
        debug!(seed = ?seeded.effective_seed, given = value.is_some(), "seeded run generator");
        seeded
    }

    /// Number of generators handed out so far.
    pub fn seedings(&self) -> u64 {
        self.seedings.load(Ordering::SeqCst)
    }
}
