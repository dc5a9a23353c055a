//! Default statevector-backed [`Simulator`].

use std::cell::RefCell;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::rng::SampleRng;
use crate::{OutcomeCount, SimulationError, Simulator, parser, statevector};

/// Statevector simulator with seedable measurement sampling.
///
/// Two backends built with the same seed produce identical histograms for
/// identical inputs; [`new`](Self::new) seeds from the system clock instead.
/// The sampler state advances across calls, so the backend is not shareable
/// between threads.
#[derive(Debug)]
pub struct StatevectorBackend {
    rng: RefCell<SampleRng>,
}

impl StatevectorBackend {
    /// Builds a backend seeded from the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(clock_seed())
    }

    /// Builds a backend with a fixed sampling seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: RefCell::new(SampleRng::from_seed(seed)),
        }
    }
}

impl Default for StatevectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator for StatevectorBackend {
    fn simulate(&self, source: &str, shots: u32) -> Result<Vec<OutcomeCount>, SimulationError> {
        let program = parser::parse(source)?;
        let mut rng = self.rng.borrow_mut();
        statevector::run(&program, shots, &mut rng)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0x5eed)
}
