//! Local statevector simulation of OPENQASM 2.0 circuits.
//!
//! The execution agent treats simulation as an opaque collaborator: circuit
//! text and a shot count in, an outcome histogram out. [`Simulator`] is that
//! seam. [`StatevectorBackend`] is the bundled implementation, a dense
//! statevector engine with seedable measurement sampling sized for small
//! circuits; tests and alternative deployments substitute their own
//! implementations behind the same trait.

mod backend;
mod parser;
mod rng;
mod statevector;

pub use backend::StatevectorBackend;
pub use parser::ParseError;
pub use statevector::MAX_SIM_QUBITS;

use thiserror::Error;

/// A measured bit-string and the number of shots that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeCount {
    /// Rendered classical bits, most significant first.
    pub key: String,
    pub count: u64,
}

/// Errors raised while executing a circuit.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The circuit text is not a valid program.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The circuit parsed but could not be executed.
    #[error("{message}")]
    Backend {
        /// Human-readable description of the failure.
        message: String,
    },
}

/// Capability to execute a circuit and report measured outcomes.
///
/// Implementations append an implicit measure-everything step when the
/// circuit contains no measurement, and report outcomes in first-observed
/// order; callers impose their own ordering and truncation.
pub trait Simulator {
    /// Runs `source` for `shots` repetitions.
    fn simulate(&self, source: &str, shots: u32) -> Result<Vec<OutcomeCount>, SimulationError>;
}
