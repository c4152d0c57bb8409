pub mod error;
pub mod math;

pub use error::{Error, ParetoError, Result, SolverError};
pub use math::integer_linear::benders::{
    BendersConfig, BendersDecomposition, BendersOutcome, Cut, CutSet, CutSource, CutStrategy,
    Instance, IterationRecord,
};
pub use math::integer_linear::{SessionConfig, SolverEngine, SolverSession};
