use thiserror::Error;

/// The elderly and combined reductions do not describe the same buildings.
/// Pairing them is impossible and the run must stop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("the number of features in elderly ({elderly}) and combined ({combined}) data do not match")]
    FeatureCountMismatch { elderly: usize, combined: usize },

    #[error("mismatch in geometry between elderly and combined data at feature {index}")]
    GeometryMismatch { index: usize },
}
