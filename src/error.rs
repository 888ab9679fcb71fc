use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// An event reached the pairing stage without enough jets
    #[error("event {index} reached jet pairing with {n_jets} selected jets, need 4")]
    MalformedEvent { index: usize, n_jets: usize },

    #[error("event {index} has invalid weight {weight}")]
    InvalidWeight { index: usize, weight: f64 },

    #[error("cannot merge histograms with different binning")]
    IncompatibleBinning,
}

/// Per-event failure; the event is dropped from region assignment only
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum KinematicsError {
    #[error("non-finite {quantity}")]
    NonFiniteKinematics { quantity: &'static str },
}

pub(crate) fn ensure_finite(
    quantity: &'static str,
    value: f64,
) -> Result<f64, KinematicsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(KinematicsError::NonFiniteKinematics { quantity })
    }
}
