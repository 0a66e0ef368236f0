use thiserror::Error;

/// Failures of the simulation core. Every variant is fatal for the
/// interaction that produced it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown element: {0}")]
    UnknownElement(String),

    #[error("Prediction has {actual} values but {expected} elements are known")]
    PredictionLength { expected: usize, actual: usize },

    #[error("Prediction[{index}] = {value} is not a probability")]
    PredictionRange { index: usize, value: f64 },

    #[error("Classifier expects {expected} input samples, got {actual}")]
    InputLength { expected: usize, actual: usize },

    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid wavelength grid: {0}")]
    InvalidGrid(String),

    #[error("Line width must be positive and finite, got {0}")]
    InvalidWidth(f64),

    #[error("Noise error: {0}")]
    Noise(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<rand_distr::NormalError> for Error {
    fn from(err: rand_distr::NormalError) -> Self {
        Error::Noise(err.to_string())
    }
}
