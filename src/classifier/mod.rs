/// Classifier boundary: spectrum in, one probability per element out.
///
/// The dashboard only needs `predict`; which model sits behind it is decided
/// once at startup (see [`crate::assets`]).
pub mod dense;
pub mod line_match;

pub use dense::DenseClassifier;
pub use line_match::LineMatchClassifier;

use crate::data::model::Spectrum;
use crate::error::{Error, Result};

pub trait Classifier {
    /// Short human-readable name shown in the top bar.
    fn name(&self) -> &str;

    /// Per-element probabilities, index-aligned with the label list the
    /// classifier was loaded with.
    fn predict(&self, spectrum: &Spectrum) -> Result<Vec<f64>>;
}

/// Reject classifier output that cannot be a prediction vector for
/// `n_elements` elements. Values are otherwise passed through untouched.
pub fn validate_prediction(prediction: &[f64], n_elements: usize) -> Result<()> {
    if prediction.len() != n_elements {
        return Err(Error::PredictionLength {
            expected: n_elements,
            actual: prediction.len(),
        });
    }
    match prediction
        .iter()
        .position(|p| !(0.0..=1.0).contains(p))
    {
        Some(index) => Err(Error::PredictionRange {
            index,
            value: prediction[index],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_probabilities() {
        assert!(validate_prediction(&[0.0, 0.5, 1.0], 3).is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            validate_prediction(&[0.2, 0.3], 4),
            Err(Error::PredictionLength {
                expected: 4,
                actual: 2
            })
        );
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert!(matches!(
            validate_prediction(&[0.2, 1.5], 2),
            Err(Error::PredictionRange { index: 1, .. })
        ));
        assert!(matches!(
            validate_prediction(&[f64::NAN, 0.1], 2),
            Err(Error::PredictionRange { index: 0, .. })
        ));
    }
}
