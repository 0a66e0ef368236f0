use super::model::{DetectionBand, Element};
use crate::error::{Error, Result};

/// An element counts as detected only when its probability is strictly above
/// this value.
pub const DETECTION_THRESHOLD: f64 = 0.5;

/// Half-width of the highlighted region around each line, in nm.
pub const BAND_HALF_WIDTH_NM: f64 = 3.0;

pub fn is_detected(probability: f64) -> bool {
    probability > DETECTION_THRESHOLD
}

/// One band per line of every element whose prediction exceeds the
/// threshold, in element order then line order.
///
/// `predictions[i]` belongs to `elements[i]`; a length mismatch is an error.
pub fn detect(predictions: &[f64], elements: &[Element]) -> Result<Vec<DetectionBand>> {
    if predictions.len() != elements.len() {
        return Err(Error::PredictionLength {
            expected: elements.len(),
            actual: predictions.len(),
        });
    }

    let bands = elements
        .iter()
        .zip(predictions)
        .filter(|(_, p)| is_detected(**p))
        .flat_map(|(element, _)| {
            element
                .lines
                .iter()
                .enumerate()
                .map(move |(j, &center)| DetectionBand {
                    element: element.id.clone(),
                    center,
                    half_width: BAND_HALF_WIDTH_NM,
                    show_label: j == 0,
                })
        })
        .collect();

    Ok(bands)
}
