use super::Classifier;
use crate::data::model::{Element, Spectrum, WavelengthGrid};
use crate::error::{Error, Result};

/// Model-free fallback: an element scores the weakest normalized intensity
/// found at its lines, so every line has to be lit for a high score.
///
/// Lines outside the grid are ignored; an element with no line on the grid
/// always scores 0.
#[derive(Debug, Clone)]
pub struct LineMatchClassifier {
    line_indices: Vec<Vec<usize>>,
    grid_len: usize,
}

impl LineMatchClassifier {
    pub fn new(elements: &[Element], grid: &WavelengthGrid) -> Self {
        let line_indices = elements
            .iter()
            .map(|el| {
                el.lines
                    .iter()
                    .filter(|&&l| l >= grid.start() && l <= grid.end())
                    .map(|&l| grid.nearest_index(l))
                    .collect()
            })
            .collect();

        Self {
            line_indices,
            grid_len: grid.len(),
        }
    }
}

impl Classifier for LineMatchClassifier {
    fn name(&self) -> &str {
        "line-match"
    }

    fn predict(&self, spectrum: &Spectrum) -> Result<Vec<f64>> {
        if spectrum.len() != self.grid_len {
            return Err(Error::InputLength {
                expected: self.grid_len,
                actual: spectrum.len(),
            });
        }

        Ok(self
            .line_indices
            .iter()
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| spectrum.intensities[i])
                    .reduce(f64::min)
                    .unwrap_or(0.0)
                    .clamp(0.0, 1.0)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::validate_prediction;
    use crate::data::detect::is_detected;
    use crate::data::model::{Concentrations, LineTable};
    use crate::data::synth::Synthesizer;

    fn predict_for(conc: &Concentrations) -> Vec<f64> {
        let table = LineTable::builtin();
        let grid = WavelengthGrid::default();
        let sp = Synthesizer::default()
            .synthesize_noiseless(&table, conc, &grid)
            .unwrap();
        LineMatchClassifier::new(table.elements(), &grid)
            .predict(&sp)
            .unwrap()
    }

    #[test]
    fn pure_hydrogen_is_the_only_detection() {
        let table = LineTable::builtin();
        let pred = predict_for(&Concentrations::zeros(table.ids()).with("Hidrogeno", 1.0));

        validate_prediction(&pred, table.len()).unwrap();
        let detected: Vec<&str> = table
            .ids()
            .zip(&pred)
            .filter(|(_, p)| is_detected(**p))
            .map(|(id, _)| id)
            .collect();
        assert_eq!(detected, vec!["Hidrogeno"]);
    }

    #[test]
    fn empty_sample_detects_nothing() {
        let table = LineTable::builtin();
        let pred = predict_for(&Concentrations::zeros(table.ids()));
        assert!(pred.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn lines_off_the_grid_score_zero() {
        let grid = WavelengthGrid::new(400.0, 500.0, 101).unwrap();
        let clf = LineMatchClassifier::new(&[Element::new("Infrarrojo", &[900.0])], &grid);
        let sp = Spectrum {
            intensities: vec![1.0; 101],
        };
        assert_eq!(clf.predict(&sp).unwrap(), vec![0.0]);
    }

    #[test]
    fn spectrum_from_other_grid_is_rejected() {
        let grid = WavelengthGrid::default();
        let clf = LineMatchClassifier::new(LineTable::builtin().elements(), &grid);
        assert!(matches!(
            clf.predict(&Spectrum::zeros(10)),
            Err(Error::InputLength { .. })
        ));
    }
}
