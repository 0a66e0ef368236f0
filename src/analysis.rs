use rand::Rng;

use crate::assets::Assets;
use crate::classifier::validate_prediction;
use crate::data::detect::{detect, is_detected};
use crate::data::model::{Concentrations, DetectionBand, Spectrum, WavelengthGrid};
use crate::data::synth::Synthesizer;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Analysis – result of one interaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Element ids in prediction order.
    pub elements: Vec<String>,
    pub concentrations: Concentrations,
    pub spectrum: Spectrum,
    pub predictions: Vec<f64>,
    pub bands: Vec<DetectionBand>,
}

/// Per-element row of the quantitative view.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementReport {
    pub element: String,
    /// Concentration set by the user.
    pub real: f64,
    /// Classifier probability.
    pub predicted: f64,
    /// Share of the summed probabilities (estimated composition).
    pub share: f64,
    pub detected: bool,
}

/// Synthesize, classify and overlay. Any failure aborts the whole
/// interaction; there is no partial result.
pub fn analyze<R: Rng + ?Sized>(
    assets: &Assets,
    synth: &Synthesizer,
    grid: &WavelengthGrid,
    concentrations: &Concentrations,
    rng: &mut R,
) -> Result<Analysis> {
    let spectrum = synth.synthesize(&assets.table, concentrations, grid, rng)?;

    let predictions = assets.classifier.predict(&spectrum)?;
    validate_prediction(&predictions, assets.elements.len())?;

    let bands = detect(&predictions, &assets.elements)?;
    log::debug!(
        "Predictions {:?}, {} bands highlighted",
        predictions,
        bands.len()
    );

    Ok(Analysis {
        elements: assets.labels().map(str::to_string).collect(),
        concentrations: concentrations.clone(),
        spectrum,
        predictions,
        bands,
    })
}

impl Analysis {
    /// Predictions scaled to sum to 1, or all zero when nothing is predicted.
    pub fn composition(&self) -> Vec<f64> {
        let total: f64 = self.predictions.iter().sum();
        if total > 0.0 {
            self.predictions.iter().map(|p| p / total).collect()
        } else {
            vec![0.0; self.predictions.len()]
        }
    }

    /// Real vs predicted, one row per element in prediction order.
    pub fn reports(&self) -> Vec<ElementReport> {
        self.elements
            .iter()
            .zip(&self.predictions)
            .zip(self.composition())
            .map(|((id, &predicted), share)| ElementReport {
                element: id.clone(),
                real: self.concentrations.get(id),
                predicted,
                share,
                detected: is_detected(predicted),
            })
            .collect()
    }

    pub fn detected(&self) -> impl Iterator<Item = &str> {
        self.elements
            .iter()
            .zip(&self.predictions)
            .filter(|(_, p)| is_detected(**p))
            .map(|(id, _)| id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::classifier::{Classifier, LineMatchClassifier};
    use crate::data::model::LineTable;
    use crate::error::Error;

    /// Returns a canned prediction whatever the spectrum.
    struct Fixed(Vec<f64>);

    impl Classifier for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn predict(&self, _spectrum: &Spectrum) -> Result<Vec<f64>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl Classifier for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn predict(&self, _spectrum: &Spectrum) -> Result<Vec<f64>> {
            Err(Error::Model("session closed".into()))
        }
    }

    fn assets_with(classifier: Box<dyn Classifier>) -> Assets {
        Assets::new(LineTable::builtin(), &["Hidrogeno", "Sodio"], classifier).unwrap()
    }

    fn run(assets: &Assets, conc: &Concentrations) -> Result<Analysis> {
        analyze(
            assets,
            &Synthesizer::default(),
            &WavelengthGrid::default(),
            conc,
            &mut StdRng::seed_from_u64(11),
        )
    }

    #[test]
    fn hydrogen_example_end_to_end() {
        let assets = assets_with(Box::new(Fixed(vec![0.9, 0.1])));
        let conc = Concentrations::zeros(["Hidrogeno", "Sodio"]).with("Hidrogeno", 1.0);
        let analysis = run(&assets, &conc).unwrap();

        assert_eq!(analysis.spectrum.len(), 1000);
        assert_eq!(analysis.bands.len(), 3);
        assert_eq!(analysis.detected().collect::<Vec<_>>(), vec!["Hidrogeno"]);
    }

    #[test]
    fn classifier_failure_aborts_interaction() {
        let assets = assets_with(Box::new(Failing));
        let conc = Concentrations::zeros(["Hidrogeno", "Sodio"]);
        assert_eq!(
            run(&assets, &conc),
            Err(Error::Model("session closed".into()))
        );
    }

    #[test]
    fn malformed_prediction_is_surfaced() {
        let assets = assets_with(Box::new(Fixed(vec![0.9, 0.1, 0.4])));
        let conc = Concentrations::zeros(["Hidrogeno", "Sodio"]);
        assert_eq!(
            run(&assets, &conc),
            Err(Error::PredictionLength {
                expected: 2,
                actual: 3
            })
        );

        let assets = assets_with(Box::new(Fixed(vec![1.2, 0.1])));
        assert!(matches!(
            run(&assets, &conc),
            Err(Error::PredictionRange { index: 0, .. })
        ));
    }

    #[test]
    fn unknown_concentration_key_aborts_interaction() {
        let assets = assets_with(Box::new(Fixed(vec![0.0, 0.0])));
        let conc = Concentrations::new().with("Mercurio", 0.3);
        assert_eq!(
            run(&assets, &conc),
            Err(Error::UnknownElement("Mercurio".into()))
        );
    }

    #[test]
    fn reports_compare_real_and_predicted() {
        let assets = assets_with(Box::new(Fixed(vec![0.6, 0.2])));
        let conc = Concentrations::zeros(["Hidrogeno", "Sodio"])
            .with("Hidrogeno", 0.7)
            .with("Sodio", 0.3);
        let reports = run(&assets, &conc).unwrap().reports();

        assert_eq!(reports[0].element, "Hidrogeno");
        assert_relative_eq!(reports[0].real, 0.7);
        assert_relative_eq!(reports[0].share, 0.75, epsilon = 1e-12);
        assert!(reports[0].detected);
        assert_relative_eq!(reports[1].share, 0.25, epsilon = 1e-12);
        assert!(!reports[1].detected);
    }

    #[test]
    fn composition_of_empty_prediction_is_zero() {
        let assets = assets_with(Box::new(Fixed(vec![0.0, 0.0])));
        let conc = Concentrations::zeros(["Hidrogeno", "Sodio"]);
        assert_eq!(run(&assets, &conc).unwrap().composition(), vec![0.0, 0.0]);
    }

    #[test]
    fn line_match_detects_sodium_in_a_mix() {
        let table = LineTable::builtin();
        let grid = WavelengthGrid::default();
        let labels: Vec<&str> = table.ids().collect();
        let clf = LineMatchClassifier::new(table.elements(), &grid);
        let assets = Assets::new(table.clone(), &labels, Box::new(clf)).unwrap();

        let conc = Concentrations::zeros(labels.iter().copied())
            .with("Hidrogeno", 0.8)
            .with("Sodio", 0.6);
        let analysis = analyze(
            &assets,
            &Synthesizer::new(1.5, 0.0).unwrap(),
            &grid,
            &conc,
            &mut StdRng::seed_from_u64(0),
        )
        .unwrap();

        let detected: Vec<&str> = analysis.detected().collect();
        assert!(detected.contains(&"Hidrogeno"));
        assert!(detected.contains(&"Sodio"));
        assert!(!detected.contains(&"Calcio"));
    }
}
