use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::Classifier;
use crate::data::model::Spectrum;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Model file layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Sigmoid,
    Tanh,
    Softmax,
}

impl Activation {
    fn apply(self, values: &mut [f32]) {
        match self {
            Activation::Linear => {}
            Activation::Relu => values.iter_mut().for_each(|v| *v = v.max(0.0)),
            Activation::Sigmoid => values
                .iter_mut()
                .for_each(|v| *v = 1.0 / (1.0 + (-*v).exp())),
            Activation::Tanh => values.iter_mut().for_each(|v| *v = v.tanh()),
            Activation::Softmax => {
                let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let mut sum = 0.0;
                for v in values.iter_mut() {
                    *v = (*v - max).exp();
                    sum += *v;
                }
                if sum > 0.0 {
                    values.iter_mut().for_each(|v| *v /= sum);
                }
            }
        }
    }
}

/// Fully connected layer. `weights[o][i]` connects input `i` to output `o`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn inputs(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    fn outputs(&self) -> usize {
        self.weights.len()
    }

    fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut out: Vec<f32> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect();
        self.activation.apply(&mut out);
        out
    }
}

// ---------------------------------------------------------------------------
// DenseClassifier
// ---------------------------------------------------------------------------

/// Feed-forward network exported from the trained model as JSON:
///
/// ```json
/// {
///   "name": "espectrometria-v1",
///   "input_len": 1000,
///   "layers": [
///     { "weights": [[...], ...], "bias": [...], "activation": "relu" },
///     { "weights": [[...], ...], "bias": [...], "activation": "sigmoid" }
///   ]
/// }
/// ```
///
/// The spectrum is fed as one channel of `input_len` samples, i.e. the
/// `[1, N, 1]` tensor flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseClassifier {
    #[serde(default = "default_name")]
    name: String,
    input_len: usize,
    layers: Vec<DenseLayer>,
}

fn default_name() -> String {
    "dense".to_string()
}

impl DenseClassifier {
    pub fn new(name: impl Into<String>, input_len: usize, layers: Vec<DenseLayer>) -> Result<Self> {
        let model = Self {
            name: name.into(),
            input_len,
            layers,
        };
        model.check_shapes()?;
        Ok(model)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let model: Self = serde_json::from_str(text).map_err(|e| Error::Model(e.to_string()))?;
        model.check_shapes()?;
        Ok(model)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading model file {}", path.display()))?;
        let model = Self::from_json(&text)
            .with_context(|| format!("parsing model file {}", path.display()))?;
        log::info!(
            "Loaded model '{}' ({} layers, {} inputs, {} outputs)",
            model.name,
            model.layers.len(),
            model.input_len,
            model.output_len()
        );
        Ok(model)
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    pub fn output_len(&self) -> usize {
        self.layers.last().map_or(0, DenseLayer::outputs)
    }

    fn check_shapes(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::Model("model has no layers".into()));
        }

        let mut expected_inputs = self.input_len;
        for (k, layer) in self.layers.iter().enumerate() {
            if layer.outputs() == 0 {
                return Err(Error::Model(format!("layer {k} has no outputs")));
            }
            if let Some(o) = layer.weights.iter().position(|row| row.len() != expected_inputs) {
                return Err(Error::Model(format!(
                    "layer {k}, row {o}: expected {expected_inputs} weights, got {}",
                    layer.weights[o].len()
                )));
            }
            if layer.bias.len() != layer.outputs() {
                return Err(Error::Model(format!(
                    "layer {k}: {} outputs but {} biases",
                    layer.outputs(),
                    layer.bias.len()
                )));
            }
            expected_inputs = layer.outputs();
        }
        debug_assert_eq!(self.layers[0].inputs(), self.input_len);
        Ok(())
    }
}

impl Classifier for DenseClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, spectrum: &Spectrum) -> Result<Vec<f64>> {
        if spectrum.len() != self.input_len {
            return Err(Error::InputLength {
                expected: self.input_len,
                actual: spectrum.len(),
            });
        }

        let output = self
            .layers
            .iter()
            .fold(spectrum.as_f32(), |x, layer| layer.forward(&x));

        Ok(output.into_iter().map(f64::from).collect())
    }
}
