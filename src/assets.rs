use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::classifier::{Classifier, DenseClassifier, LineMatchClassifier};
use crate::config::SimulatorConfig;
use crate::data::model::{Element, LineTable, WavelengthGrid};

// ---------------------------------------------------------------------------
// Assets – loaded once, read-only afterwards
// ---------------------------------------------------------------------------

/// Line table, ordered element labels and the classifier, bundled so the
/// analysis path receives them explicitly.
pub struct Assets {
    pub table: LineTable,
    /// Label order shared by sliders, classifier output and the overlay.
    pub elements: Vec<Element>,
    pub classifier: Box<dyn Classifier>,
}

impl Assets {
    /// Assemble assets from already loaded parts. Every label must be in
    /// `table`.
    pub fn new<S: AsRef<str>>(
        table: LineTable,
        labels: &[S],
        classifier: Box<dyn Classifier>,
    ) -> Result<Self> {
        let elements = table.select(labels).context("resolving element labels")?;
        Ok(Self {
            table,
            elements,
            classifier,
        })
    }

    /// One-time startup load driven by the configuration.
    pub fn load(config: &SimulatorConfig, grid: &WavelengthGrid) -> Result<Self> {
        let table = match &config.lines_path {
            Some(path) => load_line_table(path)?,
            None => LineTable::builtin(),
        };

        let labels: Vec<String> = match &config.labels_path {
            Some(path) => load_labels(path)?,
            None => table.ids().map(str::to_string).collect(),
        };
        if labels.is_empty() {
            bail!("no element labels to classify");
        }

        let classifier: Box<dyn Classifier> = match &config.model_path {
            Some(path) => {
                let model = DenseClassifier::load(path)?;
                if model.input_len() != grid.len() {
                    bail!(
                        "model expects {} samples but the grid has {}",
                        model.input_len(),
                        grid.len()
                    );
                }
                if model.output_len() != labels.len() {
                    bail!(
                        "model predicts {} elements but {} labels are loaded",
                        model.output_len(),
                        labels.len()
                    );
                }
                Box::new(model)
            }
            None => {
                log::warn!("No model configured, using the line-match classifier");
                let elements = table.select(&labels).context("resolving element labels")?;
                Box::new(LineMatchClassifier::new(&elements, grid))
            }
        };

        let assets = Self::new(table, &labels, classifier)?;
        log::info!(
            "Assets ready: {} elements {:?}, classifier '{}'",
            assets.elements.len(),
            labels,
            assets.classifier.name()
        );
        Ok(assets)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|el| el.id.as_str())
    }
}

/// Labels file: a JSON array of element ids.
pub fn load_labels(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading labels file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing labels file {}", path.display()))
}

/// Line table file: `[{ "id": "Hidrogeno", "lines": [656.3, ...] }, ...]`.
pub fn load_line_table(path: &Path) -> Result<LineTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading line table {}", path.display()))?;
    let table: LineTable = serde_json::from_str(&text)
        .with_context(|| format!("parsing line table {}", path.display()))?;
    if table.is_empty() {
        bail!("line table {} is empty", path.display());
    }
    Ok(table)
}
