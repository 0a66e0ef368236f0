use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Element – one entry of the spectral line table
// ---------------------------------------------------------------------------

/// A chemical element and the wavelengths (nm) of its characteristic lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub lines: Vec<f64>,
}

impl Element {
    pub fn new(id: impl Into<String>, lines: &[f64]) -> Self {
        Self {
            id: id.into(),
            lines: lines.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// LineTable – the fixed element → lines lookup
// ---------------------------------------------------------------------------

/// Ordered, read-only table of known elements.
///
/// Serialized as a JSON array of `{ "id": ..., "lines": [...] }` so the
/// element order survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineTable {
    elements: Vec<Element>,
}

impl LineTable {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// The table the classifier was trained against.
    pub fn builtin() -> Self {
        Self::new(vec![
            Element::new("Hidrogeno", &[656.3, 486.1, 434.0]),
            Element::new("Helio", &[587.6, 667.8, 501.5]),
            Element::new("Sodio", &[589.0, 589.6]),
            Element::new("Calcio", &[422.7, 393.4]),
        ])
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    /// Look up an element, failing on identifiers the table does not know.
    pub fn lookup(&self, id: &str) -> Result<&Element> {
        self.get(id)
            .ok_or_else(|| Error::UnknownElement(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(|el| el.id.as_str())
    }

    /// Resolve an ordered label list into the matching elements.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Element>> {
        ids.iter()
            .map(|id| self.lookup(id.as_ref()).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

// ---------------------------------------------------------------------------
// WavelengthGrid – evenly spaced sample positions
// ---------------------------------------------------------------------------

/// `n` evenly spaced wavelengths from `start` to `end`, both inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthGrid {
    points: Vec<f64>,
}

impl WavelengthGrid {
    pub fn new(start: f64, end: f64, n: usize) -> Result<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(Error::InvalidGrid(format!(
                "range [{start}, {end}] is not finite"
            )));
        }
        if start >= end {
            return Err(Error::InvalidGrid(format!(
                "start {start} must be below end {end}"
            )));
        }
        if n < 2 {
            return Err(Error::InvalidGrid(format!(
                "need at least 2 samples, got {n}"
            )));
        }

        Ok(Self {
            points: linspace(start, end, n),
        })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }

    /// Index of the grid sample closest to `wavelength` (clamped to the grid).
    pub fn nearest_index(&self, wavelength: f64) -> usize {
        let step = (self.end() - self.start()) / (self.len() - 1) as f64;
        let pos = ((wavelength - self.start()) / step).round();
        if pos <= 0.0 {
            0
        } else {
            (pos as usize).min(self.len() - 1)
        }
    }
}

impl Default for WavelengthGrid {
    /// 1000 samples over 350–800 nm.
    fn default() -> Self {
        Self {
            points: linspace(350.0, 800.0, 1000),
        }
    }
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    let mut points: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
    // Pin the last point so rounding never shifts the upper bound.
    points[n - 1] = end;
    points
}

// ---------------------------------------------------------------------------
// Concentrations – one slider value per element
// ---------------------------------------------------------------------------

/// Element concentrations keyed by element id. Missing keys read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Concentrations {
    values: BTreeMap<String, f64>,
}

impl Concentrations {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `ids` at concentration 0.
    pub fn zeros<S: AsRef<str>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            values: ids
                .into_iter()
                .map(|id| (id.as_ref().to_string(), 0.0))
                .collect(),
        }
    }

    pub fn with(mut self, id: &str, value: f64) -> Self {
        self.set(id, value);
        self
    }

    pub fn set(&mut self, id: &str, value: f64) {
        self.values.insert(id.to_string(), value);
    }

    pub fn get(&self, id: &str) -> f64 {
        self.values.get(id).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn reset(&mut self) {
        self.values.values_mut().for_each(|v| *v = 0.0);
    }
}

// ---------------------------------------------------------------------------
// Spectrum – normalized intensities aligned to a grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub intensities: Vec<f64>,
}

impl Spectrum {
    pub fn zeros(len: usize) -> Self {
        Self {
            intensities: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }

    pub fn max(&self) -> f64 {
        self.intensities
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Index of the first maximum sample, `None` for an empty spectrum.
    pub fn argmax(&self) -> Option<usize> {
        self.intensities
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i)
    }

    /// Samples as `f32` for model input.
    pub fn as_f32(&self) -> Vec<f32> {
        self.intensities.iter().map(|&v| v as f32).collect()
    }
}

// ---------------------------------------------------------------------------
// DetectionBand – highlighted region around a detected line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionBand {
    pub element: String,
    pub center: f64,
    pub half_width: f64,
    /// Only the first band of each element carries the element label.
    pub show_label: bool,
}

impl DetectionBand {
    pub fn lower(&self) -> f64 {
        self.center - self.half_width
    }

    pub fn upper(&self) -> f64 {
        self.center + self.half_width
    }
}
