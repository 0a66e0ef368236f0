/// Data layer: core types, spectrum synthesis, detection and export.
///
/// Architecture:
/// ```text
///   Concentrations + LineTable
///        │
///        ▼
///   ┌──────────┐
///   │  synth    │  sum of Gaussian lines + noise → normalized Spectrum
///   └──────────┘
///        │
///        ▼  (classifier, outside this module)
///   ┌──────────┐
///   │  detect   │  predictions > 0.5 → DetectionBand per line
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  Spectrum + bands → .csv / .json / .parquet
///   └──────────┘
/// ```

pub mod detect;
pub mod export;
pub mod model;
pub mod synth;
