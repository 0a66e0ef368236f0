use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{BooleanArray, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use super::model::{DetectionBand, WavelengthGrid};
use crate::analysis::Analysis;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Write an analysed spectrum to a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – one row per sample: `wavelength_nm,intensity,highlighted`
/// * `.json`    – spectrum arrays plus predictions, concentrations and bands
/// * `.parquet` – the same columns as the CSV export
pub fn export_file(path: &Path, grid: &WavelengthGrid, analysis: &Analysis) -> Result<()> {
    if grid.len() != analysis.spectrum.len() {
        bail!(
            "spectrum has {} samples but the grid has {}",
            analysis.spectrum.len(),
            grid.len()
        );
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => export_csv(path, grid, analysis),
        "json" => export_json(path, grid, analysis),
        "parquet" | "pq" => export_parquet(path, grid, analysis),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!("Exported {} samples to {}", grid.len(), path.display());
    Ok(())
}

/// Whether `wavelength` falls inside any detection band.
fn highlighted(bands: &[DetectionBand], wavelength: f64) -> bool {
    bands
        .iter()
        .any(|b| wavelength >= b.lower() && wavelength <= b.upper())
}

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CsvRow {
    wavelength_nm: f64,
    intensity: f64,
    highlighted: bool,
}

fn export_csv(path: &Path, grid: &WavelengthGrid, analysis: &Analysis) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;

    for (&wavelength_nm, &intensity) in grid.points().iter().zip(&analysis.spectrum.intensities) {
        writer
            .serialize(CsvRow {
                wavelength_nm,
                intensity,
                highlighted: highlighted(&analysis.bands, wavelength_nm),
            })
            .context("writing CSV row")?;
    }

    writer.flush().context("flushing CSV file")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON writer
// ---------------------------------------------------------------------------

/// ```json
/// {
///   "wavelength_nm": [350.0, ...],
///   "intensity": [0.01, ...],
///   "concentrations": { "Hidrogeno": 1.0, ... },
///   "predictions": { "Hidrogeno": 0.93, ... },
///   "bands": [{ "element": "Hidrogeno", "center": 656.3, "half_width": 3.0, "show_label": true }]
/// }
/// ```
#[derive(Serialize)]
struct JsonExport<'a> {
    wavelength_nm: &'a [f64],
    intensity: &'a [f64],
    concentrations: BTreeMap<&'a str, f64>,
    predictions: BTreeMap<&'a str, f64>,
    bands: &'a [DetectionBand],
}

fn export_json(path: &Path, grid: &WavelengthGrid, analysis: &Analysis) -> Result<()> {
    let doc = JsonExport {
        wavelength_nm: grid.points(),
        intensity: &analysis.spectrum.intensities,
        concentrations: analysis.concentrations.iter().collect(),
        predictions: analysis
            .elements
            .iter()
            .map(String::as_str)
            .zip(analysis.predictions.iter().copied())
            .collect(),
        bands: &analysis.bands,
    };

    let file = File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(BufWriter::new(file), &doc).context("writing JSON")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet writer
// ---------------------------------------------------------------------------

fn export_parquet(path: &Path, grid: &WavelengthGrid, analysis: &Analysis) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("wavelength_nm", DataType::Float64, false),
        Field::new("intensity", DataType::Float64, false),
        Field::new("highlighted", DataType::Boolean, false),
    ]));

    let flags: Vec<bool> = grid
        .points()
        .iter()
        .map(|&w| highlighted(&analysis.bands, w))
        .collect();

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from(grid.points().to_vec())),
            Arc::new(Float64Array::from(analysis.spectrum.intensities.clone())),
            Arc::new(BooleanArray::from(flags)),
        ],
    )
    .context("building record batch")?;

    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use serde_json::Value as JsonValue;
    use tempfile::TempDir;

    use super::*;
    use crate::data::model::{Concentrations, Spectrum};

    fn sample() -> (WavelengthGrid, Analysis) {
        let grid = WavelengthGrid::new(580.0, 600.0, 21).unwrap();
        let analysis = Analysis {
            elements: vec!["Sodio".into(), "Calcio".into()],
            concentrations: Concentrations::new().with("Sodio", 0.8),
            spectrum: Spectrum {
                intensities: (0..21).map(|i| i as f64 / 20.0).collect(),
            },
            predictions: vec![0.95, 0.05],
            bands: vec![DetectionBand {
                element: "Sodio".into(),
                center: 589.0,
                half_width: 3.0,
                show_label: true,
            }],
        };
        (grid, analysis)
    }

    #[test]
    fn csv_rows_follow_the_grid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("espectro.csv");
        let (grid, analysis) = sample();
        export_file(&path, &grid, &analysis).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["wavelength_nm", "intensity", "highlighted"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 21);
        assert_eq!(&rows[0][2], "false");
        // 589 nm sits at index 9, inside the 586–592 band.
        assert_eq!(&rows[9][2], "true");
    }

    #[test]
    fn json_keeps_predictions_by_element() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("espectro.json");
        let (grid, analysis) = sample();
        export_file(&path, &grid, &analysis).unwrap();

        let doc: JsonValue = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["intensity"].as_array().unwrap().len(), 21);
        assert_eq!(doc["predictions"]["Sodio"], 0.95);
        assert_eq!(doc["concentrations"]["Sodio"], 0.8);
        assert_eq!(doc["bands"][0]["element"], "Sodio");
    }

    #[test]
    fn parquet_has_one_row_per_sample() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("espectro.parquet");
        let (grid, analysis) = sample();
        export_file(&path, &grid, &analysis).unwrap();

        let file = File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(rows, 21);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (grid, analysis) = sample();
        let err = export_file(&dir.path().join("espectro.xlsx"), &grid, &analysis).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn mismatched_grid_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (_, analysis) = sample();
        let grid = WavelengthGrid::default();
        assert!(export_file(&dir.path().join("espectro.csv"), &grid, &analysis).is_err());
    }
}
