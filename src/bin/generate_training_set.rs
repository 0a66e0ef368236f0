use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Float64Builder, ListBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use spectrum_ml::data::model::{Concentrations, LineTable, WavelengthGrid};
use spectrum_ml::data::synth::Synthesizer;

/// Write synthetic labelled spectra for classifier training.
#[derive(Debug, Parser)]
#[command(name = "generate-training-set", version)]
struct Args {
    #[arg(long, default_value = "training_set.parquet")]
    output: PathBuf,

    /// Number of spectra to generate.
    #[arg(long, default_value_t = 2000)]
    count: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Each element is present with probability 1/2, at a concentration drawn
/// from (0, 1].
fn random_mix(table: &LineTable, rng: &mut StdRng) -> Concentrations {
    let mut conc = Concentrations::zeros(table.ids());
    for id in table.ids() {
        if rng.gen_bool(0.5) {
            conc.set(id, 1.0 - rng.gen::<f64>());
        }
    }
    conc
}

fn list_column(rows: &[Vec<f64>]) -> ArrayRef {
    let mut builder = ListBuilder::new(Float64Builder::new());
    for row in rows {
        builder.values().append_slice(row);
        builder.append(true);
    }
    Arc::new(builder.finish())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let table = LineTable::builtin();
    let grid = WavelengthGrid::default();
    let synth = Synthesizer::default();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut all_y: Vec<Vec<f64>> = Vec::with_capacity(args.count);
    let mut mixes: Vec<Concentrations> = Vec::with_capacity(args.count);

    for _ in 0..args.count {
        let conc = random_mix(&table, &mut rng);
        let spectrum = synth.synthesize(&table, &conc, &grid, &mut rng)?;
        all_y.push(spectrum.intensities);
        mixes.push(conc);
    }
    let all_x = vec![grid.points().to_vec(); args.count];

    let list_type = DataType::List(Arc::new(Field::new("item", DataType::Float64, true)));
    let mut fields = vec![
        Field::new("x", list_type.clone(), false),
        Field::new("y", list_type, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![list_column(&all_x), list_column(&all_y)];

    for id in table.ids() {
        let values: Vec<f64> = mixes.iter().map(|c| c.get(id)).collect();
        let labels: Vec<bool> = values.iter().map(|&v| v > 0.0).collect();

        fields.push(Field::new(id, DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(values)));
        fields.push(Field::new(format!("has_{id}"), DataType::Boolean, false));
        columns.push(Arc::new(BooleanArray::from(labels)));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch =
        RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    log::info!(
        "Wrote {} spectra ({} wavelengths each, {} elements) to {}",
        args.count,
        grid.len(),
        table.len(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use arrow::array::{Array, ListArray};

    use super::*;

    #[test]
    fn mixes_only_use_known_elements_in_range() {
        let table = LineTable::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let mix = random_mix(&table, &mut rng);
            for (id, c) in mix.iter() {
                assert!(table.get(id).is_some());
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn list_column_keeps_row_lengths() {
        let col = list_column(&[vec![1.0, 2.0], vec![3.0]]);
        let list = col.as_any().downcast_ref::<ListArray>().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.value(0).len(), 2);
        assert_eq!(list.value(1).len(), 1);
    }
}
