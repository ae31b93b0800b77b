//! Save many stations' normalised series to one parquet file.
//!
//! The layout is orthogonal: a single `date` column shared by every station,
//! then one nullable discharge column per station named by its gage code.
//! Station coordinates travel as field metadata.

use std::{collections::HashMap, fs::File, path::Path, sync::Arc};

use anyhow::{ensure, Result};
use arrow::{
    array::{ArrayRef, Date32Builder, Float32Builder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::{Datelike, NaiveDate};
use parquet::{
    arrow::ArrowWriter,
    basic::{Compression, ZstdLevel},
    file::properties::WriterProperties,
};

use crate::{cli::create_progress_bar, metadata::Coordinates};

const CHUNK_SIZE: usize = 100_000;

#[derive(Debug, Clone, PartialEq)]
pub struct StationColumn {
    pub station: String,
    pub coords: Coordinates,
    pub values: Vec<Option<f64>>,
}

/// Stations sharing one date axis.
#[derive(Debug, Default)]
pub struct DischargeTable {
    pub dates: Vec<NaiveDate>,
    pub stations: Vec<StationColumn>,
}

pub fn save_discharge(table: &DischargeTable, file_path: &Path) -> Result<()> {
    for column in &table.stations {
        ensure!(
            column.values.len() == table.dates.len(),
            "station {} has {} values for {} dates",
            column.station,
            column.values.len(),
            table.dates.len()
        );
    }

    let schema = Arc::new(make_schema(table));
    let file = File::create(file_path)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(ZstdLevel::default()))
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
    let pb = create_progress_bar(table.dates.len() as u64, "Writing parquet file".to_string());

    let epoch_offset = NaiveDate::from_ymd_opt(1970, 1, 1)
        .map(|d| d.num_days_from_ce())
        .unwrap_or(719_163);

    for start in (0..table.dates.len()).step_by(CHUNK_SIZE) {
        let end = (start + CHUNK_SIZE).min(table.dates.len());

        let mut date_builder = Date32Builder::with_capacity(end - start);
        for date in &table.dates[start..end] {
            date_builder.append_value(date.num_days_from_ce() - epoch_offset);
        }

        let mut columns: Vec<ArrayRef> = vec![Arc::new(date_builder.finish())];
        for station in &table.stations {
            let mut builder = Float32Builder::with_capacity(end - start);
            for value in &station.values[start..end] {
                builder.append_option(value.map(|v| v as f32));
            }
            columns.push(Arc::new(builder.finish()));
        }

        let batch = RecordBatch::try_new(schema.clone(), columns)?;
        writer.write(&batch)?;
        pb.set_position(end as u64);
    }

    pb.finish_with_message("Finished writing parquet file");
    writer.close()?;

    Ok(())
}

fn make_schema(table: &DischargeTable) -> Schema {
    let mut fields = vec![Field::new("date", DataType::Date32, false)];

    for station in &table.stations {
        let metadata = HashMap::from([
            ("latitude".to_string(), station.coords.latitude.to_string()),
            ("longitude".to_string(), station.coords.longitude.to_string()),
            ("units".to_string(), "m3/s".to_string()),
        ]);
        fields.push(Field::new(&station.station, DataType::Float32, true).with_metadata(metadata));
    }

    let metadata = HashMap::from([
        ("title".to_string(), "Brazil River Discharge".to_string()),
        (
            "source".to_string(),
            "Brazil Hidroweb, https://www.snirh.gov.br/hidroweb/".to_string(),
        ),
        ("featureType".to_string(), "timeSeries".to_string()),
    ]);

    Schema::new(fields).with_metadata(metadata)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::fs;

    use arrow::array::{Array, Date32Array, Float32Array};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::NamedTempFile;

    use super::*;

    fn table_fixture() -> DischargeTable {
        let start = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        DischargeTable {
            dates: start.iter_days().take(3).collect(),
            stations: vec![
                StationColumn {
                    station: "10100000".to_string(),
                    coords: Coordinates {
                        latitude: -4.5,
                        longitude: -69.9,
                    },
                    values: vec![None, Some(3.2), None],
                },
                StationColumn {
                    station: "10200000".to_string(),
                    coords: Coordinates {
                        latitude: -5.0,
                        longitude: -70.0,
                    },
                    values: vec![Some(1.0), Some(2.0), Some(3.0)],
                },
            ],
        }
    }

    #[test]
    fn should_write_shared_date_axis() {
        let temp_file = NamedTempFile::new().unwrap();
        let temp_path = temp_file.path().to_path_buf();

        save_discharge(&table_fixture(), &temp_path).unwrap();

        let file = fs::File::open(&temp_path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();

        let mut total_rows = 0;
        for batch_result in reader {
            let batch = batch_result.unwrap();
            total_rows += batch.num_rows();

            let schema = batch.schema();
            assert_eq!(schema.fields().len(), 3);
            assert_eq!(schema.field(0).name(), "date");
            assert_eq!(schema.field(1).name(), "10100000");
            assert_eq!(schema.field(2).name(), "10200000");

            let dates = batch
                .column(0)
                .as_any()
                .downcast_ref::<Date32Array>()
                .unwrap();
            assert_eq!(dates.value(0), 0);
            assert_eq!(dates.value(2), 2);

            let first = batch
                .column(1)
                .as_any()
                .downcast_ref::<Float32Array>()
                .unwrap();
            assert_eq!(first.null_count(), 2);
            assert_eq!(first.value(1), 3.2_f32);

            assert_eq!(batch.column(2).null_count(), 0);
        }

        assert_eq!(total_rows, 3);
    }

    #[test]
    fn should_reject_ragged_station() {
        let mut table = table_fixture();
        table.stations[1].values.pop();
        let temp_file = NamedTempFile::new().unwrap();

        assert!(save_discharge(&table, temp_file.path()).is_err());
    }
}
