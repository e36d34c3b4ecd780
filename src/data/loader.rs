use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::config::ColumnConfig;

use super::error::{LoadError, Result};
use super::laptime::parse_lap_time;
use super::model::{VehicleRecord, VehicleTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean the vehicle table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`             – header row followed by one vehicle per row
/// * `.parquet` / `.pq` – one column per field, any scalar type
///
/// Every column name and cell is trimmed, and the lap-time column is parsed
/// into seconds. The row count always matches the source.
pub fn load_file(path: &Path, columns: &ColumnConfig) -> Result<VehicleTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => read_csv(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => {
            return Err(LoadError::UnsupportedExtension {
                extension: other.to_string(),
            })
        }
    };

    let table = clean(raw, columns, path)?;
    let missing = table.missing_lap_times();
    log::info!(
        "Loaded {} vehicles from {} ({} columns)",
        table.len(),
        path.display(),
        table.column_names.len()
    );
    if missing > 0 {
        log::warn!("{missing} of {} lap times are missing or unparseable", table.len());
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Raw text table shared by all formats
// ---------------------------------------------------------------------------

/// Untyped rows straight from the file. `None` is an absent cell.
#[derive(Debug, Default)]
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

/// Trim everything, resolve the schema once, and build typed records.
fn clean(raw: RawTable, columns: &ColumnConfig, path: &Path) -> Result<VehicleTable> {
    let headers: Vec<String> = raw.headers.iter().map(|h| h.trim().to_string()).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(LoadError::EmptyHeader {
            path: path.to_path_buf(),
        });
    }

    for required in columns.required() {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn {
                column: required.to_string(),
                path: path.to_path_buf(),
            });
        }
    }

    let schema = Schema::resolve(&headers, columns);
    let records = raw
        .rows
        .into_iter()
        .enumerate()
        .map(|(row_no, row)| {
            let cells: Vec<Option<String>> = row
                .into_iter()
                .map(|cell| cell.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()))
                .collect();
            schema.build_record(row_no, &headers, &cells)
        })
        .collect();

    Ok(VehicleTable::from_records(records, headers))
}

/// Column positions for every field, resolved once per load.
struct Schema {
    rank: Option<usize>,
    name: Option<usize>,
    year: Option<usize>,
    brand: Option<usize>,
    model: Option<usize>,
    chassis_code: Option<usize>,
    engine_l: Option<usize>,
    engine_type: Option<usize>,
    drivetrain: Option<usize>,
    race_event: Option<usize>,
    date: Option<usize>,
    lap_time: Option<usize>,
}

impl Schema {
    fn resolve(headers: &[String], columns: &ColumnConfig) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Schema {
            rank: find(columns.rank.as_str()),
            name: find(columns.name.as_str()),
            year: find(columns.year.as_str()),
            brand: find(columns.brand.as_str()),
            model: find(columns.model.as_str()),
            chassis_code: find(columns.chassis_code.as_str()),
            engine_l: find(columns.engine_l.as_str()),
            engine_type: find(columns.engine_type.as_str()),
            drivetrain: find(columns.drivetrain.as_str()),
            race_event: find(columns.race_event.as_str()),
            date: find(columns.date.as_str()),
            lap_time: find(columns.lap_time.as_str()),
        }
    }

    fn mapped(&self) -> [Option<usize>; 12] {
        [
            self.rank,
            self.name,
            self.year,
            self.brand,
            self.model,
            self.chassis_code,
            self.engine_l,
            self.engine_type,
            self.drivetrain,
            self.race_event,
            self.date,
            self.lap_time,
        ]
    }

    fn build_record(
        &self,
        row_no: usize,
        headers: &[String],
        cells: &[Option<String>],
    ) -> VehicleRecord {
        let text = |idx: Option<usize>| cell(cells, idx).unwrap_or("").to_string();

        let time_raw = cell(cells, self.lap_time);
        let lap_time = parse_lap_time(time_raw);
        if lap_time.is_none() {
            if let Some(token) = time_raw {
                log::debug!("Row {row_no}: unparseable lap time {token:?}");
            }
        }

        let engine_l = text(self.engine_l);
        let engine_litres = engine_l.parse::<f64>().ok().filter(|v| v.is_finite());

        let mapped = self.mapped();
        let extra: BTreeMap<String, String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !mapped.contains(&Some(*i)))
            .map(|(i, h)| (h.clone(), text(Some(i))))
            .collect();

        VehicleRecord {
            rank: text(self.rank),
            name: text(self.name),
            year: text(self.year),
            brand: text(self.brand),
            model: text(self.model),
            chassis_code: text(self.chassis_code),
            engine_l,
            engine_litres,
            engine_type: text(self.engine_type),
            drivetrain: text(self.drivetrain),
            race_event: text(self.race_event),
            date: text(self.date),
            time_raw: time_raw.unwrap_or("").to_string(),
            lap_time,
            extra,
        }
    }
}

fn cell(cells: &[Option<String>], idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| cells.get(i)).and_then(|c| c.as_deref())
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one vehicle per row.
/// Short rows are padded with absent cells.
fn read_csv(path: &Path) -> Result<RawTable> {
    let csv_err = |source: csv::Error| {
        let not_found = matches!(
            source.kind(),
            csv::ErrorKind::Io(e) if e.kind() == std::io::ErrorKind::NotFound
        );
        if not_found {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Csv {
                path: path.to_path_buf(),
                source,
            }
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let row: Vec<Option<String>> = (0..headers.len())
            .map(|i| record.get(i).map(str::to_string))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file, casting every column to text so it can go through
/// the same cleaning as CSV. Works with files written by Pandas and Polars.
fn read_parquet(path: &Path) -> Result<RawTable> {
    let parquet_err = |message: String| LoadError::Parquet {
        path: path.to_path_buf(),
        message,
    };

    let file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| parquet_err(format!("reading metadata: {e}")))?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder
        .build()
        .map_err(|e| parquet_err(format!("building reader: {e}")))?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| parquet_err(format!("reading record batch: {e}")))?;

        let text_columns = batch
            .columns()
            .iter()
            .map(|col| column_as_text(col))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(parquet_err)?;

        for row in 0..batch.num_rows() {
            let cells = text_columns
                .iter()
                .map(|col| {
                    let strings = col.as_string::<i32>();
                    (!strings.is_null(row)).then(|| strings.value(row).to_string())
                })
                .collect();
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}

/// Cast any scalar Arrow column to `Utf8`.
fn column_as_text(col: &Arc<dyn Array>) -> std::result::Result<Arc<dyn Array>, String> {
    cast(col.as_ref(), &DataType::Utf8)
        .map_err(|e| format!("column of type {:?} is not convertible to text: {e}", col.data_type()))
}
