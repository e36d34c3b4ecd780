use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::data::error::{LoadError, Result};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Elite 100 lap-time visualizer.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Vehicle data file (.csv, .parquet or .pq).
    #[arg(default_value = "elite100.csv")]
    pub data: PathBuf,

    /// JSON file mapping logical fields to column names in the data file.
    #[arg(long, value_name = "JSON")]
    pub columns: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Names of the source columns feeding each [`VehicleRecord`] field.
///
/// Matching happens after column names are trimmed. Any field missing from a
/// JSON override keeps its default.
///
/// [`VehicleRecord`]: crate::data::model::VehicleRecord
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ColumnConfig {
    pub rank: String,
    pub name: String,
    pub year: String,
    pub brand: String,
    pub model: String,
    pub chassis_code: String,
    pub engine_l: String,
    pub engine_type: String,
    pub drivetrain: String,
    pub race_event: String,
    pub date: String,
    pub lap_time: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            rank: "Rank".into(),
            name: "Name".into(),
            year: "Year".into(),
            brand: "Brand".into(),
            model: "Model".into(),
            chassis_code: "ChassisCode".into(),
            engine_l: "EngineL".into(),
            engine_type: "EngineType".into(),
            drivetrain: "Drivetrain".into(),
            race_event: "RaceEvent".into(),
            date: "Date".into(),
            lap_time: "Time".into(),
        }
    }
}

impl ColumnConfig {
    /// Read a column mapping from a JSON object such as
    /// `{ "lap_time": "Lap", "brand": "Make" }`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        Self::from_json_str(&text).map_err(|source| LoadError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Columns that must be present for the table to be usable.
    pub fn required(&self) -> [&str; 4] {
        [
            self.brand.as_str(),
            self.drivetrain.as_str(),
            self.engine_type.as_str(),
            self.lap_time.as_str(),
        ]
    }
}
