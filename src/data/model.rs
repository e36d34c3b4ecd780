use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// VehicleRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single vehicle entry with its schema resolved at load time.
///
/// Text fields are trimmed; an absent cell is an empty string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleRecord {
    pub rank: String,
    pub name: String,
    pub year: String,
    pub brand: String,
    pub model: String,
    pub chassis_code: String,
    /// Engine displacement as written in the source.
    pub engine_l: String,
    /// `engine_l` coerced to a number, `None` when it is not one.
    pub engine_litres: Option<f64>,
    pub engine_type: String,
    pub drivetrain: String,
    pub race_event: String,
    pub date: String,
    /// Lap time as written in the source (trimmed).
    pub time_raw: String,
    /// Lap time in seconds. `None` marks a missing or unparseable time.
    pub lap_time: Option<f64>,
    /// Columns outside the resolved schema: column name → trimmed text.
    pub extra: BTreeMap<String, String>,
}

impl VehicleRecord {
    /// Whether the record can be placed on the lap-time chart.
    pub fn is_plottable(&self) -> bool {
        !self.brand.is_empty() && self.lap_time.is_some()
    }

    /// Point label: `"{model} {chassis_code}"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.model, self.chassis_code)
    }

    /// Non-empty extra columns as `"column: value"` lines, `None` if there are none.
    pub fn extra_details(&self) -> Option<String> {
        let lines: Vec<String> = self
            .extra
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(column, value)| format!("{column}: {value}"))
            .collect();
        (!lines.is_empty()).then(|| lines.join("\n"))
    }
}

// ---------------------------------------------------------------------------
// VehicleTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full cleaned table with pre-computed filter choices.
#[derive(Debug, Clone, Default)]
pub struct VehicleTable {
    /// All records (rows), including ones without a usable lap time.
    pub records: Vec<VehicleRecord>,
    /// Trimmed column names in file order.
    pub column_names: Vec<String>,
    /// Sorted unique brands among plottable records.
    pub brands: BTreeSet<String>,
    /// Sorted unique drivetrains among plottable records.
    pub drivetrains: BTreeSet<String>,
    /// Sorted unique engine types among plottable records.
    pub engine_types: BTreeSet<String>,
}

impl VehicleTable {
    /// Build the filter indices from the loaded records.
    pub fn from_records(records: Vec<VehicleRecord>, column_names: Vec<String>) -> Self {
        let mut brands = BTreeSet::new();
        let mut drivetrains = BTreeSet::new();
        let mut engine_types = BTreeSet::new();

        for rec in records.iter().filter(|r| r.is_plottable()) {
            brands.insert(rec.brand.clone());
            drivetrains.insert(rec.drivetrain.clone());
            engine_types.insert(rec.engine_type.clone());
        }

        VehicleTable {
            records,
            column_names,
            brands,
            drivetrains,
            engine_types,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records whose lap time is missing.
    pub fn missing_lap_times(&self) -> usize {
        self.records.iter().filter(|r| r.lap_time.is_none()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(brand: &str, drivetrain: &str, lap_time: Option<f64>) -> VehicleRecord {
        VehicleRecord {
            brand: brand.into(),
            drivetrain: drivetrain.into(),
            engine_type: "NA".into(),
            lap_time,
            ..Default::default()
        }
    }

    #[test]
    fn unique_values_skip_unplottable_rows() {
        let table = VehicleTable::from_records(
            vec![
                rec("Porsche", "RWD", Some(99.0)),
                rec("Honda", "FWD", Some(105.0)),
                rec("Audi", "AWD", None),
                rec("", "AWD", Some(101.0)),
                rec("Porsche", "RWD", Some(98.0)),
            ],
            vec!["Brand".into()],
        );
        assert_eq!(table.len(), 5);
        assert_eq!(table.missing_lap_times(), 1);
        assert_eq!(
            table.brands.iter().cloned().collect::<Vec<_>>(),
            vec!["Honda".to_string(), "Porsche".to_string()]
        );
        assert_eq!(table.drivetrains.len(), 2);
        assert!(!table.drivetrains.contains("AWD"));
    }

    #[test]
    fn label_joins_model_and_chassis() {
        let r = VehicleRecord {
            model: "911 GT3".into(),
            chassis_code: "992.1".into(),
            ..Default::default()
        };
        assert_eq!(r.label(), "911 GT3 992.1");
    }

    #[test]
    fn extra_details_skip_blank_columns() {
        let mut r = VehicleRecord::default();
        assert_eq!(r.extra_details(), None);
        r.extra.insert("Tyres".into(), "R888R".into());
        r.extra.insert("Notes".into(), "dry".into());
        r.extra.insert("Weather".into(), String::new());
        assert_eq!(r.extra_details().as_deref(), Some("Notes: dry\nTyres: R888R"));
    }
}
