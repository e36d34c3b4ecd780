use std::collections::BTreeSet;

use super::model::{VehicleRecord, VehicleTable};

// ---------------------------------------------------------------------------
// Selection: which categorical values are shown
// ---------------------------------------------------------------------------

/// Multi-select state for a categorical column.
///
/// `Only` is never empty: deselecting the last value falls back to `All`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Whether `value` is explicitly selected (never true for `All`).
    pub fn is_selected(&self, value: &str) -> bool {
        match self {
            Selection::All => false,
            Selection::Only(set) => set.contains(value),
        }
    }

    /// Whether a record with this value passes.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.contains(value),
        }
    }

    /// Add or remove a single value.
    pub fn toggle(&mut self, value: &str) {
        match self {
            Selection::All => {
                *self = Selection::Only(BTreeSet::from([value.to_string()]));
            }
            Selection::Only(set) => {
                if !set.remove(value) {
                    set.insert(value.to_string());
                }
                if set.is_empty() {
                    *self = Selection::All;
                }
            }
        }
    }

    pub fn select_all(&mut self) {
        *self = Selection::All;
    }
}

// ---------------------------------------------------------------------------
// Model / chassis search
// ---------------------------------------------------------------------------

/// Comma-separated free-text search over model names and chassis codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    /// Split on commas; each term is trimmed and lowercased, blanks dropped.
    pub fn parse(text: &str) -> Self {
        let terms = text
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        SearchQuery { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// A record matches when any term does:
    /// * multi-word term → equals the whole model name
    /// * single-word term → equals one word of the model, or the chassis code
    pub fn matches(&self, model: &str, chassis_code: &str) -> bool {
        if self.is_empty() {
            return true;
        }
        let model = model.to_lowercase();
        let chassis = chassis_code.to_lowercase();
        let model_words: Vec<&str> = model.split_whitespace().collect();

        self.terms.iter().any(|term| {
            if term.split_whitespace().count() > 1 {
                *term == model
            } else {
                model_words.contains(&term.as_str()) || *term == chassis
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Combined vehicle filter
// ---------------------------------------------------------------------------

/// Everything the user can filter by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    pub brands: Selection,
    pub drivetrains: Selection,
    /// Single engine type, or `None` for all.
    pub engine_type: Option<String>,
    pub search: SearchQuery,
}

impl VehicleFilter {
    pub fn matches(&self, rec: &VehicleRecord) -> bool {
        self.brands.matches(&rec.brand)
            && self.drivetrains.matches(&rec.drivetrain)
            && self
                .engine_type
                .as_deref()
                .is_none_or(|e| e == rec.engine_type)
            && self.search.matches(&rec.model, &rec.chassis_code)
    }
}

/// Return indices of plottable records that pass every active filter,
/// in table order.
pub fn filtered_indices(table: &VehicleTable, filter: &VehicleFilter) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| rec.is_plottable() && filter.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Selection of exactly these values; none means "all".
    fn only(values: &[&str]) -> Selection {
        let set: BTreeSet<String> = values.iter().map(|v| v.to_string()).collect();
        if set.is_empty() {
            Selection::All
        } else {
            Selection::Only(set)
        }
    }

    fn rec(brand: &str, drivetrain: &str, engine: &str, model: &str, chassis: &str) -> VehicleRecord {
        VehicleRecord {
            brand: brand.into(),
            drivetrain: drivetrain.into(),
            engine_type: engine.into(),
            model: model.into(),
            chassis_code: chassis.into(),
            lap_time: Some(100.0),
            ..Default::default()
        }
    }

    fn table() -> VehicleTable {
        let mut no_time = rec("Audi", "AWD", "FI", "RS3", "8Y");
        no_time.lap_time = None;
        VehicleTable::from_records(
            vec![
                rec("Porsche", "RWD", "NA", "911 GT3 RS", "992.1"),
                rec("Honda", "FWD", "FI", "Civic Type R", "FL5"),
                rec("Nissan", "AWD", "FI", "GT-R Nismo", "R35"),
                no_time,
                rec("Porsche", "AWD", "FI", "911 Turbo S", "992.1"),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn toggling_falls_back_to_all() {
        let mut sel = Selection::All;
        sel.toggle("Porsche");
        assert_eq!(sel, only(&["Porsche"]));
        sel.toggle("Honda");
        assert!(sel.matches("Honda") && sel.matches("Porsche") && !sel.matches("BMW"));
        sel.toggle("Porsche");
        sel.toggle("Honda");
        assert!(sel.is_all());
        assert!(sel.matches("BMW"));
    }

    #[test]
    fn default_filter_keeps_all_plottable_rows() {
        let t = table();
        assert_eq!(filtered_indices(&t, &VehicleFilter::default()), vec![0, 1, 2, 4]);
    }

    #[test]
    fn categorical_filters_combine() {
        let t = table();
        let filter = VehicleFilter {
            brands: only(&["Porsche", "Nissan"]),
            drivetrains: only(&["AWD"]),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&t, &filter), vec![2, 4]);

        let filter = VehicleFilter {
            engine_type: Some("NA".into()),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&t, &filter), vec![0]);
    }

    #[test]
    fn search_single_words_match_model_words_or_chassis() {
        let q = SearchQuery::parse(" fl5 , gt3");
        assert!(q.matches("Civic Type R", "FL5"));
        assert!(q.matches("911 GT3 RS", "992.1"));
        assert!(!q.matches("911 Turbo S", "992.1"));
        // Partial words do not match.
        assert!(!SearchQuery::parse("gt").matches("911 GT3 RS", "992.1"));
    }

    #[test]
    fn search_multi_word_terms_need_exact_model() {
        let q = SearchQuery::parse("Civic Type R");
        assert!(q.matches("civic type r", "FL5"));
        assert!(!q.matches("Civic Type R Limited", "FK8"));
    }

    #[test]
    fn blank_search_terms_are_ignored() {
        let q = SearchQuery::parse(" , ,");
        assert!(q.is_empty());
        assert!(q.matches("anything", ""));
        assert!(!SearchQuery::parse("rs3,,").matches("M2", ""));
    }

    #[test]
    fn search_by_chassis_through_filter() {
        let t = table();
        let filter = VehicleFilter {
            search: SearchQuery::parse("992.1"),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&t, &filter), vec![0, 4]);
    }
}
