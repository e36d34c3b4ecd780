use crate::chart::ChartModel;
use crate::color::DrivetrainColors;
use crate::data::filter::{filtered_indices, SearchQuery, VehicleFilter};
use crate::data::model::VehicleTable;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at start-up and never mutated.
    pub table: VehicleTable,

    /// Current brand / drivetrain / engine / search selection.
    pub filter: VehicleFilter,

    /// Raw text of the model/chassis search box.
    pub search_text: String,

    /// Indices of records passing the current filter (cached).
    pub visible_indices: Vec<usize>,

    /// Chart for `visible_indices` (cached).
    pub chart: ChartModel,

    pub colors: DrivetrainColors,

    /// Whether the vehicle table is shown under the plot.
    pub show_table: bool,

    /// Status message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: VehicleTable) -> Self {
        if table.is_empty() {
            log::warn!("Vehicle table has no rows");
        }
        let colors = DrivetrainColors::new(&table.drivetrains);
        let missing = table.missing_lap_times();
        let status_message =
            (missing > 0).then(|| format!("{missing} vehicles without a usable lap time"));

        let mut state = Self {
            table,
            filter: VehicleFilter::default(),
            search_text: String::new(),
            visible_indices: Vec::new(),
            chart: ChartModel::default(),
            colors,
            show_table: false,
            status_message,
        };
        state.refilter();
        state
    }

    /// Recompute `visible_indices` and the chart after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = filtered_indices(&self.table, &self.filter);
        self.chart = ChartModel::build(&self.table, &self.visible_indices, &self.colors);
        log::debug!(
            "Filter matched {} of {} vehicles",
            self.visible_indices.len(),
            self.table.len()
        );
    }

    pub fn toggle_brand(&mut self, brand: &str) {
        self.filter.brands.toggle(brand);
        self.refilter();
    }

    pub fn all_brands(&mut self) {
        self.filter.brands.select_all();
        self.refilter();
    }

    pub fn toggle_drivetrain(&mut self, drivetrain: &str) {
        self.filter.drivetrains.toggle(drivetrain);
        self.refilter();
    }

    pub fn all_drivetrains(&mut self) {
        self.filter.drivetrains.select_all();
        self.refilter();
    }

    pub fn set_engine_type(&mut self, engine_type: Option<String>) {
        if self.filter.engine_type != engine_type {
            self.filter.engine_type = engine_type;
            self.refilter();
        }
    }

    /// Re-parse the search box text.
    pub fn apply_search(&mut self) {
        let query = SearchQuery::parse(&self.search_text);
        if query != self.filter.search {
            self.filter.search = query;
            self.refilter();
        }
    }
}
