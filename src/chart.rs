use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;

use crate::color::DrivetrainColors;
use crate::data::laptime::{format_duration, format_lap_time};
use crate::data::model::{VehicleRecord, VehicleTable};

/// Preferred spacing between y-axis ticks, in seconds.
pub const TICK_INTERVAL: f64 = 0.5;
/// Upper bound on y ticks; wider spans get a coarser step.
const MAX_Y_TICKS: f64 = 200.0;
/// Horizontal offset of a point's text label from its marker.
pub const LABEL_OFFSET: f64 = 0.10;
/// Approximate width of one label character in brand-axis units.
const CHAR_WIDTH: f64 = 0.08;

/// Legend order for the standard (engine type, drivetrain) combinations.
const LEGEND_ORDER: [(&str, &str); 6] = [
    ("NA", "RWD"),
    ("FI", "RWD"),
    ("NA", "AWD"),
    ("FI", "AWD"),
    ("NA", "FWD"),
    ("FI", "FWD"),
];

// ---------------------------------------------------------------------------
// Chart building blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Brand position on the x axis.
    pub x: f64,
    /// Lap time in seconds.
    pub y: f64,
    pub label: String,
    pub hover: String,
}

/// One legend entry: every vehicle sharing an engine type and drivetrain.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Color32,
    /// Forced-induction markers are drawn as outlines only.
    pub hollow: bool,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YTick {
    pub value: f64,
    /// Blank for minor ticks.
    pub label: String,
}

/// Details of the fastest vehicle in the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FastestLap {
    /// Index into `VehicleTable::records`.
    pub record: usize,
    pub name: String,
    pub duration: String,
    pub vehicle: String,
    pub engine: String,
    pub event: String,
    pub rank: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub vehicles: usize,
    pub brands: usize,
    pub fastest: Option<FastestLap>,
}

impl Summary {
    pub fn headline(&self) -> String {
        format!("{} vehicles | {} brands", self.vehicles, self.brands)
    }
}

// ---------------------------------------------------------------------------
// ChartModel – everything the plot needs, computed once per filter change
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartModel {
    /// Brands sorted by their fastest lap; position = x coordinate.
    pub brand_order: Vec<String>,
    pub series: Vec<Series>,
    pub y_ticks: Vec<YTick>,
    /// Spacing of `y_ticks`, in seconds.
    pub y_step: f64,
    pub x_range: (f64, f64),
    pub summary: Summary,
}

impl ChartModel {
    /// Build the chart for the given plottable record indices.
    pub fn build(table: &VehicleTable, indices: &[usize], colors: &DrivetrainColors) -> Self {
        let rows: Vec<(usize, &VehicleRecord, f64)> = indices
            .iter()
            .filter_map(|&i| {
                let rec = table.records.get(i)?;
                Some((i, rec, rec.lap_time?))
            })
            .collect();

        let brand_order = brand_order(&rows);
        let position: BTreeMap<&str, usize> = brand_order
            .iter()
            .enumerate()
            .map(|(i, b)| (b.as_str(), i))
            .collect();

        let mut sorted = rows.clone();
        sorted.sort_by(|a, b| {
            position[a.1.brand.as_str()]
                .cmp(&position[b.1.brand.as_str()])
                .then(a.2.total_cmp(&b.2))
        });

        let series = build_series(&sorted, &position, colors);

        let max_label = rows
            .iter()
            .map(|(_, rec, _)| rec.label().chars().count())
            .max()
            .unwrap_or(0);
        let x_range = if brand_order.is_empty() {
            (-0.5, 0.5)
        } else {
            let label_width = max_label as f64 * CHAR_WIDTH;
            (-0.5, (brand_order.len() - 1) as f64 + label_width + 0.5)
        };

        let times: Vec<f64> = rows.iter().map(|r| r.2).collect();
        let (y_ticks, y_step) = y_ticks(&times);
        let summary = summarize(&rows, brand_order.len());

        ChartModel {
            brand_order,
            series,
            y_ticks,
            y_step,
            x_range,
            summary,
        }
    }

    /// Hover text of the point in `series_name` closest to `(x, y)`.
    pub fn hover_text(&self, series_name: &str, x: f64, y: f64) -> Option<&str> {
        self.series
            .iter()
            .filter(|s| s.name == series_name)
            .flat_map(|s| s.points.iter())
            .min_by(|a, b| {
                let da = (a.x - x).powi(2) + (a.y - y).powi(2);
                let db = (b.x - x).powi(2) + (b.y - y).powi(2);
                da.total_cmp(&db)
            })
            .map(|p| p.hover.as_str())
    }

    /// Label for a y tick at `value`, empty when the tick is unlabelled.
    pub fn y_label(&self, value: f64) -> &str {
        self.y_ticks
            .iter()
            .find(|t| (t.value - value).abs() < 1e-6)
            .map(|t| t.label.as_str())
            .unwrap_or("")
    }
}

/// Brands ordered by fastest lap time, ties broken by name.
fn brand_order(rows: &[(usize, &VehicleRecord, f64)]) -> Vec<String> {
    let mut fastest: BTreeMap<&str, f64> = BTreeMap::new();
    for (_, rec, time) in rows {
        fastest
            .entry(rec.brand.as_str())
            .and_modify(|t| *t = t.min(*time))
            .or_insert(*time);
    }
    let mut order: Vec<(&str, f64)> = fastest.into_iter().collect();
    order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(b.0)));
    order.into_iter().map(|(b, _)| b.to_string()).collect()
}

fn build_series(
    sorted: &[(usize, &VehicleRecord, f64)],
    position: &BTreeMap<&str, usize>,
    colors: &DrivetrainColors,
) -> Vec<Series> {
    let present: BTreeSet<(&str, &str)> = sorted
        .iter()
        .map(|(_, rec, _)| (rec.engine_type.as_str(), rec.drivetrain.as_str()))
        .collect();

    let mut keys: Vec<(&str, &str)> = LEGEND_ORDER
        .iter()
        .copied()
        .filter(|k| present.contains(k))
        .collect();
    keys.extend(
        present
            .iter()
            .copied()
            .filter(|k| !LEGEND_ORDER.iter().any(|l| l == k)),
    );

    keys.into_iter()
        .map(|(engine_type, drivetrain)| {
            let points = sorted
                .iter()
                .filter(|(_, rec, _)| rec.engine_type == engine_type && rec.drivetrain == drivetrain)
                .map(|&(_, rec, time)| ChartPoint {
                    x: position[rec.brand.as_str()] as f64,
                    y: time,
                    label: rec.label(),
                    hover: hover_text(rec),
                })
                .collect();
            Series {
                name: format!("{drivetrain} {engine_type}"),
                color: colors.color_for(drivetrain),
                hollow: engine_type == "FI",
                points,
            }
        })
        .collect()
}

fn hover_text(rec: &VehicleRecord) -> String {
    format!(
        "{}\nModel: {}\nBrand: {}\nTime: {}\nEngine: {}L ({})\nDrivetrain: {}\nRank: {}",
        rec.name,
        rec.model,
        rec.brand,
        format_lap_time(rec.lap_time),
        rec.engine_l,
        rec.engine_type,
        rec.drivetrain,
        rec.rank
    )
}

/// Tick spacing for a `min..max` span: [`TICK_INTERVAL`], doubled until
/// the span needs at most `MAX_Y_TICKS` ticks.
pub fn y_tick_step(min: f64, max: f64) -> f64 {
    let span = (max - min).abs();
    let mut step = TICK_INTERVAL;
    while span / step > MAX_Y_TICKS {
        step *= 2.0;
    }
    step
}

/// Ticks every step across the data, plus the fastest time itself. Only the
/// minimum and whole seconds carry a label. Returns the ticks and the step.
pub fn y_ticks(times: &[f64]) -> (Vec<YTick>, f64) {
    let Some(min) = times.iter().copied().min_by(f64::total_cmp) else {
        return (Vec::new(), TICK_INTERVAL);
    };
    let max = times.iter().copied().max_by(f64::total_cmp).unwrap_or(min);
    let step = y_tick_step(min, max);

    let start = (min / step).ceil() * step;
    let mut values = vec![min];
    let mut k = 0.0;
    loop {
        let t = start + k * step;
        if t >= max + step {
            break;
        }
        values.push(t);
        k += 1.0;
    }
    values.sort_by(f64::total_cmp);
    values.dedup();

    let ticks = values
        .into_iter()
        .map(|value| {
            let label = if value == min || value % 1.0 < 0.01 {
                format_duration(value)
            } else {
                String::new()
            };
            YTick { value, label }
        })
        .collect();
    (ticks, step)
}

fn summarize(rows: &[(usize, &VehicleRecord, f64)], brands: usize) -> Summary {
    let fastest = rows
        .iter()
        .fold(None::<&(usize, &VehicleRecord, f64)>, |best, row| match best {
            Some(b) if b.2 <= row.2 => Some(b),
            _ => Some(row),
        })
        .map(|&(i, rec, time)| FastestLap {
            record: i,
            name: rec.name.clone(),
            duration: format_duration(time),
            vehicle: format!("{} {} {} {}", rec.year, rec.brand, rec.model, rec.chassis_code),
            engine: format!("{}L {} - {}", rec.engine_l, rec.engine_type, rec.drivetrain),
            event: format!("{} • {}", rec.race_event, rec.date),
            rank: format!("Elite 100 Rank: {}", rec.rank),
        });

    Summary {
        vehicles: rows.len(),
        brands,
        fastest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, brand: &str, engine: &str, drivetrain: &str, time: f64) -> VehicleRecord {
        VehicleRecord {
            rank: "7".into(),
            name: name.into(),
            year: "2023".into(),
            brand: brand.into(),
            model: format!("{name} model"),
            chassis_code: "X1".into(),
            engine_l: "2.0".into(),
            engine_type: engine.into(),
            drivetrain: drivetrain.into(),
            race_event: "Track Day".into(),
            date: "2023-05-01".into(),
            lap_time: Some(time),
            ..Default::default()
        }
    }

    fn model(records: Vec<VehicleRecord>) -> (VehicleTable, ChartModel) {
        let table = VehicleTable::from_records(records, Vec::new());
        let colors = DrivetrainColors::new(&table.drivetrains);
        let indices: Vec<usize> = (0..table.len()).collect();
        let chart = ChartModel::build(&table, &indices, &colors);
        (table, chart)
    }

    #[test]
    fn brands_sorted_by_fastest_lap() {
        let (_, chart) = model(vec![
            rec("a", "Honda", "FI", "FWD", 105.0),
            rec("b", "Porsche", "NA", "RWD", 99.0),
            rec("c", "Honda", "FI", "FWD", 101.0),
            rec("d", "BMW", "FI", "RWD", 101.0),
        ]);
        assert_eq!(chart.brand_order, vec!["Porsche", "BMW", "Honda"]);
        assert_eq!(chart.summary.brands, 3);
        assert_eq!(chart.summary.vehicles, 4);
    }

    #[test]
    fn series_follow_legend_order_then_extras() {
        let (_, chart) = model(vec![
            rec("a", "Honda", "FI", "FWD", 105.0),
            rec("b", "Porsche", "NA", "RWD", 99.0),
            rec("c", "Nissan", "FI", "AWD", 98.0),
            rec("d", "Tesla", "EV", "AWD", 97.0),
            rec("e", "Porsche", "FI", "RWD", 100.0),
        ]);
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["RWD NA", "RWD FI", "AWD FI", "FWD FI", "AWD EV"]);

        let rwd_fi = &chart.series[1];
        assert!(rwd_fi.hollow);
        assert_eq!(rwd_fi.color, crate::color::RWD_COLOR);
        assert!(!chart.series[0].hollow);
    }

    #[test]
    fn points_carry_brand_position_label_and_hover() {
        let (_, chart) = model(vec![
            rec("slow", "Porsche", "NA", "RWD", 101.0),
            rec("fast", "Porsche", "NA", "RWD", 99.5),
            rec("mid", "Audi", "NA", "RWD", 100.0),
        ]);
        let pts = &chart.series[0].points;
        // Sorted by brand position, then by time.
        let ys: Vec<f64> = pts.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![99.5, 101.0, 100.0]);
        assert_eq!(pts[2].x, 1.0);
        assert_eq!(pts[0].label, "fast model X1");
        assert!(pts[0].hover.contains("Time: 01:39.500"));
        assert!(pts[0].hover.contains("Engine: 2.0L (NA)"));

        assert_eq!(chart.hover_text("RWD NA", 1.02, 100.1), Some(pts[2].hover.as_str()));
        assert_eq!(chart.hover_text("AWD FI", 0.0, 100.0), None);
    }

    #[test]
    fn y_ticks_cover_range_with_sparse_labels() {
        let (ticks, step) = y_ticks(&[99.289, 100.7]);
        assert_eq!(step, TICK_INTERVAL);
        let values: Vec<f64> = ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![99.289, 99.5, 100.0, 100.5, 101.0]);
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["01:39.289", "", "01:40.000", "", "01:41.000"]);
        assert!(y_ticks(&[]).0.is_empty());
    }

    #[test]
    fn y_ticks_deduplicate_aligned_minimum() {
        let (ticks, _) = y_ticks(&[100.0]);
        let values: Vec<f64> = ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![100.0]);
        assert_eq!(ticks[0].label, "01:40.000");
    }

    #[test]
    fn wide_span_coarsens_tick_step() {
        let (ticks, step) = y_ticks(&[99.289, 10_000_000.0]);
        assert!(ticks.len() <= MAX_Y_TICKS as usize + 2);
        assert_eq!(step, 65_536.0);
        assert_eq!(ticks[0].value, 99.289);
        assert!(ticks.last().unwrap().value >= 10_000_000.0);
        assert!(ticks.iter().skip(1).all(|t| t.value % step == 0.0));
    }

    #[test]
    fn hover_leaves_out_extra_columns() {
        let mut with_extra = rec("a", "Porsche", "NA", "RWD", 99.0);
        with_extra.extra.insert("Notes".into(), "wet track".into());
        let (_, chart) = model(vec![with_extra]);
        let hover = &chart.series[0].points[0].hover;
        assert!(!hover.contains("Notes"));
        assert!(!hover.contains("wet track"));
        assert!(hover.ends_with("Rank: 7"));
    }

    #[test]
    fn x_range_leaves_room_for_labels() {
        let (_, chart) = model(vec![
            rec("abc", "Porsche", "NA", "RWD", 99.0),
            rec("b", "Audi", "NA", "RWD", 100.0),
        ]);
        // Longest label "abc model X1" is 12 chars.
        let (lo, hi) = chart.x_range;
        assert_eq!(lo, -0.5);
        assert!((hi - (1.0 + 12.0 * 0.08 + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn summary_reports_first_fastest() {
        let (_, chart) = model(vec![
            rec("first", "Porsche", "NA", "RWD", 99.0),
            rec("second", "Audi", "FI", "AWD", 99.0),
            rec("third", "Honda", "FI", "FWD", 103.0),
        ]);
        let fastest = chart.summary.fastest.as_ref().unwrap();
        assert_eq!(fastest.record, 0);
        assert_eq!(fastest.name, "first");
        assert_eq!(fastest.duration, "01:39.000");
        assert_eq!(fastest.vehicle, "2023 Porsche first model X1");
        assert_eq!(fastest.engine, "2.0L NA - RWD");
        assert_eq!(fastest.event, "Track Day • 2023-05-01");
        assert_eq!(fastest.rank, "Elite 100 Rank: 7");
        assert_eq!(chart.summary.headline(), "3 vehicles | 3 brands");
    }

    #[test]
    fn empty_selection() {
        let table = VehicleTable::default();
        let colors = DrivetrainColors::new(&table.drivetrains);
        let chart = ChartModel::build(&table, &[], &colors);
        assert!(chart.series.is_empty());
        assert!(chart.summary.fastest.is_none());
        assert_eq!(chart.summary.headline(), "0 vehicles | 0 brands");
        assert_eq!(chart.x_range, (-0.5, 0.5));
    }
}
