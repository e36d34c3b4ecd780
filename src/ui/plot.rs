use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{
    Corner, GridMark, Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text, VLine,
};

use crate::chart::{ChartModel, LABEL_OFFSET};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Lap-time plot (central panel)
// ---------------------------------------------------------------------------

/// Render brands on x (fastest first) against lap time on y.
pub fn lap_time_plot(ui: &mut Ui, state: &AppState) {
    let chart = &state.chart;
    if chart.series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No vehicles match the current filters");
        });
        return;
    }

    // Axis closures must be 'static, so they get their own copies.
    let brands = chart.brand_order.clone();
    let brand_count = brands.len();
    let tick_chart = chart.clone();
    let label_chart = chart.clone();
    let y_marks: Vec<GridMark> = chart
        .y_ticks
        .iter()
        .map(|t| GridMark {
            value: t.value,
            step_size: chart.y_step,
        })
        .collect();

    let (x_min, x_max) = chart.x_range;

    Plot::new("lap_time_plot")
        .legend(Legend::default().position(Corner::RightTop))
        .x_axis_label("Brand (sorted by fastest time →)")
        .y_axis_label("Lap Time - lowest is fastest")
        .include_x(x_min)
        .include_x(x_max)
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(true)
        .allow_boxed_zoom(true)
        .x_grid_spacer(move |_input| {
            (0..brand_count)
                .map(|i| GridMark {
                    value: i as f64,
                    step_size: 1.0,
                })
                .collect()
        })
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            brands.get(idx as usize).cloned().unwrap_or_default()
        })
        .y_grid_spacer(move |_input| y_marks.clone())
        .y_axis_formatter(move |mark, _range| tick_chart.y_label(mark.value).to_string())
        .label_formatter(move |name, value| {
            if name.is_empty() {
                return String::new();
            }
            hover_label(&label_chart, name, value)
        })
        .show(ui, |plot_ui| {
            for x in 0..brand_count {
                plot_ui.vline(
                    VLine::new(x as f64)
                        .color(Color32::from_black_alpha(128))
                        .width(1.0),
                );
            }

            for series in &chart.series {
                let points: PlotPoints = series.points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(points)
                        .name(&series.name)
                        .shape(MarkerShape::Circle)
                        .filled(!series.hollow)
                        .color(series.color)
                        .radius(3.0),
                );

                for p in &series.points {
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(p.x + LABEL_OFFSET, p.y),
                            RichText::new(&p.label).size(9.0).color(Color32::WHITE),
                        )
                        .anchor(Align2::LEFT_CENTER),
                    );
                }
            }
        });
}

fn hover_label(chart: &ChartModel, name: &str, value: &PlotPoint) -> String {
    chart
        .hover_text(name, value.x, value.y)
        .map(str::to_string)
        .unwrap_or_default()
}
