mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::EliteVisualizerApp;
use clap::Parser;
use config::{Cli, ColumnConfig};
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let columns = match &cli.columns {
        Some(path) => ColumnConfig::from_json_file(path)
            .with_context(|| format!("loading column mapping {}", path.display()))?,
        None => ColumnConfig::default(),
    };

    // One-shot load: the window only opens once the table is in memory.
    let table = data::loader::load_file(&cli.data, &columns)
        .with_context(|| format!("loading vehicle data {}", cli.data.display()))
        .inspect_err(|e| log::error!("{e:#}"))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Elite 100 Visualizer",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(EliteVisualizerApp::new(table)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}
