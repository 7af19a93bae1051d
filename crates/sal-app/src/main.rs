//! Main application entry point

// No console window in Windows release builds
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sal_data::DashboardConfig;

mod app;
mod loader;

use app::SalaryAtlasApp;
use loader::Loader;

/// Interactive dashboard of data-science salaries
#[derive(Debug, Parser)]
#[command(name = "salary-atlas", version, about)]
struct Args {
    /// Salary CSV to open at startup
    #[arg(long)]
    data: Option<PathBuf>,

    /// World GeoJSON for the globe
    #[arg(long)]
    world: Option<PathBuf>,

    /// Dashboard settings file
    #[arg(long, default_value = "salary-atlas.json")]
    config: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = DashboardConfig::load_or_default(&args.config)?.with_overrides(args.data, args.world);
    let loader = Loader::new(config.null_config.clone())?;

    info!("Starting Salary Atlas");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0]),
        persist_window: false,
        ..Default::default()
    };

    eframe::run_native(
        "Salary Atlas",
        options,
        Box::new(move |cc| Box::new(SalaryAtlasApp::new(cc, config, loader))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
