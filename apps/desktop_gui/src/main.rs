mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::CatalogClient;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::{load_settings, Cli};
use crate::controller::events::UiEvent;
use crate::ui::CatalogApp;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli, |key| std::env::var(key).ok())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let endpoint = settings.endpoint()?;
    let client = CatalogClient::new(endpoint, settings.request_timeout())?;
    tracing::info!(%endpoint, timeout_secs = settings.request_timeout_secs, "starting catalog browser");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(client, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Catalog Browser")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Catalog Browser",
        options,
        Box::new(|_cc| Ok(Box::new(CatalogApp::new(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow::anyhow!("GUI terminated with an error: {err}"))
}
