mod app;
mod clicker;
mod config;
mod cps;
mod error;
mod hotkeys;
mod keys;
mod listener;


use clap::Parser;
use eframe::egui;
use tracing::error;

use crate::app::{AutoClickerApp, WINDOW_SIZE};
use crate::config::{Args, Config};
use crate::error::Result;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auto_clicker=info".into()),
        )
        .try_init();
}

fn run() -> Result<()> {
    let config = Config::try_from(Args::parse())?;

    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(WINDOW_SIZE)
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Auto Clicker",
        opts,
        Box::new(move |cc| Box::new(AutoClickerApp::new(cc, config))),
    )?;
    Ok(())
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("auto_clicker: {err}");
        std::process::exit(1);
    }
}
