use anyhow::{Context, Result, bail};
use eframe::{NativeOptions, egui};
use std::{env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use workbench::{about, app::WorkbenchApp, config::WorkbenchConfig};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("workbench=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn config_path(args: &[String]) -> Result<Option<PathBuf>> {
    let Some(pos) = args.iter().position(|a| a == "--config") else {
        return Ok(None);
    };
    match args.get(pos + 1) {
        Some(path) if !path.starts_with('-') => Ok(Some(PathBuf::from(path))),
        _ => bail!("--config expects a path"),
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }

    init_tracing();
    let config = WorkbenchConfig::load(config_path(&args)?.as_deref())
        .context("loading configuration")?;
    info!(
        version = about::WORKBENCH_DISPLAY_VERSION,
        storage_dir = %config.storage_dir.display(),
        payload = %config.payload_path.display(),
        "starting workbench"
    );

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Workbench",
        options,
        Box::new(move |_cc| Ok(Box::new(WorkbenchApp::new(&config)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
