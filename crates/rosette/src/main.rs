use clap::Parser;
use relm4::prelude::*;
use rosette::config;
use rosette::gui::app::{AppInit, AppModel};
use rosette::sys::runtime;
use std::path::PathBuf;

/// Demo page with radial context menus.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Configuration file to use instead of the XDG location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the built-in configuration and its icons to the config directory and exit
    #[arg(long)]
    write_default: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if cli.write_default {
        config::write_default_config(&config_path)?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let config = config::load_or_default(&config_path);
    log::info!(
        "Loaded {} menus from {}",
        config.menus.len(),
        config_path.display()
    );

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx, config_path.clone());

    // argv belongs to clap, not GTK
    let app = RelmApp::new("org.rosette.demo").with_args(Vec::new());
    app.run::<AppModel>(AppInit {
        config,
        config_path,
        rx,
    });
    Ok(())
}
