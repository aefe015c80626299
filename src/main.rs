use anyhow::Context;
use clap::Parser;
use coverflow::Size;
use coverlist::config::{self, Overrides};
use coverlist::gui::app::{AppInit, AppModel};
use coverlist::gui::carousel::Stage;
use coverlist::sys::runtime;
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Index of the initially selected element
    #[arg(short, long)]
    selected: Option<usize>,

    /// Disable animation and reflections
    #[arg(long = "static")]
    force_static: bool,

    /// Write the sample configuration to the config path and exit
    #[arg(long)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if args.init {
        let path = config::write_default_config(&config_path)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }

    let overrides = Overrides {
        selected: args.selected,
        force_static: args.force_static,
    };
    let mut config = config::load_or_default(&config_path)?;
    overrides.apply(&mut config);

    let container = Size::new(config.window.width as f64, config.window.height as f64);
    let stage = Stage::new(&config, container)?;

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx, config_path.clone());

    // GTK must not see our own flags.
    let app = RelmApp::new("org.coverlist.CoverList").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        stage,
        config,
        config_path,
        overrides,
        events: rx,
    });
    Ok(())
}
