//! `optosim`: opens a window on the poster room and renders it through the
//! simulated glasses.

mod app;
mod cli;

use anyhow::Result;
use clap::Parser;

use optosim_engine::device::GpuInit;
use optosim_engine::logging::{init_logging, LoggingConfig};
use optosim_engine::scene::PosterImage;
use optosim_engine::window::Runtime;

use crate::app::StudioApp;
use crate::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let poster = match &args.poster {
        Some(path) => PosterImage::open(path)?,
        None => PosterImage::blank_card(),
    };
    log::info!("poster {}x{}", poster.width(), poster.height());

    let config = args.optical_config();
    for eye in [config.active, config.active.other()] {
        log::info!("{}", config.lens(eye).readout(eye).join(", "));
    }

    let app = StudioApp::new(config, args.scene_state(), poster).with_model(args.optical_model());
    Runtime::run(args.runtime_config(), GpuInit::default(), app)
}
