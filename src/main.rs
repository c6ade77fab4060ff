//! signcoach CLI — streams frames to an inference server and runs the
//! sign-language training curriculum headless.
//!
//! Usage:
//!   signcoach --frame sample.jpg                         # defaults, local server
//!   signcoach --frame sample.jpg --server 10.0.0.7:5000  # server override
//!   signcoach --frame sample.jpg --config session.json   # full config file

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use signcoach::{FileFrameSource, LogPresenter, SessionController, TrainerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "signcoach",
    about = "Sign language training client driven by a remote inference server"
)]
struct Args {
    /// Encoded image replayed as the frame source (stands in for a live camera)
    #[arg(long)]
    frame: PathBuf,

    /// Path to a JSON config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Inference server address override, e.g. 127.0.0.1:5000
    #[arg(long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => TrainerConfig::load(path)?,
        None => TrainerConfig::default(),
    };
    if let Some(server) = args.server {
        config.server_addr = server;
    }

    let mut frame_source = FileFrameSource::open(&args.frame)?;
    let mut presenter = LogPresenter::new();

    let controller = SessionController::new(config)?;
    let report = controller.run(&mut frame_source, &mut presenter).await?;

    info!(
        "session {} done: {}/{} lessons completed",
        report.session_id, report.lessons_completed, report.lessons_total
    );
    Ok(())
}
