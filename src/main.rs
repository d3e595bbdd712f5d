//! gpuwatch: a terminal dashboard for NVIDIA GPU telemetry
//! Polls power draw, memory usage and utilization through NVML and
//! refreshes on a fixed interval until `q` is pressed.

mod core;
mod display;
mod error;
mod selection;
mod watch;

use std::process;
use std::time::Duration;

use clap::Parser;
use nvml_wrapper::Nvml;

use crate::core::DevicePoller;
use crate::display::{DisplayOptions, Layout};
use crate::error::Result;

const DEFAULT_INTERVAL_SECS: f64 = 1.0;
const MIN_INTERVAL_SECS: f64 = 0.1;

#[derive(Parser)]
#[command(name = "gpuwatch")]
#[command(version)]
#[command(about = "A terminal dashboard for NVIDIA GPU telemetry", long_about = None)]
struct Args {
    /// Comma-separated GPU indices to monitor (e.g. "0,2,3"). Default: all GPUs.
    #[arg(short = 'i', long = "id", value_name = "IDS")]
    id: Option<String>,

    /// Seconds to wait between updates (default: 1.0)
    #[arg(short = 'n', long = "interval", value_name = "SECONDS")]
    interval: Option<f64>,

    /// Display GPU status on a single horizontal line
    #[arg(short = 'l', long = "line")]
    line: bool,

    /// Width for the GPU name column in vertical layout (0 to hide)
    #[arg(long, value_name = "N")]
    name_width: Option<usize>,

    /// Print one snapshot as JSON and exit
    #[arg(long)]
    json: bool,

    /// Force colored output
    #[arg(long, alias = "color")]
    force_color: bool,

    /// Suppress colored output
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let args = Args::parse();

    if args.force_color && args.no_color {
        eprintln!("Error: --force-color and --no-color cannot be used together");
        process::exit(1);
    }

    if args.json && args.interval.is_some() {
        eprintln!("Error: --json and --interval cannot be used together");
        process::exit(1);
    }

    watch::install_panic_hook();

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let nvml = Nvml::init()?;
    let device_count = nvml.device_count()?;

    let ids = match &args.id {
        Some(list) => selection::parse_gpu_ids(list)?,
        None => (0..device_count).collect(),
    };
    selection::validate_selection(&ids, device_count)?;

    let poller = DevicePoller::new(&nvml, &ids)?;

    if args.json {
        let snapshot = poller.snapshot(&nvml)?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let opts = DisplayOptions {
        layout: if args.line {
            Layout::Horizontal
        } else {
            Layout::Vertical
        },
        name_width: args.name_width.unwrap_or_else(|| poller.max_name_len()),
        force_color: args.force_color,
        no_color: args.no_color,
    };
    let interval = Duration::from_secs_f64(
        args.interval
            .unwrap_or(DEFAULT_INTERVAL_SECS)
            .max(MIN_INTERVAL_SECS),
    );

    watch::run(&poller, &opts, interval)
}
