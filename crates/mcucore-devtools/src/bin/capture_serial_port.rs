//! Read lines from a serial port and write them to stdout until Ctrl+C.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use mcucore_capture::{
    list_ports, CaptureConfig, LineCapture, LineSource, SerialLineSource, StopSignal,
};
use std::io;

#[derive(Parser, Debug)]
#[command(version, about = "Read lines from a serial port and write them to stdout")]
struct Cli {
    /// Serial device to read from, e.g. /dev/ttyACM0 or COM3
    #[arg(long, value_name = "PORT")]
    port: String,
}

fn main() -> Result<()> {
    mcucore_devtools::init_logging();
    let cli = Cli::parse();
    run(&cli).inspect_err(|e| error!("{e:#}"))
}

fn run(cli: &Cli) -> Result<()> {
    println!("port: {}", cli.port);

    let stop = StopSignal::new();
    let handler_stop = stop.clone();
    ctrlc::set_handler(move || handler_stop.raise())
        .context("failed to install Ctrl+C handler")?;

    let config = CaptureConfig::new(&cli.port);
    let source = match SerialLineSource::open(&config, stop.clone()) {
        Ok(source) => source,
        Err(e) => {
            report_available_ports();
            return Err(e).with_context(|| format!("cannot capture from {}", cli.port));
        }
    };

    let summary = LineCapture::new(source, io::stdout().lock(), stop)
        .run()
        .with_context(|| format!("capture from {} failed", cli.port))?;
    info!("{} lines forwarded", summary.lines);
    Ok(())
}

fn report_available_ports() {
    let ports = list_ports();
    if ports.is_empty() {
        warn!("no serial ports detected on this host");
    }
    for port in ports {
        warn!("available: {port}");
    }
}
