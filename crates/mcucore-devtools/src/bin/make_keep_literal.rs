//! Print the `KeepLiteral` overloads for `progmem_string_data.h`.

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use mcucore_codegen::KeepLiteralEmitter;
use std::io;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Print the KeepLiteral template declarations for progmem_string_data.h"
)]
struct Cli {}

fn main() -> Result<()> {
    mcucore_devtools::init_logging();
    Cli::parse();

    let emitter = KeepLiteralEmitter::new();
    debug!("fragment length {}", emitter.fragment_len());
    emitter
        .write_to(&mut io::stdout().lock())
        .context("failed to write declarations to stdout")
}
