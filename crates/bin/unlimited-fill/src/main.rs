//! Command line front end for `unlimited-storage`.
//!
//! Reads `index [weight]` records from a file or stdin, fills a counter
//! storage and prints every cell.

use clap::Parser;
use unlimited_fill::{Args, run};
use unlimited_storage::log;

#[cfg(not(target_arch = "wasm32"))]
use mimalloc::MiMalloc;
#[cfg(not(target_arch = "wasm32"))]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if cfg!(debug_assertions) | cfg!(test) {
        colog::default_builder()
            .filter_level(log::LevelFilter::Trace)
            .init();
    } else {
        colog::default_builder().init();
    }

    let args = Args::parse();
    run(args)?;
    Ok(())
}
