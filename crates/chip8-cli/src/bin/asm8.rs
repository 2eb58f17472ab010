//! Assemble a source file to a ROM.

use std::fs;
use std::path::PathBuf;

use argh::FromArgs;
use chip8_core::assembler::assemble;
use chip8_core::cartridge::Cartridge;
use chip8_core::error::CResult;
use chip8_core::logger::init_logger;

/// assemble CHIP-8 source into a ROM
#[derive(FromArgs)]
struct Args {
    /// source assembly file
    #[argh(positional)]
    input: PathBuf,

    /// output ROM path
    #[argh(option, short = 'o', default = "PathBuf::from(\"a.out\")")]
    output: PathBuf,

    /// verbose logging
    #[argh(switch, short = 'v')]
    verbose: bool,
}

fn run() -> CResult {
    let args: Args = argh::from_env();
    init_logger(if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    })?;

    let source = fs::read_to_string(&args.input)?;
    let rom = assemble(&source)?;
    let cartridge = Cartridge::load_from_bytes(&args.input.to_string_lossy(), &rom);
    cartridge.save_to_path(&args.output)?;

    log::info!(
        "assembled {} bytes to {}",
        rom.len(),
        args.output.display()
    );
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("asm8: {}", err);
        std::process::exit(1);
    }
}
