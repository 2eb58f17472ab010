//! Disassemble a ROM file (or stdin) to stdout.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use argh::FromArgs;
use chip8_core::disassembler::{disassemble, format_line};
use chip8_core::error::CResult;
use chip8_core::logger::init_logger;

/// disassemble a CHIP-8 ROM into mnemonics
#[derive(FromArgs)]
struct Args {
    /// ROM file; reads stdin if omitted
    #[argh(positional)]
    input: Option<PathBuf>,

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

    let data = match &args.input {
        Some(path) => fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    for line in disassemble(&data) {
        println!("{}", format_line(&line));
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("dis8: {}", err);
        std::process::exit(1);
    }
}
