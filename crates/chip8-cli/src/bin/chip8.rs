//! Run a CHIP-8 ROM in a window, with host keyboard, display and audio
//! wired in through `chip8-drivers`.

use std::path::PathBuf;

use argh::FromArgs;
use chip8_core::cartridge::Cartridge;
use chip8_core::capabilities::SystemClock;
use chip8_core::error::CResult;
use chip8_core::logger::init_logger;
use chip8_core::vm::cpu::{exec, Vm};
use chip8_drivers::{UsfxAudioDriver, WinitDriver};

/// run a CHIP-8 ROM
#[derive(FromArgs)]
struct Args {
    /// ROM file to execute
    #[argh(positional)]
    rom: PathBuf,

    /// PRNG seed for RND, for reproducible runs
    #[argh(option)]
    seed: Option<u64>,

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

    let cartridge = Cartridge::load_from_path(&args.rom)?;
    log::info!("loaded {} ({} bytes)", cartridge.title(), cartridge.data().len());

    let mut vm = match args.seed {
        Some(seed) => Vm::with_seed(cartridge.data(), seed),
        None => Vm::new(cartridge.data()),
    };

    let (keyboard, mut renderer, mut killer) = WinitDriver::new()?;
    let mut audio = UsfxAudioDriver::default();
    let clock = SystemClock;

    exec(&mut vm, &keyboard, &mut renderer, &mut killer, &mut audio, &clock)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("chip8: {}", err);
        std::process::exit(1);
    }
}
