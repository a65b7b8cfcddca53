use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use crossterm::tty::IsTty;
use log::info;

use emu8_core::constants::{DEFAULT_CLOCK_HZ, DEFAULT_MAX_TICKS_PER_FRAME};
use emu8_core::Chip8;

use display::Display;
use run::Settings;

mod display;
mod keymap;
mod run;

/// Runs a Chip-8 ROM, drawing its display as text
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = DEFAULT_CLOCK_HZ)]
    clock_hz: u32,

    /// Upper bound on instructions executed per 60Hz frame
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS_PER_FRAME)]
    max_ticks_per_frame: u32,

    /// Stop after this many 60Hz frames
    #[arg(long)]
    frames: Option<u64>,

    /// Keys held down for the whole run, e.g. "qe" holds 4 and 6
    #[arg(long)]
    hold: Option<String>,

    /// Run as fast as possible instead of at the clock speed
    #[arg(long)]
    fast: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut chip8 = Chip8::new();
    chip8
        .load_file(&cli.rom)
        .with_context(|| format!("unable to load ROM {}", cli.rom.display()))?;
    info!("successfully loaded ROM {}", cli.rom.display());

    let settings = Settings {
        clock_hz: cli.clock_hz,
        max_ticks_per_frame: cli.max_ticks_per_frame,
        frames: cli.frames,
        held_keys: keymap::held_keys(cli.hold.as_deref().unwrap_or("")),
        fast: cli.fast,
    };

    let stdout = io::stdout();
    let terminal = stdout.is_tty();
    let mut display = Display::new(stdout.lock(), terminal);

    let summary = run::run(&mut chip8, &mut display, &settings);
    display.restore()?;
    let summary = summary?;
    info!(
        "stopped after {} frames, {} instructions, {} errors",
        summary.frames, summary.instructions, summary.errors
    );
    Ok(())
}
