use std::io::Write;
use std::time::{Duration, Instant};

use log::warn;
use rand::RngCore;

use emu8_core::constants::{NUM_KEYS, TIMER_HZ};
use emu8_core::Chip8;

use crate::display::Display;

/// How the host drives the interpreter
#[derive(Debug, Clone)]
pub struct Settings {
    /// Instructions per second
    pub clock_hz: u32,
    /// Upper bound on instructions run between two timer ticks
    pub max_ticks_per_frame: u32,
    /// Number of 60Hz frames to run before stopping, or forever
    pub frames: Option<u64>,
    /// Keys held down for the whole run
    pub held_keys: [bool; NUM_KEYS],
    /// Whether or not the default clock speed should be respected
    pub fast: bool,
}

/// What happened over the course of a run
#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub frames: u64,
    pub instructions: u64,
    pub errors: u64,
}

/// Instructions executed per 60Hz frame; always at least one
pub fn ticks_per_frame(clock_hz: u32, max_ticks_per_frame: u32) -> u32 {
    (clock_hz / TIMER_HZ).min(max_ticks_per_frame).max(1)
}

/// Drives `chip8` one 60Hz frame at a time
/// - runs a frame's worth of instructions, logging any recoverable errors
/// - ticks the delay timer
/// - renders the frame if it changed
/// - sleeps out whatever is left of the frame
pub fn run<R: RngCore, W: Write>(
    chip8: &mut Chip8<R>,
    display: &mut Display<W>,
    settings: &Settings,
) -> anyhow::Result<Summary> {
    let ticks = ticks_per_frame(settings.clock_hz, settings.max_ticks_per_frame);
    let frame_time = Duration::from_secs(1) / TIMER_HZ;
    let mut summary = Summary::default();

    while settings.frames.map_or(true, |limit| summary.frames < limit) {
        let frame_start = Instant::now();

        chip8.set_keys(settings.held_keys);
        for _ in 0..ticks {
            summary.instructions += 1;
            match chip8.step() {
                Ok(()) => (),
                Err(err) if err.is_recoverable() => {
                    summary.errors += 1;
                    warn!("{}", err);
                }
                Err(err) => return Err(err.into()),
            }
        }
        chip8.tick_timer();

        // If the draw flag is set, render the current frame and unset it
        if let Some(frame) = chip8.get_frame() {
            display.render(frame)?;
            chip8.clear_draw_flag();
        }
        summary.frames += 1;

        let elapsed = frame_start.elapsed();
        if !settings.fast && frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
    }

    Ok(summary)
}
