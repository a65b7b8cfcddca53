use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::constants::{MAX_ROM_SIZE, NUM_KEYS, PROGRAM_START};
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `rng`, the source of random bytes for `Cxkk`
///
/// Supplies interfaces for:
/// - resetting the machine and loading roms
/// - pressing and releasing keys
/// - advancing the CPU by a single instruction
/// - advancing its delay timer
/// - inspecting its frame buffer for rendering by some display
///
/// The host is expected to call `step` at its chosen clock speed and `tick_timer` at 60Hz.
pub struct Chip8<R = StdRng> {
    state: State,
    rng: R,
}

impl Chip8<StdRng> {
    pub fn new() -> Self {
        Chip8::with_rng(StdRng::from_entropy())
    }
}

impl Default for Chip8<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Chip8<R> {
    /// Builds a machine that draws its random bytes from `rng`
    pub fn with_rng(rng: R) -> Self {
        Chip8 {
            state: State::new(),
            rng,
        }
    }

    /// Returns the machine to its power-on state, discarding any loaded rom
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Resets the machine and copies `rom` into memory at 0x200
    ///
    /// A rom that doesn't fit is refused before anything is touched.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        self.reset();
        let start = PROGRAM_START as usize;
        self.state.memory[start..start + rom.len()].copy_from_slice(rom);
        debug!("loaded {} byte rom at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Load a rom from a source
    ///
    /// # Arguments
    /// * `reader` a reader that contains a ROM; at most one byte past the limit is read
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<(), Chip8Error> {
        let mut rom = Vec::with_capacity(MAX_ROM_SIZE);
        reader.take(MAX_ROM_SIZE as u64 + 1).read_to_end(&mut rom)?;
        self.load(&rom)
    }

    /// Load a rom from a file on disk
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Chip8Error> {
        let mut file = File::open(path)?;
        self.load_rom(&mut file)
    }

    /// Advances the CPU by a single instruction
    /// - fetches the opcode at the pc, refusing a pc outside of memory
    /// - decodes it, skipping over anything that isn't an instruction
    /// - executes it
    ///
    /// Every error is recoverable; the machine can be stepped again afterwards.
    pub fn step(&mut self) -> Result<(), Chip8Error> {
        let op = self.state.fetch()?;
        let instruction = match Instruction::decode(op) {
            Ok(instruction) => instruction,
            Err(err) => {
                self.state.advance_pc(0x2);
                return Err(err);
            }
        };
        trace!(
            "{} {} v{:02X?} i{:04X} pc{:04X}",
            op,
            instruction,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        instruction.execute(&mut self.state, &mut self.rng)
    }

    /// Decrements the delay timer, stopping at 0
    pub fn tick_timer(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn get_frame(&self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn needs_redraw(&self) -> bool {
        self.state.draw_flag
    }

    /// Called by the display once it has flushed the current frame
    pub fn clear_draw_flag(&mut self) {
        self.state.draw_flag = false;
    }

    /// Overwrites the pressed status of every key
    pub fn set_keys(&mut self, keys: [bool; NUM_KEYS]) {
        self.state.pressed_keys = keys;
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed; anything past 0xF is ignored
    pub fn key_press(&mut self, key: u8) {
        if let Some(pressed) = self.state.pressed_keys.get_mut(key as usize) {
            *pressed = true;
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        if let Some(pressed) = self.state.pressed_keys.get_mut(key as usize) {
            *pressed = false;
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }
}
