use log::debug;

use crate::constants::{
    ADDRESS_MASK, DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START, MEMORY_SIZE, NUM_KEYS,
    NUM_REGISTERS, PROGRAM_START, SPRITE_SHEET, STACK_SIZE,
};
use crate::error::Chip8Error;
use crate::opcode::Opcode;

/// The FrameBuffer is indexed as [y][x]
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - VF doubles as the carry, borrow, shifted-out bit and collision flag
///     - any instruction that sets a flag clobbers whatever VF held before
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter, always kept within the 12-bit address space
///
/// Pointer
/// - (sp) the number of return addresses on the stack, 0..=16
///
/// Timers
/// - an 8-bit delay timer, decremented towards 0 by the host at 60Hz
///
/// ## Memory
/// - 16 entry stack of return addresses
/// - 4096 bytes of addressable memory
///     - 0x000..0x050 holds the sprite sheet
///     - 0x200.. holds the ROM
/// - 64x32 frame buffer of pixels, toggled by drawing
///
/// ## Input
/// - the pressed status of keys 0..F, written by the host between steps
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub pressed_keys: [bool; NUM_KEYS],
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        memory[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);

        State {
            v: [0; NUM_REGISTERS],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            pressed_keys: [false; NUM_KEYS],
        }
    }

    /// Returns every field to its power-on value and re-seeds the sprite sheet
    pub fn reset(&mut self) {
        *self = State::new();
        debug!("state reset, pc={:04X}", self.pc);
    }

    /// Reads the opcode at the program counter.
    ///
    /// A program counter outside of memory is refused without touching any state;
    /// an opcode straddling the end of memory takes its second byte from address 0.
    pub fn fetch(&self) -> Result<Opcode, Chip8Error> {
        let pc = self.pc as usize;
        if pc >= MEMORY_SIZE {
            return Err(Chip8Error::ProgramCounterOutOfBounds { pc: self.pc });
        }
        Ok(Opcode::from_bytes(
            self.memory[pc],
            self.memory[(pc + 1) % MEMORY_SIZE],
        ))
    }

    /// Moves the program counter forwards by `by` bytes, wrapping at the end of memory
    pub fn advance_pc(&mut self, by: u16) {
        self.pc = self.pc.wrapping_add(by) & ADDRESS_MASK;
    }

    /// Points the program counter at `addr`, truncated to 12 bits
    pub fn jump(&mut self, addr: u16) {
        self.pc = addr & ADDRESS_MASK;
    }

    /// Saves a return address
    /// - refuses to grow beyond STACK_SIZE entries, leaving the stack untouched
    pub fn push(&mut self, addr: u16) -> Result<(), Chip8Error> {
        let sp = self.sp as usize;
        if sp >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow);
        }
        self.stack[sp] = addr;
        self.sp += 1;
        Ok(())
    }

    /// Takes the most recently saved return address
    /// - an empty stack is left untouched
    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    /// Reads memory, wrapping addresses past the end back to 0x000
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.memory[addr as usize % MEMORY_SIZE]
    }

    /// Writes memory, wrapping addresses past the end back to 0x000
    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize % MEMORY_SIZE] = value;
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test_state {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_new_state_seeds_sprite_sheet() {
        let state = State::new();
        assert_eq!(state.memory[0..80], SPRITE_SHEET[..]);
        assert!(state.memory[80..].iter().all(|&byte| byte == 0));
        assert_eq!(state.pc, 0x200);
    }

    #[test]
    fn test_reset_restores_every_field() {
        let mut state = State::new();
        state.v[0x3] = 0x42;
        state.i = 0x300;
        state.pc = 0x456;
        state.sp = 0x2;
        state.stack[0x1] = 0x222;
        state.delay_timer = 0x10;
        state.memory[0x0] = 0x00;
        state.memory[0x300] = 0xAB;
        state.frame_buffer[5][5] = true;
        state.draw_flag = true;
        state.pressed_keys[0xA] = true;
        state.reset();
        assert_eq!(state, State::new());
    }

    #[test]
    fn test_fetch_reads_big_endian() {
        let mut state = State::new();
        state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(state.fetch().unwrap(), Opcode(0xAABB));
    }

    #[test]
    fn test_fetch_refuses_pc_outside_memory() {
        let mut state = State::new();
        state.pc = 0x1000;
        assert!(matches!(
            state.fetch(),
            Err(Chip8Error::ProgramCounterOutOfBounds { pc: 0x1000 })
        ));
    }

    #[test]
    fn test_fetch_wraps_second_byte() {
        let mut state = State::new();
        state.pc = 0xFFF;
        state.memory[0xFFF] = 0x12;
        assert_eq!(state.fetch().unwrap(), Opcode(0x12F0));
    }

    #[test]
    fn test_advance_pc_wraps() {
        let mut state = State::new();
        state.pc = 0xFFE;
        state.advance_pc(0x4);
        assert_eq!(state.pc, 0x002);
    }

    #[test]
    fn test_push_then_pop() {
        let mut state = State::new();
        state.push(0xABC).unwrap();
        assert_eq!(state.sp, 0x1);
        assert_eq!(state.pop().unwrap(), 0xABC);
        assert_eq!(state.sp, 0x0);
    }

    #[test]
    fn test_push_refuses_full_stack() {
        let mut state = State::new();
        for addr in 0..STACK_SIZE as u16 {
            state.push(addr).unwrap();
        }
        let stack = state.stack;
        assert!(matches!(
            state.push(0x999),
            Err(Chip8Error::StackOverflow)
        ));
        assert_eq!(state.sp, 16);
        assert_eq!(state.stack, stack);
    }

    #[test]
    fn test_pop_refuses_empty_stack() {
        let mut state = State::new();
        assert!(matches!(state.pop(), Err(Chip8Error::StackUnderflow)));
        assert_eq!(state.sp, 0);
    }

    #[test]
    fn test_stack_round_trips_random_sequences() {
        let mut rng = StdRng::seed_from_u64(0x8);
        for _ in 0..100 {
            let mut state = State::new();
            let depth = rng.gen_range(0..STACK_SIZE);
            for _ in 0..depth {
                state.push(rng.gen_range(0..0x1000)).unwrap();
            }
            let sp = state.sp;
            let addr: u16 = rng.gen_range(0..0x1000);
            state.push(addr).unwrap();
            assert_eq!(state.pop().unwrap(), addr);
            assert_eq!(state.sp, sp);
        }
    }

    #[test]
    fn test_memory_access_wraps() {
        let mut state = State::new();
        state.write_byte(0x1001, 0x7);
        assert_eq!(state.memory[0x001], 0x7);
        assert_eq!(state.read_byte(0x1001), 0x7);
    }
}
