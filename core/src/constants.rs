/// Bytes of addressable memory (0x000..=0xFFF)
pub const MEMORY_SIZE: usize = 4096;

/// Every address the CPU produces is confined to 12 bits
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// ROMs are loaded, and execution starts, at 0x200
pub const PROGRAM_START: u16 = 0x200;

/// Everything from PROGRAM_START to the end of memory is available to a ROM
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const STACK_SIZE: usize = 16;
pub const NUM_REGISTERS: usize = 16;
pub const NUM_KEYS: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// The sprite sheet lives at the very bottom of memory
pub const FONT_START: u16 = 0x000;
pub const FONT_GLYPH_SIZE: u16 = 5;

/// The timers and the display are refreshed at 60Hz
pub const TIMER_HZ: u32 = 60;
pub const DEFAULT_CLOCK_HZ: u32 = 500;
pub const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 20;

/// # Sprite Sheet
/// Hexadecimal glyphs 0..F, each 4 pixels wide and 5 rows tall.
///
/// Only the high nibble of each byte is drawn, e.g. the glyph for `0`:
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
