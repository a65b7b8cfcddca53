use std::io;

use thiserror::Error;

/// Everything that can go wrong while loading or running a ROM.
///
/// Loading errors abort the load before memory is touched.
/// Every other variant is raised by a single step and leaves the machine runnable.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("unable to read ROM: {0}")]
    Io(#[from] io::Error),

    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("stack overflow: all 16 return addresses are already in use")]
    StackOverflow,

    #[error("stack underflow: attempted to return from a subroutine with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode: {opcode:#06X}")]
    InvalidOpcode { opcode: u16 },

    #[error("program counter out of bounds at address {pc:#06X}")]
    ProgramCounterOutOfBounds { pc: u16 },
}

impl Chip8Error {
    /// Whether the machine can keep stepping after this error
    pub fn is_recoverable(&self) -> bool {
        match self {
            Chip8Error::Io(_) | Chip8Error::RomTooLarge { .. } => false,
            Chip8Error::StackOverflow
            | Chip8Error::StackUnderflow
            | Chip8Error::InvalidOpcode { .. }
            | Chip8Error::ProgramCounterOutOfBounds { .. } => true,
        }
    }
}

#[cfg(test)]
mod test_error {
    use super::*;

    #[test]
    fn test_load_errors_are_fatal() {
        let io = Chip8Error::from(io::Error::new(io::ErrorKind::NotFound, "missing"));
        assert!(!io.is_recoverable());
        let size = Chip8Error::RomTooLarge {
            size: 4000,
            max_size: 3584,
        };
        assert!(!size.is_recoverable());
    }

    #[test]
    fn test_step_errors_are_recoverable() {
        assert!(Chip8Error::StackOverflow.is_recoverable());
        assert!(Chip8Error::StackUnderflow.is_recoverable());
        assert!(Chip8Error::InvalidOpcode { opcode: 0xFFFF }.is_recoverable());
        assert!(Chip8Error::ProgramCounterOutOfBounds { pc: 0x1000 }.is_recoverable());
    }

    #[test]
    fn test_formats_opcode_as_hex() {
        let err = Chip8Error::InvalidOpcode { opcode: 0x5121 };
        assert_eq!(err.to_string(), "unknown opcode: 0x5121");
    }
}
