pub use chip8::Chip8;
pub use error::Chip8Error;
pub use instruction::Instruction;
pub use opcode::Opcode;
pub use state::{FrameBuffer, State};

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
mod state;
