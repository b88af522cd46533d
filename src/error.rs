/*!
error.rs - Fatal control-unit faults.

Both variants terminate the current step (and therefore `run`). They carry
the program counter of the faulting instruction so a host can print a
precise diagnostic. Masked interrupt requests, `SIM` no-ops and `HLT` are
ordinary control flow and never surface here.
*/

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CpuError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    /// The bus drove a value wider than 8 bits onto the data lines.
    #[error("invalid byte 0x{value:X} read from 0x{addr:04X} (instruction at 0x{pc:04X})")]
    InvalidByte { pc: u16, addr: u16, value: u16 },

    /// The fetched byte matched no decode rule.
    #[error("invalid opcode 0x{opcode:02X} at 0x{pc:04X}")]
    InvalidOpcode { pc: u16, opcode: u8 },
}

impl CpuError {
    /// Program counter of the instruction that faulted.
    pub fn pc(&self) -> u16 {
        match *self {
            CpuError::InvalidByte { pc, .. } | CpuError::InvalidOpcode { pc, .. } => pc,
        }
    }
}
