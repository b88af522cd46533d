#![doc = r#"
cu8085 library crate.

Control unit of an Intel 8080/8085 style processor: fetch / decode /
execute, vectored interrupts, stack and restart handling.

Modules:
- alu: reference execution unit (register file, SP, PC, arithmetic and flags)
- bus: Bus trait (memory + port space) and a flat 64 KiB `Memory`
- cpu: control unit (facade + state + decode + dispatch + interrupts)
- error: fault type returned by stepping

In tests, shared machine builders are available under `crate::test_utils`.
"#]

pub mod alu;
pub mod bus;
pub mod cpu;
pub mod error;

// Re-export commonly used types at the crate root for convenience.
pub use alu::Alu;
pub use bus::{Bus, Memory};
pub use cpu::{
    AckToken, Acknowledgement, ControlUnit, ExecutionUnit, Instruction, InterruptLine,
    Interrupter, StepOutcome, decode,
};
pub use error::{CpuError, Result};

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
