/*!
cpu::mod - Public façade for the 8085 control unit.

Layout:

```text
    state.rs      - Control-unit state (run flag, opcode, interrupt enable).
    regs.rs       - Register / operand naming and the `ExecutionUnit` trait.
    decode.rs     - Pure opcode -> `Instruction` decoder (fixed + range tables).
    execute.rs    - Fetch, `M` operand, stack and restart helpers.
    interrupts.rs - Interrupt lines, shared latch, `Interrupter` handle.
    dispatch/     - One step: fetch, decode, family handlers, interrupts.
    core/         - `ControlUnit` facade (reset, step, run, trap).
```

The public surface is the `ControlUnit` facade plus the decoder and the
interrupt types. Arithmetic and flags are delegated to whatever implements
`ExecutionUnit`; `crate::alu::Alu` is the bundled one.

Usage:
```rust
use cu8085::{Alu, ControlUnit, Memory};

let mut bus = Memory::with_program(0x0100, &[0x3E, 0x10, 0xC6, 0x05, 0x76]);
let mut cu = ControlUnit::new();
cu.reset(&mut bus);
let mut alu = Alu::new();
alu.pc = 0x0100;
cu.run(&mut alu, &mut bus).unwrap();
assert_eq!(alu.a, 0x15);
```
*/

pub mod core;
pub mod decode;
pub mod dispatch;
pub(crate) mod execute;
pub mod interrupts;
pub mod regs;
pub mod state;

// Re-exports:
// - ControlUnit (facade over CuState)
// - StepOutcome / Acknowledgement (what a step reports)
// - ExecutionUnit (seam to the register file + ALU)
pub use crate::cpu::core::ControlUnit;
pub use crate::cpu::decode::{Instruction, decode};
pub use crate::cpu::dispatch::StepOutcome;
pub use crate::cpu::interrupts::{AckToken, Acknowledgement, InterruptLine, Interrupter};
pub use crate::cpu::regs::{ExecutionUnit, Operand, Reg8, RegPair, StackPair};
pub use crate::cpu::state::CuState;
