/*!
state.rs - Control-unit state (run flag, opcode, interrupt enable) and the
shared interrupt latch handle.

Overview
========
`CuState` holds everything the control unit owns. It intentionally excludes:
  - The register file, SP and PC (owned by the execution unit)
  - Memory and I/O (owned by the bus)
Those are borrowed per step and never stored here.

Lifecycle
=========
- `reset` restores defaults: not running, opcode $00, interrupts disabled,
  mask all-unmasked, nothing pending.
- `opcode` and `instr_pc` are overwritten by every fetch.
- The latch is reset in place so `Interrupter` handles obtained before a
  reset keep working.
- Cloning copies the latch contents into a new latch. Handles taken from
  the original never reach the clone.
*/

use crate::cpu::interrupts::Interrupter;

#[derive(Debug, Default)]
pub struct CuState {
    /// Cleared by HLT; `run` exits when false.
    pub running: bool,
    /// Opcode of the instruction currently (or last) executing.
    pub opcode: u8,
    /// Address of that opcode; reported with faults.
    pub instr_pc: u16,
    /// Global interrupt enable (EI / DI).
    pub interrupt_enabled: bool,
    interrupter: Interrupter,
}

impl CuState {
    /// Create state with reset defaults.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore reset defaults. Interrupter handles stay connected.
    pub fn reset(&mut self) {
        self.running = false;
        self.opcode = 0x00;
        self.instr_pc = 0x0000;
        self.interrupt_enabled = false;
        self.interrupter.reset();
    }

    /// Handle to the shared interrupt latch.
    #[inline]
    pub fn interrupter(&self) -> &Interrupter {
        &self.interrupter
    }

    #[inline]
    pub fn halt(&mut self) {
        self.running = false;
    }
}

impl Clone for CuState {
    fn clone(&self) -> Self {
        Self {
            running: self.running,
            opcode: self.opcode,
            instr_pc: self.instr_pc,
            interrupt_enabled: self.interrupt_enabled,
            interrupter: self.interrupter.detached(),
        }
    }
}
