/*!
execute.rs - Shared side-effecting helpers (fetch, `M`, stack, restart).

Purpose
=======
Centralize every bus interaction the family handlers need so each handler
reads as instruction semantics only. All handlers operate on a `Machine`,
which borrows the control-unit state, the execution unit and the bus for
the duration of one step.

Scope (crate-visible)
---------------------
Fetch:
    fetch_u8, fetch_u16
Operand access (`M` redirected to the bus at HL):
    read_operand, write_operand, alu_source
Stack:
    push_bytes, pop_bytes
Control transfer:
    restart

Fault Reporting
===============
Every memory read goes through `read_byte`, which rejects data-line values
wider than 8 bits with `CpuError::InvalidByte` tagged with the address of
the instruction being executed.
*/

use crate::bus::Bus;
use crate::cpu::decode::AluSource;
use crate::cpu::regs::{ExecutionUnit, Operand};
use crate::cpu::state::CuState;
use crate::error::{CpuError, Result};

/// One step's view of the machine.
pub(crate) struct Machine<'a, E: ExecutionUnit, B: Bus> {
    pub cu: &'a mut CuState,
    pub eu: &'a mut E,
    pub bus: &'a mut B,
}

impl<'a, E: ExecutionUnit, B: Bus> Machine<'a, E, B> {
    pub fn new(cu: &'a mut CuState, eu: &'a mut E, bus: &'a mut B) -> Self {
        Self { cu, eu, bus }
    }

    // ---------------------------------------------------------------------
    // Memory / fetch
    // ---------------------------------------------------------------------

    /// Read one validated byte from memory.
    pub fn read_byte(&mut self, addr: u16) -> Result<u8> {
        let raw = self.bus.read(addr);
        u8::try_from(raw).map_err(|_| CpuError::InvalidByte {
            pc: self.cu.instr_pc,
            addr,
            value: raw,
        })
    }

    /// Read the byte at PC and advance PC by one.
    pub fn fetch_u8(&mut self) -> Result<u8> {
        let pc = self.eu.pc();
        self.eu.set_pc(pc.wrapping_add(1));
        self.read_byte(pc)
    }

    /// Fetch a little-endian word (low byte first).
    pub fn fetch_u16(&mut self) -> Result<u16> {
        let lo = self.fetch_u8()?;
        let hi = self.fetch_u8()?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    // ---------------------------------------------------------------------
    // Operands
    // ---------------------------------------------------------------------

    /// Value of a MOV / MVI / ALU operand; `M` reads memory at HL.
    pub fn read_operand(&mut self, op: Operand) -> Result<u8> {
        match op.register() {
            Some(r) => Ok(self.eu.reg(r)),
            None => {
                let hl = self.eu.hl();
                self.read_byte(hl)
            }
        }
    }

    /// Store to a MOV / MVI operand; `M` writes memory at HL.
    pub fn write_operand(&mut self, op: Operand, v: u8) {
        match op.register() {
            Some(r) => self.eu.set_reg(r, v),
            None => {
                let hl = self.eu.hl();
                self.bus.write(hl, v);
            }
        }
    }

    /// Operand of an ALU instruction: register / `M`, or the next byte.
    pub fn alu_source(&mut self, source: AluSource) -> Result<u8> {
        match source {
            AluSource::Operand(op) => self.read_operand(op),
            AluSource::Immediate => self.fetch_u8(),
        }
    }

    // ---------------------------------------------------------------------
    // Stack
    // ---------------------------------------------------------------------
    //
    // The stack grows down. Push pre-decrements and leaves the high byte at
    // the higher address; pop reads low then high, post-incrementing.

    pub fn push_bytes(&mut self, hi: u8, lo: u8) {
        let sp = self.eu.sp().wrapping_sub(1);
        self.bus.write(sp, hi);
        let sp = sp.wrapping_sub(1);
        self.bus.write(sp, lo);
        self.eu.set_sp(sp);
    }

    /// Pop two bytes, returned as (high, low).
    pub fn pop_bytes(&mut self) -> Result<(u8, u8)> {
        let sp = self.eu.sp();
        let lo = self.read_byte(sp)?;
        let sp = sp.wrapping_add(1);
        let hi = self.read_byte(sp)?;
        self.eu.set_sp(sp.wrapping_add(1));
        Ok((hi, lo))
    }

    // ---------------------------------------------------------------------
    // Control transfer
    // ---------------------------------------------------------------------

    /// Push PC (high then low) and jump to `vector`.
    pub fn restart(&mut self, vector: u16) {
        let [hi, lo] = self.eu.pc().to_be_bytes();
        self.push_bytes(hi, lo);
        self.eu.set_pc(vector);
    }
}
