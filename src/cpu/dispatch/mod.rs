/*!
dispatch - Orchestrator for a single control-unit step (fetch/decode/execute,
then interrupts).

Overview
========
Coordinates a single step:
1. Record the instruction address, fetch the opcode (PC advances).
2. Decode it with the pure decoder; an unknown byte is an `InvalidOpcode`
   fault carrying the byte and its address.
3. Offer the decoded instruction to each family handler in turn until one
   claims it. Handlers fetch their own operand bytes.
4. Service a pending interrupt if interrupts are enabled.

Interrupts are therefore sampled only between instructions: an instruction
is never interrupted part-way through its operand fetches.

Architecture
============
- Orchestrator (`step`): owns ordering (execute, then service).
- Family handlers: `load_store`, `arithmetic`, `logical`, `control_flow`,
  `misc`. Each exposes `handle(instr, machine) -> Result<bool>`:
    Ok(true)  => instruction recognized and executed
    Ok(false) => not this family; the orchestrator continues the chain
    Err(_)    => bus fault while executing; propagates out unchanged
*/

pub(crate) mod arithmetic;
pub(crate) mod control_flow;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;

use crate::bus::Bus;
use crate::cpu::decode::{Instruction, decode};
use crate::cpu::execute::Machine;
use crate::cpu::interrupts::Acknowledgement;
use crate::cpu::regs::ExecutionUnit;
use crate::cpu::state::CuState;
use crate::error::{CpuError, Result};

/// What one step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// The instruction that was executed.
    pub instruction: Instruction,
    /// Set when a pending interrupt was serviced after the instruction.
    pub acknowledged: Option<Acknowledgement>,
}

/// Execute one instruction, then service interrupts.
pub(crate) fn step<E: ExecutionUnit, B: Bus>(
    cu: &mut CuState,
    eu: &mut E,
    bus: &mut B,
) -> Result<StepOutcome> {
    let mut m = Machine::new(cu, eu, bus);
    let instruction = fetch_and_decode(&mut m)?;
    let acknowledged = process_interrupts(&mut m);
    Ok(StepOutcome {
        instruction,
        acknowledged,
    })
}

/// Fetch one opcode, decode it and run its handler.
fn fetch_and_decode<E: ExecutionUnit, B: Bus>(m: &mut Machine<'_, E, B>) -> Result<Instruction> {
    let pc = m.eu.pc();
    m.cu.instr_pc = pc;
    let opcode = m.fetch_u8()?;
    m.cu.opcode = opcode;

    let Some(instr) = decode(opcode) else {
        log::warn!("invalid opcode {opcode:02X} at {pc:04X}");
        return Err(CpuError::InvalidOpcode { pc, opcode });
    };
    log::trace!("{pc:04X}: {instr}");

    let handled = load_store::handle(instr, m)?
        || arithmetic::handle(instr, m)?
        || logical::handle(instr, m)?
        || control_flow::handle(instr, m)?
        || misc::handle(instr, m)?;
    if !handled {
        // Every decodable instruction belongs to a family.
        return Err(CpuError::InvalidOpcode { pc, opcode });
    }
    Ok(instr)
}

/// Service the pending interrupt, if interrupts are enabled and one is pending.
fn process_interrupts<E: ExecutionUnit, B: Bus>(
    m: &mut Machine<'_, E, B>,
) -> Option<Acknowledgement> {
    if !m.cu.interrupt_enabled {
        return None;
    }
    let pending = m.cu.interrupter().take_pending()?;
    m.cu.interrupt_enabled = false;
    let vector = pending.line.vector();
    log::debug!("servicing {} -> {vector:04X}", pending.line);
    m.restart(vector);
    Some(Acknowledgement {
        line: pending.line,
        token: pending.token,
    })
}
