/*!
control_flow.rs - Control-flow / system family handler

Overview
========
  JMP a16   (0xC3)        PC <- little-endian operand
  RET       (0xC9)        PC <- pop (low, then high)
  RST n     (0xC7 + 8*n)  push PC, PC <- n * 8
  HLT       (0x76)        clear the running flag

Behavior Details
================
- RST pushes the address of the following instruction, so a RET at the
  vector resumes right after the RST.
- HLT only stops `run`; PC already points past it. A pending interrupt is
  still serviced at the end of the HLT step, so PC may sit at a vector when
  `run` returns.
- Conditional jumps, calls and returns are not part of this instruction set.
*/

use crate::bus::Bus;
use crate::cpu::decode::Instruction;
use crate::cpu::execute::Machine;
use crate::cpu::regs::ExecutionUnit;
use crate::error::Result;

/// Byte distance between consecutive RST vectors.
pub(crate) const RESTART_STRIDE: u16 = 8;

pub(crate) fn handle<E: ExecutionUnit, B: Bus>(
    instr: Instruction,
    m: &mut Machine<'_, E, B>,
) -> Result<bool> {
    match instr {
        Instruction::Jump => {
            let target = m.fetch_u16()?;
            m.eu.set_pc(target);
        }
        Instruction::Return => {
            let (hi, lo) = m.pop_bytes()?;
            m.eu.set_pc(u16::from_be_bytes([hi, lo]));
        }
        Instruction::Restart(n) => m.restart(u16::from(n) * RESTART_STRIDE),
        Instruction::Halt => {
            log::debug!("HLT at {:04X}", m.cu.instr_pc);
            m.cu.halt();
        }
        _ => return Ok(false),
    }
    Ok(true)
}
