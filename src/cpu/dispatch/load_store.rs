/*!
load_store.rs - Data movement family handler

Overview
========
Implements the register / memory / stack transfer instructions:

  MVI r,d8     (0x06 + 8*r)         r in B C D E H L M A
  LXI rp,d16   (0x01 + 16*rp)       rp in B D H SP
  MOV d,s      (0x40 + 8*d + s)     every pair except d = s = M (that is HLT)
  PUSH rp      (0xC5 + 16*rp)       rp in B D H PSW
  POP rp       (0xC1 + 16*rp)       rp in B D H PSW

Responsibilities
================
- Fetch immediate operands (LXI is little-endian: low byte first).
- Route `M` through the bus at HL.
- PUSH writes high then low at descending addresses; POP restores low then
  high. PSW is the (A, F) pair.

Flags are never touched here except by POP PSW, which restores F verbatim.

Return Contract
===============
`handle` returns Ok(true) if the instruction belongs to this family and was
executed, Ok(false) otherwise.
*/

use crate::bus::Bus;
use crate::cpu::decode::Instruction;
use crate::cpu::execute::Machine;
use crate::cpu::regs::ExecutionUnit;
use crate::error::Result;

pub(crate) fn handle<E: ExecutionUnit, B: Bus>(
    instr: Instruction,
    m: &mut Machine<'_, E, B>,
) -> Result<bool> {
    match instr {
        Instruction::MoveImmediate(dst) => {
            let v = m.fetch_u8()?;
            m.write_operand(dst, v);
        }
        Instruction::LoadPairImmediate(pair) => {
            let lo = m.fetch_u8()?;
            let hi = m.fetch_u8()?;
            match pair.halves() {
                Some((h, l)) => {
                    m.eu.set_reg(h, hi);
                    m.eu.set_reg(l, lo);
                }
                None => m.eu.set_sp(u16::from_le_bytes([lo, hi])),
            }
        }
        Instruction::Move { dst, src } => {
            let v = m.read_operand(src)?;
            m.write_operand(dst, v);
        }
        Instruction::Push(pair) => {
            let (h, l) = pair.halves();
            let (hi, lo) = (m.eu.reg(h), m.eu.reg(l));
            m.push_bytes(hi, lo);
        }
        Instruction::Pop(pair) => {
            let (h, l) = pair.halves();
            let (hi, lo) = m.pop_bytes()?;
            m.eu.set_reg(l, lo);
            m.eu.set_reg(h, hi);
        }
        _ => return Ok(false),
    }
    Ok(true)
}
