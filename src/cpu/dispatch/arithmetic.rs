/*!
arithmetic.rs - ADD / ADC / SUB / SBB family handler

Overview
========
  register form  ADD 0x80-0x87  ADC 0x88-0x8F  SUB 0x90-0x97  SBB 0x98-0x9F
  immediate form ADI 0xC6       ACI 0xCE       SUI 0xD6       SBI 0xDE

The low three bits of the register form select the operand in B C D E H L
M A order; `M` reads memory at HL. The immediate form fetches one byte.

Flag and carry semantics belong to the execution unit; this handler only
selects the operand and the operation.
*/

use crate::bus::Bus;
use crate::cpu::decode::{AluOp, Instruction};
use crate::cpu::execute::Machine;
use crate::cpu::regs::ExecutionUnit;
use crate::error::Result;

pub(crate) fn handle<E: ExecutionUnit, B: Bus>(
    instr: Instruction,
    m: &mut Machine<'_, E, B>,
) -> Result<bool> {
    let Instruction::Alu { op, source } = instr else {
        return Ok(false);
    };
    let apply: fn(&mut E, u8) = match op {
        AluOp::Add => |eu: &mut E, v: u8| eu.add(v, false),
        AluOp::AddWithCarry => |eu: &mut E, v: u8| eu.add(v, true),
        AluOp::Sub => |eu: &mut E, v: u8| eu.sub(v, false),
        AluOp::SubWithBorrow => |eu: &mut E, v: u8| eu.sub(v, true),
        _ => return Ok(false),
    };
    let v = m.alu_source(source)?;
    apply(&mut *m.eu, v);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::alu::{CARRY, ZERO};
    use crate::test_utils::setup;

    #[test]
    fn adi_adds_immediate() {
        let (mut cu, mut alu, mut bus) = setup(&[0xC6, 0x05]);
        cu.step(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.a, 0x05);
        assert!(!alu.is_flag_set(ZERO));
    }

    #[test]
    fn add_register_and_memory_operands() {
        // MVI A,$10 ; MVI B,$01 ; ADD B ; LXI H,$2000 ; ADD M
        let (mut cu, mut alu, mut bus) =
            setup(&[0x3E, 0x10, 0x06, 0x01, 0x80, 0x21, 0x00, 0x20, 0x86]);
        bus.poke(0x2000, 0x20);
        for _ in 0..5 {
            cu.step(&mut alu, &mut bus).unwrap();
        }
        assert_eq!(alu.a, 0x31);
    }

    #[test]
    fn sub_register_form_subtracts() {
        // MVI A,$05 ; MVI C,$07 ; SUB C
        let (mut cu, mut alu, mut bus) = setup(&[0x3E, 0x05, 0x0E, 0x07, 0x91]);
        for _ in 0..3 {
            cu.step(&mut alu, &mut bus).unwrap();
        }
        assert_eq!(alu.a, 0xFE);
        assert!(alu.is_flag_set(CARRY));
    }

    #[test]
    fn carry_chained_through_adc_and_sbb() {
        // MVI A,$FF ; ADI $01 (CY) ; ACI $00 -> 1 ; SBI $00 -> 1 - 0 - 0
        let (mut cu, mut alu, mut bus) = setup(&[0x3E, 0xFF, 0xC6, 0x01, 0xCE, 0x00, 0xDE, 0x00]);
        cu.step(&mut alu, &mut bus).unwrap();
        cu.step(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.a, 0x00);
        assert!(alu.is_flag_set(CARRY));
        cu.step(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.a, 0x01);
        assert!(!alu.is_flag_set(CARRY));
        cu.step(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.a, 0x01);
    }

    #[test]
    fn sbb_register_form_consumes_borrow() {
        // MVI A,$00 ; SUI $01 (borrow) ; MVI D,$00 ; SBB D
        let (mut cu, mut alu, mut bus) = setup(&[0x3E, 0x00, 0xD6, 0x01, 0x16, 0x00, 0x9A]);
        for _ in 0..4 {
            cu.step(&mut alu, &mut bus).unwrap();
        }
        assert_eq!(alu.a, 0xFE);
    }
}
