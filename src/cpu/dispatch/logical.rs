/*!
logical.rs - ANA / ORA / XRA family handler

  register form  ANA 0xA0-0xA7  XRA 0xA8-0xAF  ORA 0xB0-0xB7
  immediate form ANI 0xE6       XRI 0xEE       ORI 0xF6

Operand selection matches `arithmetic`; flag effects are the execution
unit's.
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
        AluOp::And => E::and,
        AluOp::Or => E::or,
        AluOp::Xor => E::xor,
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
    fn ani_ori_xri_immediates() {
        // MVI A,$F0 ; ANI $3C ; ORI $01 ; XRI $FF
        let (mut cu, mut alu, mut bus) = setup(&[0x3E, 0xF0, 0xE6, 0x3C, 0xF6, 0x01, 0xEE, 0xFF]);
        cu.step(&mut alu, &mut bus).unwrap();
        cu.step(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.a, 0x30);
        cu.step(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.a, 0x31);
        cu.step(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.a, 0xCE);
        assert!(!alu.is_flag_set(CARRY));
    }

    #[test]
    fn ora_register_block_starts_at_b0() {
        // MVI A,$01 ; MVI E,$80 ; ORA E
        let (mut cu, mut alu, mut bus) = setup(&[0x3E, 0x01, 0x1E, 0x80, 0xB3]);
        for _ in 0..3 {
            cu.step(&mut alu, &mut bus).unwrap();
        }
        assert_eq!(alu.a, 0x81);
    }

    #[test]
    fn xra_a_clears_accumulator() {
        // MVI A,$5A ; XRA A
        let (mut cu, mut alu, mut bus) = setup(&[0x3E, 0x5A, 0xAF]);
        cu.step(&mut alu, &mut bus).unwrap();
        cu.step(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.a, 0);
        assert!(alu.is_flag_set(ZERO));
    }

    #[test]
    fn ana_m_reads_memory_at_hl() {
        // LXI H,$4000 ; MVI A,$FF ; ANA M
        let (mut cu, mut alu, mut bus) = setup(&[0x21, 0x00, 0x40, 0x3E, 0xFF, 0xA6]);
        bus.poke(0x4000, 0x0F);
        for _ in 0..3 {
            cu.step(&mut alu, &mut bus).unwrap();
        }
        assert_eq!(alu.a, 0x0F);
    }
}
