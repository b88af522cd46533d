/*!
alu.rs - Reference execution unit: 8085 register file and flag logic.

Overview
========
`Alu` owns every architecturally visible register (A, F, B, C, D, E, H, L,
SP, PC) and implements `ExecutionUnit`, so the control unit can be run end
to end without a host-provided execution unit.

8085 Flag Register Bit Layout (for reference)
=============================================
Bit: 7 6 5 4  3 2 1 0
     S Z 0 AC 0 P 1 CY
Where:
  S  = SIGN       (bit 7 of the result)
  Z  = ZERO
  AC = AUX_CARRY  (carry out of bit 3)
  P  = PARITY     (set on even parity)
  1  = always set by arithmetic/logic results
  CY = CARRY      (carry out of bit 7, or borrow for subtraction)

Design Choices
==============
- `set_reg(F, v)` stores `v` unchanged; only arithmetic/logic results force
  the fixed bits. POP PSW therefore restores exactly what PUSH PSW saved.
- Subtraction computes AC the way the 8080 does: as the half-carry of
  A + !operand + !borrow.
- ANA sets AC (8085 behavior); ORA / XRA clear AC and CY.
*/

use crate::cpu::regs::{ExecutionUnit, Reg8};

/// Flag bit masks.
pub const CARRY: u8 = 0b0000_0001;
pub const FIXED_ONE: u8 = 0b0000_0010;
pub const PARITY: u8 = 0b0000_0100;
pub const AUX_CARRY: u8 = 0b0001_0000;
pub const ZERO: u8 = 0b0100_0000;
pub const SIGN: u8 = 0b1000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alu {
    pub a: u8,
    pub f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Default for Alu {
    fn default() -> Self {
        Self {
            a: 0,
            f: FIXED_ONE,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            sp: 0x0000,
            pc: 0x0000,
        }
    }
}

impl Alu {
    /// Create a register file with power-up defaults.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return true if a flag (bit mask) is set.
    #[inline]
    pub fn is_flag_set(&self, mask: u8) -> bool {
        (self.f & mask) != 0
    }

    /// Store an arithmetic/logic result and derive S, Z, P from it.
    fn commit(&mut self, result: u8, carry: bool, aux_carry: bool) {
        let mut f = FIXED_ONE;
        if result & 0x80 != 0 {
            f |= SIGN;
        }
        if result == 0 {
            f |= ZERO;
        }
        if result.count_ones() % 2 == 0 {
            f |= PARITY;
        }
        if aux_carry {
            f |= AUX_CARRY;
        }
        if carry {
            f |= CARRY;
        }
        self.a = result;
        self.f = f;
    }
}

impl ExecutionUnit for Alu {
    #[inline]
    fn reg(&self, r: Reg8) -> u8 {
        match r {
            Reg8::A => self.a,
            Reg8::F => self.f,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    #[inline]
    fn set_reg(&mut self, r: Reg8, v: u8) {
        match r {
            Reg8::A => self.a = v,
            Reg8::F => self.f = v,
            Reg8::B => self.b = v,
            Reg8::C => self.c = v,
            Reg8::D => self.d = v,
            Reg8::E => self.e = v,
            Reg8::H => self.h = v,
            Reg8::L => self.l = v,
        }
    }

    #[inline]
    fn sp(&self) -> u16 {
        self.sp
    }
    #[inline]
    fn set_sp(&mut self, v: u16) {
        self.sp = v;
    }
    #[inline]
    fn pc(&self) -> u16 {
        self.pc
    }
    #[inline]
    fn set_pc(&mut self, v: u16) {
        self.pc = v;
    }

    fn add(&mut self, operand: u8, with_carry: bool) {
        let cin = u8::from(with_carry && self.is_flag_set(CARRY));
        let sum = u16::from(self.a) + u16::from(operand) + u16::from(cin);
        let ac = (self.a & 0x0F) + (operand & 0x0F) + cin > 0x0F;
        self.commit(sum as u8, sum > 0xFF, ac);
    }

    fn sub(&mut self, operand: u8, with_borrow: bool) {
        let bin = u8::from(with_borrow && self.is_flag_set(CARRY));
        let result = self.a.wrapping_sub(operand).wrapping_sub(bin);
        let borrow = u16::from(self.a) < u16::from(operand) + u16::from(bin);
        let ac = (self.a & 0x0F) + (!operand & 0x0F) + (1 - bin) > 0x0F;
        self.commit(result, borrow, ac);
    }

    fn and(&mut self, operand: u8) {
        let result = self.a & operand;
        self.commit(result, false, true);
    }

    fn or(&mut self, operand: u8) {
        let result = self.a | operand;
        self.commit(result, false, false);
    }

    fn xor(&mut self, operand: u8) {
        let result = self.a ^ operand;
        self.commit(result, false, false);
    }
}
