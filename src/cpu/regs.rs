/*!
regs.rs - `ExecutionUnit` trait plus the register naming used by decode and
dispatch.

Option A (Chosen):
==================
The trait does NOT include:
  - Bus access of any kind (memory, `M`, stack, ports)
  - Instruction fetch
  - Interrupt state

Rationale: the execution unit owns the register file and the flag logic,
nothing else. Everything that touches the bus stays in the control unit
(`cpu::execute`) so a `Bus` is always passed explicitly at call sites and
never borrowed through the execution unit.

Register Naming
===============
- `Reg8`     : storage registers of the execution unit (A, F, B, C, D, E, H, L).
- `Operand`  : the 3-bit operand selector used by MOV / MVI / ALU opcodes,
               in encoding order {B, C, D, E, H, L, M, A}. `M` is a
               pseudo-register (memory at HL) and never maps to storage.
- `RegPair`  : LXI destinations {BC, DE, HL, SP}.
- `StackPair`: PUSH / POP pairs {BC, DE, HL, PSW}; PSW is A + flags.

Implementations Provided:
=========================
- `ExecutionUnit` for `crate::alu::Alu` (reference register file + flags).
*/

use std::fmt;

/// Storage registers held by the execution unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Reg8::A => "A",
            Reg8::F => "F",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
        };
        f.write_str(s)
    }
}

/// 3-bit operand selector, in opcode encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    B,
    C,
    D,
    E,
    H,
    L,
    M,
    A,
}

impl Operand {
    /// Operand order as encoded in the low 3 bits of MOV / ALU opcodes.
    pub const ORDER: [Operand; 8] = [
        Operand::B,
        Operand::C,
        Operand::D,
        Operand::E,
        Operand::H,
        Operand::L,
        Operand::M,
        Operand::A,
    ];

    /// Map a 3-bit selector to its operand. Only the low 3 bits are used.
    #[inline]
    pub fn from_index(index: u8) -> Operand {
        Self::ORDER[(index & 0x07) as usize]
    }

    /// Storage register behind this operand, or `None` for `M`.
    #[inline]
    pub fn register(self) -> Option<Reg8> {
        match self {
            Operand::B => Some(Reg8::B),
            Operand::C => Some(Reg8::C),
            Operand::D => Some(Reg8::D),
            Operand::E => Some(Reg8::E),
            Operand::H => Some(Reg8::H),
            Operand::L => Some(Reg8::L),
            Operand::M => None,
            Operand::A => Some(Reg8::A),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.register() {
            Some(r) => r.fmt(f),
            None => f.write_str("M"),
        }
    }
}

/// 16-bit LXI destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegPair {
    BC,
    DE,
    HL,
    SP,
}

impl RegPair {
    /// (high, low) storage registers, or `None` for the stack pointer.
    #[inline]
    pub fn halves(self) -> Option<(Reg8, Reg8)> {
        match self {
            RegPair::BC => Some((Reg8::B, Reg8::C)),
            RegPair::DE => Some((Reg8::D, Reg8::E)),
            RegPair::HL => Some((Reg8::H, Reg8::L)),
            RegPair::SP => None,
        }
    }
}

impl fmt::Display for RegPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intel syntax names a pair by its high register.
        let s = match self {
            RegPair::BC => "B",
            RegPair::DE => "D",
            RegPair::HL => "H",
            RegPair::SP => "SP",
        };
        f.write_str(s)
    }
}

/// PUSH / POP register pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackPair {
    BC,
    DE,
    HL,
    PSW,
}

impl StackPair {
    /// (high, low) storage registers.
    #[inline]
    pub fn halves(self) -> (Reg8, Reg8) {
        match self {
            StackPair::BC => (Reg8::B, Reg8::C),
            StackPair::DE => (Reg8::D, Reg8::E),
            StackPair::HL => (Reg8::H, Reg8::L),
            StackPair::PSW => (Reg8::A, Reg8::F),
        }
    }
}

impl fmt::Display for StackPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StackPair::BC => "B",
            StackPair::DE => "D",
            StackPair::HL => "H",
            StackPair::PSW => "PSW",
        };
        f.write_str(s)
    }
}

/// Register file + arithmetic/logic capability consumed by the control unit.
///
/// Intentionally excludes:
///   * Bus access (including `M`)
///   * Stack push/pop
///   * Instruction fetch
///
/// The arithmetic methods own all result and flag effects; the control unit
/// only supplies operands and never inspects flags.
pub trait ExecutionUnit {
    // ---------------------------------------------------------------------
    // Register file
    // ---------------------------------------------------------------------
    fn reg(&self, r: Reg8) -> u8;
    fn set_reg(&mut self, r: Reg8, v: u8);
    fn sp(&self) -> u16;
    fn set_sp(&mut self, v: u16);
    fn pc(&self) -> u16;
    fn set_pc(&mut self, v: u16);

    // ---------------------------------------------------------------------
    // Arithmetic / logic (accumulator is the implicit destination)
    // ---------------------------------------------------------------------

    /// A <- A + operand (+ CY when `with_carry`).
    fn add(&mut self, operand: u8, with_carry: bool);

    /// A <- A - operand (- CY when `with_borrow`).
    fn sub(&mut self, operand: u8, with_borrow: bool);

    fn and(&mut self, operand: u8);
    fn or(&mut self, operand: u8);
    fn xor(&mut self, operand: u8);

    // ---------------------------------------------------------------------
    // Composites
    // ---------------------------------------------------------------------

    #[inline]
    fn a(&self) -> u8 {
        self.reg(Reg8::A)
    }

    #[inline]
    fn set_a(&mut self, v: u8) {
        self.set_reg(Reg8::A, v);
    }

    /// Combined HL pair, used for `M` addressing.
    #[inline]
    fn hl(&self) -> u16 {
        u16::from_be_bytes([self.reg(Reg8::H), self.reg(Reg8::L)])
    }
}
