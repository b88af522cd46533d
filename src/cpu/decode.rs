/*!
decode.rs - Pure opcode decoder.

Purpose
=======
Map one opcode byte to an `Instruction` without touching any machine state.
Operand bytes (immediates, addresses) are NOT part of decoding: the
executing handler fetches them, so instruction length is implicit in how
many bytes a handler consumes. `Instruction::length` reports it for
tooling.

Decode Order
============
A byte is matched against, in priority order:
  1. The single-opcode table (NOP, HLT, MVI, LXI, PUSH, POP, IN, OUT, EI,
     DI, SIM, RET, JMP and the seven immediate ALU forms).
  2. The MOV block $40-$7F (HLT at $76 already claimed by rule 1).
  3. The ALU register blocks, checked in family order
     ADD, ADC, SUB, SBB, ANA, ORA, XRA.
  4. The RST list (eight entries, vector = index * 8).
  5. Anything else is `None`; the dispatcher reports it as an invalid opcode.

Range-Offset Decoding
=====================
Families whose operand is encoded in the low 3 bits occupy a contiguous
block of eight opcodes. `block_offset(byte, base)` yields `byte - base`
when `0 <= byte - base < 8`; the offset selects the operand through
`Operand::ORDER`. The matched base is returned as a local value and never
stored between calls.

$B8-$BF (CMP) and the remaining 8080/8085 opcodes (conditional jumps and
calls, rotates, 16-bit INX/DCX/DAD, LDA/STA, ...) are outside this
instruction set and decode to `None`.
*/

use std::fmt;

use crate::cpu::regs::{Operand, RegPair, StackPair};

/// Accumulator operation selected by an ALU opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    AddWithCarry,
    Sub,
    SubWithBorrow,
    And,
    Or,
    Xor,
}

impl AluOp {
    fn register_mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::AddWithCarry => "ADC",
            AluOp::Sub => "SUB",
            AluOp::SubWithBorrow => "SBB",
            AluOp::And => "ANA",
            AluOp::Or => "ORA",
            AluOp::Xor => "XRA",
        }
    }

    fn immediate_mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADI",
            AluOp::AddWithCarry => "ACI",
            AluOp::Sub => "SUI",
            AluOp::SubWithBorrow => "SBI",
            AluOp::And => "ANI",
            AluOp::Or => "ORI",
            AluOp::Xor => "XRI",
        }
    }
}

/// Where an ALU instruction takes its operand from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluSource {
    /// Register (or `M`) selected by range-offset decoding.
    Operand(Operand),
    /// One immediate byte following the opcode.
    Immediate,
}

/// A decoded instruction. Operand bytes are fetched at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    Nop,
    Halt,
    MoveImmediate(Operand),
    LoadPairImmediate(RegPair),
    Push(StackPair),
    Pop(StackPair),
    Move { dst: Operand, src: Operand },
    Alu { op: AluOp, source: AluSource },
    Input,
    Output,
    EnableInterrupts,
    DisableInterrupts,
    SetInterruptMask,
    Return,
    Jump,
    /// Restart: call to vector `index * 8`.
    Restart(u8),
}

impl Instruction {
    /// Encoded length in bytes (opcode + operand bytes).
    pub fn length(&self) -> u16 {
        match self {
            Instruction::MoveImmediate(_)
            | Instruction::Input
            | Instruction::Output
            | Instruction::Alu {
                source: AluSource::Immediate,
                ..
            } => 2,
            Instruction::LoadPairImmediate(_) | Instruction::Jump => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Nop => f.write_str("NOP"),
            Instruction::Halt => f.write_str("HLT"),
            Instruction::MoveImmediate(dst) => write!(f, "MVI {dst}"),
            Instruction::LoadPairImmediate(pair) => write!(f, "LXI {pair}"),
            Instruction::Push(pair) => write!(f, "PUSH {pair}"),
            Instruction::Pop(pair) => write!(f, "POP {pair}"),
            Instruction::Move { dst, src } => write!(f, "MOV {dst},{src}"),
            Instruction::Alu {
                op,
                source: AluSource::Operand(src),
            } => write!(f, "{} {src}", op.register_mnemonic()),
            Instruction::Alu {
                op,
                source: AluSource::Immediate,
            } => f.write_str(op.immediate_mnemonic()),
            Instruction::Input => f.write_str("IN"),
            Instruction::Output => f.write_str("OUT"),
            Instruction::EnableInterrupts => f.write_str("EI"),
            Instruction::DisableInterrupts => f.write_str("DI"),
            Instruction::SetInterruptMask => f.write_str("SIM"),
            Instruction::Return => f.write_str("RET"),
            Instruction::Jump => f.write_str("JMP"),
            Instruction::Restart(n) => write!(f, "RST {n}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

pub const NOP: u8 = 0x00;
pub const HLT: u8 = 0x76;

/// MVI opcodes by destination.
const MVI_TABLE: [(u8, Operand); 8] = [
    (0x06, Operand::B),
    (0x0E, Operand::C),
    (0x16, Operand::D),
    (0x1E, Operand::E),
    (0x26, Operand::H),
    (0x2E, Operand::L),
    (0x36, Operand::M),
    (0x3E, Operand::A),
];

const LXI_TABLE: [(u8, RegPair); 4] = [
    (0x01, RegPair::BC),
    (0x11, RegPair::DE),
    (0x21, RegPair::HL),
    (0x31, RegPair::SP),
];

const PUSH_TABLE: [(u8, StackPair); 4] = [
    (0xC5, StackPair::BC),
    (0xD5, StackPair::DE),
    (0xE5, StackPair::HL),
    (0xF5, StackPair::PSW),
];

const POP_TABLE: [(u8, StackPair); 4] = [
    (0xC1, StackPair::BC),
    (0xD1, StackPair::DE),
    (0xE1, StackPair::HL),
    (0xF1, StackPair::PSW),
];

/// Immediate ALU forms.
const ALU_IMMEDIATE_TABLE: [(u8, AluOp); 7] = [
    (0xC6, AluOp::Add),
    (0xCE, AluOp::AddWithCarry),
    (0xD6, AluOp::Sub),
    (0xDE, AluOp::SubWithBorrow),
    (0xE6, AluOp::And),
    (0xF6, AluOp::Or),
    (0xEE, AluOp::Xor),
];

/// MOV blocks by destination: MOV dst,src = base(dst) + index(src).
const MOV_BLOCKS: [(u8, Operand); 8] = [
    (0x40, Operand::B),
    (0x48, Operand::C),
    (0x50, Operand::D),
    (0x58, Operand::E),
    (0x60, Operand::H),
    (0x68, Operand::L),
    (0x70, Operand::M),
    (0x78, Operand::A),
];

/// ALU register blocks, in checking order.
pub const ALU_BLOCKS: [(u8, AluOp); 7] = [
    (0x80, AluOp::Add),
    (0x88, AluOp::AddWithCarry),
    (0x90, AluOp::Sub),
    (0x98, AluOp::SubWithBorrow),
    (0xA0, AluOp::And),
    (0xB0, AluOp::Or),
    (0xA8, AluOp::Xor),
];

/// RST opcodes; the position in this list is the restart index.
pub const RST_TABLE: [u8; 8] = [0xC7, 0xCF, 0xD7, 0xDF, 0xE7, 0xEF, 0xF7, 0xFF];

#[inline]
fn lookup<T: Copy>(table: &[(u8, T)], byte: u8) -> Option<T> {
    table.iter().find(|(op, _)| *op == byte).map(|&(_, v)| v)
}

/// Offset of `byte` inside the 8-opcode block starting at `base`, if any.
#[inline]
pub fn block_offset(byte: u8, base: u8) -> Option<u8> {
    byte.checked_sub(base).filter(|&diff| diff < 8)
}

fn decode_fixed(byte: u8) -> Option<Instruction> {
    let instr = match byte {
        NOP => Instruction::Nop,
        HLT => Instruction::Halt,
        0xDB => Instruction::Input,
        0xD3 => Instruction::Output,
        0xF3 => Instruction::DisableInterrupts,
        0xFB => Instruction::EnableInterrupts,
        0x30 => Instruction::SetInterruptMask,
        0xC9 => Instruction::Return,
        0xC3 => Instruction::Jump,
        _ => {
            if let Some(dst) = lookup(&MVI_TABLE, byte) {
                Instruction::MoveImmediate(dst)
            } else if let Some(pair) = lookup(&LXI_TABLE, byte) {
                Instruction::LoadPairImmediate(pair)
            } else if let Some(pair) = lookup(&PUSH_TABLE, byte) {
                Instruction::Push(pair)
            } else if let Some(pair) = lookup(&POP_TABLE, byte) {
                Instruction::Pop(pair)
            } else if let Some(op) = lookup(&ALU_IMMEDIATE_TABLE, byte) {
                Instruction::Alu {
                    op,
                    source: AluSource::Immediate,
                }
            } else {
                return None;
            }
        }
    };
    Some(instr)
}

fn decode_move(byte: u8) -> Option<Instruction> {
    MOV_BLOCKS.iter().find_map(|&(base, dst)| {
        block_offset(byte, base).map(|offset| Instruction::Move {
            dst,
            src: Operand::from_index(offset),
        })
    })
}

fn decode_alu_register(byte: u8) -> Option<Instruction> {
    ALU_BLOCKS.iter().find_map(|&(base, op)| {
        block_offset(byte, base).map(|offset| Instruction::Alu {
            op,
            source: AluSource::Operand(Operand::from_index(offset)),
        })
    })
}

fn decode_restart(byte: u8) -> Option<Instruction> {
    RST_TABLE
        .iter()
        .position(|&op| op == byte)
        .map(|index| Instruction::Restart(index as u8))
}

/// Decode one opcode byte. Returns `None` for bytes outside this instruction set.
pub fn decode(byte: u8) -> Option<Instruction> {
    decode_fixed(byte)
        .or_else(|| decode_move(byte))
        .or_else(|| decode_alu_register(byte))
        .or_else(|| decode_restart(byte))
}
