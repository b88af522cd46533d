//! Shared test utilities for building small machines around a program.
//!
//! These helpers de-duplicate setup across the CPU, dispatch and interrupt
//! tests. They intentionally support just what the test suite needs:
//! - a `Memory` bus with a program loaded at an origin
//! - an `Alu` with PC at the origin and SP at a fixed, out-of-the-way top
//! - a `ControlUnit` that has been reset against that bus
//! - a bus that drives an out-of-range value at one address
//!
//! Notes on the default layout:
//! - Programs load at `PROGRAM_ORIGIN` ($0100), clear of the RST / TRAP /
//!   interrupt vectors in page zero.
//! - SP starts at `STACK_TOP` ($F000).

#![allow(dead_code)]

use crate::alu::Alu;
use crate::bus::{Bus, Memory};
use crate::cpu::core::ControlUnit;

pub const PROGRAM_ORIGIN: u16 = 0x0100;
pub const STACK_TOP: u16 = 0xF000;

/// Build a reset control unit, a register file and memory holding `program`
/// at `PROGRAM_ORIGIN`.
pub fn setup(program: &[u8]) -> (ControlUnit, Alu, Memory) {
    setup_at(PROGRAM_ORIGIN, program)
}

/// Like `setup`, with an explicit load address (PC starts there).
pub fn setup_at(origin: u16, program: &[u8]) -> (ControlUnit, Alu, Memory) {
    let mut bus = Memory::new();
    let mut cu = ControlUnit::new();
    cu.reset(&mut bus);
    bus.load(origin, program);
    let mut alu = Alu::new();
    alu.pc = origin;
    alu.sp = STACK_TOP;
    (cu, alu, bus)
}

/// Memory bus that drives `value` (wider than a byte) when `addr` is read.
pub struct FaultyBus {
    pub inner: Memory,
    addr: u16,
    value: u16,
}

impl FaultyBus {
    pub fn new(addr: u16, value: u16) -> Self {
        Self {
            inner: Memory::new(),
            addr,
            value,
        }
    }
}

impl Bus for FaultyBus {
    fn read(&mut self, addr: u16) -> u16 {
        if addr == self.addr {
            self.value
        } else {
            self.inner.read(addr)
        }
    }
    fn write(&mut self, addr: u16, value: u8) {
        self.inner.write(addr, value);
    }
    fn read_io(&mut self, port: u8) -> u8 {
        self.inner.read_io(port)
    }
    fn write_io(&mut self, port: u8, value: u8) {
        self.inner.write_io(port, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::HLT;

    #[test]
    fn setup_places_program_and_registers() {
        let (cu, alu, bus) = setup(&[0x3E, 0x42]);
        assert_eq!(alu.pc, PROGRAM_ORIGIN);
        assert_eq!(alu.sp, STACK_TOP);
        assert_eq!(bus.peek(PROGRAM_ORIGIN), 0x3E);
        assert_eq!(bus.peek(PROGRAM_ORIGIN + 1), 0x42);
        assert!(!cu.is_running());
    }

    #[test]
    fn reset_seeds_halt_at_rst5_vector() {
        let (_cu, _alu, bus) = setup(&[]);
        assert_eq!(bus.peek(0x0028), HLT);
    }

    #[test]
    fn faulty_bus_only_faults_at_its_address() {
        let mut bus = FaultyBus::new(0x0010, 0x0100);
        bus.write(0x0011, 0x22);
        assert_eq!(bus.read(0x0010), 0x0100);
        assert_eq!(bus.read(0x0011), 0x0022);
    }
}
