/*!
bus: Trait abstraction decoupling the control unit from concrete memory and
I/O devices.

Overview
========
The control unit only needs four capabilities from the system bus:
  - read / write one byte of the 16-bit memory space
  - read / write one byte of the 8-bit I/O port space

Accepting a trait instead of a concrete memory type:
  * Keeps the control unit testable with lightweight mocks (including buses
    that deliberately misbehave).
  * Lets hosts map ROM, RAM and memory-mapped devices however they like.

Data Lines
==========
`read` returns the raw value driven on the data lines as a `u16`. A
well-behaved device only ever drives 0x00-0xFF. The control unit validates
every memory read and reports anything wider as `CpuError::InvalidByte`
instead of silently truncating it. I/O port reads are plain bytes.

Modules
=======
- ram: flat 64 KiB RAM + 256 I/O port reference implementation (`Memory`).
*/

pub mod ram;

pub use ram::Memory;

/// Minimal interface the control unit depends on for memory and port access.
pub trait Bus {
    /// Read the data-line value at a memory address.
    fn read(&mut self, addr: u16) -> u16;

    /// Write one byte to a memory address.
    fn write(&mut self, addr: u16, value: u8);

    /// Read one byte from an I/O port.
    fn read_io(&mut self, port: u8) -> u8;

    /// Write one byte to an I/O port.
    fn write_io(&mut self, port: u8, value: u8);
}
