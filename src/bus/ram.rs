/*!
RAM module: flat 64 KiB memory plus 256 I/O ports.

Memory map:
- $0000-$FFFF: RAM, no mirroring, no ROM protection
- Ports $00-$FF: independent latches (a write is read back unchanged)

This is the reference `Bus` used by the demo binary and the test suite.
Hosts with memory-mapped devices implement `Bus` themselves.
*/

use crate::bus::Bus;

/// Size of the addressable memory space (in bytes).
pub const MEMORY_SIZE: usize = 0x1_0000;

/// Number of I/O ports.
pub const PORT_COUNT: usize = 0x100;

pub struct Memory {
    data: Box<[u8]>,
    ports: [u8; PORT_COUNT],
}

impl Default for Memory {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Create a new memory instance initialized to 0.
    pub fn new() -> Self {
        Self {
            data: vec![0u8; MEMORY_SIZE].into_boxed_slice(),
            ports: [0; PORT_COUNT],
        }
    }

    /// Create memory with `program` copied in at `origin`.
    ///
    /// Bytes past $FFFF wrap around to $0000.
    pub fn with_program(origin: u16, program: &[u8]) -> Self {
        let mut mem = Self::new();
        mem.load(origin, program);
        mem
    }

    /// Copy `bytes` into memory starting at `origin` (wrapping at 16 bits).
    pub fn load(&mut self, origin: u16, bytes: &[u8]) {
        let mut addr = origin;
        for &b in bytes {
            self.data[addr as usize] = b;
            addr = addr.wrapping_add(1);
        }
    }

    /// Clear memory and ports to 0.
    pub fn reset(&mut self) {
        self.data.fill(0);
        self.ports.fill(0);
    }

    /// Read a byte without going through the `Bus` trait.
    #[inline]
    pub fn peek(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    /// Write a byte without going through the `Bus` trait.
    #[inline]
    pub fn poke(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    /// Current latch value of an I/O port.
    #[inline]
    pub fn port(&self, port: u8) -> u8 {
        self.ports[port as usize]
    }

    /// Preload an I/O port (e.g. a device input for `IN`).
    #[inline]
    pub fn set_port(&mut self, port: u8, value: u8) {
        self.ports[port as usize] = value;
    }
}

impl Bus for Memory {
    #[inline]
    fn read(&mut self, addr: u16) -> u16 {
        u16::from(self.data[addr as usize])
    }

    #[inline]
    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    #[inline]
    fn read_io(&mut self, port: u8) -> u8 {
        self.ports[port as usize]
    }

    #[inline]
    fn write_io(&mut self, port: u8, value: u8) {
        self.ports[port as usize] = value;
    }
}
