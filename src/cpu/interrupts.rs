/*!
interrupts.rs - Maskable vectored interrupts, TRAP, SIM.

State Machine
=============
  interrupt_enabled : bool                  (held by `CuState`, EI / DI)
  mask              : 3 bits, one per line  (shared latch, SIM)
  pending           : none | line + token   (shared latch, `Interrupter::request`)

Request (any thread, any time)
------------------------------
If the line's mask bit is set the request is dropped (never queued).
Otherwise it replaces whatever is pending: last requester wins, there is
no priority arbitration between lines.

Servicing (once per step, after the instruction)
------------------------------------------------
Nothing happens while interrupts are disabled or nothing is pending.
Otherwise: disable interrupts, take the pending record (clearing it), call
`base + index * 8` exactly like RST does, and hand the requester's token
back to the caller as an `Acknowledgement`.

TRAP is non-maskable and bypasses all of the above; it is delivered by a
direct call (`ControlUnit::trap`), never queued.

Sharing
=======
The mask and the pending record are the only state shared with the
outside. They live in an `InterruptLatch` behind `Arc<Mutex<_>>`;
`Interrupter` is the cloneable handle to it. The lock is held only for the
duration of a field update, never across a bus access.

Vectors (8085)
==============
  TRAP    -> $0024
  RST 5.5 -> $002C
  RST 6.5 -> $0034
  RST 7.5 -> $003C
*/

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Non-maskable TRAP entry point.
pub const TRAP_VECTOR: u16 = 0x0024;
/// Vector of line 0 (RST 5.5); line `n` vectors to `LINE_VECTOR_BASE + n * 8`.
pub const LINE_VECTOR_BASE: u16 = 0x002C;
/// Mask after reset: every line unmasked.
pub const RESET_MASK: u8 = 0b000;
/// Mask bits (M5.5, M6.5, M7.5).
pub const MASK_BITS: u8 = 0b0000_0111;
/// SIM: mask-set-enable bit of the accumulator.
pub const SIM_MASK_ENABLE: u8 = 0b0000_1000;

/// The three maskable vectored interrupt lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterruptLine {
    Rst55,
    Rst65,
    Rst75,
}

impl InterruptLine {
    pub const ALL: [InterruptLine; 3] = [
        InterruptLine::Rst55,
        InterruptLine::Rst65,
        InterruptLine::Rst75,
    ];

    /// Line index (0 = RST 5.5, 1 = RST 6.5, 2 = RST 7.5).
    #[inline]
    pub fn index(self) -> u8 {
        match self {
            InterruptLine::Rst55 => 0,
            InterruptLine::Rst65 => 1,
            InterruptLine::Rst75 => 2,
        }
    }

    #[inline]
    pub fn from_index(index: u8) -> Option<InterruptLine> {
        Self::ALL.get(index as usize).copied()
    }

    /// Mask bit for this line.
    #[inline]
    pub fn mask_bit(self) -> u8 {
        1 << self.index()
    }

    /// Service entry point.
    #[inline]
    pub fn vector(self) -> u16 {
        LINE_VECTOR_BASE + u16::from(self.index()) * 8
    }
}

impl fmt::Display for InterruptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InterruptLine::Rst55 => "RST 5.5",
            InterruptLine::Rst65 => "RST 6.5",
            InterruptLine::Rst75 => "RST 7.5",
        };
        f.write_str(s)
    }
}

/// Opaque requester-chosen id, handed back when the request is serviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AckToken(pub u32);

/// Notice that a pending interrupt was accepted and its vector taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgement {
    pub line: InterruptLine,
    pub token: Option<AckToken>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingInterrupt {
    pub line: InterruptLine,
    pub token: Option<AckToken>,
}

#[derive(Debug, Clone)]
struct InterruptLatch {
    mask: u8,
    pending: Option<PendingInterrupt>,
}

impl Default for InterruptLatch {
    fn default() -> Self {
        Self {
            mask: RESET_MASK,
            pending: None,
        }
    }
}

/// Cloneable, thread-safe handle for raising interrupt requests.
///
/// Every clone refers to the same latch as the control unit that created it.
/// A request is observed by the next servicing point, never mid-instruction.
#[derive(Debug, Clone, Default)]
pub struct Interrupter {
    latch: Arc<Mutex<InterruptLatch>>,
}

impl Interrupter {
    pub fn new() -> Self {
        Self::default()
    }

    // The latch is plain data with no multi-field invariant, so a poisoned
    // lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, InterruptLatch> {
        self.latch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Request an interrupt on `line`.
    ///
    /// Returns `false` if the line is masked and the request was dropped.
    /// An accepted request replaces any unserviced one.
    pub fn request(&self, line: InterruptLine, token: Option<AckToken>) -> bool {
        let mut latch = self.lock();
        if latch.mask & line.mask_bit() != 0 {
            log::debug!("{line} request dropped (mask {:03b})", latch.mask);
            return false;
        }
        if let Some(prev) = latch.pending.replace(PendingInterrupt { line, token }) {
            log::debug!("{line} request replaces unserviced {}", prev.line);
        } else {
            log::debug!("{line} request pending");
        }
        true
    }

    /// Current 3-bit mask.
    pub fn mask(&self) -> u8 {
        self.lock().mask
    }

    /// Line of the pending request, if any.
    pub fn pending(&self) -> Option<InterruptLine> {
        self.lock().pending.map(|p| p.line)
    }

    pub(crate) fn set_mask(&self, mask: u8) {
        self.lock().mask = mask & MASK_BITS;
    }

    pub(crate) fn take_pending(&self) -> Option<PendingInterrupt> {
        self.lock().pending.take()
    }

    /// New, unconnected latch holding a copy of this one's mask and pending record.
    pub(crate) fn detached(&self) -> Interrupter {
        let copy = self.lock().clone();
        Interrupter {
            latch: Arc::new(Mutex::new(copy)),
        }
    }

    /// Restore reset defaults in place; existing handles stay connected.
    pub(crate) fn reset(&self) {
        *self.lock() = InterruptLatch::default();
    }

    /// SIM: overwrite the mask from A[2:0] when A[3] is set, otherwise no-op.
    pub(crate) fn apply_sim(&self, acc: u8) {
        if acc & SIM_MASK_ENABLE == 0 {
            return;
        }
        let mut latch = self.lock();
        latch.mask = (latch.mask & !MASK_BITS) | (acc & MASK_BITS);
        log::debug!("SIM mask {:03b}", latch.mask);
    }
}
