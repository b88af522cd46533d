/*!
core::ControlUnit - Public façade over `CuState`.

Design
======
- `ControlUnit` stores a single field: `state: CuState`.
- The register file (including SP and PC) lives in an `ExecutionUnit`, and
  memory / ports live behind a `Bus`. Both are borrowed per call.
- Public API: construction, reset, run-loop variants, single stepping,
  TRAP delivery, interrupt requests and read-only inspection.

Reset
=====
`reset` restores control-unit defaults and writes HLT at $0028 (the RST 5
vector). It does not touch execution-unit registers; the caller positions
PC and SP.

Run Loop
========
`run` marks the unit running and steps until HLT clears the flag. Each
step executes one instruction and then services at most one interrupt.
Faults (unknown opcode, invalid byte on the bus) stop the loop and are
returned to the caller.
*/

use crate::bus::Bus;
use crate::cpu::decode::HLT;
use crate::cpu::dispatch::{self, StepOutcome};
use crate::cpu::execute::Machine;
use crate::cpu::interrupts::{AckToken, Acknowledgement, InterruptLine, Interrupter, TRAP_VECTOR};
use crate::cpu::regs::ExecutionUnit;
use crate::cpu::state::CuState;
use crate::error::Result;

/// Address seeded with HLT on reset (RST 5 vector).
pub const RESET_HALT_ADDR: u16 = 0x0028;

#[derive(Debug, Clone, Default)]
pub struct ControlUnit {
    state: CuState,
}

impl ControlUnit {
    /// Construct a control unit with reset defaults (not running, DI, unmasked).
    pub fn new() -> Self {
        Self {
            state: CuState::new(),
        }
    }

    /// Return immutable reference to internal state (for inspection / testing).
    pub fn state(&self) -> &CuState {
        &self.state
    }

    /// Return mutable reference to internal state (escape hatch for tests and hosts).
    pub fn state_mut(&mut self) -> &mut CuState {
        &mut self.state
    }

    /// Restore defaults and seed HLT at `RESET_HALT_ADDR`.
    pub fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.state.reset();
        bus.write(RESET_HALT_ADDR, HLT);
        log::debug!("control unit reset");
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Opcode of the most recently fetched instruction.
    pub fn opcode(&self) -> u8 {
        self.state.opcode
    }

    pub fn interrupt_enabled(&self) -> bool {
        self.state.interrupt_enabled
    }

    // ---------------------------------------------------------------------
    // Interrupts
    // ---------------------------------------------------------------------

    /// Cloneable handle for raising interrupts, e.g. from another thread.
    pub fn interrupter(&self) -> Interrupter {
        self.state.interrupter().clone()
    }

    /// Request an interrupt on `line`; `false` if the line is masked.
    pub fn request_interrupt(&self, line: InterruptLine, token: Option<AckToken>) -> bool {
        self.state.interrupter().request(line, token)
    }

    pub fn interrupt_mask(&self) -> u8 {
        self.state.interrupter().mask()
    }

    pub fn pending_interrupt(&self) -> Option<InterruptLine> {
        self.state.interrupter().pending()
    }

    /// Deliver TRAP: push PC and jump to `TRAP_VECTOR`.
    ///
    /// Non-maskable. Ignores the enable flag and the mask, leaves any pending
    /// request untouched.
    pub fn trap<E: ExecutionUnit, B: Bus>(&mut self, eu: &mut E, bus: &mut B) {
        log::debug!("TRAP from {:04X}", eu.pc());
        Machine::new(&mut self.state, eu, bus).restart(TRAP_VECTOR);
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// Execute one instruction, then service a pending interrupt.
    pub fn step<E: ExecutionUnit, B: Bus>(&mut self, eu: &mut E, bus: &mut B) -> Result<StepOutcome> {
        dispatch::step(&mut self.state, eu, bus)
    }

    /// Run until HLT.
    pub fn run<E: ExecutionUnit, B: Bus>(&mut self, eu: &mut E, bus: &mut B) -> Result<()> {
        self.run_with(eu, bus, |_| {})
    }

    /// Run until HLT, reporting every serviced interrupt to `on_ack`.
    pub fn run_with<E, B, F>(&mut self, eu: &mut E, bus: &mut B, mut on_ack: F) -> Result<()>
    where
        E: ExecutionUnit,
        B: Bus,
        F: FnMut(Acknowledgement),
    {
        self.state.running = true;
        while self.state.running {
            if let Some(ack) = self.step(eu, bus)?.acknowledged {
                on_ack(ack);
            }
        }
        Ok(())
    }

    /// Run until HLT or until `max_steps` instructions have executed.
    ///
    /// Returns the number of instructions executed. The unit is still
    /// running afterwards if the budget ran out first.
    pub fn run_for<E: ExecutionUnit, B: Bus>(
        &mut self,
        eu: &mut E,
        bus: &mut B,
        max_steps: usize,
    ) -> Result<usize> {
        self.state.running = true;
        let mut steps = 0;
        while self.state.running && steps < max_steps {
            self.step(eu, bus)?;
            steps += 1;
        }
        Ok(steps)
    }
}

// -------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alu::Alu;
    use crate::bus::Memory;
    use crate::cpu::decode::Instruction;
    use crate::cpu::interrupts::RESET_MASK;
    use crate::error::CpuError;
    use crate::test_utils::{FaultyBus, PROGRAM_ORIGIN, STACK_TOP, setup};

    #[test]
    fn construction_and_reset() {
        let mut bus = Memory::new();
        let mut cu = ControlUnit::new();
        cu.state_mut().interrupt_enabled = true;
        cu.state_mut().opcode = 0xC3;
        cu.reset(&mut bus);
        assert!(!cu.is_running());
        assert!(!cu.interrupt_enabled());
        assert_eq!(cu.opcode(), 0x00);
        assert_eq!(cu.interrupt_mask(), RESET_MASK);
        assert_eq!(bus.peek(RESET_HALT_ADDR), HLT);
    }

    #[test]
    fn cloned_unit_has_its_own_interrupt_latch() {
        let a = ControlUnit::new();
        let b = a.clone();
        assert!(a.request_interrupt(InterruptLine::Rst55, None));
        assert_eq!(b.pending_interrupt(), None);

        let remote = b.interrupter();
        remote.request(InterruptLine::Rst75, Some(AckToken(5)));
        assert_eq!(a.pending_interrupt(), Some(InterruptLine::Rst55));
        assert_eq!(b.pending_interrupt(), Some(InterruptLine::Rst75));
    }

    #[test]
    fn step_reports_instruction() {
        let (mut cu, mut alu, mut bus) = setup(&[0xC6, 0x05]);
        let out = cu.step(&mut alu, &mut bus).unwrap();
        assert_eq!(out.instruction.to_string(), "ADI");
        assert_eq!(out.acknowledged, None);
        assert_eq!(cu.opcode(), 0xC6);
        assert_eq!(alu.a, 5);
    }

    #[test]
    fn run_stops_at_hlt() {
        // MVI A,$10 ; ADI $05 ; HLT
        let (mut cu, mut alu, mut bus) = setup(&[0x3E, 0x10, 0xC6, 0x05, HLT]);
        cu.run(&mut alu, &mut bus).unwrap();
        assert!(!cu.is_running());
        assert_eq!(alu.a, 0x15);
        assert_eq!(alu.pc, PROGRAM_ORIGIN + 5);
    }

    #[test]
    fn rst_5_after_reset_halts() {
        let (mut cu, mut alu, mut bus) = setup(&[0xEF]);
        cu.run(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.pc, RESET_HALT_ADDR + 1);
        assert_eq!(alu.sp, STACK_TOP - 2);
    }

    #[test]
    fn pending_interrupt_serviced_on_hlt_step() {
        // EI ; HLT, with RST 7.5 raised before running. EI is serviced first.
        let (mut cu, mut alu, mut bus) = setup(&[0xFB, HLT]);
        let vector = InterruptLine::Rst75.vector();
        bus.poke(vector, HLT);
        cu.interrupter().request(InterruptLine::Rst75, Some(AckToken(3)));
        let mut acks = Vec::new();
        cu.run_with(&mut alu, &mut bus, |a| acks.push(a)).unwrap();
        assert_eq!(
            acks,
            vec![Acknowledgement {
                line: InterruptLine::Rst75,
                token: Some(AckToken(3))
            }]
        );
        // Serviced after EI; the HLT at the vector stopped the run.
        assert_eq!(alu.pc, vector + 1);
        assert_eq!(bus.peek(STACK_TOP - 1), 0x01);
        assert_eq!(bus.peek(STACK_TOP - 2), 0x01);
        assert!(!cu.interrupt_enabled());
    }

    #[test]
    fn interrupt_raised_before_hlt_leaves_pc_at_vector() {
        let (mut cu, mut alu, mut bus) = setup(&[HLT]);
        cu.state_mut().interrupt_enabled = true;
        cu.request_interrupt(InterruptLine::Rst55, None);
        cu.run(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.pc, InterruptLine::Rst55.vector());
    }

    #[test]
    fn masked_line_is_never_serviced() {
        // MVI A,$0A (mask RST 6.5) ; SIM ; EI ; NOP ; HLT
        let (mut cu, mut alu, mut bus) = setup(&[0x3E, 0x0A, 0x30, 0xFB, 0x00, HLT]);
        cu.run_for(&mut alu, &mut bus, 2).unwrap();
        assert!(!cu.request_interrupt(InterruptLine::Rst65, None));
        cu.run(&mut alu, &mut bus).unwrap();
        assert_eq!(alu.pc, PROGRAM_ORIGIN + 6);
        assert!(cu.interrupt_enabled());
    }

    #[test]
    fn trap_ignores_enable_and_mask() {
        let (mut cu, mut alu, mut bus) = setup(&[0x3E, 0x0F, 0x30]);
        cu.run_for(&mut alu, &mut bus, 2).unwrap();
        assert_eq!(cu.interrupt_mask(), 0b111);
        assert!(!cu.interrupt_enabled());
        let return_pc = alu.pc;
        cu.trap(&mut alu, &mut bus);
        assert_eq!(alu.pc, TRAP_VECTOR);
        assert_eq!(bus.peek(STACK_TOP - 1), (return_pc >> 8) as u8);
        assert_eq!(bus.peek(STACK_TOP - 2), return_pc as u8);
    }

    #[test]
    fn run_for_respects_budget() {
        // JMP $0100 (loop forever)
        let (mut cu, mut alu, mut bus) = setup(&[0xC3, 0x00, 0x01]);
        let n = cu.run_for(&mut alu, &mut bus, 10).unwrap();
        assert_eq!(n, 10);
        assert!(cu.is_running());
        assert_eq!(alu.pc, PROGRAM_ORIGIN);
    }

    #[test]
    fn run_for_stops_early_on_hlt() {
        let (mut cu, mut alu, mut bus) = setup(&[0x00, HLT, 0x00]);
        let n = cu.run_for(&mut alu, &mut bus, 10).unwrap();
        assert_eq!(n, 2);
        assert!(!cu.is_running());
    }

    #[test]
    fn run_surfaces_faults() {
        let (mut cu, mut alu, mut bus) = setup(&[0x00, 0x08]);
        let err = cu.run(&mut alu, &mut bus).unwrap_err();
        assert_eq!(
            err,
            CpuError::InvalidOpcode {
                pc: PROGRAM_ORIGIN + 1,
                opcode: 0x08
            }
        );
    }

    #[test]
    fn invalid_byte_in_operand_reports_instruction_address() {
        let mut bus = FaultyBus::new(0x0201, 0x0100);
        let mut cu = ControlUnit::new();
        cu.reset(&mut bus);
        bus.inner.load(0x0200, &[0x00, 0x00]);
        let mut alu = Alu::new();
        alu.pc = 0x0200;
        // Second byte is an opcode fetch at $0201.
        let first = cu.step(&mut alu, &mut bus).unwrap();
        assert_eq!(first.instruction, Instruction::Nop);
        let err = cu.step(&mut alu, &mut bus).unwrap_err();
        assert_eq!(
            err,
            CpuError::InvalidByte {
                pc: 0x0201,
                addr: 0x0201,
                value: 0x0100
            }
        );

        // MVI A with its immediate on the faulty address.
        let mut bus = FaultyBus::new(0x0301, 0x1FF);
        cu.reset(&mut bus);
        bus.inner.load(0x0300, &[0x3E]);
        alu.pc = 0x0300;
        let err = cu.step(&mut alu, &mut bus).unwrap_err();
        assert_eq!(err.pc(), 0x0300);
    }
}
