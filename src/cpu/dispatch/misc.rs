/*!
misc.rs - NOP, port I/O and interrupt-control family handler

  NOP      (0x00)
  IN  p8   (0xDB)   A <- port p8
  OUT p8   (0xD3)   port p8 <- A
  EI       (0xFB)   enable maskable interrupts
  DI       (0xF3)   disable maskable interrupts
  SIM      (0x30)   A[3] set: mask <- A[2:0]

EI takes effect immediately: an interrupt pending when EI executes is
serviced at the end of that same step.
*/

use crate::bus::Bus;
use crate::cpu::decode::Instruction;
use crate::cpu::execute::Machine;
use crate::cpu::regs::ExecutionUnit;
use crate::error::Result;

pub(crate) fn handle<E: ExecutionUnit, B: Bus>(
    instr: Instruction,
    m: &mut Machine<'_, E, B>,
) -> Result<bool> {
    match instr {
        Instruction::Nop => {}
        Instruction::Input => {
            let port = m.fetch_u8()?;
            let v = m.bus.read_io(port);
            m.eu.set_a(v);
        }
        Instruction::Output => {
            let port = m.fetch_u8()?;
            let a = m.eu.a();
            m.bus.write_io(port, a);
        }
        Instruction::EnableInterrupts => m.cu.interrupt_enabled = true,
        Instruction::DisableInterrupts => m.cu.interrupt_enabled = false,
        Instruction::SetInterruptMask => m.cu.interrupter().apply_sim(m.eu.a()),
        _ => return Ok(false),
    }
    Ok(true)
}
