use std::thread;
use std::time::Duration;

use cu8085::{AckToken, Alu, ControlUnit, InterruptLine, Memory};

const ORIGIN: u16 = 0x0100;

fn build_demo_memory() -> Memory {
    let mut mem = Memory::new();

    // Main program at $0100
    let program: &[u8] = &[
        0x31, 0x00, 0xF0, // LXI SP,$F000
        0x3E, 0x10, // MVI A,$10
        0xC6, 0x05, // ADI $05 => A = 0x15
        0x21, 0x00, 0x02, // LXI H,$0200
        0x77, // MOV M,A
        0xFB, // EI
        0xC3, 0x0C, 0x01, // JMP $010C -> spin until interrupted
    ];
    mem.load(ORIGIN, program);

    // RST 7.5 service routine: write A to port 1 and stop.
    let isr: &[u8] = &[
        0xD3, 0x01, // OUT $01
        0x76, // HLT
    ];
    mem.load(InterruptLine::Rst75.vector(), isr);
    mem
}

fn main() {
    let mut bus = build_demo_memory();

    let mut cu = ControlUnit::new();
    cu.reset(&mut bus);
    let mut alu = Alu::new();
    alu.pc = ORIGIN;

    // Raise RST 7.5 from another thread while the program spins.
    let irq = cu.interrupter();
    let device = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        irq.request(InterruptLine::Rst75, Some(AckToken(1)))
    });

    let result = cu.run_with(&mut alu, &mut bus, |ack| {
        println!("acknowledged {} (token {:?})", ack.line, ack.token);
    });
    let accepted = device.join().unwrap_or(false);

    if let Err(e) = result {
        eprintln!("fault: {e}");
        std::process::exit(1);
    }

    // Inspect state
    println!("request accepted: {accepted}");
    println!("A: 0x{:02X}", alu.a);
    println!("F: 0b{:08b}", alu.f);
    println!("HL: 0x{:02X}{:02X}", alu.h, alu.l);
    println!("SP: 0x{:04X}", alu.sp);
    println!("PC: 0x{:04X}", alu.pc);
    println!("mem[0x0200]: 0x{:02X}", bus.peek(0x0200));
    println!("port[0x01]: 0x{:02X}", bus.port(0x01));
}
