//! Backchannel UART formatting and echo demo.
//!
//! Prints a few formatted values at startup, then echoes every received
//! character from the receive interrupt, pulsing the red LED per keystroke.
//! Talk to the backchannel UART at 115200 8N1.

#![no_std]
#![no_main]

use core::fmt::Write as _;

use cortex_m::asm;
use cortex_m_rt::entry;
use msp432p401r as pac;
use msp432p401r::interrupt;
use panic_halt as _;

use launchpad::serial::{self, SerialTx};
use sd_shell::Console;

#[entry]
fn main() -> ! {
    let p = pac::Peripherals::take().unwrap();

    launchpad::stop_watchdog(&p.WDT_A);
    launchpad::init_led(&p.DIO);

    let (tx, mut rx) = serial::init(p.EUSCI_A0, &p.DIO);
    rx.enable_rx_interrupt();
    unsafe { pac::NVIC::unmask(pac::Interrupt::EUSCIA0_IRQ) };

    let mut console = Console::new(tx);
    write!(console, "\n\nPrintf support for the launchpad\r\n").ok();
    write!(console, "Decimal: {}\r\n", 10).ok();
    write!(console, "Hex: {:x}\r\n", 10).ok();
    write!(console, "Float: {}\r\n", 4.32).ok();

    loop {
        asm::wfi();
    }
}

#[interrupt]
fn EUSCIA0_IRQ() {
    let uart = unsafe { &*pac::EUSCI_A0::ptr() };
    if uart.ucaifg.read().bits() & 1 == 0 {
        return;
    }
    let byte = uart.ucarxbuf.read().bits() as u8;
    let mut tx = unsafe { SerialTx::steal() };
    tx.write_byte(byte);
    let dio = unsafe { &*pac::DIO::ptr() };
    launchpad::toggle_led(dio);
}
