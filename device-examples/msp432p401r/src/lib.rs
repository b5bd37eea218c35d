//! Board support glue for the MSP432P401R Launchpad demos.
//!
//! Register-level setup for the eUSCI A0 UART and eUSCI B0 SPI, plus the
//! `embedded-sdmmc` backing for the shell's filesystem seam. The DCO wakes
//! up at 3 MHz and the demos run on that default, so there is no clock
//! configuration here; the UART and SPI dividers assume it.

#![no_std]

pub mod sdfs;
pub mod serial;
pub mod spi;

use msp432p401r as pac;

const WDTPW: u16 = 0x5A00;
const WDTHOLD: u16 = 0x0080;

/// Stop the watchdog timer. Must happen before anything else at reset.
pub fn stop_watchdog(wdt: &pac::WDT_A) {
    wdt.wdtctl.write(|w| unsafe { w.bits(WDTPW | WDTHOLD) });
}

/// Make P1.0 (the red LED) an output, driven low.
pub fn init_led(dio: &pac::DIO) {
    dio.paout.modify(|r, w| unsafe { w.bits(r.bits() & !1) });
    dio.padir.modify(|r, w| unsafe { w.bits(r.bits() | 1) });
}

/// Toggle the P1.0 LED. Safe to call from interrupt context.
pub fn toggle_led(dio: &pac::DIO) {
    dio.paout.modify(|r, w| unsafe { w.bits(r.bits() ^ 1) });
}
