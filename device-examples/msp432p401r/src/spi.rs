//! eUSCI B0 SPI master for the SD card slot.
//!
//! P1.5 is UCB0CLK, P1.6 UCB0SIMO, P1.7 UCB0SOMI; chip select is plain GPIO
//! on P4.6, asserted around each [`SpiDevice`] transaction. The bus runs at
//! 375 kHz, inside the 400 kHz limit SD cards impose during initialization.

use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorType, Operation, SpiDevice};
use msp432p401r as pac;

const UCSWRST: u16 = 1 << 0;
const UCSSEL_SMCLK: u16 = 2 << 6;
const UCSYNC: u16 = 1 << 8;
const UCMST: u16 = 1 << 11;
const UCMSB: u16 = 1 << 13;
const UCCKPH: u16 = 1 << 15;

const UCRXIFG: u16 = 1 << 0;
const UCTXIFG: u16 = 1 << 1;

// 3 MHz SMCLK / 8 = 375 kHz
const SPI_DIV: u16 = 8;

const SPI_PINS: u16 = (1 << 5) | (1 << 6) | (1 << 7);

// P4.6 sits in the high byte of the port B pair
const CS_BIT: u16 = 1 << 14;

/// SPI bus plus chip-select line, one transaction per SD card command.
pub struct SdSpi {
    _marker: (),
}

impl SdSpi {
    /// Configure eUSCI B0 as a 3-wire SPI master (mode 0, MSB first) and the
    /// chip-select GPIO, deasserted.
    pub fn new(spi: pac::EUSCI_B0, dio: &pac::DIO) -> SdSpi {
        // SPI pins to the primary module function
        dio.pasel0
            .modify(|r, w| unsafe { w.bits(r.bits() | SPI_PINS) });
        dio.pasel1
            .modify(|r, w| unsafe { w.bits(r.bits() & !SPI_PINS) });

        // Chip select high (inactive) before the pin turns around to output
        dio.pbout.modify(|r, w| unsafe { w.bits(r.bits() | CS_BIT) });
        dio.pbdir.modify(|r, w| unsafe { w.bits(r.bits() | CS_BIT) });

        spi.ucbctlw0
            .write(|w| unsafe { w.bits(UCSWRST | UCSSEL_SMCLK | UCSYNC | UCMST | UCMSB | UCCKPH) });
        spi.ucbbrw.write(|w| unsafe { w.bits(SPI_DIV) });
        spi.ucbctlw0
            .modify(|r, w| unsafe { w.bits(r.bits() & !UCSWRST) });

        SdSpi { _marker: () }
    }

    fn assert_cs(&mut self) {
        let dio = unsafe { &*pac::DIO::ptr() };
        dio.pbout.modify(|r, w| unsafe { w.bits(r.bits() & !CS_BIT) });
    }

    fn deassert_cs(&mut self) {
        let dio = unsafe { &*pac::DIO::ptr() };
        dio.pbout.modify(|r, w| unsafe { w.bits(r.bits() | CS_BIT) });
    }

    /// Clock one byte out and one byte in.
    fn xfer(&mut self, byte: u8) -> u8 {
        let spi = unsafe { &*pac::EUSCI_B0::ptr() };
        while spi.ucbifg.read().bits() & UCTXIFG == 0 {}
        spi.ucbtxbuf.write(|w| unsafe { w.bits(byte as u16) });
        while spi.ucbifg.read().bits() & UCRXIFG == 0 {}
        spi.ucbrxbuf.read().bits() as u8
    }
}

impl ErrorType for SdSpi {
    type Error = Infallible;
}

impl SpiDevice for SdSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        self.assert_cs();
        for op in operations {
            match op {
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = self.xfer(0xFF);
                    }
                }
                Operation::Write(buf) => {
                    for &byte in buf.iter() {
                        self.xfer(byte);
                    }
                }
                Operation::Transfer(read, write) => {
                    let common = read.len().min(write.len());
                    for i in 0..common {
                        read[i] = self.xfer(write[i]);
                    }
                    for byte in read[common..].iter_mut() {
                        *byte = self.xfer(0xFF);
                    }
                    for &byte in write[common..].iter() {
                        self.xfer(byte);
                    }
                }
                Operation::TransferInPlace(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = self.xfer(*byte);
                    }
                }
                Operation::DelayNs(ns) => McuDelay.delay_ns(*ns),
            }
        }
        self.deassert_cs();
        Ok(())
    }
}

/// Cycle-counting delay, assuming the 3 MHz reset-default DCO.
pub struct McuDelay;

impl DelayNs for McuDelay {
    fn delay_ns(&mut self, ns: u32) {
        cortex_m::asm::delay(ns / 1000 * 3 + 1);
    }
}
