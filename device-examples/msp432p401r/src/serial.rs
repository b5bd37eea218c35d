//! Blocking eUSCI A0 UART at 115200 8N1 on P1.2 (RX) / P1.3 (TX).
//!
//! The transmit half implements [`embedded_io::Write`] one byte per call,
//! busy-waiting on the TX-ready flag; the receive half is meant to be driven
//! from the `EUSCIA0_IRQ` interrupt handler.

use core::convert::Infallible;
use msp432p401r as pac;

const UCSWRST: u16 = 1 << 0;
const UCSSEL_SMCLK: u16 = 2 << 6;
const UCRXIE: u16 = 1 << 0;
const UCRXIFG: u16 = 1 << 0;
const UCTXIFG: u16 = 1 << 1;

// 3 MHz SMCLK / 26 = 115384 baud, low-frequency generation, no modulation
const BRDIV_115200: u16 = 26;

const UART_PINS: u16 = (1 << 2) | (1 << 3);

/// Transmit half of eUSCI A0.
pub struct SerialTx {
    _marker: (),
}

/// Receive half of eUSCI A0.
pub struct SerialRx {
    _marker: (),
}

/// Configure eUSCI A0 for 115200 8N1 sourced from SMCLK and split into
/// transmit and receive halves.
pub fn init(uart: pac::EUSCI_A0, dio: &pac::DIO) -> (SerialTx, SerialRx) {
    // P1.2/P1.3 to the primary module function
    dio.pasel0
        .modify(|r, w| unsafe { w.bits(r.bits() | UART_PINS) });
    dio.pasel1
        .modify(|r, w| unsafe { w.bits(r.bits() & !UART_PINS) });

    // Hold the module in reset while configuring
    uart.ucactlw0
        .write(|w| unsafe { w.bits(UCSWRST | UCSSEL_SMCLK) });
    uart.ucabrw.write(|w| unsafe { w.bits(BRDIV_115200) });
    uart.ucamctlw.write(|w| unsafe { w.bits(0) });
    uart.ucactlw0
        .modify(|r, w| unsafe { w.bits(r.bits() & !UCSWRST) });

    (SerialTx { _marker: () }, SerialRx { _marker: () })
}

impl SerialTx {
    /// Conjure a second transmit handle for the echo path in the receive
    /// interrupt handler.
    ///
    /// # Safety
    ///
    /// Output from the two handles interleaves at byte granularity. The
    /// caller must accept that an echo byte can land in the middle of
    /// main-loop output.
    pub unsafe fn steal() -> SerialTx {
        SerialTx { _marker: () }
    }

    fn try_write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        let uart = unsafe { &*pac::EUSCI_A0::ptr() };
        if uart.ucaifg.read().bits() & UCTXIFG == 0 {
            return Err(nb::Error::WouldBlock);
        }
        uart.ucatxbuf.write(|w| unsafe { w.bits(byte as u16) });
        Ok(())
    }

    /// Transmit one byte, spinning until the hardware buffer is free.
    pub fn write_byte(&mut self, byte: u8) {
        nb::block!(self.try_write(byte)).ok();
    }
}

impl embedded_io::ErrorType for SerialTx {
    type Error = Infallible;
}

impl embedded_io::Write for SerialTx {
    /// Send the first byte of `buf`, blocking until the transmitter accepts
    /// it. `write_all` loops this over a whole buffer.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.write_byte(buf[0]);
        Ok(1)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        let uart = unsafe { &*pac::EUSCI_A0::ptr() };
        while uart.ucaifg.read().bits() & UCTXIFG == 0 {}
        Ok(())
    }
}

impl SerialRx {
    /// Enable the receive interrupt. `EUSCIA0_IRQ` must also be unmasked in
    /// the NVIC.
    pub fn enable_rx_interrupt(&mut self) {
        let uart = unsafe { &*pac::EUSCI_A0::ptr() };
        uart.ucaie.modify(|r, w| unsafe { w.bits(r.bits() | UCRXIE) });
    }

    /// Whether a received byte is waiting.
    pub fn byte_ready(&self) -> bool {
        let uart = unsafe { &*pac::EUSCI_A0::ptr() };
        uart.ucaifg.read().bits() & UCRXIFG != 0
    }

    /// Read the received byte, clearing the receive flag. Call from the
    /// interrupt handler once the flag has fired.
    pub fn read_byte(&mut self) -> u8 {
        let uart = unsafe { &*pac::EUSCI_A0::ptr() };
        uart.ucarxbuf.read().bits() as u8
    }
}
