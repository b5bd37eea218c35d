//! Serial shell over a FAT-formatted SD card.
//!
//! The UART receive interrupt feeds a line editor and echoes each keystroke;
//! the main loop polls for completed lines and hands them to the shell. The
//! red LED blinks from SysTick as a liveness heartbeat. Wire the SD card
//! slot to eUSCI B0 (P1.5/P1.6/P1.7) with chip select on P4.6 and talk to
//! the backchannel UART at 115200 8N1.

#![no_std]
#![no_main]

use core::cell::RefCell;
use core::fmt::Write as _;

use cortex_m::asm;
use cortex_m::interrupt::Mutex;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::{entry, exception};
use msp432p401r as pac;
use msp432p401r::interrupt;
use panic_halt as _;

use embedded_sdmmc::SdCard;
use launchpad::sdfs::SdVfs;
use launchpad::serial::{self, SerialRx, SerialTx};
use launchpad::spi::{McuDelay, SdSpi};
use sd_shell::{Console, Feed, LineEditor, Shell, GREETING};

static EDITOR: Mutex<RefCell<LineEditor>> = Mutex::new(RefCell::new(LineEditor::new()));
static RX: Mutex<RefCell<Option<SerialRx>>> = Mutex::new(RefCell::new(None));

// 3 MHz / 30000 = 100 Hz tick; the handler divides this down for the blink
const SYSTICK_RELOAD: u32 = 30_000 - 1;

#[entry]
fn main() -> ! {
    let p = pac::Peripherals::take().unwrap();
    let mut core = pac::CorePeripherals::take().unwrap();

    launchpad::stop_watchdog(&p.WDT_A);
    launchpad::init_led(&p.DIO);

    core.SYST.set_clock_source(SystClkSource::Core);
    core.SYST.set_reload(SYSTICK_RELOAD);
    core.SYST.clear_current();
    core.SYST.enable_counter();
    core.SYST.enable_interrupt();

    let (tx, mut rx) = serial::init(p.EUSCI_A0, &p.DIO);
    rx.enable_rx_interrupt();
    cortex_m::interrupt::free(|cs| RX.borrow(cs).replace(Some(rx)));
    unsafe { pac::NVIC::unmask(pac::Interrupt::EUSCIA0_IRQ) };

    let spi = SdSpi::new(p.EUSCI_B0, &p.DIO);
    let card = SdCard::new(spi, McuDelay);

    let mut console = Console::new(tx);
    write!(console, "{}", GREETING).ok();

    let vfs = match SdVfs::mount(card) {
        Ok(vfs) => vfs,
        Err(code) => {
            write!(console, "Card mount failed: {}\r\n", code.name()).ok();
            loop {
                asm::wfi();
            }
        }
    };

    let mut shell = Shell::new(vfs, console);
    shell.prompt();

    loop {
        let line = cortex_m::interrupt::free(|cs| EDITOR.borrow(cs).borrow_mut().take_line());
        match line {
            Some(line) => {
                // A line with invalid UTF-8 can't name any command; run it
                // as empty so the usual bad-command message comes back.
                shell.run_line(core::str::from_utf8(&line).unwrap_or(""));
            }
            None => asm::wfi(),
        }
    }
}

#[interrupt]
fn EUSCIA0_IRQ() {
    cortex_m::interrupt::free(|cs| {
        let mut rx = RX.borrow(cs).borrow_mut();
        let Some(rx) = rx.as_mut() else { return };
        if !rx.byte_ready() {
            return;
        }
        let byte = rx.read_byte();
        let mut echo = unsafe { SerialTx::steal() };
        match EDITOR.borrow(cs).borrow_mut().feed(byte) {
            Feed::Echo(b) => echo.write_byte(b),
            Feed::Rubout => echo.write_byte(0x08),
            Feed::Ready | Feed::Ignored => {}
        }
    });
}

#[exception]
fn SysTick() {
    static mut TICKS: u32 = 0;
    *TICKS += 1;
    if *TICKS >= 50 {
        *TICKS = 0;
        let dio = unsafe { &*pac::DIO::ptr() };
        launchpad::toggle_led(dio);
    }
}
