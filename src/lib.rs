//! Minimal serial command-line shell over a FAT filesystem, for TI Launchpad
//! demo firmware.
//!
//! The crate holds the hardware-independent core of the SD-card shell demo:
//! an interrupt-fed [`LineEditor`], a table-driven command dispatcher, the
//! working-directory [`path`] resolver, and the [`Shell`] engine implementing
//! `help`, `ls`, `pwd`, `cd`/`chdir` and `cat`. The FAT library and the
//! serial port stay behind two seams: [`Vfs`] for the filesystem and
//! [`embedded_io::Write`] for the byte transport, so the whole shell runs
//! under the host test harness with mocks.
//!
//! The firmware glue for the MSP432P401R Launchpad, including the
//! `embedded-sdmmc` backing for [`Vfs`] and the eUSCI UART/SPI setup, lives
//! in `device-examples/msp432p401r/`.
//!
//! # Usage
//!
//! Feed received bytes to a [`LineEditor`] from the UART receive interrupt,
//! echoing per the returned [`Feed`] action. In the main loop, poll
//! [`LineEditor::take_line`] and hand completed lines to
//! [`Shell::run_line`], which runs the command and prints any failure
//! message followed by the `>` prompt.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

pub mod cmdline;
pub mod console;
pub mod fs;
pub mod line;
pub mod path;
pub mod shell;

pub use cmdline::{ShellError, MAX_ARGS};
pub use console::Console;
pub use fs::{Attributes, DirEntry, ErrorCode, FatDate, FatTime, Vfs};
pub use line::{Feed, LineEditor, CMD_BUF_SIZE};
pub use path::{PathBuf, PATH_BUF_SIZE};
pub use shell::{Shell, GREETING};
