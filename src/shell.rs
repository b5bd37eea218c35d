//! Shell engine: command handlers and the dispatch entry point.
//!
//! [`Shell`] owns the filesystem handle, the console, and the working
//! directory. The firmware main loop hands it completed input lines;
//! everything else (tokenizing, table lookup, handler execution, output
//! formatting) happens here. Handlers are stateless beyond the working
//! directory and return filesystem result codes unchanged.

use core::fmt::Write as _;

use crate::cmdline::{lookup, tokenize, Cmd, ShellError, CMD_TABLE};
use crate::console::Console;
use crate::fs::{Attributes, ErrorCode, Vfs};
use crate::path::{self, PathBuf, PathTooLong, PATH_BUF_SIZE};

/// Startup banner, printed before the filesystem mounts so it still shows
/// when the card is absent.
pub const GREETING: &str = "\n\nSD Card Example Program\r\nType 'help' for help.\r\n";

/// The interactive shell over one mounted volume.
pub struct Shell<V: Vfs, W: embedded_io::Write> {
    vfs: V,
    console: Console<W>,
    cwd: PathBuf,
}

impl<V: Vfs, W: embedded_io::Write> Shell<V, W> {
    /// New shell at the root directory.
    pub fn new(vfs: V, console: Console<W>) -> Self {
        Shell {
            vfs,
            console,
            cwd: path::root(),
        }
    }

    /// The committed current working directory.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// Print the startup greeting.
    pub fn greet(&mut self) {
        write!(self.console, "{}", GREETING).ok();
    }

    /// Print the prompt.
    pub fn prompt(&mut self) {
        write!(self.console, ">").ok();
    }

    /// Tokenize one completed line and run the matching command.
    ///
    /// An empty line is reported as [`ShellError::BadCmd`]; a handler's
    /// result code is propagated unchanged in [`ShellError::Cmd`].
    pub fn process_line(&mut self, line: &str) -> Result<(), ShellError> {
        let argv = tokenize(line)?;
        let name = *argv.first().ok_or(ShellError::BadCmd)?;
        let entry = lookup(name).ok_or(ShellError::BadCmd)?;
        let result = match entry.cmd {
            Cmd::Help => self.cmd_help(),
            Cmd::Ls => self.cmd_ls(),
            Cmd::Chdir => self.cmd_cd(&argv),
            Cmd::Pwd => self.cmd_pwd(),
            Cmd::Cat => self.cmd_cat(&argv),
        };
        result.map_err(ShellError::Cmd)
    }

    /// Process one line the way the firmware main loop does: run it, print
    /// any failure message, then print the prompt.
    pub fn run_line(&mut self, line: &str) {
        match self.process_line(line) {
            Ok(()) => {}
            Err(ShellError::BadCmd) => {
                write!(self.console, "Bad or no command!\r\n").ok();
            }
            Err(ShellError::TooManyArgs) => {
                write!(self.console, "Too many arguments for command processor!\r\n").ok();
            }
            Err(ShellError::Cmd(code)) => {
                write!(self.console, "Command returned error code {}\r\n", code.name()).ok();
            }
        }
        self.prompt();
    }

    fn cmd_help(&mut self) -> Result<(), ErrorCode> {
        write!(self.console, "\nAvailable commands\r\n------------------\r\n").ok();
        for entry in CMD_TABLE {
            write!(self.console, "{:>6}: {}\r\n", entry.name, entry.help).ok();
        }
        Ok(())
    }

    fn cmd_ls(&mut self) -> Result<(), ErrorCode> {
        let mut dir = self.vfs.open_dir(&self.cwd)?;

        let mut total_size: u32 = 0;
        let mut file_count: u32 = 0;
        let mut dir_count: u32 = 0;

        write!(self.console, "\r\n").ok();

        loop {
            let entry = match self.vfs.read_entry(&mut dir) {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(code) => {
                    self.vfs.close_dir(dir);
                    return Err(code);
                }
            };

            if entry.is_dir() {
                dir_count += 1;
            } else {
                file_count += 1;
                total_size += entry.size;
            }

            write!(
                self.console,
                "{}{}{}{}{} {}/{:02}/{:02} {:02}:{:02} {:9}  {}\r\n",
                if entry.attr.contains(Attributes::DIRECTORY) { 'D' } else { '-' },
                if entry.attr.contains(Attributes::READ_ONLY) { 'R' } else { '-' },
                if entry.attr.contains(Attributes::HIDDEN) { 'H' } else { '-' },
                if entry.attr.contains(Attributes::SYSTEM) { 'S' } else { '-' },
                if entry.attr.contains(Attributes::ARCHIVE) { 'A' } else { '-' },
                entry.date.year(),
                entry.date.month(),
                entry.date.day(),
                entry.time.hour(),
                entry.time.minute(),
                entry.size,
                entry.name.as_str(),
            )
            .ok();
        }
        self.vfs.close_dir(dir);

        write!(
            self.console,
            "\n{:4} File(s),{:10} bytes total\r\n{:4} Dir(s)",
            file_count, total_size, dir_count
        )
        .ok();

        let free = self.vfs.free_space_kib()?;
        write!(self.console, ", {:10}K bytes free\r\n", free).ok();
        Ok(())
    }

    fn cmd_pwd(&mut self) -> Result<(), ErrorCode> {
        write!(self.console, "\r\n{}\r\n", self.cwd.as_str()).ok();
        Ok(())
    }

    fn cmd_cd(&mut self, argv: &[&str]) -> Result<(), ErrorCode> {
        let Some(&arg) = argv.get(1) else {
            return Err(ErrorCode::InvalidParameter);
        };

        let candidate = match path::resolve(&self.cwd, arg) {
            Ok(candidate) => candidate,
            Err(PathTooLong) => {
                write!(self.console, "Resulting path name is too long\r\n").ok();
                return Ok(());
            }
        };

        // Verify the candidate opens as a directory before committing it, so
        // the committed path is always known-valid at the time it was set.
        match self.vfs.open_dir(&candidate) {
            Ok(dir) => {
                self.vfs.close_dir(dir);
                self.cwd = candidate;
                Ok(())
            }
            Err(code) => {
                write!(self.console, "cd: {}\r\n", candidate.as_str()).ok();
                Err(code)
            }
        }
    }

    fn cmd_cat(&mut self, argv: &[&str]) -> Result<(), ErrorCode> {
        let Some(&name) = argv.get(1) else {
            return Err(ErrorCode::InvalidParameter);
        };

        // The fully qualified name must fit before any filesystem call is
        // attempted.
        let full = match path::join(&self.cwd, name) {
            Ok(full) => full,
            Err(PathTooLong) => {
                write!(self.console, "Resulting path name is too long\r\n").ok();
                return Ok(());
            }
        };

        let mut file = self.vfs.open_file(&full)?;
        write!(self.console, "\r\n").ok();

        // Chunked read loop; a read shorter than the request signals
        // end-of-file.
        let mut chunk = [0u8; PATH_BUF_SIZE - 1];
        loop {
            let n = match self.vfs.read(&mut file, &mut chunk) {
                Ok(n) => n,
                Err(code) => {
                    self.vfs.close_file(file);
                    write!(self.console, "\r\n").ok();
                    return Err(code);
                }
            };
            self.console.write_bytes(&chunk[..n]);
            if n < chunk.len() {
                break;
            }
        }
        self.vfs.close_file(file);

        write!(self.console, "\r\n").ok();
        Ok(())
    }
}
