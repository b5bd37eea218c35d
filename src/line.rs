//! Interrupt-context line editor.
//!
//! [`LineEditor`] accumulates received bytes into a fixed-capacity buffer,
//! handling backspace and line terminators. It performs no I/O itself: each
//! call to [`LineEditor::feed`] returns a [`Feed`] action telling the caller
//! (normally the UART receive interrupt handler) what to echo. The main loop
//! polls [`LineEditor::take_line`] to collect completed lines.
//!
//! The editor is the only state shared between interrupt and main-loop
//! contexts. The handoff contract is single-producer/single-consumer: the
//! consumer is expected to drain a completed line before the next one
//! finishes. A slower consumer loses input silently as later bytes overwrite
//! the buffer; that race is accepted for single-user interactive use.

/// Capacity of the line buffer in bytes.
pub const CMD_BUF_SIZE: usize = 64;

const BACKSPACE: u8 = 0x08;
const ESCAPE: u8 = 0x1b;

/// Action the caller should take in response to one received byte.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feed {
    /// Byte was stored; echo it back verbatim.
    Echo(u8),
    /// Last character was rubbed out; echo a backspace.
    Rubout,
    /// Terminator received; a completed line is ready for the main loop.
    Ready,
    /// Byte was dropped: buffer full, or backspace on an empty line.
    Ignored,
}

/// Accumulates one command line at a time from single received bytes.
pub struct LineEditor {
    buf: [u8; CMD_BUF_SIZE],
    count: usize,
    line_len: usize,
    ready: bool,
}

impl LineEditor {
    /// An empty editor, ready for input.
    pub const fn new() -> Self {
        LineEditor {
            buf: [0; CMD_BUF_SIZE],
            count: 0,
            line_len: 0,
            ready: false,
        }
    }

    /// Feed one received byte, returning what to echo.
    ///
    /// Carriage return, line feed and escape each independently terminate the
    /// current line; the terminator itself is not stored. Backspace
    /// decrements the count without erasing the stored byte (future writes
    /// overwrite it). Any other byte is stored while there is room, and
    /// silently dropped once the buffer is full, until the next terminator.
    pub fn feed(&mut self, byte: u8) -> Feed {
        match byte {
            BACKSPACE => {
                if self.count > 0 {
                    self.count -= 1;
                    Feed::Rubout
                } else {
                    Feed::Ignored
                }
            }
            b'\r' | b'\n' | ESCAPE => {
                self.line_len = self.count;
                self.count = 0;
                self.ready = true;
                Feed::Ready
            }
            _ => {
                if self.count < CMD_BUF_SIZE {
                    self.buf[self.count] = byte;
                    self.count += 1;
                    Feed::Echo(byte)
                } else {
                    Feed::Ignored
                }
            }
        }
    }

    /// Whether a completed line is waiting for the main loop.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Content of the completed line. Meaningful only while [`is_ready`]
    /// returns true; afterwards the interrupt handler is free to overwrite it.
    ///
    /// [`is_ready`]: LineEditor::is_ready
    pub fn line(&self) -> &[u8] {
        &self.buf[..self.line_len]
    }

    /// Copy the completed line out, clear the buffer, and rearm the editor.
    ///
    /// Returns `None` when no line is pending. Call this from the main loop,
    /// inside the same critical section that guards [`feed`].
    ///
    /// [`feed`]: LineEditor::feed
    pub fn take_line(&mut self) -> Option<heapless::Vec<u8, CMD_BUF_SIZE>> {
        if !self.ready {
            return None;
        }
        // line_len never exceeds CMD_BUF_SIZE, so this cannot fail
        let line = heapless::Vec::from_slice(self.line()).unwrap_or_default();
        self.buf = [0; CMD_BUF_SIZE];
        self.line_len = 0;
        self.ready = false;
        Some(line)
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        LineEditor::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(ed: &mut LineEditor, bytes: &[u8]) {
        for &b in bytes {
            ed.feed(b);
        }
    }

    #[test]
    fn printable_bytes_stored_and_echoed_verbatim() {
        let mut ed = LineEditor::new();
        for &b in b"ls -l" {
            assert_eq!(ed.feed(b), Feed::Echo(b));
            assert!(!ed.is_ready());
        }
        assert_eq!(ed.feed(b'\r'), Feed::Ready);
        assert!(ed.is_ready());
        assert_eq!(ed.line(), b"ls -l");
    }

    #[test]
    fn each_terminator_closes_the_line() {
        for term in [b'\r', b'\n', 0x1b] {
            let mut ed = LineEditor::new();
            feed_all(&mut ed, b"pwd");
            assert_eq!(ed.feed(term), Feed::Ready);
            assert_eq!(&ed.take_line().unwrap()[..], b"pwd");
        }
    }

    #[test]
    fn cr_lf_produces_two_lines() {
        // CR and LF are independent terminators; the second closes an empty
        // line rather than being swallowed.
        let mut ed = LineEditor::new();
        feed_all(&mut ed, b"help");
        ed.feed(b'\r');
        assert_eq!(&ed.take_line().unwrap()[..], b"help");
        ed.feed(b'\n');
        assert_eq!(&ed.take_line().unwrap()[..], b"");
    }

    #[test]
    fn backspace_rubs_out_last_byte() {
        let mut ed = LineEditor::new();
        feed_all(&mut ed, b"cst");
        assert_eq!(ed.feed(0x08), Feed::Rubout);
        assert_eq!(ed.feed(0x08), Feed::Rubout);
        feed_all(&mut ed, b"at");
        ed.feed(b'\n');
        assert_eq!(ed.line(), b"cat");
    }

    #[test]
    fn backspace_on_empty_line_is_ignored() {
        let mut ed = LineEditor::new();
        assert_eq!(ed.feed(0x08), Feed::Ignored);
        ed.feed(b'\r');
        assert_eq!(ed.line(), b"");
    }

    #[test]
    fn excess_input_dropped_without_echo() {
        let mut ed = LineEditor::new();
        for i in 0..CMD_BUF_SIZE {
            assert_eq!(ed.feed(b'a'), Feed::Echo(b'a'), "byte {}", i);
        }
        // Everything past capacity vanishes until the terminator
        assert_eq!(ed.feed(b'b'), Feed::Ignored);
        assert_eq!(ed.feed(b'b'), Feed::Ignored);
        ed.feed(b'\r');
        assert_eq!(ed.line().len(), CMD_BUF_SIZE);
        assert!(ed.line().iter().all(|&b| b == b'a'));
    }

    #[test]
    fn backspace_reopens_a_full_buffer() {
        let mut ed = LineEditor::new();
        feed_all(&mut ed, &[b'x'; CMD_BUF_SIZE]);
        assert_eq!(ed.feed(0x08), Feed::Rubout);
        assert_eq!(ed.feed(b'y'), Feed::Echo(b'y'));
        ed.feed(b'\n');
        assert_eq!(ed.line().last(), Some(&b'y'));
    }

    #[test]
    fn take_line_rearms_for_next_command() {
        let mut ed = LineEditor::new();
        feed_all(&mut ed, b"pwd");
        ed.feed(b'\r');
        assert_eq!(&ed.take_line().unwrap()[..], b"pwd");
        assert!(ed.take_line().is_none());
        feed_all(&mut ed, b"ls");
        ed.feed(b'\r');
        assert_eq!(&ed.take_line().unwrap()[..], b"ls");
    }
}
