use std::io::{ErrorKind, Read};
use std::time::{Duration, Instant};

use log::trace;

use crate::error::{CaptureError, Result};
use crate::source::ReadOutcome;
use crate::stop::StopSignal;

const LINE_TERMINATOR: u8 = b'\n';
const CHUNK_SIZE: usize = 256;

/// Splits a byte stream into `\n` terminated lines.
///
/// The underlying reader is expected to return after a short poll interval
/// (either with data or with `ErrorKind::TimedOut`), which is when the stop
/// signal and the line deadline get checked. Bytes that arrive after a
/// terminator stay pending for the next call.
pub struct LineFramer<R> {
    reader: R,
    pending: Vec<u8>,
    line_timeout: Duration,
    stop: StopSignal,
}

impl<R: Read> LineFramer<R> {
    pub fn new(reader: R, line_timeout: Duration, stop: StopSignal) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            line_timeout,
            stop,
        }
    }

    pub fn read_line(&mut self) -> Result<ReadOutcome> {
        if let Some(line) = self.take_line() {
            return Ok(ReadOutcome::Line(line));
        }

        // A timeout too large to represent means the line never expires.
        let deadline = Instant::now().checked_add(self.line_timeout);
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            if self.stop.is_raised() {
                if !self.pending.is_empty() {
                    trace!("dropping {} bytes of unterminated line", self.pending.len());
                }
                self.pending.clear();
                return Err(CaptureError::Interrupted);
            }

            match self.reader.read(&mut buf) {
                Ok(0) => std::thread::sleep(Duration::from_millis(5)),
                Ok(n) => {
                    self.pending.extend_from_slice(&buf[..n]);
                    if let Some(line) = self.take_line() {
                        return Ok(ReadOutcome::Line(line));
                    }
                }
                // SIGINT may land during the read syscall; the stop check above handles it.
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(CaptureError::Read(e)),
            }

            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Ok(if self.pending.is_empty() {
                    ReadOutcome::TimedOut
                } else {
                    ReadOutcome::Line(std::mem::take(&mut self.pending))
                });
            }
        }
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let end = self.pending.iter().position(|&b| b == LINE_TERMINATOR)?;
        let rest = self.pending.split_off(end + 1);
        Some(std::mem::replace(&mut self.pending, rest))
    }
}
