use log::{debug, info, warn};
use std::io::Write;

use crate::encoding::decode_line;
use crate::error::{CaptureError, Result};
use crate::source::{LineSource, ReadOutcome};
use crate::stop::StopSignal;

/// Printed once the capture stops because of a user interrupt.
pub const INTERRUPT_NOTICE: &str = "Keyboard Interrupt";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    pub lines: usize,
    pub bytes: usize,
    pub timeouts: usize,
}

/// Forwards every line from a [`LineSource`] to `out` as soon as it arrives,
/// until the stop signal is raised.
pub struct LineCapture<S, W> {
    source: S,
    out: W,
    stop: StopSignal,
    summary: CaptureSummary,
}

impl<S: LineSource, W: Write> LineCapture<S, W> {
    pub fn new(source: S, out: W, stop: StopSignal) -> Self {
        Self {
            source,
            out,
            stop,
            summary: CaptureSummary::default(),
        }
    }

    /// Runs until interrupted. Any other failure closes the source and is
    /// returned to the caller.
    pub fn run(mut self) -> Result<CaptureSummary> {
        let result = self.pump();
        if let Err(e) = self.source.close() {
            warn!("closing line source failed: {e}");
        }
        result?;

        writeln!(self.out, "{INTERRUPT_NOTICE}").map_err(CaptureError::Write)?;
        self.out.flush().map_err(CaptureError::Write)?;
        info!(
            "capture stopped after {} lines ({} bytes, {} empty timeouts)",
            self.summary.lines, self.summary.bytes, self.summary.timeouts
        );
        Ok(self.summary)
    }

    fn pump(&mut self) -> Result<()> {
        while !self.stop.is_raised() {
            match self.source.read_line() {
                Ok(ReadOutcome::Line(bytes)) => self.forward(&bytes)?,
                Ok(ReadOutcome::TimedOut) => {
                    self.summary.timeouts += 1;
                    debug!("no data before line timeout");
                }
                Err(CaptureError::Interrupted) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn forward(&mut self, bytes: &[u8]) -> Result<()> {
        let text = decode_line(bytes)?;
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(CaptureError::Write)?;
        self.summary.lines += 1;
        self.summary.bytes += bytes.len();
        debug!("forwarded {} bytes", bytes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io;
    use std::rc::Rc;

    #[derive(Clone, Copy)]
    enum Step {
        Line(&'static [u8]),
        Timeout,
        Interrupt,
        Fail(io::ErrorKind),
    }

    /// Fake device driven by a script. Once the script is exhausted it raises
    /// the stop signal, the way a Ctrl+C would.
    struct FakeSource {
        steps: VecDeque<Step>,
        stop: StopSignal,
        closed: Rc<RefCell<usize>>,
    }

    impl LineSource for FakeSource {
        type Config = (Vec<Step>, Rc<RefCell<usize>>);

        fn open(config: &Self::Config, stop: StopSignal) -> Result<Self> {
            Ok(Self {
                steps: config.0.iter().copied().collect(),
                stop,
                closed: Rc::clone(&config.1),
            })
        }

        fn read_line(&mut self) -> Result<ReadOutcome> {
            match self.steps.pop_front() {
                Some(Step::Line(b)) => Ok(ReadOutcome::Line(b.to_vec())),
                Some(Step::Timeout) => Ok(ReadOutcome::TimedOut),
                Some(Step::Fail(kind)) => Err(CaptureError::Read(io::Error::new(kind, "boom"))),
                Some(Step::Interrupt) | None => {
                    self.stop.raise();
                    Err(CaptureError::Interrupted)
                }
            }
        }

        fn close(&mut self) -> Result<()> {
            *self.closed.borrow_mut() += 1;
            Ok(())
        }
    }

    /// Output sink that records what had been written at each flush.
    #[derive(Default)]
    struct FlushLog {
        buf: Vec<u8>,
        flushed: Vec<String>,
    }

    impl Write for FlushLog {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushed.push(String::from_utf8_lossy(&self.buf).into_owned());
            Ok(())
        }
    }

    fn capture(steps: Vec<Step>) -> (Result<CaptureSummary>, FlushLog, usize) {
        let closed = Rc::new(RefCell::new(0));
        let stop = StopSignal::new();
        let source = FakeSource::open(&(steps, Rc::clone(&closed)), stop.clone()).unwrap();
        let mut out = FlushLog::default();
        let result = LineCapture::new(source, &mut out, stop).run();
        let closes = *closed.borrow();
        (result, out, closes)
    }

    #[test]
    fn hello_line_is_printed_and_flushed_immediately() {
        let (result, out, _) = capture(vec![Step::Line(b"hello\n")]);
        let summary = result.unwrap();
        assert_eq!(out.flushed[0], "hello\n");
        assert_eq!(summary.lines, 1);
        assert_eq!(summary.bytes, 6);
    }

    #[test]
    fn interrupt_mid_read_stops_cleanly_with_notice() {
        let (result, out, closes) = capture(vec![
            Step::Line(b"first\n"),
            Step::Interrupt,
            Step::Line(b"never\n"),
        ]);
        assert!(result.is_ok());
        assert_eq!(
            String::from_utf8(out.buf).unwrap(),
            "first\nKeyboard Interrupt\n"
        );
        assert_eq!(closes, 1);
    }

    #[test]
    fn timeouts_print_nothing_and_keep_going() {
        let (result, out, _) = capture(vec![
            Step::Timeout,
            Step::Line(b"a\n"),
            Step::Timeout,
            Step::Timeout,
            Step::Line(b"b\n"),
        ]);
        let summary = result.unwrap();
        assert_eq!(summary.timeouts, 3);
        assert_eq!(summary.lines, 2);
        assert_eq!(
            String::from_utf8(out.buf).unwrap(),
            "a\nb\nKeyboard Interrupt\n"
        );
    }

    #[test]
    fn each_line_is_flushed_on_its_own() {
        let (_, out, _) = capture(vec![Step::Line(b"1\n"), Step::Line(b"2\n")]);
        assert_eq!(out.flushed[0], "1\n");
        assert_eq!(out.flushed[1], "1\n2\n");
    }

    #[test]
    fn invalid_utf8_aborts() {
        let (result, out, closes) = capture(vec![Step::Line(b"ok\n"), Step::Line(b"\xc3\x28\n")]);
        assert!(matches!(result, Err(CaptureError::Decode { len: 3, .. })));
        assert_eq!(String::from_utf8(out.buf).unwrap(), "ok\n");
        assert_eq!(closes, 1);
    }

    #[test]
    fn read_failure_aborts_without_notice() {
        let (result, out, closes) = capture(vec![Step::Fail(io::ErrorKind::BrokenPipe)]);
        assert!(matches!(result, Err(CaptureError::Read(_))));
        assert!(out.buf.is_empty());
        assert_eq!(closes, 1);
    }

    #[test]
    fn pre_raised_stop_never_reads() {
        let closed = Rc::new(RefCell::new(0));
        let stop = StopSignal::new();
        let source =
            FakeSource::open(&(vec![Step::Line(b"x\n")], Rc::clone(&closed)), stop.clone())
                .unwrap();
        stop.raise();
        let mut out = Vec::new();
        let summary = LineCapture::new(source, &mut out, stop).run().unwrap();
        assert_eq!(summary, CaptureSummary::default());
        assert_eq!(out, b"Keyboard Interrupt\n");
    }
}
