use crate::error::Result;
use crate::stop::StopSignal;

/// What a single `read_line` produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes up to and including a `\n`, or whatever had arrived when the
    /// line timeout expired.
    Line(Vec<u8>),
    /// The line timeout expired without a single byte arriving.
    TimedOut,
}

/// Minimal capability a line-oriented device must offer to be captured.
pub trait LineSource: Sized {
    type Config;

    /// Opens the device. Implementations that block should watch `stop` and
    /// return [`CaptureError::Interrupted`](crate::CaptureError::Interrupted)
    /// once it is raised.
    fn open(config: &Self::Config, stop: StopSignal) -> Result<Self>;

    /// Blocks until a full line is available, the line timeout expires, or
    /// the stop signal is raised. Partial data is dropped on interrupt.
    fn read_line(&mut self) -> Result<ReadOutcome>;

    /// Releases the device. Calling it more than once is harmless.
    fn close(&mut self) -> Result<()>;
}
