//! Line capture from serial devices: framing, strict decoding, and a
//! cooperative forward-to-stdout loop that stops on request.

pub mod capture;
pub mod encoding;
pub mod error;
pub mod framing;
pub mod serial_source;
pub mod source;
pub mod stop;

pub use capture::{CaptureSummary, LineCapture, INTERRUPT_NOTICE};
pub use encoding::decode_line;
pub use error::{CaptureError, Result};
pub use framing::LineFramer;
pub use serial_source::{list_ports, CaptureConfig, PortInfo, SerialLineSource};
pub use source::{LineSource, ReadOutcome};
pub use stop::StopSignal;
