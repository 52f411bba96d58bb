use std::io;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("unable to open serial port {port}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("read from serial port failed")]
    Read(#[source] io::Error),

    #[error("received {len} bytes that are not valid UTF-8: {hex}")]
    Decode { len: usize, hex: String },

    #[error("write to output failed")]
    Write(#[source] io::Error),

    /// The stop signal was raised while waiting for a line.
    #[error("interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, CaptureError>;
