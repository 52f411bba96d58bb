use log::{debug, info};
use serialport::{SerialPort, SerialPortInfo};
use std::fmt;
use std::io;
use std::time::Duration;

use crate::error::{CaptureError, Result};
use crate::framing::LineFramer;
use crate::source::{LineSource, ReadOutcome};
use crate::stop::StopSignal;

pub const DEFAULT_BAUD_RATE: u32 = 9600;
/// Longest wait for a single line before giving up on it.
pub const LINE_TIMEOUT: Duration = Duration::from_secs(120);
/// How often a blocked read wakes up to look at the stop signal.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct PortInfo {
    pub port_name: String,
    pub port_type: String,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (port_type, vid, pid, product) = match info.port_type {
            serialport::SerialPortType::UsbPort(usb) => {
                ("USB".to_string(), Some(usb.vid), Some(usb.pid), usb.product)
            }
            serialport::SerialPortType::PciPort => ("PCI".to_string(), None, None, None),
            serialport::SerialPortType::BluetoothPort => {
                ("Bluetooth".to_string(), None, None, None)
            }
            serialport::SerialPortType::Unknown => ("Unknown".to_string(), None, None, None),
        };
        Self {
            port_name: info.port_name,
            port_type,
            vid,
            pid,
            product,
        }
    }
}

impl fmt::Display for PortInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.port_name, self.port_type)?;
        if let (Some(vid), Some(pid)) = (self.vid, self.pid) {
            write!(f, " {vid:04x}:{pid:04x}")?;
        }
        if let Some(product) = &self.product {
            write!(f, " {product}")?;
        }
        write!(f, ")")
    }
}

/// Ports visible on this host. Enumeration failures yield an empty list.
pub fn list_ports() -> Vec<PortInfo> {
    serialport::available_ports()
        .unwrap_or_default()
        .into_iter()
        .map(PortInfo::from)
        .collect()
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: serialport::DataBits,
    pub parity: serialport::Parity,
    pub stop_bits: serialport::StopBits,
    pub flow_control: serialport::FlowControl,
    pub line_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: serialport::DataBits::Eight,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            flow_control: serialport::FlowControl::None,
            line_timeout: LINE_TIMEOUT,
            poll_interval: POLL_INTERVAL,
        }
    }
}

impl CaptureConfig {
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            ..Default::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_line_timeout(mut self, line_timeout: Duration) -> Self {
        self.line_timeout = line_timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// [`LineSource`] backed by a real serial device.
pub struct SerialLineSource {
    port_name: String,
    framer: Option<LineFramer<Box<dyn SerialPort>>>,
}

impl LineSource for SerialLineSource {
    type Config = CaptureConfig;

    fn open(cfg: &CaptureConfig, stop: StopSignal) -> Result<Self> {
        let port = serialport::new(&cfg.port_name, cfg.baud_rate)
            .data_bits(cfg.data_bits)
            .parity(cfg.parity)
            .stop_bits(cfg.stop_bits)
            .flow_control(cfg.flow_control)
            .timeout(cfg.poll_interval)
            .open()
            .map_err(|source| CaptureError::Open {
                port: cfg.port_name.clone(),
                source,
            })?;

        info!("opened {} at {} baud", cfg.port_name, cfg.baud_rate);
        Ok(Self {
            port_name: cfg.port_name.clone(),
            framer: Some(LineFramer::new(port, cfg.line_timeout, stop)),
        })
    }

    fn read_line(&mut self) -> Result<ReadOutcome> {
        match self.framer.as_mut() {
            Some(framer) => framer.read_line(),
            None => Err(CaptureError::Read(io::Error::new(
                io::ErrorKind::NotConnected,
                format!("{} is closed", self.port_name),
            ))),
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.framer.take().is_some() {
            debug!("closed {}", self.port_name);
        }
        Ok(())
    }
}
