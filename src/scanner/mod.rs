//! Barcode scanner input.
//!
//! Scanners either act as a USB HID keyboard (the GUI feeds their keystrokes
//! into a [`PayloadBuffer`]) or sit on a serial port ([`SerialScanner`]). Both
//! terminate each barcode with a carriage return.

mod error;
mod serial;

pub use error::ScanError;
pub use serial::{read_payloads, SerialScanner};

use crate::config::ScannerConfig;
use tracing::{info, warn};

/// Whether this client may read from the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Unknown,
    Granted,
    Denied,
}

/// Longest line accepted from a scanner. Card payloads are a few dozen bytes.
pub const MAX_PAYLOAD_BYTES: usize = 4096;

/// Collects scanner output until a line terminator arrives.
///
/// A line longer than [`MAX_PAYLOAD_BYTES`] is dropped whole: the buffer
/// discards everything up to the next terminator.
#[derive(Debug, Default)]
pub struct PayloadBuffer {
    bytes: Vec<u8>,
    overflowed: bool,
}

impl PayloadBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one byte, returning the finished payload when it ends a line.
    /// Blank lines produce nothing.
    pub fn push_byte(&mut self, byte: u8) -> Option<String> {
        if byte != b'\r' && byte != b'\n' {
            if self.overflowed {
                return None;
            }
            if self.bytes.len() >= MAX_PAYLOAD_BYTES {
                warn!(
                    limit = MAX_PAYLOAD_BYTES,
                    "scanner line too long, discarding until end of line"
                );
                self.bytes.clear();
                self.overflowed = true;
                return None;
            }
            self.bytes.push(byte);
            return None;
        }

        if self.overflowed {
            self.overflowed = false;
            return None;
        }

        let line = String::from_utf8_lossy(&self.bytes).trim().to_owned();
        self.bytes.clear();
        if line.is_empty() {
            None
        } else {
            Some(line)
        }
    }

    pub fn push_char(&mut self, c: char) -> Option<String> {
        let mut encoded = [0u8; 4];
        let mut finished = None;
        for byte in c.encode_utf8(&mut encoded).bytes() {
            if let Some(payload) = self.push_byte(byte) {
                finished = Some(payload);
            }
        }
        finished
    }
}

/// Whether a key typed while scanning belongs to the scanner rather than to
/// the focused widget. Keyboard-wedge scanners type printable characters and
/// finish with Return.
pub fn is_scanner_key(c: char) -> bool {
    c == '\r' || c == '\n' || !c.is_control()
}

/// An opened scanner.
pub enum ScannerAccess {
    /// Keystrokes arrive through the window's key controller.
    Keyboard,
    Serial(SerialScanner),
}

/// Asks for access to the configured scanner. Blocks while a serial port is
/// opened, so call it off the UI thread.
pub fn request_access(config: &ScannerConfig) -> Result<ScannerAccess, ScanError> {
    match config {
        ScannerConfig::Keyboard => {
            info!("using keyboard-wedge scanner");
            Ok(ScannerAccess::Keyboard)
        }
        ScannerConfig::Serial { port, baud_rate } => {
            let scanner = SerialScanner::open(port, *baud_rate).map_err(|e| {
                warn!(%port, "scanner access denied: {}", e);
                e
            })?;
            info!(%port, baud_rate, "serial scanner opened");
            Ok(ScannerAccess::Serial(scanner))
        }
    }
}

impl From<&Result<ScannerAccess, ScanError>> for PermissionState {
    fn from(access: &Result<ScannerAccess, ScanError>) -> Self {
        match access {
            Ok(_) => PermissionState::Granted,
            Err(_) => PermissionState::Denied,
        }
    }
}
