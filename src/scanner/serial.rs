use super::{PayloadBuffer, ScanError};
use serialport::SerialPort;
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

// Short enough that a closed window stops the reader promptly.
const READ_TIMEOUT: Duration = Duration::from_millis(250);

pub struct SerialScanner {
    port: Box<dyn SerialPort>,
}

impl SerialScanner {
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, ScanError> {
        let port = serialport::new(path, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|source| ScanError::Open {
                port: path.to_owned(),
                source,
            })?;
        Ok(SerialScanner { port })
    }

    /// Reads payloads until `stop` is set, `on_payload` returns false or the
    /// port fails.
    pub fn run<F>(mut self, stop: &AtomicBool, on_payload: F) -> Result<(), ScanError>
    where
        F: FnMut(String) -> bool,
    {
        read_payloads(&mut self.port, stop, on_payload)
    }
}

/// Splits a scanner byte stream into payloads. Read timeouts are waited out;
/// end of stream ends the loop. `stop` is checked before every read, so an
/// idle port is left within one read timeout of it being set.
pub fn read_payloads<R, F>(
    mut reader: R,
    stop: &AtomicBool,
    mut on_payload: F,
) -> Result<(), ScanError>
where
    R: Read,
    F: FnMut(String) -> bool,
{
    let mut buffer = PayloadBuffer::new();
    let mut chunk = [0u8; 256];

    loop {
        if stop.load(Ordering::Relaxed) {
            info!("scanner reader stopped");
            return Ok(());
        }

        let n = match reader.read(&mut chunk) {
            Ok(0) => {
                info!("scanner stream closed");
                return Ok(());
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::TimedOut || e.kind() == ErrorKind::Interrupted => {
                continue
            }
            Err(e) => return Err(e.into()),
        };

        for byte in &chunk[..n] {
            if let Some(payload) = buffer.push_byte(*byte) {
                debug!(len = payload.len(), "scanner payload");
                if !on_payload(payload) {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};
    use std::sync::atomic::AtomicUsize;

    /// A port nobody is scanning at: every read times out.
    struct IdlePort<'a> {
        reads: &'a AtomicUsize,
        stop_after: usize,
        stop: &'a AtomicBool,
    }

    impl Read for IdlePort<'_> {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            if self.reads.fetch_add(1, Ordering::Relaxed) + 1 == self.stop_after {
                self.stop.store(true, Ordering::Relaxed);
            }
            Err(io::Error::new(ErrorKind::TimedOut, "no data"))
        }
    }

    #[test]
    fn reads_every_payload_until_end_of_stream() {
        let stream = Cursor::new(b"first\rsecond\r\nthird".to_vec());
        let mut seen = Vec::new();
        read_payloads(stream, &AtomicBool::new(false), |payload| {
            seen.push(payload);
            true
        })
        .unwrap();

        // "third" never got its terminator.
        assert_eq!(seen, vec!["first", "second"]);
    }

    #[test]
    fn stops_when_consumer_hangs_up() {
        let stream = Cursor::new(b"first\rsecond\r".to_vec());
        let mut seen = Vec::new();
        read_payloads(stream, &AtomicBool::new(false), |payload| {
            seen.push(payload);
            false
        })
        .unwrap();

        assert_eq!(seen, vec!["first"]);
    }

    #[test]
    fn idle_reader_notices_stop_between_timeouts() {
        let stop = AtomicBool::new(false);
        let reads = AtomicUsize::new(0);
        let port = IdlePort {
            reads: &reads,
            stop_after: 3,
            stop: &stop,
        };

        read_payloads(port, &stop, |_| panic!("no payload expected")).unwrap();
        assert_eq!(reads.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn stopped_reader_never_reads() {
        let stream = Cursor::new(b"first\r".to_vec());
        let mut seen = Vec::new();
        read_payloads(stream, &AtomicBool::new(true), |payload| {
            seen.push(payload);
            true
        })
        .unwrap();

        assert!(seen.is_empty());
    }
}
