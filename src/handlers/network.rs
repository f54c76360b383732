//! TCP sink for remote log collectors
//!
//! Sends one formatted line per record to a remote server. Useful for
//! centralized logging in distributed systems.

use crate::core::{LoggerError, Record, Result, Sink};
use parking_lot::Mutex;
use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

/// Network sink that sends records to a remote TCP server
///
/// # Example
///
/// ```no_run
/// use channel_logger::handlers::{NetworkSink, SinkHandler};
/// use channel_logger::prelude::*;
///
/// let sink = NetworkSink::connect("127.0.0.1:5140").expect("log server reachable");
/// let logger = Logger::new("app");
/// logger
///     .push_handler(HandlerEntry::from_handler(SinkHandler::new(sink)))
///     .unwrap();
/// logger.info("sent to 127.0.0.1:5140", Context::new());
/// ```
pub struct NetworkSink {
    address: String,
    stream: Mutex<Option<TcpStream>>,
    reconnect_on_error: bool,
}

impl NetworkSink {
    /// Connect eagerly; fails if the server is unreachable
    pub fn connect(address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        let stream = Self::open(&address)?;
        Ok(Self {
            address,
            stream: Mutex::new(Some(stream)),
            reconnect_on_error: true,
        })
    }

    /// Defer connecting until the first record
    pub fn lazy(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            stream: Mutex::new(None),
            reconnect_on_error: true,
        }
    }

    /// Enable or disable automatic reconnection on errors
    ///
    /// Default: enabled
    #[must_use]
    pub fn with_reconnect(mut self, enable: bool) -> Self {
        self.reconnect_on_error = enable;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn open(address: &str) -> Result<TcpStream> {
        let stream = TcpStream::connect(address)?;
        stream.set_write_timeout(Some(IO_TIMEOUT))?;
        stream.set_read_timeout(Some(IO_TIMEOUT))?;
        // Enable TCP_NODELAY for low-latency logging
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

impl Sink for NetworkSink {
    fn write(&self, _record: &Record, formatted: &str) -> Result<()> {
        let mut message = String::with_capacity(formatted.len() + 1);
        message.push_str(formatted);
        message.push('\n');

        let mut guard = self.stream.lock();

        if guard.is_none() {
            if !self.reconnect_on_error {
                return Err(LoggerError::writer("Network stream not connected"));
            }
            *guard = Some(Self::open(&self.address)?);
        }

        let result = match guard.as_mut() {
            Some(stream) => stream.write_all(message.as_bytes()),
            None => return Err(LoggerError::writer("Network stream not connected")),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => {
                // Connection lost
                *guard = None;

                if !self.reconnect_on_error {
                    return Err(e.into());
                }

                match Self::open(&self.address) {
                    Ok(mut stream) => {
                        stream.write_all(message.as_bytes())?;
                        *guard = Some(stream);
                        Ok(())
                    }
                    Err(reconnect_err) => Err(LoggerError::writer(format!(
                        "Failed to send log and reconnect: {} (reconnect: {})",
                        e, reconnect_err
                    ))),
                }
            }
        }
    }

    fn flush(&self) -> Result<()> {
        if let Some(stream) = self.stream.lock().as_mut() {
            stream.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "network"
    }
}
