//! Connection Handler
//!
//! One TCP connection to a store endpoint. Every round trip runs against a
//! deadline: each socket read and write is given only the time left before
//! it, so a reply that arrives in small pieces cannot outlast the bound.

use std::io::{self, BufReader, BufWriter, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use crate::error::{ConsoleError, Result};
use crate::protocol::{read_response, write_command, Command, Response};

/// A single connection to the store
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<BoundedStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<BoundedStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Dial `endpoint`, trying each resolved address until one accepts
    pub fn dial(endpoint: &str, timeout: Duration) -> Result<Self> {
        let addrs = endpoint.to_socket_addrs().map_err(|e| {
            ConsoleError::Unavailable(format!("cannot resolve {}: {}", endpoint, e))
        })?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Self::new(stream),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(match last_err {
            Some(e) => ConsoleError::Unavailable(format!("cannot connect to {}: {}", endpoint, e)),
            None => ConsoleError::Unavailable(format!("{} resolved to no addresses", endpoint)),
        })
    }

    /// Wrap an established stream
    ///
    /// Sets up buffered I/O and disables Nagle's algorithm
    pub fn new(stream: TcpStream) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(BoundedStream::new(read_stream)),
            writer: BufWriter::new(BoundedStream::new(write_stream)),
            peer_addr,
        })
    }

    /// Send one command and wait for its response, giving up at `deadline`
    ///
    /// An expired deadline surfaces as an I/O error of kind `TimedOut`.
    pub fn round_trip(&mut self, command: &Command, deadline: Instant) -> Result<Response> {
        self.reader.get_mut().deadline = Some(deadline);
        self.writer.get_mut().deadline = Some(deadline);

        tracing::trace!("Sending {} to {}", command.name(), self.peer_addr);
        write_command(&mut self.writer, command)?;
        let response = read_response(&mut self.reader)?;
        tracing::trace!("{} from {} -> {:?}", command.name(), self.peer_addr, response.status);
        Ok(response)
    }

    /// Close both directions of the stream
    pub fn shutdown(self) {
        if let Err(e) = self.writer.get_ref().stream.shutdown(Shutdown::Both) {
            tracing::debug!("Shutdown of {} failed: {}", self.peer_addr, e);
        }
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

/// Time left before `deadline`, or a `TimedOut` error once it has passed
pub(crate) fn time_left(deadline: Instant) -> io::Result<Duration> {
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        return Err(io::Error::new(ErrorKind::TimedOut, "deadline elapsed"));
    }
    Ok(left)
}

/// A stream half whose socket timeout is re-armed before every read/write
struct BoundedStream {
    stream: TcpStream,
    deadline: Option<Instant>,
}

impl BoundedStream {
    fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            deadline: None,
        }
    }
}

impl Read for BoundedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(deadline) = self.deadline {
            self.stream.set_read_timeout(Some(time_left(deadline)?))?;
        }
        self.stream.read(buf)
    }
}

impl Write for BoundedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(deadline) = self.deadline {
            self.stream.set_write_timeout(Some(time_left(deadline)?))?;
        }
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}
