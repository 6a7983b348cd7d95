//! Store Session
//!
//! The console's single live handle to a remote store.
//!
//! ## Lifecycle
//! 1. [`Session::connect`] walks the endpoint list, dials, authenticates
//!    (when a username is configured) and pings
//! 2. Each [`KvStore`] call is one request/response round trip. The
//!    request timeout is a deadline for the whole call, re-dial included
//! 3. A transport failure drops the connection; the next call re-dials.
//!    The failed call is reported, never retried
//! 4. Dropping the session shuts the connection down

use std::io::ErrorKind;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{ConsoleError, Result};
use crate::protocol::{decode_entries, Command, Response, Status};
use super::connection::time_left;
use super::{Connection, Entry, KvStore};

/// A session with a remote store
pub struct Session {
    config: Config,

    /// `None` after a transport failure until the next call re-dials
    conn: Option<Connection>,

    /// Endpoint the current (or last) connection was made to
    endpoint: String,
}

impl Session {
    /// Establish the session
    ///
    /// Any failure here is a [`ConsoleError::Startup`].
    pub fn connect(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ConsoleError::Startup(e.to_string()))?;

        let (conn, endpoint) =
            open(&config, None).map_err(|e| ConsoleError::Startup(e.to_string()))?;

        tracing::info!("Session established with {}", endpoint);

        Ok(Self {
            config,
            conn: Some(conn),
            endpoint,
        })
    }

    /// Endpoint the session is talking to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a connection is currently open
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// One round trip, re-dialing first if the last call broke the connection
    ///
    /// Re-dial and request share a single deadline.
    fn call(&mut self, command: &Command) -> Result<Response> {
        let timeout_ms = self.config.request_timeout_ms;
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                tracing::info!("Reconnecting to store");
                let (conn, endpoint) = open(&self.config, Some(deadline))
                    .map_err(|e| transport_failure(e, timeout_ms))?;
                self.endpoint = endpoint;
                conn
            }
        };

        tracing::debug!("{} -> {}", command.name(), conn.peer_addr());

        match conn.round_trip(command, deadline) {
            Ok(response) => {
                self.conn = Some(conn);
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(
                    "{} to {} failed, dropping connection: {}",
                    command.name(),
                    conn.peer_addr(),
                    e
                );
                conn.shutdown();
                Err(transport_failure(e, timeout_ms))
            }
        }
    }
}

impl KvStore for Session {
    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let response = self.call(&Command::Put {
            key: key.as_bytes().to_vec(),
            value: value.as_bytes().to_vec(),
        })?;

        match response.status {
            Status::Ok => Ok(()),
            Status::NotFound => Err(unexpected_not_found("PUT")),
            Status::Error => Err(ConsoleError::Unavailable(response.error_message())),
        }
    }

    fn get(&mut self, key: &str) -> Result<Option<String>> {
        let response = self.call(&Command::Get {
            key: key.as_bytes().to_vec(),
        })?;

        match response.status {
            Status::Ok => {
                let value = response.payload.unwrap_or_default();
                Ok(Some(String::from_utf8_lossy(&value).into_owned()))
            }
            Status::NotFound => Ok(None),
            Status::Error => Err(ConsoleError::Unavailable(response.error_message())),
        }
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        let response = self.call(&Command::Delete {
            key: key.as_bytes().to_vec(),
        })?;

        match response.status {
            // Deleting an absent key is not an error
            Status::Ok | Status::NotFound => Ok(()),
            Status::Error => Err(ConsoleError::Unavailable(response.error_message())),
        }
    }

    fn scan_prefix(&mut self, prefix: &str) -> Result<Vec<Entry>> {
        let response = self.call(&Command::Scan {
            prefix: prefix.as_bytes().to_vec(),
        })?;

        match response.status {
            Status::Ok => {
                let entries = decode_entries(response.payload.as_deref())
                    .map_err(|e| ConsoleError::Unavailable(e.to_string()))?;
                Ok(entries
                    .into_iter()
                    .map(|(key, value)| Entry {
                        key: String::from_utf8_lossy(&key).into_owned(),
                        value: String::from_utf8_lossy(&value).into_owned(),
                    })
                    .collect())
            }
            Status::NotFound => Ok(Vec::new()),
            Status::Error => Err(ConsoleError::Unavailable(response.error_message())),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::debug!("Closing session with {}", self.endpoint);
            conn.shutdown();
        }
    }
}

// =============================================================================
// Connection setup
// =============================================================================

/// Try each endpoint in order; returns the connection and the endpoint used
///
/// With a `deadline` the whole walk must finish before it. Without one,
/// each endpoint gets the dial timeout plus a fresh request timeout.
fn open(config: &Config, deadline: Option<Instant>) -> Result<(Connection, String)> {
    let mut last_err = None;

    for endpoint in &config.endpoints {
        match establish(endpoint, config, deadline) {
            Ok(conn) => return Ok((conn, endpoint.clone())),
            Err(e) => {
                tracing::warn!("Endpoint {} unavailable: {}", endpoint, e);
                last_err = Some(e);
            }
        }

        if let Some(deadline) = deadline {
            if Instant::now() >= deadline {
                return Err(timed_out(config.request_timeout_ms));
            }
        }
    }

    Err(last_err.unwrap_or_else(|| ConsoleError::Config("no endpoints configured".to_string())))
}

fn establish(endpoint: &str, config: &Config, deadline: Option<Instant>) -> Result<Connection> {
    let timeout_ms = config.request_timeout_ms;
    let mut dial_timeout = Duration::from_millis(config.dial_timeout_ms);
    if let Some(deadline) = deadline {
        let left = time_left(deadline).map_err(|_| timed_out(timeout_ms))?;
        dial_timeout = dial_timeout.min(left);
    }

    let mut conn = Connection::dial(endpoint, dial_timeout)
        .map_err(|e| transport_failure(e, timeout_ms))?;
    let deadline = deadline.unwrap_or_else(|| Instant::now() + Duration::from_millis(timeout_ms));

    if let Some(username) = &config.username {
        tracing::debug!("Authenticating to {} as {}", endpoint, username);
        let response = handshake(
            &mut conn,
            &Command::Auth {
                username: username.as_bytes().to_vec(),
                password: config.password.as_deref().unwrap_or("").as_bytes().to_vec(),
            },
            deadline,
            timeout_ms,
        )?;
        if response.status != Status::Ok {
            return Err(ConsoleError::Unavailable(format!(
                "authentication failed: {}",
                response.error_message()
            )));
        }
    }

    let response = handshake(&mut conn, &Command::Ping, deadline, timeout_ms)?;
    if response.status != Status::Ok {
        return Err(ConsoleError::Unavailable(format!(
            "ping failed: {}",
            response.error_message()
        )));
    }

    Ok(conn)
}

fn handshake(
    conn: &mut Connection,
    command: &Command,
    deadline: Instant,
    timeout_ms: u64,
) -> Result<Response> {
    conn.round_trip(command, deadline)
        .map_err(|e| transport_failure(e, timeout_ms))
}

fn timed_out(timeout_ms: u64) -> ConsoleError {
    ConsoleError::Unavailable(format!("request timed out after {}ms", timeout_ms))
}

/// Map a transport-level failure onto the error the console reports
fn transport_failure(err: ConsoleError, timeout_ms: u64) -> ConsoleError {
    match err {
        ConsoleError::Io(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
            timed_out(timeout_ms)
        }
        ConsoleError::Io(e) => ConsoleError::Unavailable(format!("connection error: {}", e)),
        ConsoleError::Protocol(msg) => ConsoleError::Unavailable(format!("protocol error: {}", msg)),
        other => other,
    }
}

fn unexpected_not_found(op: &str) -> ConsoleError {
    ConsoleError::Unavailable(format!("unexpected NOT_FOUND response to {}", op))
}
