//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - GET:    key_len (4 bytes) + key
//! - PUT:    key_len (4 bytes) + key + value
//! - DELETE: key_len (4 bytes) + key
//! - PING:   empty
//! - SCAN:   prefix (raw, may be empty)
//! - AUTH:   user_len (4 bytes) + user + password
//!
//! ### SCAN Response Payload
//! ```text
//! count (4) + count × [ key_len (4) + key + value_len (4) + value ]
//! ```

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{ConsoleError, Result};
use super::{Command, CommandType, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Vec<u8> {
    let mut payload = BytesMut::new();
    match command {
        Command::Get { key } | Command::Delete { key } => {
            put_prefixed(&mut payload, key);
        }
        Command::Put { key, value } => {
            put_prefixed(&mut payload, key);
            payload.put_slice(value);
        }
        Command::Ping => {}
        Command::Scan { prefix } => payload.put_slice(prefix),
        Command::Auth { username, password } => {
            put_prefixed(&mut payload, username);
            payload.put_slice(password);
        }
    }

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from a complete frame
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_byte, mut payload) = split_frame(bytes, "command")?;

    let cmd_type = CommandType::try_from(cmd_byte).map_err(|b| {
        ConsoleError::Protocol(format!("Unknown command type: 0x{:02x}", b))
    })?;

    match cmd_type {
        CommandType::Get => Ok(Command::Get {
            key: take_prefixed(&mut payload, "GET command: key")?,
        }),
        CommandType::Put => {
            let key = take_prefixed(&mut payload, "PUT command: key")?;
            Ok(Command::Put { key, value: payload.to_vec() })
        }
        CommandType::Delete => Ok(Command::Delete {
            key: take_prefixed(&mut payload, "DELETE command: key")?,
        }),
        CommandType::Ping => {
            if !payload.is_empty() {
                return Err(ConsoleError::Protocol(format!(
                    "PING command: unexpected payload of {} bytes",
                    payload.len()
                )));
            }
            Ok(Command::Ping)
        }
        CommandType::Scan => Ok(Command::Scan { prefix: payload.to_vec() }),
        CommandType::Auth => {
            let username = take_prefixed(&mut payload, "AUTH command: username")?;
            Ok(Command::Auth { username, password: payload.to_vec() })
        }
    }
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    frame(response.status as u8, payload)
}

/// Decode a response from a complete frame
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = split_frame(bytes, "response")?;

    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        _ => {
            return Err(ConsoleError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_vec())
    };

    Ok(Response { status, payload })
}

// =============================================================================
// SCAN entry lists
// =============================================================================

/// Encode an ordered list of (key, value) pairs as a SCAN payload
pub fn encode_entries(entries: &[(Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u32(entries.len() as u32);
    for (key, value) in entries {
        put_prefixed(&mut buf, key);
        put_prefixed(&mut buf, value);
    }
    buf.to_vec()
}

/// Decode a SCAN payload into (key, value) pairs
///
/// An absent payload is an empty result.
pub fn decode_entries(payload: Option<&[u8]>) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut buf = match payload {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Ok(Vec::new()),
    };

    if buf.remaining() < 4 {
        return Err(ConsoleError::Protocol(
            "SCAN response: missing entry count".to_string(),
        ));
    }
    let count = buf.get_u32() as usize;

    // Each entry needs at least two length prefixes
    if count > buf.remaining() / 8 {
        return Err(ConsoleError::Protocol(format!(
            "SCAN response: {} entries cannot fit in {} bytes",
            count,
            buf.remaining()
        )));
    }

    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let key = take_prefixed(&mut buf, "SCAN response: key")?;
        let value = take_prefixed(&mut buf, "SCAN response: value")?;
        entries.push((key, value));
    }

    if buf.has_remaining() {
        return Err(ConsoleError::Protocol(format!(
            "SCAN response: {} trailing bytes",
            buf.remaining()
        )));
    }

    Ok(entries)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let frame = read_frame(reader)?;
    decode_command(&frame)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    writer.write_all(&encode_command(command))?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let frame = read_frame(reader)?;
    decode_response(&frame)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&encode_response(response))?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Internal helpers
// =============================================================================

fn frame(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut message = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    message.put_u8(tag);
    message.put_u32(payload.len() as u32);
    message.put_slice(payload);
    message.to_vec()
}

/// Split a frame into its tag byte and exactly `payload_len` payload bytes
fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(ConsoleError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    let tag = header.get_u8();
    let payload_len = header.get_u32();
    check_payload_len(payload_len, what)?;

    let total_len = HEADER_SIZE + payload_len as usize;
    if bytes.len() < total_len {
        return Err(ConsoleError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((tag, &bytes[HEADER_SIZE..total_len]))
}

fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = (&header[1..]).get_u32();
    check_payload_len(payload_len, "frame")?;

    let mut message = vec![0u8; HEADER_SIZE + payload_len as usize];
    message[..HEADER_SIZE].copy_from_slice(&header);
    reader.read_exact(&mut message[HEADER_SIZE..])?;
    Ok(message)
}

fn check_payload_len(payload_len: u32, what: &str) -> Result<()> {
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(ConsoleError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, payload_len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

fn put_prefixed(buf: &mut BytesMut, bytes: &[u8]) {
    buf.put_u32(bytes.len() as u32);
    buf.put_slice(bytes);
}

fn take_prefixed(buf: &mut &[u8], what: &str) -> Result<Vec<u8>> {
    if buf.remaining() < 4 {
        return Err(ConsoleError::Protocol(format!("{}: missing length", what)));
    }
    let len = buf.get_u32() as usize;
    if buf.remaining() < len {
        return Err(ConsoleError::Protocol(format!(
            "{}: incomplete (expected {}, got {})",
            what,
            len,
            buf.remaining()
        )));
    }
    let bytes = buf[..len].to_vec();
    buf.advance(len);
    Ok(bytes)
}
