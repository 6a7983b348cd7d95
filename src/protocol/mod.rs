//! Protocol Module
//!
//! Defines the wire protocol between the console and the store.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: GET   - Payload: key_len (4) + key
//! - 0x02: PUT   - Payload: key_len (4) + key + value
//! - 0x03: DEL   - Payload: key_len (4) + key
//! - 0x04: PING  - Payload: empty
//! - 0x05: SCAN  - Payload: prefix
//! - 0x06: AUTH  - Payload: user_len (4) + user + password
//!
//! 0x01-0x04 are the base AtlasKV command set. SCAN and AUTH are
//! extensions the server must support: without SCAN `list` fails, and
//! without AUTH any session with a username fails at startup.
//!
//! A SCAN reply carries `count (4)` followed by `key_len (4) + key +
//! value_len (4) + value` per entry, in ascending key order.
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND
//! - 0x02: ERROR

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, Status};
pub use codec::{
    encode_command, decode_command, encode_response, decode_response,
    encode_entries, decode_entries,
    read_command, write_command, read_response, write_response,
    HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
