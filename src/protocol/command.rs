//! Command definitions
//!
//! Requests the console sends to the store.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    Get = 0x01,
    Put = 0x02,
    Delete = 0x03,
    Ping = 0x04,
    Scan = 0x05,
    Auth = 0x06,
}

impl TryFrom<u8> for CommandType {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x01 => Ok(CommandType::Get),
            0x02 => Ok(CommandType::Put),
            0x03 => Ok(CommandType::Delete),
            0x04 => Ok(CommandType::Ping),
            0x05 => Ok(CommandType::Scan),
            0x06 => Ok(CommandType::Auth),
            other => Err(other),
        }
    }
}

/// A store request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: Vec<u8> },

    /// Put a key-value pair
    Put { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key (absent keys are not an error)
    Delete { key: Vec<u8> },

    /// Ping (health check)
    Ping,

    /// All entries whose key starts with `prefix`, in key order
    Scan { prefix: Vec<u8> },

    /// Present credentials for this connection
    Auth { username: Vec<u8>, password: Vec<u8> },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Put { .. } => CommandType::Put,
            Command::Delete { .. } => CommandType::Delete,
            Command::Ping => CommandType::Ping,
            Command::Scan { .. } => CommandType::Scan,
            Command::Auth { .. } => CommandType::Auth,
        }
    }

    /// Short name for log lines (never includes payloads)
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get { .. } => "GET",
            Command::Put { .. } => "PUT",
            Command::Delete { .. } => "DELETE",
            Command::Ping => "PING",
            Command::Scan { .. } => "SCAN",
            Command::Auth { .. } => "AUTH",
        }
    }
}
