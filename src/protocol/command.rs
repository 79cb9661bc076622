//! Command definitions
//!
//! Represents requests sent to the key-value server.

/// Command types, tagged on the wire by a single ASCII byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    Get = b'G',
    Set = b'S',
    Del = b'D',
}

impl CommandType {
    /// The wire tag for this command
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Look up a command type by its wire tag
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'G' => Some(CommandType::Get),
            b'S' => Some(CommandType::Set),
            b'D' => Some(CommandType::Del),
            _ => None,
        }
    }

    /// Lowercase operation name, as used in logs and reports
    pub fn name(self) -> &'static str {
        match self {
            CommandType::Get => "get",
            CommandType::Set => "set",
            CommandType::Del => "del",
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: Vec<u8> },

    /// Set a key-value pair
    Set { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Del { key: Vec<u8> },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Set { .. } => CommandType::Set,
            Command::Del { .. } => CommandType::Del,
        }
    }

    /// The key this command addresses
    pub fn key(&self) -> &[u8] {
        match self {
            Command::Get { key } | Command::Set { key, .. } | Command::Del { key } => key,
        }
    }
}
