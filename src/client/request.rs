//! Request definitions
//!
//! A request is built by a worker, executed by a client which stores the
//! server reply in `outcome`, and dropped once its statistics are recorded.

use bytes::BytesMut;

use crate::protocol::{encode_del, encode_get, encode_set, CommandType, Reply};

/// One benchmark request and, after execution, its reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Operation to perform
    pub command: CommandType,

    /// Key, the decimal rendering of the numeric key
    pub key: String,

    /// Value written by SET, or the value a GET is expected to return
    pub value: String,

    /// Reply from the server; `None` until the request has been executed
    pub outcome: Option<Reply>,
}

impl Request {
    pub fn new(command: CommandType, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            command,
            key: key.into(),
            value: value.into(),
            outcome: None,
        }
    }

    /// GET request expecting `expected` back
    pub fn get(key: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(CommandType::Get, key, expected)
    }

    /// SET request
    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(CommandType::Set, key, value)
    }

    /// DEL request
    pub fn del(key: impl Into<String>) -> Self {
        Self::new(CommandType::Del, key, String::new())
    }

    /// Append the wire encoding of this request to `buf`
    pub fn encode(&self, buf: &mut BytesMut) {
        match self.command {
            CommandType::Get => encode_get(buf, self.key.as_bytes()),
            CommandType::Set => encode_set(buf, self.key.as_bytes(), self.value.as_bytes()),
            CommandType::Del => encode_del(buf, self.key.as_bytes()),
        }
    }
}
