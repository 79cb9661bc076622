//! Response definitions
//!
//! A reply from the server is either a value (possibly empty) or an error
//! message. Both carry raw bytes.

/// A decoded server reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Value payload; empty for SET/DEL acknowledgements and GET misses
    Value(Vec<u8>),

    /// Error content sent after the `-` marker
    Error(Vec<u8>),
}

impl Reply {
    /// Create a value reply
    pub fn value(payload: impl Into<Vec<u8>>) -> Self {
        Reply::Value(payload.into())
    }

    /// Create an empty value reply
    pub fn empty() -> Self {
        Reply::Value(Vec::new())
    }

    /// Create an error reply
    pub fn error(message: &str) -> Self {
        Reply::Error(message.as_bytes().to_vec())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Raw bytes of the reply, value or error content alike
    pub fn payload(&self) -> &[u8] {
        match self {
            Reply::Value(bytes) | Reply::Error(bytes) => bytes,
        }
    }

    /// Payload as text, replacing invalid UTF-8
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(self.payload()).into_owned()
    }
}
