//! Protocol Module
//!
//! Defines the length-prefixed text protocol spoken by the key-value server.
//!
//! ## Protocol Format
//!
//! ### Request Format
//! ```text
//! ┌──────────┬───────────────┬─────────────────────────────┐
//! │ Tag (1)  │ Lengths (SP)  │      Key [+ Value]          │
//! └──────────┴───────────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 'G': GET - `G<klen> <key>`
//! - 'S': SET - `S<klen> <vlen> <key><value>`
//! - 'D': DEL - `D<klen> <key>`
//!
//! ### Reply Format
//! ```text
//! ┌───────────────┬─────────────────────────────┐
//! │  Length (SP)  │          Payload            │
//! └───────────────┴─────────────────────────────┘
//! ```
//!
//! An error reply is a `-` token followed by a regular length-prefixed
//! payload holding the error message. There are no request IDs: replies
//! arrive in the order requests were written.

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::Reply;
pub use codec::{
    decode_command, decode_reply, encode_command, encode_del, encode_get, encode_reply,
    encode_set, read_command, read_reply, write_command, write_reply, ERROR_MARKER,
    MAX_PAYLOAD_SIZE, SEPARATOR,
};
