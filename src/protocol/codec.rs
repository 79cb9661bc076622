//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! Every variable-length field is framed by a decimal ASCII length followed by
//! a single space, so keys and values may contain any byte (spaces and
//! newlines included) without escaping.
//!
//! ### Requests
//! ```text
//! GET:  'G' <klen> SP <key>
//! SET:  'S' <klen> SP <vlen> SP <key><value>
//! DEL:  'D' <klen> SP <key>
//! ```
//!
//! ### Replies
//! ```text
//! value: <vlen> SP <value>
//! error: '-' SP <elen> SP <message>
//! ```

use std::io::{self, BufRead, Read, Write};

use bytes::{BufMut, BytesMut};

use super::{Command, CommandType, Reply};
use crate::error::{BenchError, Result};

/// Separator terminating every length field
pub const SEPARATOR: u8 = b' ';

/// Length token marking an error reply
pub const ERROR_MARKER: &[u8] = b"-";

/// Maximum payload size accepted on the read path (512 MB)
pub const MAX_PAYLOAD_SIZE: usize = 512 * 1024 * 1024;

/// Longest length token we are willing to buffer, separator included
const MAX_TOKEN_LEN: u64 = 24;

// =============================================================================
// Request Encoding
// =============================================================================

/// Append a GET request: `G<klen> <key>`
pub fn encode_get(buf: &mut BytesMut, key: &[u8]) {
    encode_keyed(buf, CommandType::Get, key);
}

/// Append a DEL request: `D<klen> <key>`
pub fn encode_del(buf: &mut BytesMut, key: &[u8]) {
    encode_keyed(buf, CommandType::Del, key);
}

/// Append a SET request: `S<klen> <vlen> <key><value>`
///
/// There is no separator between key and value; the two lengths define the
/// split.
pub fn encode_set(buf: &mut BytesMut, key: &[u8], value: &[u8]) {
    buf.reserve(2 * MAX_TOKEN_LEN as usize + key.len() + value.len());
    buf.put_u8(CommandType::Set.tag());
    put_length(buf, key.len());
    put_length(buf, value.len());
    buf.put_slice(key);
    buf.put_slice(value);
}

fn encode_keyed(buf: &mut BytesMut, command_type: CommandType, key: &[u8]) {
    buf.reserve(MAX_TOKEN_LEN as usize + key.len());
    buf.put_u8(command_type.tag());
    put_length(buf, key.len());
    buf.put_slice(key);
}

/// Write a decimal length followed by the separator
fn put_length(buf: &mut BytesMut, len: usize) {
    buf.put_slice(len.to_string().as_bytes());
    buf.put_u8(SEPARATOR);
}

/// Encode a command into a fresh buffer
pub fn encode_command(command: &Command) -> BytesMut {
    let mut buf = BytesMut::new();
    match command {
        Command::Get { key } => encode_get(&mut buf, key),
        Command::Set { key, value } => encode_set(&mut buf, key, value),
        Command::Del { key } => encode_del(&mut buf, key),
    }
    buf
}

// =============================================================================
// Reply Encoding
// =============================================================================

/// Append a reply in wire format
pub fn encode_reply(buf: &mut BytesMut, reply: &Reply) {
    let payload = reply.payload();
    buf.reserve(2 + MAX_TOKEN_LEN as usize + payload.len());
    if reply.is_error() {
        buf.put_slice(ERROR_MARKER);
        buf.put_u8(SEPARATOR);
    }
    put_length(buf, payload.len());
    buf.put_slice(payload);
}

// =============================================================================
// Decoding
// =============================================================================

/// Read one reply from a buffered stream
///
/// Steps:
/// 1. Read the length token up to and including the next space
/// 2. A `-` token introduces an error reply whose content is itself framed
///    as `<len> SP <bytes>`
/// 3. Otherwise the token is the value length; read exactly that many bytes
///
/// Malformed or truncated framing yields `BenchError::Protocol`; a failing
/// or closed transport yields `BenchError::Transport`.
pub fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply> {
    read_reply_inner(reader).map_err(|e| match e {
        BenchError::Io(io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof => {
            BenchError::Transport("connection closed by peer".to_string())
        }
        BenchError::Io(io_err) => BenchError::Transport(io_err.to_string()),
        other => other,
    })
}

fn read_reply_inner<R: BufRead>(reader: &mut R) -> Result<Reply> {
    let token = read_token(reader)?;

    if token == ERROR_MARKER {
        let len = read_length(reader)?;
        let content = read_payload(reader, len)?;
        return Ok(Reply::Error(content));
    }

    let len = parse_length(&token)?;
    let value = read_payload(reader, len)?;
    Ok(Reply::Value(value))
}

/// Decode a single reply from a byte slice
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    let mut cursor = bytes;
    read_reply(&mut cursor)
}

/// Read one command from a buffered stream (server side)
///
/// Returns `Ok(None)` when the stream is cleanly closed before a new command
/// starts.
pub fn read_command<R: BufRead>(reader: &mut R) -> Result<Option<Command>> {
    let tag = {
        let buf = reader.fill_buf()?;
        match buf.first() {
            Some(&tag) => tag,
            None => return Ok(None),
        }
    };
    reader.consume(1);

    let command_type = CommandType::from_tag(tag).ok_or_else(|| {
        BenchError::Protocol(format!("Unknown command tag: 0x{:02x}", tag))
    })?;

    let command = match command_type {
        CommandType::Get => {
            let klen = read_length(reader)?;
            Command::Get {
                key: read_payload(reader, klen)?,
            }
        }
        CommandType::Del => {
            let klen = read_length(reader)?;
            Command::Del {
                key: read_payload(reader, klen)?,
            }
        }
        CommandType::Set => {
            let klen = read_length(reader)?;
            let vlen = read_length(reader)?;
            let key = read_payload(reader, klen)?;
            let value = read_payload(reader, vlen)?;
            Command::Set { key, value }
        }
    };

    Ok(Some(command))
}

/// Decode a single command from a byte slice
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let mut cursor = bytes;
    read_command(&mut cursor)?
        .ok_or_else(|| BenchError::Protocol("Empty command buffer".to_string()))
}

/// Read bytes up to and including the next separator, returned trimmed
fn read_token<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut raw = Vec::with_capacity(MAX_TOKEN_LEN as usize);
    let n = reader
        .by_ref()
        .take(MAX_TOKEN_LEN)
        .read_until(SEPARATOR, &mut raw)?;

    if n == 0 {
        return Err(BenchError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stream closed before length field",
        )));
    }

    if raw.last() != Some(&SEPARATOR) {
        let reason = if n as u64 == MAX_TOKEN_LEN {
            "Length field too long"
        } else {
            "Truncated length field"
        };
        return Err(BenchError::Protocol(format!(
            "{}: '{}'",
            reason,
            String::from_utf8_lossy(&raw)
        )));
    }

    Ok(raw.trim_ascii().to_vec())
}

/// Read a length token and parse it
fn read_length<R: BufRead>(reader: &mut R) -> Result<usize> {
    let token = read_token(reader).map_err(|e| match e {
        BenchError::Io(io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof => {
            BenchError::Protocol("Stream ended before length field".to_string())
        }
        other => other,
    })?;
    parse_length(&token)
}

/// Parse a trimmed decimal length token
fn parse_length(token: &[u8]) -> Result<usize> {
    let len = std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(|| {
            BenchError::Protocol(format!(
                "Invalid length field: '{}'",
                String::from_utf8_lossy(token)
            ))
        })?;

    if len > MAX_PAYLOAD_SIZE {
        return Err(BenchError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }

    Ok(len)
}

/// Read exactly `len` payload bytes
fn read_payload<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut payload = vec![0u8; len];
    if len > 0 {
        reader.read_exact(&mut payload).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                BenchError::Protocol(format!("Short read: expected {} payload bytes", len))
            } else {
                BenchError::Io(e)
            }
        })?;
    }
    Ok(payload)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Write a reply to a stream
pub fn write_reply<W: Write>(writer: &mut W, reply: &Reply) -> Result<()> {
    let mut bytes = BytesMut::new();
    encode_reply(&mut bytes, reply);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
