//! # RESP2 Encoding and Parsing
//!
//! Purpose: Frame outgoing commands and parse server replies into [`Reply`].
//!
//! ## Design Principles
//! 1. **Recursive Descent**: Nested arrays are read by recursing per element.
//! 2. **Caller-Owned Buffers**: The line buffer lives on the connection.
//! 3. **Binary-Safe**: Bulk strings are treated as raw bytes.
//! 4. **Explicit Nil**: Null bulk strings and null arrays stay distinguishable
//!    from empty ones, since they signal an absent key or member.

use std::io::{BufRead, Read};

use crate::error::{ClientError, ClientResult};
use crate::executor::Command;

// Upper bounds on buffers sized from length headers.
const MAX_PREALLOC: usize = 64 * 1024;
const MAX_ARRAY_PREALLOC: usize = 1024;

/// RESP2 reply value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// +OK style replies.
    Status(Vec<u8>),
    /// -ERR ... replies.
    Error(Vec<u8>),
    /// :123 replies.
    Integer(i64),
    /// $... bulk strings, with None for null.
    Bulk(Option<Vec<u8>>),
    /// *... arrays, with None for null.
    Array(Option<Vec<Reply>>),
}

impl Reply {
    /// True for the null bulk string and the null array.
    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Bulk(None) | Reply::Array(None))
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Reply::Status(_) => "status",
            Reply::Error(_) => "error",
            Reply::Integer(_) => "integer",
            Reply::Bulk(Some(_)) => "bulk",
            Reply::Array(Some(_)) => "array",
            Reply::Bulk(None) | Reply::Array(None) => "nil",
        }
    }

    /// Convenience constructor for a non-null bulk string.
    pub fn bulk(data: impl Into<Vec<u8>>) -> Self {
        Reply::Bulk(Some(data.into()))
    }

    /// Convenience constructor for an array of bulk strings.
    pub fn bulk_array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Vec<u8>>,
    {
        Reply::Array(Some(items.into_iter().map(Reply::bulk).collect()))
    }
}

/// Encodes a command as a RESP2 array into the provided buffer.
pub fn encode_command(command: &Command, out: &mut Vec<u8>) {
    out.push(b'*');
    push_len(out, command.args().len() + 1);
    push_bulk(out, command.name().as_bytes());
    for arg in command.args() {
        push_bulk(out, arg);
    }
}

fn push_bulk(out: &mut Vec<u8>, data: &[u8]) {
    out.push(b'$');
    push_len(out, data.len());
    out.extend_from_slice(data);
    out.extend_from_slice(b"\r\n");
}

fn push_len(out: &mut Vec<u8>, len: usize) {
    out.extend_from_slice(itoa::Buffer::new().format(len).as_bytes());
    out.extend_from_slice(b"\r\n");
}

/// Reads one RESP value from the buffered reader.
pub fn read_reply<R: BufRead>(reader: &mut R, line_buf: &mut Vec<u8>) -> ClientResult<Reply> {
    read_line(reader, line_buf)?;
    if line_buf.is_empty() {
        return Err(ClientError::Protocol);
    }

    match line_buf[0] {
        b'+' => Ok(Reply::Status(line_buf[1..].to_vec())),
        b'-' => Ok(Reply::Error(line_buf[1..].to_vec())),
        b':' => Ok(Reply::Integer(parse_i64(&line_buf[1..])?)),
        b'$' => {
            let len = parse_i64(&line_buf[1..])?;
            read_bulk(reader, len)
        }
        b'*' => {
            let len = parse_i64(&line_buf[1..])?;
            read_array(reader, len, line_buf)
        }
        _ => Err(ClientError::Protocol),
    }
}

fn read_bulk<R: BufRead>(reader: &mut R, len: i64) -> ClientResult<Reply> {
    if len < 0 {
        return Ok(Reply::Bulk(None));
    }
    // The header is untrusted: grow the buffer as bytes arrive.
    let len = len as u64;
    let mut data = Vec::with_capacity(len.min(MAX_PREALLOC as u64) as usize);
    let read = reader.by_ref().take(len).read_to_end(&mut data)?;
    if read as u64 != len {
        return Err(ClientError::Protocol);
    }

    let mut crlf = [0u8; 2];
    reader.read_exact(&mut crlf)?;
    if crlf != *b"\r\n" {
        return Err(ClientError::Protocol);
    }
    Ok(Reply::Bulk(Some(data)))
}

fn read_array<R: BufRead>(reader: &mut R, len: i64, line_buf: &mut Vec<u8>) -> ClientResult<Reply> {
    if len < 0 {
        return Ok(Reply::Array(None));
    }

    let mut items = Vec::with_capacity((len as u64).min(MAX_ARRAY_PREALLOC as u64) as usize);
    for _ in 0..len {
        items.push(read_reply(reader, line_buf)?);
    }
    Ok(Reply::Array(Some(items)))
}

fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> ClientResult<()> {
    buf.clear();
    let bytes = reader.read_until(b'\n', buf)?;
    if bytes == 0 {
        return Err(ClientError::Protocol);
    }
    if buf.len() < 2 || buf[buf.len() - 2] != b'\r' {
        return Err(ClientError::Protocol);
    }
    buf.truncate(buf.len() - 2);
    Ok(())
}

fn parse_i64(data: &[u8]) -> ClientResult<i64> {
    std::str::from_utf8(data)
        .ok()
        .and_then(|text| text.parse().ok())
        .ok_or(ClientError::Protocol)
}
