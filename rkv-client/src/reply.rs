//! # Reply Decoding
//!
//! Turns raw [`Reply`] values into typed results. Each decoder validates the
//! shape it expects before touching the contents and reports the store's
//! nil sentinel as [`Lookup::Absent`] rather than as an error; operations then
//! collapse `Absent` into their documented zero value.

use std::collections::HashMap;

use crate::error::{ClientError, ClientResult};
use crate::resp::Reply;

/// Outcome of a reply that may legitimately be nil.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Lookup<T> {
    Found(T),
    Absent,
}

impl<T> Lookup<T> {
    pub(crate) fn or(self, zero: T) -> T {
        match self {
            Lookup::Found(value) => value,
            Lookup::Absent => zero,
        }
    }

    /// For commands that never reply nil: `Absent` is a decode error.
    pub(crate) fn required(self, command: &'static str) -> ClientResult<T> {
        match self {
            Lookup::Found(value) => Ok(value),
            Lookup::Absent => Err(ClientError::Decode(format!("{} replied nil", command))),
        }
    }

    pub(crate) fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
        }
    }
}

impl<T: Default> Lookup<T> {
    pub(crate) fn or_default(self) -> T {
        self.or(T::default())
    }
}

/// One step of a cursor scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanPage<T> {
    /// Cursor to pass to the next call; `0` means the iteration is complete.
    pub cursor: u64,
    /// Items observed in this step. May be empty while `cursor` is non-zero.
    pub items: T,
}

impl<T> ScanPage<T> {
    /// True once the server has reported the end of the iteration.
    pub fn is_finished(&self) -> bool {
        self.cursor == 0
    }
}

/// A sorted-set member with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMember {
    pub member: Vec<u8>,
    pub score: f64,
}

// Separates server errors and nil from everything else.
fn check(reply: Reply) -> ClientResult<Lookup<Reply>> {
    match reply {
        Reply::Error(message) => Err(ClientError::Server { message }),
        reply if reply.is_nil() => Ok(Lookup::Absent),
        reply => Ok(Lookup::Found(reply)),
    }
}

fn unexpected(command: &'static str, expected: &'static str, reply: &Reply) -> ClientError {
    ClientError::UnexpectedResponse {
        command,
        expected,
        actual: reply.kind(),
    }
}

pub(crate) fn integer(command: &'static str, reply: Reply) -> ClientResult<Lookup<i64>> {
    match check(reply)? {
        Lookup::Found(Reply::Integer(value)) => Ok(Lookup::Found(value)),
        Lookup::Found(other) => Err(unexpected(command, "integer", &other)),
        Lookup::Absent => Ok(Lookup::Absent),
    }
}

pub(crate) fn bulk(command: &'static str, reply: Reply) -> ClientResult<Lookup<Vec<u8>>> {
    match check(reply)? {
        Lookup::Found(Reply::Bulk(Some(data))) => Ok(Lookup::Found(data)),
        Lookup::Found(other) => Err(unexpected(command, "bulk", &other)),
        Lookup::Absent => Ok(Lookup::Absent),
    }
}

pub(crate) fn status(command: &'static str, reply: Reply) -> ClientResult<Lookup<Vec<u8>>> {
    match check(reply)? {
        Lookup::Found(Reply::Status(text)) => Ok(Lookup::Found(text)),
        Lookup::Found(other) => Err(unexpected(command, "status", &other)),
        Lookup::Absent => Ok(Lookup::Absent),
    }
}

/// Bulk string holding a decimal float, as ZSCORE and ZINCRBY reply.
pub(crate) fn float(command: &'static str, reply: Reply) -> ClientResult<Lookup<f64>> {
    match bulk(command, reply)? {
        Lookup::Found(data) => parse_float(&data).map(Lookup::Found),
        Lookup::Absent => Ok(Lookup::Absent),
    }
}

/// Array whose elements may individually be nil, as HMGET replies.
pub(crate) fn optional_bulks(
    command: &'static str,
    reply: Reply,
) -> ClientResult<Lookup<Vec<Option<Vec<u8>>>>> {
    let items = match array(command, reply)? {
        Lookup::Found(items) => items,
        Lookup::Absent => return Ok(Lookup::Absent),
    };
    items
        .into_iter()
        .map(|item| match item {
            Reply::Bulk(data) => Ok(data),
            other => Err(unexpected(command, "bulk", &other)),
        })
        .collect::<ClientResult<Vec<_>>>()
        .map(Lookup::Found)
}

/// Array of non-nil bulk strings.
pub(crate) fn bulks(command: &'static str, reply: Reply) -> ClientResult<Lookup<Vec<Vec<u8>>>> {
    match array(command, reply)? {
        Lookup::Found(items) => bulk_items(command, items).map(Lookup::Found),
        Lookup::Absent => Ok(Lookup::Absent),
    }
}

/// Flat `field value field value ...` array folded into a map.
pub(crate) fn field_values(
    command: &'static str,
    reply: Reply,
) -> ClientResult<Lookup<HashMap<String, Vec<u8>>>> {
    match bulks(command, reply)? {
        Lookup::Found(items) => pair_fields(command, items).map(Lookup::Found),
        Lookup::Absent => Ok(Lookup::Absent),
    }
}

/// Two-element `[cursor, [items...]]` scan reply.
pub(crate) fn scan(command: &'static str, reply: Reply) -> ClientResult<Lookup<ScanPage<Vec<Vec<u8>>>>> {
    let parts = match array(command, reply)? {
        Lookup::Found(parts) => parts,
        Lookup::Absent => return Ok(Lookup::Absent),
    };
    if parts.len() != 2 {
        return Err(ClientError::Decode(format!(
            "{} reply has {} elements, expected 2",
            command,
            parts.len()
        )));
    }

    let mut parts = parts.into_iter();
    let (cursor, items) = match (parts.next(), parts.next()) {
        (Some(Reply::Bulk(Some(cursor))), Some(items)) => (cursor, items),
        (Some(other), _) => return Err(unexpected(command, "bulk cursor", &other)),
        _ => return Err(ClientError::Decode(format!("{} reply truncated", command))),
    };
    let cursor = std::str::from_utf8(&cursor)
        .ok()
        .and_then(|text| text.parse::<u64>().ok())
        .ok_or_else(|| {
            ClientError::Decode(format!(
                "{} cursor {:?} is not an unsigned integer",
                command,
                String::from_utf8_lossy(&cursor)
            ))
        })?;
    let items = match items {
        Reply::Array(Some(items)) => bulk_items(command, items)?,
        other => return Err(unexpected(command, "array", &other)),
    };
    Ok(Lookup::Found(ScanPage { cursor, items }))
}

/// Pairs a flat `field value ...` list into a map. Odd length is a decode error.
pub(crate) fn pair_fields(
    command: &'static str,
    items: Vec<Vec<u8>>,
) -> ClientResult<HashMap<String, Vec<u8>>> {
    ensure_even(command, items.len())?;
    let mut map = HashMap::with_capacity(items.len() / 2);
    let mut iter = items.into_iter();
    while let (Some(field), Some(value)) = (iter.next(), iter.next()) {
        let field = String::from_utf8(field).map_err(|err| {
            ClientError::Decode(format!("{} field is not valid UTF-8: {}", command, err))
        })?;
        map.insert(field, value);
    }
    Ok(map)
}

/// Pairs a flat `member score ...` list. Odd length is a decode error.
pub(crate) fn pair_scores(command: &'static str, items: Vec<Vec<u8>>) -> ClientResult<Vec<ScoredMember>> {
    ensure_even(command, items.len())?;
    let mut members = Vec::with_capacity(items.len() / 2);
    let mut iter = items.into_iter();
    while let (Some(member), Some(score)) = (iter.next(), iter.next()) {
        members.push(ScoredMember {
            member,
            score: parse_float(&score)?,
        });
    }
    Ok(members)
}

fn ensure_even(command: &'static str, len: usize) -> ClientResult<()> {
    if len % 2 != 0 {
        return Err(ClientError::Decode(format!(
            "{} returned {} elements, expected an even count",
            command, len
        )));
    }
    Ok(())
}

fn array(command: &'static str, reply: Reply) -> ClientResult<Lookup<Vec<Reply>>> {
    match check(reply)? {
        Lookup::Found(Reply::Array(Some(items))) => Ok(Lookup::Found(items)),
        Lookup::Found(other) => Err(unexpected(command, "array", &other)),
        Lookup::Absent => Ok(Lookup::Absent),
    }
}

fn bulk_items(command: &'static str, items: Vec<Reply>) -> ClientResult<Vec<Vec<u8>>> {
    items
        .into_iter()
        .map(|item| match item {
            Reply::Bulk(Some(data)) => Ok(data),
            other => Err(unexpected(command, "bulk", &other)),
        })
        .collect()
}

fn parse_float(data: &[u8]) -> ClientResult<f64> {
    let text = std::str::from_utf8(data)
        .map_err(|_| ClientError::Decode("score is not valid UTF-8".to_string()))?;
    // The store spells infinities "inf"/"-inf"; Rust's parser accepts both.
    text.parse::<f64>()
        .map_err(|_| ClientError::Decode(format!("{:?} is not a float", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_is_absent_not_error() {
        assert_eq!(integer("ZRANK", Reply::Bulk(None)).unwrap(), Lookup::Absent);
        assert_eq!(bulk("HGET", Reply::Array(None)).unwrap(), Lookup::Absent);
        assert_eq!(integer("ZRANK", Reply::Bulk(None)).unwrap().or(-1), -1);
    }

    #[test]
    fn server_error_surfaces() {
        let err = integer("ZCARD", Reply::Error(b"WRONGTYPE".to_vec())).unwrap_err();
        assert!(matches!(err, ClientError::Server { .. }));
    }

    #[test]
    fn wrong_type_is_unexpected_response() {
        let err = integer("HLEN", Reply::bulk("3")).unwrap_err();
        assert!(matches!(
            err,
            ClientError::UnexpectedResponse { command: "HLEN", expected: "integer", actual: "bulk" }
        ));
    }

    #[test]
    fn decodes_scan_page() {
        let reply = Reply::Array(Some(vec![Reply::bulk("42"), Reply::bulk_array(["a", "1", "b", "2"])]));
        let page = scan("HSCAN", reply).unwrap().into_option().unwrap();
        assert_eq!(page.cursor, 42);
        let map = pair_fields("HSCAN", page.items).unwrap();
        assert_eq!(map.get("a"), Some(&b"1".to_vec()));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn odd_payload_is_decode_error() {
        let err = pair_fields("HSCAN", vec![b"a".to_vec(), b"1".to_vec(), b"b".to_vec()]).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn scan_with_wrong_arity_fails() {
        let reply = Reply::Array(Some(vec![Reply::bulk("0")]));
        assert!(matches!(scan("ZSCAN", reply), Err(ClientError::Decode(_))));
    }

    #[test]
    fn scan_with_non_numeric_cursor_fails() {
        let reply = Reply::Array(Some(vec![Reply::bulk("abc"), Reply::bulk_array(Vec::<Vec<u8>>::new())]));
        assert!(matches!(scan("HSCAN", reply), Err(ClientError::Decode(_))));
    }

    #[test]
    fn pairs_scores() {
        let members = pair_scores("ZSCAN", vec![b"m".to_vec(), b"1.5".to_vec(), b"n".to_vec(), b"-inf".to_vec()])
            .unwrap();
        assert_eq!(members[0], ScoredMember { member: b"m".to_vec(), score: 1.5 });
        assert_eq!(members[1].score, f64::NEG_INFINITY);
    }

    #[test]
    fn hmget_keeps_nil_slots() {
        let reply = Reply::Array(Some(vec![Reply::bulk("x"), Reply::Bulk(None)]));
        let values = optional_bulks("HMGET", reply).unwrap().or_default();
        assert_eq!(values, vec![Some(b"x".to_vec()), None]);
    }
}
