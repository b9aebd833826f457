//! # Cursor Scans
//!
//! One call to [`Client::hscan`] or [`Client::zscan`] performs one step of the
//! store's incremental enumeration. Feed the returned cursor back in until it
//! comes back as `0`.
//!
//! `count` is only a hint and `MATCH` filtering happens after elements are
//! picked, so a step can return nothing while the cursor is still non-zero.
//! Enumeration is best effort: keys mutated during a scan may yield
//! duplicates or omissions.

use std::collections::HashMap;

use crate::client::Client;
use crate::error::ClientResult;
use crate::executor::{Command, Executor};
use crate::reply::{self, Lookup, ScanPage, ScoredMember};

/// Optional `MATCH` and `COUNT` arguments of a scan step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions<'a> {
    pattern: Option<&'a str>,
    count: Option<u64>,
}

impl<'a> ScanOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Glob pattern passed verbatim to `MATCH`. Empty patterns are omitted.
    pub fn pattern(mut self, pattern: &'a str) -> Self {
        self.pattern = Some(pattern).filter(|p| !p.is_empty());
        self
    }

    /// Advisory batch size passed to `COUNT`. Zero is omitted.
    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count).filter(|&c| c > 0);
        self
    }
}

/// Builds `<name> key cursor [MATCH pattern] [COUNT n]`.
pub fn scan_command(name: &'static str, key: &str, cursor: u64, options: ScanOptions<'_>) -> Command {
    let mut cmd = Command::with_capacity(name, 6).arg(key).arg(cursor);
    if let Some(pattern) = options.pattern {
        cmd.push("MATCH");
        cmd.push(pattern);
    }
    if let Some(count) = options.count {
        cmd.push("COUNT");
        cmd.push(count);
    }
    cmd
}

impl<E: Executor> Client<E> {
    /// One HSCAN step over the fields of `key`.
    pub fn hscan(
        &self,
        key: &str,
        cursor: u64,
        options: ScanOptions<'_>,
    ) -> ClientResult<ScanPage<HashMap<String, Vec<u8>>>> {
        let cmd = scan_command("HSCAN", key, cursor, options);
        match reply::scan("HSCAN", self.run(&cmd)?)? {
            Lookup::Found(page) => Ok(ScanPage {
                cursor: page.cursor,
                items: reply::pair_fields("HSCAN", page.items)?,
            }),
            Lookup::Absent => Ok(ScanPage {
                cursor: 0,
                items: HashMap::new(),
            }),
        }
    }

    /// One ZSCAN step over the members of `key`, with their scores.
    pub fn zscan(
        &self,
        key: &str,
        cursor: u64,
        options: ScanOptions<'_>,
    ) -> ClientResult<ScanPage<Vec<ScoredMember>>> {
        let cmd = scan_command("ZSCAN", key, cursor, options);
        match reply::scan("ZSCAN", self.run(&cmd)?)? {
            Lookup::Found(page) => Ok(ScanPage {
                cursor: page.cursor,
                items: reply::pair_scores("ZSCAN", page.items)?,
            }),
            Lookup::Absent => Ok(ScanPage {
                cursor: 0,
                items: Vec::new(),
            }),
        }
    }

    /// Runs HSCAN from cursor 0 until the server reports completion.
    pub fn hscan_all(&self, key: &str, options: ScanOptions<'_>) -> ClientResult<HashMap<String, Vec<u8>>> {
        let mut fields = HashMap::new();
        let mut cursor = 0;
        loop {
            let page = self.hscan(key, cursor, options)?;
            fields.extend(page.items);
            if page.cursor == 0 {
                return Ok(fields);
            }
            cursor = page.cursor;
        }
    }

    /// Runs ZSCAN from cursor 0 until the server reports completion.
    pub fn zscan_all(&self, key: &str, options: ScanOptions<'_>) -> ClientResult<Vec<ScoredMember>> {
        let mut members = Vec::new();
        let mut cursor = 0;
        loop {
            let page = self.zscan(key, cursor, options)?;
            members.extend(page.items);
            if page.cursor == 0 {
                return Ok(members);
            }
            cursor = page.cursor;
        }
    }
}
