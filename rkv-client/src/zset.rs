//! # Sorted-Set Operations
//!
//! Range queries, rank lookups, removals and union/intersection stores.
//! Every request is assembled by a free `*_command` function so the exact
//! argument order can be checked without a server.
//!
//! Score bounds are passed through as strings and keep the store's syntax:
//! `"-inf"`, `"+inf"`, `"(2"` for exclusive bounds. Lexical bounds use
//! `"-"`, `"+"`, `"[a"` and `"(a"`.

use std::fmt;

use crate::client::Client;
use crate::error::ClientResult;
use crate::executor::{Command, Executor};
use crate::reply;
use crate::scalar::{as_str, Scalar};

/// Inclusive-by-default score interval, in logical `min..=max` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRange {
    pub min: String,
    pub max: String,
}

impl ScoreRange {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        ScoreRange {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Every score, `-inf` to `+inf`.
    pub fn all() -> Self {
        Self::new("-inf", "+inf")
    }
}

/// `LIMIT offset count` sub-clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub offset: i64,
    pub count: i64,
}

impl Limit {
    pub fn new(offset: i64, count: i64) -> Self {
        Limit { offset, count }
    }
}

/// How scores of a member present in several sources are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Min,
    Max,
}

impl Aggregate {
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregate::Sum => "SUM",
            Aggregate::Min => "MIN",
            Aggregate::Max => "MAX",
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `ZRANGE`/`ZREVRANGE key start stop [WITHSCORES]`.
pub fn rank_range_command(name: &'static str, key: &str, start: i64, stop: i64, with_scores: bool) -> Command {
    let mut cmd = Command::with_capacity(name, 4).arg(key).arg(start).arg(stop);
    if with_scores {
        cmd.push("WITHSCORES");
    }
    cmd
}

/// `ZRANGEBYSCORE key min max [WITHSCORES] [LIMIT offset count]`.
pub fn zrangebyscore_command(key: &str, range: &ScoreRange, with_scores: bool, limit: Option<Limit>) -> Command {
    let cmd = Command::with_capacity("ZRANGEBYSCORE", 7)
        .arg(key)
        .arg(range.min.as_str())
        .arg(range.max.as_str());
    score_range_tail(cmd, with_scores, limit)
}

/// `ZREVRANGEBYSCORE key max min [WITHSCORES] [LIMIT offset count]`.
///
/// The reverse command takes the upper bound first.
pub fn zrevrangebyscore_command(key: &str, range: &ScoreRange, with_scores: bool, limit: Option<Limit>) -> Command {
    let cmd = Command::with_capacity("ZREVRANGEBYSCORE", 7)
        .arg(key)
        .arg(range.max.as_str())
        .arg(range.min.as_str());
    score_range_tail(cmd, with_scores, limit)
}

fn score_range_tail(mut cmd: Command, with_scores: bool, limit: Option<Limit>) -> Command {
    if with_scores {
        cmd.push("WITHSCORES");
    }
    if let Some(limit) = limit {
        cmd.push("LIMIT");
        cmd.push(limit.offset);
        cmd.push(limit.count);
    }
    cmd
}

/// `ZUNIONSTORE`/`ZINTERSTORE dest numkeys key... [WEIGHTS w...] [AGGREGATE mode]`.
///
/// The number of weights is not checked against the number of keys; the
/// server rejects a mismatch.
pub fn store_command<S: AsRef<str>>(
    name: &'static str,
    destination: &str,
    keys: &[S],
    weights: &[f64],
    aggregate: Option<Aggregate>,
) -> Command {
    let mut cmd = Command::with_capacity(name, keys.len() + weights.len() + 5)
        .arg(destination)
        .arg(keys.len());
    cmd.extend(keys.iter().map(as_str));
    if !weights.is_empty() {
        cmd.push("WEIGHTS");
        cmd.extend(weights.iter().copied());
    }
    if let Some(aggregate) = aggregate {
        cmd.push("AGGREGATE");
        cmd.push(aggregate.as_str());
    }
    cmd
}

impl<E: Executor> Client<E> {
    fn zinteger(&self, cmd: &Command, zero: i64) -> ClientResult<i64> {
        Ok(reply::integer(cmd.name(), self.run(cmd)?)?.or(zero))
    }

    fn zmembers(&self, cmd: &Command) -> ClientResult<Vec<Vec<u8>>> {
        Ok(reply::bulks(cmd.name(), self.run(cmd)?)?.or_default())
    }

    /// ZADD key score member [score member ...]. Returns the number of new members.
    pub fn zadd<M: Into<Scalar>>(&self, key: &str, members: impl IntoIterator<Item = (M, f64)>) -> ClientResult<i64> {
        let mut cmd = Command::new("ZADD").arg(key);
        for (member, score) in members {
            cmd.push(score);
            cmd.push(member);
        }
        Ok(reply::integer("ZADD", self.run(&cmd)?)?.or(0))
    }

    /// ZSCORE key member. `None` when the key or member is missing.
    pub fn zscore(&self, key: &str, member: &str) -> ClientResult<Option<f64>> {
        let cmd = Command::new("ZSCORE").arg(key).arg(member);
        Ok(reply::float("ZSCORE", self.run(&cmd)?)?.into_option())
    }

    /// ZINCRBY key delta member. Returns the new score.
    pub fn zincrby(&self, key: &str, delta: f64, member: &str) -> ClientResult<f64> {
        let cmd = Command::new("ZINCRBY").arg(key).arg(delta).arg(member);
        reply::float("ZINCRBY", self.run(&cmd)?)?.required("ZINCRBY")
    }

    /// ZCARD key. 0 when the key is missing.
    pub fn zcard(&self, key: &str) -> ClientResult<i64> {
        self.zinteger(&Command::new("ZCARD").arg(key), 0)
    }

    /// ZCOUNT key min max.
    pub fn zcount(&self, key: &str, range: &ScoreRange) -> ClientResult<i64> {
        let cmd = Command::new("ZCOUNT")
            .arg(key)
            .arg(range.min.as_str())
            .arg(range.max.as_str());
        self.zinteger(&cmd, 0)
    }

    /// ZLEXCOUNT key min max.
    pub fn zlexcount(&self, key: &str, min: &str, max: &str) -> ClientResult<i64> {
        self.zinteger(&Command::new("ZLEXCOUNT").arg(key).arg(min).arg(max), 0)
    }

    /// ZRANGE key start stop [WITHSCORES], ascending by score.
    ///
    /// With scores, the result alternates member and score.
    pub fn zrange(&self, key: &str, start: i64, stop: i64, with_scores: bool) -> ClientResult<Vec<Vec<u8>>> {
        self.zmembers(&rank_range_command("ZRANGE", key, start, stop, with_scores))
    }

    /// ZREVRANGE key start stop [WITHSCORES], descending by score.
    pub fn zrevrange(&self, key: &str, start: i64, stop: i64, with_scores: bool) -> ClientResult<Vec<Vec<u8>>> {
        self.zmembers(&rank_range_command("ZREVRANGE", key, start, stop, with_scores))
    }

    /// ZRANGEBYSCORE key min max [WITHSCORES] [LIMIT offset count].
    pub fn zrangebyscore(
        &self,
        key: &str,
        range: &ScoreRange,
        with_scores: bool,
        limit: Option<Limit>,
    ) -> ClientResult<Vec<Vec<u8>>> {
        self.zmembers(&zrangebyscore_command(key, range, with_scores, limit))
    }

    /// ZREVRANGEBYSCORE key max min [WITHSCORES] [LIMIT offset count].
    pub fn zrevrangebyscore(
        &self,
        key: &str,
        range: &ScoreRange,
        with_scores: bool,
        limit: Option<Limit>,
    ) -> ClientResult<Vec<Vec<u8>>> {
        self.zmembers(&zrevrangebyscore_command(key, range, with_scores, limit))
    }

    /// ZRANK key member. -1 when the member is missing.
    pub fn zrank(&self, key: &str, member: &str) -> ClientResult<i64> {
        self.zinteger(&Command::new("ZRANK").arg(key).arg(member), -1)
    }

    /// ZREVRANK key member. -1 when the member is missing.
    pub fn zrevrank(&self, key: &str, member: &str) -> ClientResult<i64> {
        self.zinteger(&Command::new("ZREVRANK").arg(key).arg(member), -1)
    }

    /// ZREM key member [member ...]. Returns the number removed.
    pub fn zrem<S: AsRef<str>>(&self, key: &str, members: &[S]) -> ClientResult<i64> {
        let mut cmd = Command::with_capacity("ZREM", members.len() + 1).arg(key);
        cmd.extend(members.iter().map(as_str));
        self.zinteger(&cmd, 0)
    }

    /// ZREMRANGEBYRANK key start stop.
    pub fn zremrangebyrank(&self, key: &str, start: i64, stop: i64) -> ClientResult<i64> {
        self.zinteger(&Command::new("ZREMRANGEBYRANK").arg(key).arg(start).arg(stop), 0)
    }

    /// ZREMRANGEBYSCORE key min max.
    pub fn zremrangebyscore(&self, key: &str, range: &ScoreRange) -> ClientResult<i64> {
        let cmd = Command::new("ZREMRANGEBYSCORE")
            .arg(key)
            .arg(range.min.as_str())
            .arg(range.max.as_str());
        self.zinteger(&cmd, 0)
    }

    /// ZREMRANGEBYLEX key min max.
    pub fn zremrangebylex(&self, key: &str, min: &str, max: &str) -> ClientResult<i64> {
        self.zinteger(&Command::new("ZREMRANGEBYLEX").arg(key).arg(min).arg(max), 0)
    }

    /// ZUNIONSTORE. Returns the cardinality of `destination` afterwards.
    pub fn zunionstore<S: AsRef<str>>(
        &self,
        destination: &str,
        keys: &[S],
        weights: &[f64],
        aggregate: Option<Aggregate>,
    ) -> ClientResult<i64> {
        self.zinteger(&store_command("ZUNIONSTORE", destination, keys, weights, aggregate), 0)
    }

    /// ZINTERSTORE. Returns the cardinality of `destination` afterwards.
    pub fn zinterstore<S: AsRef<str>>(
        &self,
        destination: &str,
        keys: &[S],
        weights: &[f64],
        aggregate: Option<Aggregate>,
    ) -> ClientResult<i64> {
        self.zinteger(&store_command("ZINTERSTORE", destination, keys, weights, aggregate), 0)
    }
}
