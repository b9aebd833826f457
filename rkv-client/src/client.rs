//! # Client Facade
//!
//! Purpose: Expose typed, validated operations over hashes, sorted sets and
//! locks on top of any [`Executor`].
//!
//! ## Design Principles
//! 1. **Facade Pattern**: `Client` hides pooling and protocol details.
//! 2. **Stateless Calls**: Each operation is one request/reply (or a fixed
//!    sequence of them); nothing is cached between calls.
//! 3. **Nil Is Not Failure**: A missing key or member yields the operation's
//!    zero value, never an error.

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::executor::{Command, Executor};
use crate::pool::ConnectionPool;
use crate::resp::Reply;

/// Typed access to the remote store.
///
/// Operations are grouped by data type in the `hash`, `zset`, `scan` and
/// `lock` modules.
pub struct Client<E = ConnectionPool> {
    executor: E,
}

impl Client<ConnectionPool> {
    /// Creates a pooled client with default configuration.
    pub fn connect(addr: impl Into<String>) -> ClientResult<Self> {
        Self::with_config(ClientConfig::with_addr(addr))
    }

    /// Creates a pooled client with a custom configuration.
    pub fn with_config(config: ClientConfig) -> ClientResult<Self> {
        Ok(Client::new(ConnectionPool::new(config)?))
    }
}

impl<E> Client<E> {
    /// Wraps an existing executor.
    pub fn new(executor: E) -> Self {
        Client { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }
}

impl<E: Executor> Client<E> {
    #[inline]
    pub(crate) fn run(&self, command: &Command) -> ClientResult<Reply> {
        self.executor.execute(command)
    }
}
