//! # Connection Pool
//!
//! Purpose: Reuse TCP connections across commands to reduce handshake
//! latency and allocation churn. The pool is the production [`Executor`].
//!
//! ## Design Principles
//! 1. **Bounded Reuse**: At most `max_total` sockets, `max_idle` of them parked.
//! 2. **Short Critical Sections**: The mutex guards only the idle queue and count.
//! 3. **No Waiting**: An exhausted pool errors instead of blocking the caller.
//! 4. **Poisoned Sockets Leave**: A connection that failed mid-command is closed.

use std::collections::VecDeque;
use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::executor::{Command, Executor};
use crate::resp::{encode_command, read_reply, Reply};

struct PoolState {
    idle: VecDeque<Connection>,
    total: usize,
}

struct PoolInner {
    config: ClientConfig,
    addr: SocketAddr,
    state: Mutex<PoolState>,
}

/// Connection pool handle. Cloning shares the same pool.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Creates a pool. No connection is opened until the first command.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let addr: SocketAddr = config
            .addr
            .parse()
            .map_err(|_| ClientError::InvalidAddress(config.addr.clone()))?;
        let state = PoolState {
            idle: VecDeque::with_capacity(config.max_idle),
            total: 0,
        };
        Ok(ConnectionPool {
            inner: Arc::new(PoolInner {
                config,
                addr,
                state: Mutex::new(state),
            }),
        })
    }

    /// Acquires a connection from the pool, opening one if none is idle.
    pub fn acquire(&self) -> ClientResult<PooledConnection> {
        if let Some(conn) = self.pop_idle() {
            return Ok(PooledConnection::new(self.clone(), conn));
        }

        if !self.try_reserve() {
            return Err(ClientError::PoolExhausted {
                max_total: self.inner.config.max_total,
            });
        }

        match Connection::connect(self.inner.addr, &self.inner.config) {
            Ok(conn) => {
                debug!(addr = %self.inner.addr, "opened connection");
                Ok(PooledConnection::new(self.clone(), conn))
            }
            Err(err) => {
                self.release_slot();
                Err(err)
            }
        }
    }

    /// Number of idle and total connections, in that order.
    pub fn stats(&self) -> (usize, usize) {
        let state = self.inner.state.lock();
        (state.idle.len(), state.total)
    }

    fn pop_idle(&self) -> Option<Connection> {
        self.inner.state.lock().idle.pop_front()
    }

    fn try_reserve(&self) -> bool {
        let mut state = self.inner.state.lock();
        if state.total >= self.inner.config.max_total {
            return false;
        }
        state.total += 1;
        true
    }

    fn release_slot(&self) {
        let mut state = self.inner.state.lock();
        state.total = state.total.saturating_sub(1);
    }

    fn return_connection(&self, conn: Connection) {
        let mut state = self.inner.state.lock();
        if state.idle.len() < self.inner.config.max_idle {
            state.idle.push_back(conn);
        } else {
            state.total = state.total.saturating_sub(1);
        }
    }
}

impl Executor for ConnectionPool {
    fn execute(&self, command: &Command) -> ClientResult<Reply> {
        trace!(command = command.name(), args = command.args().len(), "execute");
        self.acquire()?.exec(command)
    }
}

/// RAII wrapper returning a connection to the pool on drop.
pub struct PooledConnection {
    pool: ConnectionPool,
    conn: Option<Connection>,
    valid: bool,
}

impl PooledConnection {
    fn new(pool: ConnectionPool, conn: Connection) -> Self {
        PooledConnection {
            pool,
            conn: Some(conn),
            valid: true,
        }
    }

    /// Sends one command and reads its reply.
    pub fn exec(&mut self, command: &Command) -> ClientResult<Reply> {
        let conn = match self.conn.as_mut() {
            Some(conn) => conn,
            None => return Err(ClientError::Protocol),
        };
        let reply = conn.exec(command);
        if let Err(err) = &reply {
            // If IO/protocol fails, do not return this connection to the pool.
            warn!(command = command.name(), error = %err, "discarding connection");
            self.valid = false;
        }
        reply
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => return,
        };

        if self.valid {
            self.pool.return_connection(conn);
        } else {
            self.pool.release_slot();
        }
    }
}

/// Single TCP connection with reusable buffers.
struct Connection {
    // Buffered reader reduces syscalls while still allowing direct writes.
    reader: BufReader<TcpStream>,
    line_buf: Vec<u8>,
    write_buf: Vec<u8>,
}

impl Connection {
    fn connect(addr: SocketAddr, config: &ClientConfig) -> ClientResult<Self> {
        let stream = match config.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout)?,
            None => TcpStream::connect(addr)?,
        };
        stream.set_read_timeout(config.read_timeout)?;
        stream.set_write_timeout(config.write_timeout)?;
        // Disable Nagle to keep request latency low for small payloads.
        stream.set_nodelay(true)?;

        Ok(Connection {
            reader: BufReader::new(stream),
            line_buf: Vec::with_capacity(128),
            write_buf: Vec::with_capacity(256),
        })
    }

    fn exec(&mut self, command: &Command) -> ClientResult<Reply> {
        self.write_buf.clear();
        encode_command(command, &mut self.write_buf);

        let stream = self.reader.get_mut();
        stream.write_all(&self.write_buf)?;
        stream.flush()?;

        read_reply(&mut self.reader, &mut self.line_buf)
    }
}
