//! # RemoteKV Sync Client
//!
//! Purpose: Provide typed, validated access to hashes, sorted sets and
//! lock entries on a Redis-compatible store, over a pooled synchronous
//! RESP2 connection.
//!
//! ## Design Principles
//! 1. **Single Seam**: Every operation goes through [`Executor::execute`];
//!    the pool is just one implementation of it.
//! 2. **Closed Coercion**: Arguments are a fixed set of [`Scalar`] types.
//! 3. **Shape First**: Replies are validated before they are interpreted.
//! 4. **Nil Is Not Failure**: Missing keys and members map to zero values.
//!
//! ```no_run
//! use rkv_client::{Client, ScanOptions};
//!
//! let client = Client::connect("127.0.0.1:6379")?;
//! if client.set_nx_ex("lock:report", "worker-1", 30)? {
//!     let mut cursor = 0;
//!     loop {
//!         let page = client.hscan("report", cursor, ScanOptions::new().count(100))?;
//!         // ... process page.items ...
//!         if page.is_finished() {
//!             break;
//!         }
//!         cursor = page.cursor;
//!     }
//! }
//! # Ok::<(), rkv_client::ClientError>(())
//! ```

mod client;
mod config;
mod error;
mod executor;
mod hash;
mod lock;
mod pool;
mod reply;
mod resp;
mod scalar;
mod scan;
mod zset;

#[cfg(test)]
mod mock;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use executor::{Command, Executor};
pub use hash::{hmget_commands, HMGET_CHUNK_SIZE};
pub use lock::{lock_command, Expiry};
pub use pool::{ConnectionPool, PooledConnection};
pub use reply::{ScanPage, ScoredMember};
pub use resp::Reply;
pub use scalar::Scalar;
pub use scan::{scan_command, ScanOptions};
pub use zset::{
    rank_range_command, store_command, zrangebyscore_command, zrevrangebyscore_command, Aggregate, Limit,
    ScoreRange,
};

pub use rkv_common::{AppError, ErrorCode};
