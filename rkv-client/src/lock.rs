//! # Lock Acquisition
//!
//! `SET key value EX|PX expire NX` used as a mutual-exclusion lock. One
//! round trip, no retry, no renewal. Ownership lives entirely on the server;
//! releasing the lock (for example compare-and-delete on `value`) is up to
//! the caller.

use rkv_common::{AppError, ErrorCode};

use crate::client::Client;
use crate::error::{ClientError, ClientResult};
use crate::executor::{Command, Executor};
use crate::reply::{self, Lookup};
use crate::scalar::Scalar;

/// Expiry attached to a lock entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    Seconds(u64),
    Millis(u64),
}

impl Expiry {
    fn unit(self) -> &'static str {
        match self {
            Expiry::Seconds(_) => "EX",
            Expiry::Millis(_) => "PX",
        }
    }

    fn amount(self) -> u64 {
        match self {
            Expiry::Seconds(n) | Expiry::Millis(n) => n,
        }
    }
}

/// Builds `SET key value EX|PX expire NX`.
///
/// Rejects a value whose wire form is empty. An expiry of zero is sent as-is.
pub fn lock_command(key: &str, value: impl Into<Scalar>, expiry: Expiry) -> ClientResult<Command> {
    let value = value.into();
    if value.is_blank() {
        return Err(ClientError::Validation(AppError::with_message(
            ErrorCode::ParamInvalid,
            "lock value is empty",
        )));
    }
    Ok(Command::with_capacity("SET", 5)
        .arg(key)
        .arg(value)
        .arg(expiry.unit())
        .arg(expiry.amount())
        .arg("NX"))
}

impl<E: Executor> Client<E> {
    /// Tries to create `key` with a TTL in seconds, only if it does not exist.
    ///
    /// `Ok(false)` means someone else holds the lock.
    pub fn set_nx_ex(&self, key: &str, value: impl Into<Scalar>, seconds: u64) -> ClientResult<bool> {
        self.try_lock(key, value, Expiry::Seconds(seconds))
    }

    /// Tries to create `key` with a TTL in milliseconds, only if it does not exist.
    pub fn set_nx_px(&self, key: &str, value: impl Into<Scalar>, millis: u64) -> ClientResult<bool> {
        self.try_lock(key, value, Expiry::Millis(millis))
    }

    /// Single acquisition attempt with an explicit expiry.
    pub fn try_lock(&self, key: &str, value: impl Into<Scalar>, expiry: Expiry) -> ClientResult<bool> {
        let cmd = lock_command(key, value, expiry)?;
        match reply::status("SET", self.run(&cmd)?)? {
            Lookup::Found(_) => Ok(true),
            Lookup::Absent => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockExecutor;
    use crate::resp::Reply;

    #[test]
    fn seconds_variant_arguments() {
        let cmd = lock_command("job:1", "worker-a", Expiry::Seconds(30)).unwrap();
        assert_eq!(cmd.name(), "SET");
        assert_eq!(cmd.args_lossy(), vec!["job:1", "worker-a", "EX", "30", "NX"]);
    }

    #[test]
    fn millis_variant_arguments() {
        let cmd = lock_command("job:1", 42i64, Expiry::Millis(1500)).unwrap();
        assert_eq!(cmd.args_lossy(), vec!["job:1", "42", "PX", "1500", "NX"]);
    }

    #[test]
    fn acquire_then_contend() {
        let mock = MockExecutor::new()
            .reply(Reply::Status(b"OK".to_vec()))
            .reply(Reply::Bulk(None));
        let client = Client::new(mock);
        assert!(client.set_nx_ex("lock", "me", 10).unwrap());
        assert!(!client.set_nx_px("lock", "you", 10_000).unwrap());
        assert_eq!(client.executor().commands().len(), 2);
    }

    #[test]
    fn empty_value_fails_without_network() {
        let client = Client::new(MockExecutor::new());
        let err = client.set_nx_ex("lock", "", 10).unwrap_err();
        assert!(err.is_validation());
        match err {
            ClientError::Validation(app) => assert_eq!(app.code(), ErrorCode::ParamInvalid),
            other => panic!("unexpected error: {other}"),
        }
        assert!(client.executor().commands().is_empty());
    }

    #[test]
    fn zero_expiry_is_not_validated() {
        let cmd = lock_command("k", "v", Expiry::Seconds(0)).unwrap();
        assert_eq!(cmd.args_lossy()[3], "0");
    }

    #[test]
    fn transport_errors_propagate() {
        let client = Client::new(MockExecutor::new().fail(ClientError::Protocol));
        assert!(matches!(client.set_nx_ex("lock", "me", 1), Err(ClientError::Protocol)));

        let client = Client::new(MockExecutor::new().reply(Reply::Error(b"ERR invalid expire time".to_vec())));
        assert!(matches!(client.set_nx_px("lock", "me", 0), Err(ClientError::Server { .. })));
    }
}
