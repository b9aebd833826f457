//! # Hash Operations
//!
//! Field-level access to hashes. `hmget` splits long field lists into chunks
//! of [`HMGET_CHUNK_SIZE`] so no single request exceeds the store's
//! command-line and reply-size limits.

use std::collections::HashMap;

use crate::client::Client;
use crate::error::{ClientError, ClientResult};
use crate::executor::{Command, Executor};
use crate::reply;
use crate::scalar::{as_str, Scalar};

/// Maximum number of fields sent in one HMGET request.
pub const HMGET_CHUNK_SIZE: usize = 32;

/// Builds one HMGET request per chunk of at most `HMGET_CHUNK_SIZE` fields.
pub fn hmget_commands<S: AsRef<str>>(key: &str, fields: &[S]) -> Vec<Command> {
    fields
        .chunks(HMGET_CHUNK_SIZE)
        .map(|chunk| {
            let mut cmd = Command::with_capacity("HMGET", chunk.len() + 1).arg(key);
            cmd.extend(chunk.iter().map(as_str));
            cmd
        })
        .collect()
}

impl<E: Executor> Client<E> {
    /// HSET key field value. Returns the number of fields newly created.
    pub fn hset(&self, key: &str, field: &str, value: impl Into<Scalar>) -> ClientResult<i64> {
        let cmd = Command::new("HSET").arg(key).arg(field).arg(value);
        reply::integer("HSET", self.run(&cmd)?)?.required("HSET")
    }

    /// HGET key field. `None` when the key or field is missing.
    pub fn hget(&self, key: &str, field: &str) -> ClientResult<Option<Vec<u8>>> {
        let cmd = Command::new("HGET").arg(key).arg(field);
        Ok(reply::bulk("HGET", self.run(&cmd)?)?.into_option())
    }

    /// Fetches `fields` in order, one HMGET per chunk of 32.
    ///
    /// The result lines up with `fields`; missing fields are `None`. Any
    /// failing chunk aborts the whole call and discards earlier chunks. A
    /// chunk reply that is nil or has the wrong element count is a decode
    /// error.
    pub fn hmget<S: AsRef<str>>(&self, key: &str, fields: &[S]) -> ClientResult<Vec<Option<Vec<u8>>>> {
        let mut values = Vec::with_capacity(fields.len());
        for cmd in hmget_commands(key, fields) {
            let requested = cmd.args().len() - 1;
            let chunk = reply::optional_bulks("HMGET", self.run(&cmd)?)?.required("HMGET")?;
            if chunk.len() != requested {
                return Err(ClientError::Decode(format!(
                    "HMGET returned {} values for {} fields",
                    chunk.len(),
                    requested
                )));
            }
            values.extend(chunk);
        }
        Ok(values)
    }

    /// HMSET key field value [field value ...].
    pub fn hmset<I, K, V>(&self, key: &str, fields: I) -> ClientResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Scalar>,
        V: Into<Scalar>,
    {
        let mut cmd = Command::new("HMSET").arg(key);
        for (field, value) in fields {
            cmd.push(field);
            cmd.push(value);
        }
        reply::status("HMSET", self.run(&cmd)?)?;
        Ok(())
    }

    /// HKEYS key. Empty when the key is missing.
    pub fn hkeys(&self, key: &str) -> ClientResult<Vec<Vec<u8>>> {
        let cmd = Command::new("HKEYS").arg(key);
        Ok(reply::bulks("HKEYS", self.run(&cmd)?)?.or_default())
    }

    /// HVALS key. Empty when the key is missing.
    pub fn hvals(&self, key: &str) -> ClientResult<Vec<Vec<u8>>> {
        let cmd = Command::new("HVALS").arg(key);
        Ok(reply::bulks("HVALS", self.run(&cmd)?)?.or_default())
    }

    /// HGETALL key, folded into a field → value map.
    pub fn hgetall(&self, key: &str) -> ClientResult<HashMap<String, Vec<u8>>> {
        let cmd = Command::new("HGETALL").arg(key);
        Ok(reply::field_values("HGETALL", self.run(&cmd)?)?.or_default())
    }

    /// HLEN key. 0 when the key is missing.
    pub fn hlen(&self, key: &str) -> ClientResult<i64> {
        let cmd = Command::new("HLEN").arg(key);
        Ok(reply::integer("HLEN", self.run(&cmd)?)?.or(0))
    }

    /// HINCRBY key field delta. Returns the value after the increment.
    pub fn hincrby(&self, key: &str, field: &str, delta: i64) -> ClientResult<i64> {
        let cmd = Command::new("HINCRBY").arg(key).arg(field).arg(delta);
        reply::integer("HINCRBY", self.run(&cmd)?)?.required("HINCRBY")
    }

    /// HEXISTS key field.
    pub fn hexists(&self, key: &str, field: &str) -> ClientResult<bool> {
        let cmd = Command::new("HEXISTS").arg(key).arg(field);
        Ok(reply::integer("HEXISTS", self.run(&cmd)?)?.or(0) == 1)
    }

    /// HDEL key field [field ...]. Returns the number of fields removed.
    pub fn hdel<S: AsRef<str>>(&self, key: &str, fields: &[S]) -> ClientResult<i64> {
        let mut cmd = Command::with_capacity("HDEL", fields.len() + 1).arg(key);
        cmd.extend(fields.iter().map(as_str));
        Ok(reply::integer("HDEL", self.run(&cmd)?)?.or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockExecutor;
    use crate::resp::Reply;

    fn fields(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{}", i)).collect()
    }

    fn echo_chunk(cmd: &Command) -> Reply {
        // Reply with each requested field name as its value.
        Reply::bulk_array(cmd.args()[1..].iter().map(|f| f.to_vec()))
    }

    #[test]
    fn hmget_issues_one_request_per_chunk() {
        for n in [0usize, 1, 32, 33, 64, 65] {
            let names = fields(n);
            let commands = hmget_commands("h", &names);
            assert_eq!(commands.len(), (n + HMGET_CHUNK_SIZE - 1) / HMGET_CHUNK_SIZE, "n = {}", n);

            let mut mock = MockExecutor::new();
            for cmd in &commands {
                mock = mock.reply(echo_chunk(cmd));
            }
            let client = Client::new(mock);
            let values = client.hmget("h", &names).unwrap();

            assert_eq!(client.executor().commands(), commands);
            let expected: Vec<_> = names.iter().map(|f| Some(f.as_bytes().to_vec())).collect();
            assert_eq!(values, expected, "n = {}", n);
        }
    }

    #[test]
    fn hmget_chunks_are_bounded_and_ordered() {
        let names = fields(65);
        let commands = hmget_commands("h", &names);
        let sizes: Vec<_> = commands.iter().map(|c| c.args().len() - 1).collect();
        assert_eq!(sizes, vec![32, 32, 1]);
        assert_eq!(commands[1].args_lossy()[1], "f32");
        assert!(commands.iter().all(|c| c.args_lossy()[0] == "h"));
    }

    #[test]
    fn hmget_with_no_fields_skips_the_network() {
        let client = Client::new(MockExecutor::new());
        assert!(client.hmget::<&str>("h", &[]).unwrap().is_empty());
        assert!(client.executor().commands().is_empty());
    }

    #[test]
    fn hmget_aborts_on_failed_chunk() {
        let names = fields(40);
        let commands = hmget_commands("h", &names);
        let mock = MockExecutor::new()
            .reply(echo_chunk(&commands[0]))
            .fail(ClientError::Protocol);
        let client = Client::new(mock);
        assert!(matches!(client.hmget("h", &names), Err(ClientError::Protocol)));
        assert_eq!(client.executor().commands().len(), 2);
    }

    #[test]
    fn hmget_short_chunk_reply_is_decode_error() {
        let client = Client::new(MockExecutor::new().reply(Reply::bulk_array(["only-one"])));
        let err = client.hmget("h", &["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn hmget_long_chunk_reply_is_decode_error() {
        let client = Client::new(MockExecutor::new().reply(Reply::bulk_array(["x", "y"])));
        assert!(matches!(client.hmget("h", &["a"]), Err(ClientError::Decode(_))));
    }

    #[test]
    fn hmget_nil_chunk_reply_is_decode_error() {
        let names = fields(33);
        let mock = MockExecutor::new()
            .reply(Reply::Array(None))
            .reply(Reply::bulk_array(["f32"]));
        let client = Client::new(mock);
        assert!(matches!(client.hmget("h", &names), Err(ClientError::Decode(_))));
        // The first bad chunk stops the call.
        assert_eq!(client.executor().commands().len(), 1);
    }

    #[test]
    fn nil_reply_to_write_commands_is_decode_error() {
        let client = Client::new(MockExecutor::new().reply(Reply::Bulk(None)).reply(Reply::Bulk(None)));
        assert!(matches!(client.hincrby("h", "n", 5), Err(ClientError::Decode(_))));
        assert!(matches!(client.hset("h", "f", "v"), Err(ClientError::Decode(_))));
    }

    #[test]
    fn hmget_preserves_missing_fields() {
        let mock = MockExecutor::new().reply(Reply::Array(Some(vec![Reply::Bulk(None), Reply::bulk("v")])));
        let client = Client::new(mock);
        assert_eq!(client.hmget("h", &["a", "b"]).unwrap(), vec![None, Some(b"v".to_vec())]);
    }

    #[test]
    fn absent_values_map_to_zero() {
        let mock = MockExecutor::new()
            .reply(Reply::Bulk(None))
            .reply(Reply::Integer(0))
            .reply(Reply::Array(Some(Vec::new())))
            .reply(Reply::Integer(0))
            .reply(Reply::Array(Some(Vec::new())));
        let client = Client::new(mock);
        assert_eq!(client.hget("h", "f").unwrap(), None);
        assert_eq!(client.hlen("h").unwrap(), 0);
        assert!(client.hkeys("h").unwrap().is_empty());
        assert!(!client.hexists("h", "f").unwrap());
        assert!(client.hgetall("h").unwrap().is_empty());
    }

    #[test]
    fn hmset_flattens_pairs() {
        let client = Client::new(MockExecutor::new().reply(Reply::Status(b"OK".to_vec())));
        client.hmset("h", [("a", Scalar::from(1i64)), ("b", Scalar::from("x"))]).unwrap();
        assert_eq!(client.executor().commands()[0].name(), "HMSET");
        assert_eq!(client.executor().last_args(), vec!["h", "a", "1", "b", "x"]);
    }

    #[test]
    fn hset_coerces_value() {
        let client = Client::new(MockExecutor::new().reply(Reply::Integer(1)));
        assert_eq!(client.hset("h", "score", 2.5).unwrap(), 1);
        assert_eq!(client.executor().last_args(), vec!["h", "score", "2.5"]);
    }

    #[test]
    fn hgetall_rejects_odd_reply() {
        let client = Client::new(MockExecutor::new().reply(Reply::bulk_array(["a", "1", "b"])));
        assert!(client.hgetall("h").unwrap_err().is_decode());
    }

    #[test]
    fn hdel_and_hincrby_arguments() {
        let client = Client::new(MockExecutor::new().reply(Reply::Integer(2)).reply(Reply::Integer(7)));
        assert_eq!(client.hdel("h", &["a", "b"]).unwrap(), 2);
        assert_eq!(client.executor().last_args(), vec!["h", "a", "b"]);
        assert_eq!(client.hincrby("h", "n", -3).unwrap(), 7);
        assert_eq!(client.executor().last_args(), vec!["h", "n", "-3"]);
    }
}
