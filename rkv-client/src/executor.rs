//! # Command Executor
//!
//! Purpose: Define the single seam between request shaping and the wire.
//!
//! ## Design Principles
//! 1. **One Round Trip**: `execute` sends one command and returns its reply.
//! 2. **Coerce Once**: Arguments are converted to wire bytes as they are pushed.
//! 3. **Inspectable Requests**: A `Command` exposes its name and arguments so
//!    argument order can be checked without a server.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::ClientResult;
use crate::resp::Reply;
use crate::scalar::Scalar;

/// A command name plus its ordered wire arguments. Lives for one call.
#[derive(Clone, PartialEq, Eq)]
pub struct Command {
    name: &'static str,
    args: Vec<Bytes>,
}

impl Command {
    pub fn new(name: &'static str) -> Self {
        Command {
            name,
            args: Vec::new(),
        }
    }

    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Command {
            name,
            args: Vec::with_capacity(capacity),
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, value: impl Into<Scalar>) -> Self {
        self.push(value);
        self
    }

    /// Appends one argument in place.
    pub fn push(&mut self, value: impl Into<Scalar>) {
        self.args.push(value.into().into_wire());
    }

    /// Appends every item of `values`, in order.
    pub fn extend<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<Scalar>,
    {
        for value in values {
            self.push(value);
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn args(&self) -> &[Bytes] {
        &self.args
    }

    /// Arguments rendered as lossy UTF-8, for assertions and logs.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| String::from_utf8_lossy(arg).into_owned())
            .collect()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {:?}", String::from_utf8_lossy(arg))?;
        }
        Ok(())
    }
}

/// Executes one command against the remote store.
///
/// Implementations own connection handling. They must be safe to call from
/// several threads at once.
pub trait Executor {
    fn execute(&self, command: &Command) -> ClientResult<Reply>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, command: &Command) -> ClientResult<Reply> {
        (**self).execute(command)
    }
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, command: &Command) -> ClientResult<Reply> {
        (**self).execute(command)
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&self, command: &Command) -> ClientResult<Reply> {
        (**self).execute(command)
    }
}
