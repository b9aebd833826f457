//! Scripted executor for unit tests: records every command and replays
//! queued replies in order.

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::error::ClientResult;
use crate::executor::{Command, Executor};
use crate::resp::Reply;

#[derive(Default)]
pub(crate) struct MockExecutor {
    replies: Mutex<VecDeque<ClientResult<Reply>>>,
    commands: Mutex<Vec<Command>>,
}

impl MockExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues the reply for the next command.
    pub(crate) fn reply(self, reply: Reply) -> Self {
        self.replies.lock().push_back(Ok(reply));
        self
    }

    /// Queues a failure for the next command.
    pub(crate) fn fail(self, err: crate::ClientError) -> Self {
        self.replies.lock().push_back(Err(err));
        self
    }

    pub(crate) fn commands(&self) -> Vec<Command> {
        self.commands.lock().clone()
    }

    pub(crate) fn last_args(&self) -> Vec<String> {
        self.commands
            .lock()
            .last()
            .map(Command::args_lossy)
            .unwrap_or_default()
    }
}

impl Executor for MockExecutor {
    fn execute(&self, command: &Command) -> ClientResult<Reply> {
        self.commands.lock().push(command.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| panic!("no reply queued for {:?}", command))
    }
}
