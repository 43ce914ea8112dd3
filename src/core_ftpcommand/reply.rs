use std::fmt;

/// A status reply on the control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u16,
    pub message: String,
}

impl Reply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn use_passive_first() -> Self {
        Self::new(425, "use passive mode first")
    }

    pub fn cannot_open_data_connection() -> Self {
        Self::new(425, "can't open data connection")
    }

    pub fn transfer_aborted() -> Self {
        Self::new(426, "connection closed; transfer aborted")
    }

    pub fn transfer_complete() -> Self {
        Self::new(226, "transfer complete")
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

/// What the dispatcher does after a handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Send the reply and read the next command.
    Continue(Reply),
    /// Send the reply and end the session.
    Terminate(Reply),
}

impl From<Reply> for Flow {
    fn from(reply: Reply) -> Self {
        Flow::Continue(reply)
    }
}
