//! Reasons a chat send is refused.

/// A rejected send. Nothing is appended and no request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("a chat request is already in flight")]
    Busy,
}
