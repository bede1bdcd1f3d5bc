use crate::common::types::{MessageStatus, UserId};

/// One row of the message log.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub id: i64,
    pub sender: UserId,
    pub receiver: UserId,
    pub content: String,
    pub timestamp: i64,
    pub status: MessageStatus,
}
