use serde::{Deserialize, Serialize};

use super::types::{MessageStatus, UserId};

/// Outbound wire notification sent over a connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Envelope {
    /// Informational notice (joins, leaves, welcome).
    System { content: String },
    /// Rejection or validation notice.
    Error { content: String },
    /// A chat payload forwarded to its recipient.
    Message {
        id: i64,
        sender: UserId,
        content: String,
        timestamp: i64,
    },
    /// Delivery-status notice fanned back to the original sender.
    Status {
        #[serde(rename = "messageId")]
        message_id: i64,
        status: MessageStatus,
    },
}

/// The only inbound shape a client may send. Anything else is rejected
/// with an `Error` envelope and otherwise ignored.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    pub content: String,
}
