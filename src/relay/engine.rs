use chrono::Utc;

use super::error::RelayError;
use super::ChatState;
use crate::common::envelope::Envelope;
use crate::common::types::{MessageStatus, UserId};

/// Turn one inbound content event from `sender` into a stored message plus
/// a routing decision. Returns the id of the stored record.
///
/// The delivery status is fixed by a reachability snapshot taken before the
/// write: if the recipient connects a moment after the snapshot the record
/// stays pending and surfaces on that peer's next flush. Forward and status
/// notices are best-effort sends.
pub fn relay(state: &ChatState, sender: UserId, content: &str) -> Result<i64, RelayError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(RelayError::InvalidPayload);
    }

    let recipient = sender.peer();
    let recipient_conn = state.slots.connection_for(recipient);
    let status = if recipient_conn.is_some() {
        MessageStatus::Delivered
    } else {
        MessageStatus::Pending
    };
    let timestamp = Utc::now().timestamp_millis();

    let id = state.store.append(sender, recipient, content, timestamp, status)?;

    if let Some(conn) = recipient_conn {
        let forwarded = conn.send(Envelope::Message {
            id,
            sender,
            content: content.to_string(),
            timestamp,
        });
        if forwarded.is_err() {
            log::warn!("Failed to forward message {id} to {recipient}: connection is closing");
        }
    }

    state.send_to(
        sender,
        Envelope::Status {
            message_id: id,
            status,
        },
    );

    Ok(id)
}
