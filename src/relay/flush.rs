use super::ChatState;
use crate::common::envelope::Envelope;
use crate::common::types::{MessageStatus, UserId};

/// Drain `id`'s pending inbox after a successful bind.
///
/// Messages go out oldest first; each one is marked delivered and its
/// original sender, if still connected, gets a delivered notice. A send or
/// storage failure abandons the rest of the pass; the remaining rows stay
/// pending and are picked up on the next bind. The pending set is
/// re-queried fresh every bind, so an interrupted pass never re-delivers
/// what it already marked.
pub fn deliver_pending(state: &ChatState, id: UserId) {
    let Some(conn) = state.slots.connection_for(id) else {
        return;
    };

    let pending = match state.store.pending_for(id) {
        Ok(pending) => pending,
        Err(err) => {
            log::error!("Failed to load pending messages for {id}: {err}");
            return;
        }
    };

    if pending.is_empty() {
        return;
    }

    log::info!("Delivering {} pending messages to {id}", pending.len());

    for msg in pending {
        let forwarded = conn.send(Envelope::Message {
            id: msg.id,
            sender: msg.sender,
            content: msg.content,
            timestamp: msg.timestamp,
        });
        if forwarded.is_err() {
            log::warn!("{id} dropped mid-flush, leaving remaining messages pending");
            return;
        }

        if let Err(err) = state.store.set_delivered(msg.id) {
            log::error!("Failed to mark message {} delivered: {err}", msg.id);
            return;
        }

        state.send_to(
            msg.sender,
            Envelope::Status {
                message_id: msg.id,
                status: MessageStatus::Delivered,
            },
        );
    }
}
