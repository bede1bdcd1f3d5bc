pub mod engine;
pub mod error;
pub mod flush;
pub mod slots;

pub use engine::relay;
pub use error::RelayError;
pub use flush::deliver_pending;
pub use slots::{Outbound, SlotRegistry};

use crate::common::envelope::Envelope;
use crate::common::types::UserId;
use crate::storage::MessageStore;

/// Shared state handed to every connection task.
pub struct ChatState {
    pub slots: SlotRegistry,
    pub store: MessageStore,
}

impl ChatState {
    pub fn new(store: MessageStore) -> Self {
        Self {
            slots: SlotRegistry::new(),
            store,
        }
    }

    /// Queue an envelope for `id` if a connection is live. Best-effort:
    /// returns whether the envelope was accepted, never retries.
    pub fn send_to(&self, id: UserId, envelope: Envelope) -> bool {
        match self.slots.connection_for(id) {
            Some(conn) => match conn.send(envelope) {
                Ok(()) => true,
                Err(_) => {
                    log::warn!("Dropped envelope for {id}: connection is closing");
                    false
                }
            },
            None => false,
        }
    }
}
