use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::error::RelayError;
use crate::common::envelope::Envelope;
use crate::common::types::UserId;

/// Outbound handle for one live connection. The session's writer task
/// drains this queue into the socket, so pushing never blocks.
pub type Outbound = mpsc::UnboundedSender<Envelope>;

/// Maps the two fixed identities to at most one live connection each.
///
/// Holds no persisted state; both slots start unbound every process run.
/// The single lock serializes concurrent bind and unbind attempts.
#[derive(Default)]
pub struct SlotRegistry {
    slots: Mutex<[Option<Outbound>; 2]>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new connection to the first free identity, in
    /// `[user1, user2]` order.
    pub fn try_bind(&self, handle: Outbound) -> Result<UserId, RelayError> {
        let mut slots = self.slots.lock();
        match UserId::ALL.into_iter().find(|id| slots[id.index()].is_none()) {
            Some(id) => {
                slots[id.index()] = Some(handle);
                Ok(id)
            }
            None => Err(RelayError::SlotsFull),
        }
    }

    /// Live connection for `id`, if any. Lookup only, never creates.
    pub fn connection_for(&self, id: UserId) -> Option<Outbound> {
        self.slots.lock()[id.index()].clone()
    }

    /// Release the slot. Idempotent if already unbound.
    pub fn unbind(&self, id: UserId) {
        self.slots.lock()[id.index()] = None;
    }
}
