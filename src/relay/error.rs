use thiserror::Error;

/// Errors surfaced while handling one connection event.
///
/// None of these are fatal to the process: slot and validation errors are
/// reported to the offending connection, storage errors are contained to
/// the operation that hit them.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Both identities are already bound; the connection must be refused.
    #[error("no slots available")]
    SlotsFull,
    /// Inbound content was empty after trimming.
    #[error("invalid message payload")]
    InvalidPayload,
    /// The message store could not complete an operation.
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
}
