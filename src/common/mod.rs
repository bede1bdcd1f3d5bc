pub mod envelope;
pub mod types;

pub use envelope::{Envelope, InboundMessage};
pub use types::{MessageStatus, UserId};
