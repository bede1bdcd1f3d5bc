use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two fixed chat participants.
///
/// The topology is a closed pair: slots exist for exactly these two
/// identities and are never created or destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserId {
    User1,
    User2,
}

impl UserId {
    /// Both identities, in slot-assignment order.
    pub const ALL: [UserId; 2] = [UserId::User1, UserId::User2];

    /// The other participant.
    pub fn peer(self) -> UserId {
        match self {
            UserId::User1 => UserId::User2,
            UserId::User2 => UserId::User1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UserId::User1 => "user1",
            UserId::User2 => "user2",
        }
    }

    pub fn parse(value: &str) -> Option<UserId> {
        match value {
            "user1" => Some(UserId::User1),
            "user2" => Some(UserId::User2),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            UserId::User1 => 0,
            UserId::User2 => 1,
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery state of a stored message.
///
/// The only legal transition is `Pending` to `Delivered`, exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Delivered,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Delivered => "delivered",
        }
    }

    pub fn parse(value: &str) -> Option<MessageStatus> {
        match value {
            "pending" => Some(MessageStatus::Pending),
            "delivered" => Some(MessageStatus::Delivered),
            _ => None,
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_maps_each_identity_to_the_other() {
        assert_eq!(UserId::User1.peer(), UserId::User2);
        assert_eq!(UserId::User2.peer(), UserId::User1);
    }

    #[test]
    fn user_id_round_trips_through_str() {
        for id in UserId::ALL {
            assert_eq!(UserId::parse(id.as_str()), Some(id));
        }
        assert_eq!(UserId::parse("user3"), None);
    }

    #[test]
    fn status_round_trips_through_str() {
        assert_eq!(MessageStatus::parse("pending"), Some(MessageStatus::Pending));
        assert_eq!(
            MessageStatus::parse("delivered"),
            Some(MessageStatus::Delivered)
        );
        assert_eq!(MessageStatus::parse("sent"), None);
    }
}
