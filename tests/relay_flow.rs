//! End-to-end relay scenarios over shared state, with channel-backed
//! connection handles instead of sockets.

use tokio::sync::mpsc;

use rust_ws_chat::common::types::UserId::{User1, User2};
use rust_ws_chat::common::{Envelope, MessageStatus, UserId};
use rust_ws_chat::relay::{self, ChatState};
use rust_ws_chat::storage::MessageStore;

fn state() -> ChatState {
    ChatState::new(MessageStore::in_memory().unwrap())
}

fn bind(state: &ChatState) -> (UserId, mpsc::UnboundedReceiver<Envelope>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let id = state.slots.try_bind(tx).unwrap();
    (id, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<Envelope>) -> Vec<Envelope> {
    let mut out = Vec::new();
    while let Ok(envelope) = rx.try_recv() {
        out.push(envelope);
    }
    out
}

fn message_contents(envelopes: &[Envelope]) -> Vec<String> {
    envelopes
        .iter()
        .filter_map(|envelope| match envelope {
            Envelope::Message { content, .. } => Some(content.clone()),
            _ => None,
        })
        .collect()
}

fn delivered_ids(envelopes: &[Envelope]) -> Vec<i64> {
    envelopes
        .iter()
        .filter_map(|envelope| match envelope {
            Envelope::Status {
                message_id,
                status: MessageStatus::Delivered,
            } => Some(*message_id),
            _ => None,
        })
        .collect()
}

#[test]
fn conversation_with_reconnect_delivers_every_message_exactly_once() {
    let state = state();
    let (a, mut a_rx) = bind(&state);
    let (b, mut b_rx) = bind(&state);

    // Live exchange while both are connected.
    let live = relay::relay(&state, a, "1").unwrap();
    assert_eq!(message_contents(&drain(&mut b_rx)), ["1"]);
    assert_eq!(delivered_ids(&drain(&mut a_rx)), [live]);

    // B drops; everything A sends goes pending.
    state.slots.unbind(b);
    let second = relay::relay(&state, a, "2").unwrap();
    let third = relay::relay(&state, a, "3").unwrap();
    let statuses = drain(&mut a_rx);
    assert_eq!(
        statuses,
        [
            Envelope::Status {
                message_id: second,
                status: MessageStatus::Pending,
            },
            Envelope::Status {
                message_id: third,
                status: MessageStatus::Pending,
            },
        ]
    );

    // B reconnects: the flush replays the backlog in order and fans the
    // delivered notices back to A.
    let (b, mut b_rx) = bind(&state);
    assert_eq!(b, User2);
    relay::deliver_pending(&state, b);
    assert_eq!(message_contents(&drain(&mut b_rx)), ["2", "3"]);
    assert_eq!(delivered_ids(&drain(&mut a_rx)), [second, third]);

    // A second reconnect finds nothing left to replay.
    state.slots.unbind(b);
    let (b, mut b_rx) = bind(&state);
    relay::deliver_pending(&state, b);
    assert!(drain(&mut b_rx).is_empty());
    assert!(state.store.pending_for(User2).unwrap().is_empty());
    assert!(state.store.pending_for(User1).unwrap().is_empty());
}

#[test]
fn pending_write_racing_a_bind_surfaces_on_the_next_flush() {
    let state = state();
    let (_a, _a_rx) = bind(&state);
    let (b, mut b_rx) = bind(&state);

    // B's join flush ran before this message hit the store, and the
    // relay's reachability snapshot predates B's bind: the record lands
    // as pending even though B is now connected.
    relay::deliver_pending(&state, b);
    state
        .store
        .append(User1, User2, "raced", 100, MessageStatus::Pending)
        .unwrap();
    assert!(drain(&mut b_rx).is_empty());

    // Not lost: the next bind cycle picks it up, exactly once.
    state.slots.unbind(b);
    let (b, mut b_rx) = bind(&state);
    relay::deliver_pending(&state, b);
    assert_eq!(message_contents(&drain(&mut b_rx)), ["raced"]);

    state.slots.unbind(b);
    let (b, mut b_rx) = bind(&state);
    relay::deliver_pending(&state, b);
    assert!(drain(&mut b_rx).is_empty());
}

#[test]
fn both_directions_relay_independently() {
    let state = state();
    let (a, mut a_rx) = bind(&state);
    let (b, mut b_rx) = bind(&state);

    relay::relay(&state, a, "hello").unwrap();
    relay::relay(&state, b, "hi back").unwrap();

    assert_eq!(message_contents(&drain(&mut b_rx)), ["hello"]);
    assert_eq!(message_contents(&drain(&mut a_rx)), ["hi back"]);
    assert!(state.store.pending_for(User1).unwrap().is_empty());
    assert!(state.store.pending_for(User2).unwrap().is_empty());
}
