use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::common::envelope::{Envelope, InboundMessage};
use crate::common::types::UserId;
use crate::relay::{self, ChatState, RelayError};

/// Drive one accepted socket through its whole lifecycle: slot binding,
/// pending flush, the inbound message loop, and guaranteed slot cleanup.
pub async fn run(socket: WebSocket, state: Arc<ChatState>) {
    let (mut sink, mut stream) = socket.split();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<Envelope>();

    let user_id = match state.slots.try_bind(outbound_tx) {
        Ok(id) => id,
        Err(_) => {
            log::info!("Connection refused: No slots available.");
            send_now(
                &mut sink,
                &Envelope::Error {
                    content: "No slots available, please try again later".into(),
                },
            )
            .await;
            let _ = sink.close().await;
            return;
        }
    };

    log::info!("New connection assigned as {user_id}");

    // The writer owns the sink from here on. It ends when the last sender
    // clone is dropped, which happens at unbind below.
    let writer = tokio::spawn(drain_outbound(outbound_rx, sink));

    greet(&state, user_id);
    relay::deliver_pending(&state, user_id);

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => handle_frame(&state, user_id, &text),
            Ok(Message::Binary(bytes)) => match std::str::from_utf8(&bytes) {
                Ok(text) => handle_frame(&state, user_id, text),
                Err(_) => {
                    log::warn!("Received non-text payload from {user_id}");
                    state.send_to(
                        user_id,
                        Envelope::Error {
                            content: "Invalid message format".into(),
                        },
                    );
                }
            },
            Ok(Message::Close(frame)) => {
                match frame {
                    Some(frame) => log::info!(
                        "{user_id} disconnected. Code: {}, Reason: {}",
                        frame.code,
                        frame.reason
                    ),
                    None => log::info!("{user_id} disconnected."),
                }
                break;
            }
            // Ping/pong keepalive frames are not chat input.
            Ok(_) => {}
            Err(err) => {
                log::error!("WebSocket error for {user_id}: {err}");
                break;
            }
        }
    }

    // Cleanup runs no matter what broke the loop: free the slot, then tell
    // the remaining peer.
    state.slots.unbind(user_id);
    let peer = user_id.peer();
    state.send_to(
        peer,
        Envelope::System {
            content: format!("{user_id} has left the chat"),
        },
    );

    let _ = writer.await;
}

/// Welcome the newcomer and exchange join notices with a bound peer.
fn greet(state: &ChatState, user_id: UserId) {
    state.send_to(
        user_id,
        Envelope::System {
            content: format!("Welcome to the chat! You are {user_id}"),
        },
    );

    let peer = user_id.peer();
    if state.slots.connection_for(peer).is_some() {
        state.send_to(
            peer,
            Envelope::System {
                content: format!("{user_id} has joined the chat"),
            },
        );
        state.send_to(
            user_id,
            Envelope::System {
                content: format!("{peer} is already in the chat"),
            },
        );
    }
}

/// Decode one inbound frame and hand it to the relay engine.
fn handle_frame(state: &ChatState, user_id: UserId, raw: &str) {
    let inbound: InboundMessage = match serde_json::from_str(raw) {
        Ok(inbound) => inbound,
        Err(_) => {
            log::warn!("Received invalid message structure from {user_id}");
            state.send_to(
                user_id,
                Envelope::Error {
                    content: "Invalid message format".into(),
                },
            );
            return;
        }
    };

    log::info!("Message from {user_id}: {}", inbound.content);

    match relay::relay(state, user_id, &inbound.content) {
        Ok(_) => {}
        Err(RelayError::InvalidPayload) => {
            log::warn!("Received invalid message structure from {user_id}");
            state.send_to(
                user_id,
                Envelope::Error {
                    content: "Invalid message format".into(),
                },
            );
        }
        Err(err) => {
            log::error!("Error processing message from {user_id}: {err}");
            state.send_to(
                user_id,
                Envelope::Error {
                    content: "Failed to process message".into(),
                },
            );
        }
    }
}

/// Drain the outbound queue into the socket sink, then close it.
async fn drain_outbound(
    mut outbound_rx: mpsc::UnboundedReceiver<Envelope>,
    mut sink: SplitSink<WebSocket, Message>,
) {
    while let Some(envelope) = outbound_rx.recv().await {
        let text = match serde_json::to_string(&envelope) {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Failed to serialize envelope: {err}");
                continue;
            }
        };
        if sink.send(Message::Text(text)).await.is_err() {
            // Socket already gone; dropping the receiver makes queued
            // sends fail fast at the channel instead of piling up.
            break;
        }
    }
    let _ = sink.close().await;
}

async fn send_now(sink: &mut SplitSink<WebSocket, Message>, envelope: &Envelope) {
    match serde_json::to_string(envelope) {
        Ok(text) => {
            let _ = sink.send(Message::Text(text)).await;
        }
        Err(err) => log::warn!("Failed to serialize envelope: {err}"),
    }
}
