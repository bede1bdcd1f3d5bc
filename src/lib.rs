//! Two-party WebSocket chat relay with offline delivery.
//!
//! Exactly two participants hold connection slots at a time. Messages are
//! forwarded live when the peer is connected, stored as pending otherwise,
//! and flushed in order when the peer reconnects.

pub mod common;
pub mod config;
pub mod network;
pub mod relay;
pub mod storage;
