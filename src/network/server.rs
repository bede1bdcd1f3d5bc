use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use super::session;
use crate::relay::ChatState;

/// Build the router: one route that upgrades to WebSocket, with a plain
/// text reply for ordinary HTTP requests.
pub fn router(state: Arc<ChatState>) -> Router {
    Router::new().route("/", get(upgrade)).with_state(state)
}

/// Bind `addr` and serve until the listener fails.
pub async fn run(addr: SocketAddr, state: Arc<ChatState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("WebSocket server running at http://{addr}");
    axum::serve(listener, router(state)).await
}

async fn upgrade(
    State(state): State<Arc<ChatState>>,
    ws: Option<WebSocketUpgrade>,
) -> impl IntoResponse {
    match ws {
        Some(ws) => ws
            .on_upgrade(move |socket| session::run(socket, state))
            .into_response(),
        None => "WebSocket server is running. Connect via WebSocket protocol.".into_response(),
    }
}
