use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;

use crate::web::state::AppState;

pub async fn subscribe(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| stream_events(socket, state))
}

/// Forwards hub events to the socket until either side goes away.
/// Inbound frames other than close are ignored.
async fn stream_events(socket: WebSocket, state: AppState) {
    let hub = state.pipeline.hub();
    let send_timeout = hub.config().send_timeout;
    let mut subscription = hub.subscribe();
    let id = subscription.id;
    let (mut sender, mut inbound) = socket.split();

    loop {
        tokio::select! {
            outbound = subscription.recv() => {
                let Some(text) = outbound else { break };
                let frame = Message::Text(text.to_string().into());
                match timeout(send_timeout, sender.send(frame)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        log::debug!("subscriber {} send failed: {}", id, e);
                        break;
                    }
                    Err(_) => {
                        log::warn!("subscriber {} send timed out after {:?}", id, send_timeout);
                        break;
                    }
                }
            }
            incoming = inbound.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(e)) => {
                    log::debug!("subscriber {} receive failed: {}", id, e);
                    break;
                }
                Some(Ok(_)) => {}
            }
        }
    }

    hub.unsubscribe(id);
}
