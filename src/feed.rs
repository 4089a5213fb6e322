use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMsg};

use crate::{api::PosEvent, errors::FeedError};

/// Tail a running server's `/ws` event feed, kitchen-ticket style.
///
/// Prints one line per frame until the server closes the connection.
pub async fn run_feed(api_base: &str) -> Result<(), FeedError> {
    let ws_base = api_base
        .replace("http://", "ws://")
        .replace("https://", "wss://");
    let (ws_stream, _) = connect_async(format!("{}/ws", ws_base))
        .await
        .map_err(|e| FeedError::Connect(e.to_string()))?;
    let (_write, mut read) = ws_stream.split();

    while let Some(Ok(msg)) = read.next().await {
        if let WsMsg::Text(text) = msg {
            let Ok(event) = serde_json::from_str::<PosEvent>(&text) else {
                continue;
            };
            match event {
                PosEvent::CartSnapshot(view) => {
                    println!(
                        "cart: {} items, total ₹{:.2}",
                        view.item_count, view.totals.total
                    );
                }
                PosEvent::OrderPlaced(order) => {
                    println!(
                        "order {} ({}): {} lines, total ₹{:.2}",
                        order.id,
                        order.order_type,
                        order.lines.len(),
                        order.totals.total.round_dp(2)
                    );
                }
                PosEvent::PaymentTaken(receipt) => {
                    println!(
                        "payment: {} settled ₹{:.2} via {}",
                        receipt.order_id, receipt.total, receipt.method
                    );
                }
            }
        }
    }
    Ok(())
}
