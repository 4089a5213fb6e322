//! Load harness for exercising the engine under a realistic service rush.
//!
//! Continuously plays randomized guests against a running API server:
//! 1. Each "guest" fills the cart with a random selection off the menu.
//! 2. Checks out as dine-in or takeaway, then settles with a random method.
//! 3. Tallies orders placed, items sold, and revenue until time or ctrl-c.
//!
//! Arrivals are Poisson (exponential inter-arrival times with rate
//! `rate_hz`); order sizes are heavy-tailed around `mean_items` via a
//! unit-exponential draw. Supply a `CancellationToken` (e.g. tied to
//! ctrl-c) for clean shutdown.

use rand::Rng;
use rand_distr::{Distribution, Exp, Exp1};
use reqwest::Client;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct SimConfig {
    pub api_base: String,
    pub run_secs: Option<u64>,
    pub rate_hz: f64,
    pub mean_items: f64,
}

async fn place_one_order(
    client: &Client,
    cfg: &SimConfig,
    ids: &[String],
    n_items: usize,
) -> anyhow::Result<(String, String, f64)> {
    for _ in 0..n_items {
        let id = &ids[rand::rng().random_range(0..ids.len())];
        client
            .post(format!("{}/cart/items", cfg.api_base))
            .json(&json!({ "id": id }))
            .send()
            .await?
            .error_for_status()?;
    }

    let order_type = if rand::rng().random_bool(0.5) {
        "dine-in"
    } else {
        "takeaway"
    };
    let ack = client
        .post(format!("{}/orders", cfg.api_base))
        .json(&json!({ "order_type": order_type }))
        .send()
        .await?
        .error_for_status()?
        .json::<serde_json::Value>()
        .await?;

    let order_id = ack["order_id"].as_str().unwrap_or_default().to_string();
    // Decimal comes over the wire as a string
    let total: f64 = ack["totals"]["total"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0);

    let method = match rand::rng().random_range(0..3) {
        0 => "cash",
        1 => "card",
        _ => "upi",
    };
    client
        .post(format!("{}/orders/{}/payment", cfg.api_base, order_id))
        .json(&json!({ "method": method }))
        .send()
        .await?
        .error_for_status()?;

    Ok((order_id, format!("{} via {}", order_type, method), total))
}

/// Drive the rush until `cfg.run_secs` elapse or `cancel_token` fires.
///
/// # Side Effects
/// Continuously issues HTTP requests against `cfg.api_base`, logging each
/// settled order to stdout. Prints a final summary when the loop exits.
///
/// # Errors
/// Returns an error if any HTTP request fails or the server's menu is empty.
pub async fn run_simulation(cfg: SimConfig, cancel_token: CancellationToken) -> anyhow::Result<()> {
    let client = Client::new();

    // fetch the menu once; every simulated guest orders off the same card
    let menu = client
        .get(format!("{}/menu", cfg.api_base))
        .send()
        .await?
        .error_for_status()?
        .json::<serde_json::Value>()
        .await?;
    let ids: Vec<String> = menu
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    anyhow::ensure!(!ids.is_empty(), "server returned an empty menu");

    //1) Exponential inter-arrival times with rate = rate_hz
    let ia_dist = Exp::new(cfg.rate_hz).expect("rate_hz must be > 0");
    //2) unit exponential for order sizing
    let size_dist = Exp1;

    let mut orders_placed = 0u64;
    let mut items_sold = 0u64;
    let mut revenue = 0.0f64;
    let start = Instant::now();

    loop {
        //check overall time-limit
        if let Some(max_secs) = cfg.run_secs {
            if start.elapsed().as_secs() >= max_secs {
                break;
            }
        }
        //draw the next guest's arrival
        let wait_secs = ia_dist.sample(&mut rand::rng());
        let sleep_fut = sleep(Duration::from_secs_f64(wait_secs));
        tokio::select! {
            //user hits ctrl-c
            _ = cancel_token.cancelled() => {
                tracing::info!("received shutdown, closing the till…");
                break;
            }
            _ = sleep_fut => {
                let raw: f64 = <Exp1 as Distribution<f64>>::sample(&size_dist, &mut rand::rng());
                let n_items = (raw * cfg.mean_items).ceil().max(1.0) as usize;

                let (order_id, how, total) = place_one_order(&client, &cfg, &ids, n_items).await?;
                orders_placed += 1;
                items_sold += n_items as u64;
                revenue += total;

                println!(
                    "[{:.1}s] {} {} x{} items ₹{:.2} (running ₹{:.2})",
                    start.elapsed().as_secs_f64(),
                    order_id, how, n_items, total, revenue
                );
            }
        }
    }
    println!(
        "--- service over --- {} orders, {} items, revenue ₹{:.2}",
        orders_placed, items_sold, revenue
    );
    Ok(())
}
