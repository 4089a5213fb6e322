use crate::{api::PosEvent, cart::Cart, menu::Catalog, order::Order};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Shared engine state behind the HTTP API: one terminal, one cart, one
/// in-process log of this session's orders. Nothing here survives restart.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub cart: Arc<Mutex<Cart>>,
    pub orders: Arc<Mutex<Vec<Order>>>,
    events: broadcast::Sender<PosEvent>,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            catalog: Arc::new(catalog),
            cart: Arc::new(Mutex::new(Cart::new())),
            orders: Arc::new(Mutex::new(Vec::new())),
            events,
        }
    }

    /// Fire-and-forget: a feed with no subscribers drops the event.
    pub fn publish(&self, event: PosEvent) {
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PosEvent> {
        self.events.subscribe()
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(Catalog::sample())
    }
}
