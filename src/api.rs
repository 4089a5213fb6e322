use axum::{
    Json, Router, debug_handler,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tower_http::trace::TraceLayer;

use crate::{
    bill::BillTotals,
    cart::{Cart, OrderLine},
    errors::PosError,
    menu::{Category, MenuItem},
    order::{self, Order, OrderType, PaymentMethod, PaymentReceipt},
    state::AppState,
};

/// What the rendering layer redraws from: the current lines plus
/// display-rounded totals and the badge count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<OrderLine>,
    pub totals: BillTotals,
    pub item_count: u32,
}

impl CartView {
    fn of(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            totals: cart.totals().rounded(),
            item_count: cart.item_count(),
        }
    }
}

/// One frame of the `/ws` event feed. Subscribers get a `CartSnapshot`
/// immediately on connect, then a frame per state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PosEvent {
    CartSnapshot(CartView),
    OrderPlaced(Order),
    PaymentTaken(PaymentReceipt),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: String,
    pub totals: BillTotals,
}

#[derive(Deserialize)]
pub struct AddItem {
    pub id: String,
}

#[derive(Deserialize)]
pub struct NewOrder {
    pub order_type: OrderType,
}

#[derive(Deserialize)]
pub struct Payment {
    pub method: PaymentMethod,
}

fn error_json(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

async fn get_menu(State(state): State<AppState>) -> Json<Vec<MenuItem>> {
    Json(state.catalog.iter().cloned().collect())
}

async fn get_menu_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Response {
    match category.parse::<Category>() {
        Ok(category) => {
            let items: Vec<MenuItem> = state.catalog.by_category(category).cloned().collect();
            Json(items).into_response()
        }
        Err(e) => error_json(StatusCode::BAD_REQUEST, e),
    }
}

async fn get_cart(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart.lock().unwrap();
    Json(CartView::of(&cart))
}

async fn add_cart_item(State(state): State<AppState>, Json(payload): Json<AddItem>) -> Response {
    let Some(item) = state.catalog.get(&payload.id).cloned() else {
        return error_json(
            StatusCode::NOT_FOUND,
            PosError::UnknownItem(payload.id).to_string(),
        );
    };
    let view = {
        let mut cart = state.cart.lock().unwrap();
        cart.add_item(&item);
        CartView::of(&cart)
    };
    state.publish(PosEvent::CartSnapshot(view.clone()));
    Json(view).into_response()
}

async fn remove_cart_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<CartView> {
    let view = {
        let mut cart = state.cart.lock().unwrap();
        cart.remove_item(&id);
        CartView::of(&cart)
    };
    state.publish(PosEvent::CartSnapshot(view.clone()));
    Json(view)
}

async fn clear_cart(State(state): State<AppState>) -> Json<CartView> {
    let view = {
        let mut cart = state.cart.lock().unwrap();
        cart.clear();
        CartView::of(&cart)
    };
    state.publish(PosEvent::CartSnapshot(view.clone()));
    Json(view)
}

/// Checkout: snapshot the cart into a pending order. The cart is left as-is
/// until the payment step settles it.
#[debug_handler]
async fn place_order(State(state): State<AppState>, Json(payload): Json<NewOrder>) -> Response {
    let created = {
        let cart = state.cart.lock().unwrap();
        order::create_order(&cart, payload.order_type)
    };
    match created {
        Ok(placed) => {
            let ack = OrderAck {
                order_id: placed.id.clone(),
                totals: placed.totals.rounded(),
            };
            state.orders.lock().unwrap().push(placed.clone());
            state.publish(PosEvent::OrderPlaced(placed));
            Json(ack).into_response()
        }
        Err(e) => error_json(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

async fn list_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.orders.lock().unwrap().clone())
}

async fn get_order(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let orders = state.orders.lock().unwrap();
    match orders.iter().find(|o| o.id == id) {
        Some(order) => Json(order.clone()).into_response(),
        None => error_json(
            StatusCode::NOT_FOUND,
            PosError::UnknownOrder(id.clone()).to_string(),
        ),
    }
}

/// Settle the bill: record the method, complete the order, and start the
/// terminal's next order from an empty cart.
async fn pay_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Payment>,
) -> Response {
    let receipt = {
        let mut orders = state.orders.lock().unwrap();
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return error_json(
                StatusCode::NOT_FOUND,
                PosError::UnknownOrder(id.clone()).to_string(),
            );
        };
        order::select_payment(order, payload.method)
    };
    let view = {
        let mut cart = state.cart.lock().unwrap();
        cart.clear();
        CartView::of(&cart)
    };
    state.publish(PosEvent::PaymentTaken(receipt.clone()));
    state.publish(PosEvent::CartSnapshot(view));
    Json(receipt).into_response()
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut events = state.subscribe();
    let initial = {
        let cart = state.cart.lock().unwrap();
        PosEvent::CartSnapshot(CartView::of(&cart))
    };
    if send_frame(&mut socket, &initial).await.is_err() {
        return;
    }
    loop {
        match events.recv().await {
            Ok(event) => {
                if send_frame(&mut socket, &event).await.is_err() {
                    break;
                }
            }
            // a slow renderer just misses frames; the next one resyncs it
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => break,
        }
    }
}

async fn send_frame(socket: &mut WebSocket, event: &PosEvent) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(text) => socket.send(Message::Text(text.into())).await,
        Err(_) => Ok(()),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/menu", get(get_menu))
        .route("/menu/{category}", get(get_menu_category))
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", post(add_cart_item))
        .route("/cart/items/{id}", delete(remove_cart_item))
        .route("/orders", post(place_order).get(list_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/payment", post(pay_order))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
