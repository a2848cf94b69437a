use axum::routing::{get, post};
use axum::Router;

use crate::http::handlers::{create_order, get_product, health, list_products};
use crate::http::middleware::request_logger;
use crate::http::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/product/:productId", get(get_product))
        .route("/product", get(list_products))
        .route("/order", post(create_order));

    Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn(request_logger))
        .with_state(state)
}
