use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::http::state::AppState;
use crate::orders::OrderItem as StoredOrderItem;

const MIN_COUPON_LENGTH: usize = 8;
const MAX_COUPON_LENGTH: usize = 10;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(
        HealthResponse {
            status: "ok",
            timestamp: Utc::now().to_rfc3339(),
        }
    )
}

/// Deserialized as raw strings, not `usize`, so a non-numeric `page`/`limit`
/// falls through to the default instead of axum rejecting the request with
/// its own 400 before the handler runs.
#[derive(Deserialize)]
pub struct ListProductsQuery {
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Serialize)]
pub struct ListProductsResponse {
    page: usize,
    limit: usize,
    total: usize,
    products: Vec<Product>,
}

fn parse_or_default(raw: Option<&str>, default: usize) -> usize {
    match raw {
        None => default,
        Some(value) => {
            match value.parse::<usize>() {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("failed to parse query parameter {:?} as an integer: {}, using default {}", value, e, default);
                    default
                }
            }
        }
    }
}

pub async fn list_products(State(state): State<AppState>, Query(query): Query<ListProductsQuery>) -> Json<ListProductsResponse> {
    let page = parse_or_default(query.page.as_deref(), 1);
    let limit = parse_or_default(query.limit.as_deref(), 5);
    let result = state.catalog.list(page, limit);

    Json(
        ListProductsResponse {
            page: result.page,
            limit: result.limit,
            total: result.total,
            products: result.items,
        }
    )
}

pub async fn get_product(State(state): State<AppState>, Path(product_id): Path<String>) -> Result<Json<Product>, (StatusCode, Json<ErrorResponse>)> {
    match state.catalog.get_by_id(&product_id) {
        Some(product) => Ok(Json(product.clone())),
        None => Err(not_found("product not found")),
    }
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    #[serde(rename = "productId")]
    product_id: String,
    quantity: u32,
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    #[serde(rename = "couponCode", default)]
    coupon_code: Option<String>,
    items: Vec<OrderItemRequest>,
}

#[derive(Serialize)]
pub struct CreateOrderResponse {
    id: String,
    items: Vec<OrderItemResponse>,
    products: Vec<Product>,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    #[serde(rename = "productId")]
    product_id: String,
    quantity: u32,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message.to_string() }))
}

fn not_found(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error: message.to_string() }))
}

pub async fn create_order(State(state): State<AppState>, Json(req): Json<CreateOrderRequest>) -> Result<(StatusCode, Json<CreateOrderResponse>), (StatusCode, Json<ErrorResponse>)> {
    if req.items.is_empty() {
        return Err(bad_request("Order must contain at least one item"));
    }

    let coupon_code = req.coupon_code.filter(|code| !code.is_empty());

    if let Some(code) = coupon_code.as_deref() {
        let length = code.len();
        if length < MIN_COUPON_LENGTH || length > MAX_COUPON_LENGTH {
            return Err(bad_request("Coupon code is invalid"));
        }

        let reader = state.reader.clone();
        let query = code.to_string();
        let outcome = tokio::task::spawn_blocking(move || reader.search(&query))
            .await
            .map_err(|_| bad_request("Coupon code validation failed"))?;

        if !outcome.errors.is_empty() {
            log::error!("coupon code validation failed: {} probe error(s)", outcome.errors.len());
            return Err(bad_request("Coupon code validation failed"));
        }

        log::debug!("coupon code validated, valid: {}", outcome.found);
        if !outcome.found {
            return Err(bad_request("Coupon code is invalid"));
        }
    }

    let mut order_items = Vec::with_capacity(req.items.len());
    let mut products = Vec::with_capacity(req.items.len());
    for item in &req.items {
        let product = state.catalog.get_by_id(&item.product_id)
            .ok_or_else(|| bad_request("product not found in order item"))?;
        products.push(product.clone());
        order_items.push(StoredOrderItem { product_id: item.product_id.clone(), quantity: item.quantity });
    }

    let created = state.orders.create_order(order_items, coupon_code);

    log::info!("order created successfully, order_id: {}", created.id);

    let response = CreateOrderResponse {
        id: created.id,
        items: req.items.iter().map(|item| OrderItemResponse { product_id: item.product_id.clone(), quantity: item.quantity }).collect(),
        products,
    };

    Ok((StatusCode::CREATED, Json(response)))
}
