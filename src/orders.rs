use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: String,
    pub items: Vec<OrderItem>,
    pub coupon_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// In-memory order store. Assigns a UUID v4 per order and records creation time.
pub struct OrderStore {
    orders: Mutex<Vec<Order>>,
}

impl OrderStore {
    pub fn new() -> OrderStore {
        OrderStore { orders: Mutex::new(Vec::new()) }
    }

    pub fn create_order(&self, items: Vec<OrderItem>, coupon_code: Option<String>) -> Order {
        let order = Order {
            id: Uuid::new_v4().to_string(),
            items,
            coupon_code,
            created_at: Utc::now(),
        };

        log::info!(
            "New order created, order_id: {}, items_count: {}",
            order.id,
            order.items.len()
        );

        self.orders.lock().unwrap().push(order.clone());
        order
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}
