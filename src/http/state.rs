use std::sync::Arc;

use crate::catalog::ProductCatalog;
use crate::coupon::reader::CouponReader;
use crate::orders::OrderStore;

#[derive(Clone)]
pub struct AppState {
    pub reader: Arc<dyn CouponReader>,
    pub catalog: Arc<ProductCatalog>,
    pub orders: Arc<OrderStore>,
}
