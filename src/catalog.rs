use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResult<T> {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub items: Vec<T>,
}

/// Fixed in-memory catalog, seeded once at construction.
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new() -> ProductCatalog {
        ProductCatalog {
            products: seed_products(),
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    // TODO: offset-based pagination full-scans at the tail for large catalogs;
    // moot at this catalog's size, left unsolved since it's out of scope here.
    pub fn list(&self, page: usize, limit: usize) -> PaginatedResult<Product> {
        let page = if page < 1 { 1 } else { page };
        let limit = if limit == 0 { 5 } else { limit };

        let total = self.products.len();
        let start = (page - 1) * limit;
        if start >= total {
            return PaginatedResult { page, limit, total, items: Vec::new() };
        }
        let end = std::cmp::min(start + limit, total);

        PaginatedResult {
            page,
            limit,
            total,
            items: self.products[start..end].to_vec(),
        }
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_products() -> Vec<Product> {
    vec![
        Product { id: "1".to_string(), name: "Waffle with Berries".to_string(), price: 6.5, category: "Waffle".to_string() },
        Product { id: "2".to_string(), name: "Vanilla Bean Crème Brûlée".to_string(), price: 7.0, category: "Crème Brûlée".to_string() },
        Product { id: "3".to_string(), name: "Macaron Mix of Five".to_string(), price: 8.0, category: "Macaron".to_string() },
        Product { id: "4".to_string(), name: "Classic Tiramisu".to_string(), price: 5.5, category: "Tiramisu".to_string() },
        Product { id: "5".to_string(), name: "Pistachio Baklava".to_string(), price: 4.0, category: "Baklava".to_string() },
        Product { id: "6".to_string(), name: "Lemon Meringue Pie".to_string(), price: 5.0, category: "Pie".to_string() },
        Product { id: "7".to_string(), name: "Red Velvet Cake".to_string(), price: 4.5, category: "Cake".to_string() },
        Product { id: "8".to_string(), name: "Salted Caramel Brownie".to_string(), price: 4.5, category: "Brownie".to_string() },
        Product { id: "9".to_string(), name: "Vanilla Panna Cotta".to_string(), price: 6.5, category: "Panna Cotta".to_string() },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_first_page_with_default_limit() {
        let catalog = ProductCatalog::new();
        let page = catalog.list(1, 5);
        assert_eq!(page.total, 9);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].id, "1");
    }

    #[test]
    fn clamps_invalid_page_and_limit() {
        let catalog = ProductCatalog::new();
        let page = catalog.list(0, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 5);
    }

    #[test]
    fn returns_empty_items_past_the_last_page() {
        let catalog = ProductCatalog::new();
        let page = catalog.list(10, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 9);
    }

    #[test]
    fn get_by_id_misses_unknown_product() {
        let catalog = ProductCatalog::new();
        assert!(catalog.get_by_id("no-such-id").is_none());
    }
}
