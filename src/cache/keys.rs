//! Cache key namespaces and TTL presets used by storefront callers.
//!
//! The cache does not enforce any key structure; these generators only keep
//! callers from colliding with each other.

/// Key for the full product listing
pub fn products() -> String {
    "products".to_string()
}

/// Key for a single product
pub fn product(id: &str) -> String {
    format!("product:{}", id)
}

/// Key for the reviews of a product
pub fn reviews(product_id: &str) -> String {
    format!("reviews:{}", product_id)
}

pub fn user(id: &str) -> String {
    format!("user:{}", id)
}

pub fn orders(user_id: &str) -> String {
    format!("orders:{}", user_id)
}

pub fn cart(user_id: &str) -> String {
    format!("cart:{}", user_id)
}

pub fn wishlist(user_id: &str) -> String {
    format!("wishlist:{}", user_id)
}

pub fn coupons() -> String {
    "coupons".to_string()
}

pub fn inventory() -> String {
    "inventory".to_string()
}

pub fn low_stock() -> String {
    "lowStock".to_string()
}

/// Key for a shipment tracking lookup
pub fn tracking(tracking_number: &str) -> String {
    format!("tracking:{}", tracking_number)
}

/// Key for a shipping quote, bucketed by destination province and weight
pub fn shipping(province: &str, weight_bucket: u32) -> String {
    format!("shipping:{}:{}", province, weight_bucket)
}

/// TTL presets in milliseconds.
pub mod ttl {
    /// 1 minute
    pub const SHORT: u64 = 60 * 1000;
    /// 5 minutes
    pub const MEDIUM: u64 = 5 * 60 * 1000;
    /// 30 minutes
    pub const LONG: u64 = 30 * 60 * 1000;
    /// 1 hour
    pub const VERY_LONG: u64 = 60 * 60 * 1000;
    /// 24 hours
    pub const PERSISTENT: u64 = 24 * 60 * 60 * 1000;
}
