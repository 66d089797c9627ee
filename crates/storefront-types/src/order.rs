use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::schema::Schema;

/// One line of an order. `product_id` is the wire form of a product id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl OrderItem {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// An order as stored in the `order` collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new(items: Vec<OrderItem>) -> Self {
        Self { items }
    }

    /// Referenced product ids, in line order.
    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.product_id.as_str())
    }
}

impl Schema for Order {
    const COLLECTION: &'static str = "order";

    // Empty orders pass: whether they are acceptable is left to the caller.
    fn validate(&self) -> TypeResult<()> {
        for (idx, item) in self.items.iter().enumerate() {
            if item.product_id.trim().is_empty() {
                return Err(TypeError::Validation(format!(
                    "item {idx}: product_id must not be empty"
                )));
            }
            if item.quantity == 0 {
                return Err(TypeError::Validation(format!(
                    "item {idx}: quantity must be at least 1"
                )));
            }
        }
        Ok(())
    }
}
