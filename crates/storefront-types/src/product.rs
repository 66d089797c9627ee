use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::schema::Schema;

/// A catalog product as stored in the `product` collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    pub fn new(title: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            price,
            category: category.into(),
            image: String::new(),
            in_stock: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }
}

impl Schema for Product {
    const COLLECTION: &'static str = "product";

    fn validate(&self) -> TypeResult<()> {
        if self.title.trim().is_empty() {
            return Err(TypeError::Validation("product title must not be empty".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(TypeError::Validation(format!(
                "product price must be a non-negative number, got {}",
                self.price
            )));
        }
        Ok(())
    }
}
