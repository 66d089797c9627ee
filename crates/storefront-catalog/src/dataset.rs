use storefront_types::Product;

/// The products written by the first seed of an empty catalog.
pub fn starter_products() -> Vec<Product> {
    vec![
        Product::new("Classic White T-Shirt", 699.0, "Apparel")
            .with_description("100% cotton, breathable, and perfect for everyday wear.")
            .with_image("https://images.unsplash.com/photo-1520975916090-3105956dac38?w=800"),
        Product::new("Wireless Headphones", 4999.0, "Electronics")
            .with_description("Noise-cancelling over-ear headphones with 30h battery life.")
            .with_image("https://images.unsplash.com/photo-1518449037270-557fef82de76?w=800"),
        Product::new("Ceramic Coffee Mug", 349.0, "Home")
            .with_description("Handmade mug with matte finish and 350ml capacity.")
            .with_image("https://images.unsplash.com/photo-1523942839745-7848d4a7aa89?w=800"),
        Product::new("Running Shoes", 2999.0, "Footwear")
            .with_description("Lightweight shoes designed for comfort and performance.")
            .with_image("https://images.unsplash.com/photo-1542291026-7eec264c27ff?w=800"),
    ]
}
