//! Storefront demo binary
//!
//! Drives a full product-page interaction sequence: variant selection,
//! cart mutations, a rejected review, and an accepted one.

use std::sync::Arc;
use storefront::{
    PageConfig, Product, ProductPage, Recommendation, Variant, VariantId,
};
use storefront_core::environment::SystemClock;
use storefront_runtime::StoreError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn socks() -> Product {
    Product {
        brand: "Acme".to_string(),
        name: "Socks".to_string(),
        description: "A pair of warm, fuzzy socks.".to_string(),
        alt_text: "A pair of socks".to_string(),
        link: "https://example.com/more-socks".to_string(),
        details: vec![
            "80% cotton".to_string(),
            "20% polyester".to_string(),
            "Gender-neutral".to_string(),
        ],
        sizes: ["S", "M", "L", "XL"].map(String::from).to_vec(),
        variants: vec![
            Variant::new(VariantId::new(2234), "green", "./assets/socks-green.jpg", 10),
            Variant::new(VariantId::new(2235), "blue", "./assets/socks-blue.jpg", 0),
        ],
    }
}

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,storefront_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let page = ProductPage::new(
        socks(),
        PageConfig {
            premium: true,
            on_sale: true,
        },
        Arc::new(SystemClock),
    );

    println!("=== {} ===", page.title().await);
    println!("{}", page.description().await);
    println!("{}", page.sale_banner().await);
    println!("Shipping: {}", page.shipping_label());
    println!("Stock: {}", page.stock_label().await);

    // Hover over the blue variant: it is sold out.
    page.select_variant(1).await?;
    println!("\n>>> Selected blue variant");
    println!("Stock: {}", page.stock_label().await);

    // The add button is disabled for an out-of-stock variant.
    page.add_to_cart().await?;
    println!("Cart after blocked add: {}", page.cart_size().await);

    // Back to green and shop for real.
    page.select_variant(0).await?;
    page.add_to_cart().await?;
    page.add_to_cart().await?;
    page.remove_from_cart().await?;
    println!("\n>>> Added twice, removed once");
    println!("Cart: {}", page.cart_size().await);

    // A submit with missing fields surfaces every problem at once.
    page.set_review_name("Ada").await?;
    page.submit_review().await?;
    println!("\n>>> Incomplete review submitted");
    for error in page.form_errors().await {
        println!("  error: {error}");
    }

    // Fill in the rest and submit for real.
    page.set_review_body("Warm and fuzzy indeed.").await?;
    page.set_review_rating(5).await?;
    page.set_review_recommendation(Recommendation::Yes).await?;
    page.submit_review().await?;

    println!("\n>>> Review accepted");
    for review in page.reviews() {
        println!(
            "  {} rated {}/5 (recommends: {}): {}",
            review.name, review.rating, review.recommend, review.body
        );
    }

    Ok(())
}
