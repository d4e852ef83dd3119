//! # Storefront
//!
//! The product-page state core: a cart ledger, a review submission form, and
//! a product display with inventory-based stock messaging, wired together
//! over a notification bus.
//!
//! This crate contains no markup or rendering. It models the page as three
//! small event-driven components plus one decoupled display:
//!
//! - [`catalog`] — the product, its variants, and every derived display
//!   value (title, sale banner, shipping label, stock message)
//! - [`cart`] — the cart ledger; add/remove are total operations and the
//!   ledger can never underflow
//! - [`reviews`] — the review form with collect-all validation, and the
//!   review board fed exclusively through the notification bus
//! - [`page`] — explicit composition of the above into a [`ProductPage`]
//!   exposing the view-facing surface
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use storefront::{PageConfig, ProductPage, Recommendation};
//! use storefront_core::environment::SystemClock;
//!
//! # async fn example(product: storefront::Product) -> Result<(), storefront_runtime::StoreError> {
//! let page = ProductPage::new(
//!     product,
//!     PageConfig { premium: true, on_sale: true },
//!     Arc::new(SystemClock),
//! );
//!
//! page.add_to_cart().await?;
//! assert_eq!(page.cart_size().await, 1);
//!
//! page.set_review_name("Ada").await?;
//! page.set_review_body("Warm and fuzzy.").await?;
//! page.set_review_rating(5).await?;
//! page.set_review_recommendation(Recommendation::Yes).await?;
//! page.submit_review().await?;
//! assert_eq!(page.reviews().len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod cart;
pub mod catalog;
pub mod page;
pub mod reviews;

pub use cart::{CartAction, CartEnvironment, CartReducer, CartState};
pub use catalog::{
    Product, ProductAction, ProductEnvironment, ProductReducer, ProductState, ShippingPolicy,
    StockLevel, StockThresholds, Variant, VariantId,
};
pub use page::{PageConfig, ProductPage};
pub use reviews::{
    FormPhase, REVIEW_SUBMITTED, Rating, Recommendation, Review, ReviewBoard, ReviewDraft,
    ReviewFormAction, ReviewFormEnvironment, ReviewFormReducer, ReviewFormState,
};
