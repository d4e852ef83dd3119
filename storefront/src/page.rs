//! Explicit composition of the product page.
//!
//! [`ProductPage`] wires the components together: one notification bus, a
//! store per component, and a review board listening on the bus. It exposes the full view-facing surface —
//! user interactions in, read-only derived values out — so a rendering layer
//! never touches component internals.

use crate::cart::{CartAction, CartEnvironment, CartReducer, CartState};
use crate::catalog::{
    Product, ProductAction, ProductEnvironment, ProductReducer, ProductState, ShippingPolicy,
    StockThresholds, VariantId,
};
use crate::reviews::{
    Recommendation, Review, ReviewBoard, ReviewFormAction, ReviewFormEnvironment,
    ReviewFormReducer, ReviewFormState,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use storefront_core::bus::NotificationBus;
use storefront_core::environment::Clock;
use storefront_runtime::{Store, StoreError};

/// Required page-level configuration.
///
/// Both flags must be supplied; there is no partially-configured page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Premium accounts ship free
    pub premium: bool,
    /// Whether the sale banner is active
    pub on_sale: bool,
}

type ProductStore = Store<ProductState, ProductAction, ProductEnvironment, ProductReducer>;
type CartStore = Store<CartState, CartAction, CartEnvironment, CartReducer>;
type FormStore = Store<ReviewFormState, ReviewFormAction, ReviewFormEnvironment, ReviewFormReducer>;

/// The assembled product page
pub struct ProductPage {
    config: PageConfig,
    shipping: ShippingPolicy,
    bus: NotificationBus<Review>,
    product: ProductStore,
    cart: CartStore,
    form: FormStore,
    board: ReviewBoard,
}

impl ProductPage {
    /// Assemble a page with default stock thresholds and shipping policy
    #[must_use]
    pub fn new(product: Product, config: PageConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_policies(
            product,
            config,
            clock,
            StockThresholds::default(),
            ShippingPolicy::default(),
        )
    }

    /// Assemble a page with explicit stock thresholds and shipping policy
    #[must_use]
    pub fn with_policies(
        product: Product,
        config: PageConfig,
        clock: Arc<dyn Clock>,
        thresholds: StockThresholds,
        shipping: ShippingPolicy,
    ) -> Self {
        let bus: NotificationBus<Review> = NotificationBus::new();
        // The board subscribes before anything can publish.
        let board = ReviewBoard::new(&bus);

        Self {
            config,
            shipping,
            product: Store::new(
                ProductState::new(product, thresholds),
                ProductReducer::new(),
                ProductEnvironment,
            ),
            cart: Store::new(CartState::new(), CartReducer::new(), CartEnvironment),
            form: Store::new(
                ReviewFormState::default(),
                ReviewFormReducer::new(),
                ReviewFormEnvironment::new(clock, bus.clone()),
            ),
            board,
            bus,
        }
    }

    // ========== View → Core ==========

    /// Make the variant at `index` the active one (hover/click).
    /// Out-of-range indices are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the product store has shut down.
    pub async fn select_variant(&self, index: usize) -> Result<(), StoreError> {
        self.product.send(ProductAction::SelectVariant(index)).await
    }

    /// Add one unit of the selected variant to the cart.
    ///
    /// Mirrors the disabled add button: a no-op when the selected variant is
    /// out of stock.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the cart store has shut down.
    pub async fn add_to_cart(&self) -> Result<(), StoreError> {
        match self.selected_purchasable().await {
            Some(id) => self.cart.send(CartAction::AddItem(id)).await,
            None => {
                tracing::debug!("add to cart ignored: selected variant out of stock");
                Ok(())
            },
        }
    }

    /// Remove one unit of the selected variant from the cart.
    ///
    /// Like the add button, the remove button is disabled for an out-of-stock
    /// variant; removing a unit the cart doesn't hold is a no-op either way.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the cart store has shut down.
    pub async fn remove_from_cart(&self) -> Result<(), StoreError> {
        match self.selected_purchasable().await {
            Some(id) => self.cart.send(CartAction::RemoveItem(id)).await,
            None => {
                tracing::debug!("remove from cart ignored: selected variant out of stock");
                Ok(())
            },
        }
    }

    /// Set the review form's name field
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the form store has shut down.
    pub async fn set_review_name(&self, name: impl Into<String>) -> Result<(), StoreError> {
        self.form.send(ReviewFormAction::SetName(name.into())).await
    }

    /// Set the review form's body field
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the form store has shut down.
    pub async fn set_review_body(&self, body: impl Into<String>) -> Result<(), StoreError> {
        self.form.send(ReviewFormAction::SetBody(body.into())).await
    }

    /// Set the review form's rating field
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the form store has shut down.
    pub async fn set_review_rating(&self, rating: u8) -> Result<(), StoreError> {
        self.form.send(ReviewFormAction::SetRating(rating)).await
    }

    /// Answer the review form's recommendation question
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the form store has shut down.
    pub async fn set_review_recommendation(
        &self,
        recommend: Recommendation,
    ) -> Result<(), StoreError> {
        self.form
            .send(ReviewFormAction::SetRecommendation(recommend))
            .await
    }

    /// Attempt to submit the review form.
    ///
    /// On success the accepted review reaches the board before this returns;
    /// on validation failure [`form_errors`](Self::form_errors) lists every
    /// outstanding problem.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the form store has shut down.
    pub async fn submit_review(&self) -> Result<(), StoreError> {
        self.form.send(ReviewFormAction::Submit).await
    }

    // ========== Core → View ==========

    /// Number of units in the cart
    pub async fn cart_size(&self) -> usize {
        self.cart.state(CartState::size).await
    }

    /// Cart contents in add order
    pub async fn cart_items(&self) -> Vec<VariantId> {
        self.cart.state(|s| s.items().to_vec()).await
    }

    /// Product title
    pub async fn title(&self) -> String {
        self.product.state(|s| s.product.title()).await
    }

    /// Product description
    pub async fn description(&self) -> String {
        self.product.state(|s| s.product.description.clone()).await
    }

    /// Sale banner for the configured sale flag
    pub async fn sale_banner(&self) -> String {
        let on_sale = self.config.on_sale;
        self.product.state(move |s| s.product.sale_banner(on_sale)).await
    }

    /// Shipping cost label for the configured account tier
    #[must_use]
    pub fn shipping_label(&self) -> String {
        self.shipping.label(self.config.premium)
    }

    /// Stock message for the selected variant
    pub async fn stock_label(&self) -> &'static str {
        self.product.state(|s| s.stock_level().label()).await
    }

    /// Whether the selected variant has stock
    pub async fn in_stock(&self) -> bool {
        self.product.state(ProductState::in_stock).await
    }

    /// Image reference of the selected variant
    pub async fn image(&self) -> Option<String> {
        self.product
            .state(|s| s.image().map(ToString::to_string))
            .await
    }

    /// Validation messages from the last submit attempt
    pub async fn form_errors(&self) -> Vec<String> {
        self.form.state(|s| s.errors.clone()).await
    }

    /// Accepted reviews, oldest first
    #[must_use]
    pub fn reviews(&self) -> Vec<Review> {
        self.board.reviews()
    }

    /// The page's notification bus, for additional listeners
    #[must_use]
    pub const fn bus(&self) -> &NotificationBus<Review> {
        &self.bus
    }

    /// The page configuration
    #[must_use]
    pub const fn config(&self) -> PageConfig {
        self.config
    }

    /// Id of the selected variant when it can be purchased
    async fn selected_purchasable(&self) -> Option<VariantId> {
        self.product
            .state(|s| {
                s.selected_variant()
                    .filter(|v| v.in_stock())
                    .map(|v| v.id)
            })
            .await
    }
}

impl std::fmt::Debug for ProductPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductPage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
