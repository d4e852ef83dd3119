//! Product catalog: variants, stock classification, and derived display values.
//!
//! Everything here is plain data plus pure derivation functions. The view
//! layer renders the strings; this module only decides what they say.

use serde::{Deserialize, Serialize};
use storefront_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Unique identifier for a product variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantId(u32);

impl VariantId {
    /// Creates a `VariantId` from its numeric value
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for VariantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A specific purchasable configuration of a product (e.g. a color),
/// with its own stock quantity and image
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Unique identifier
    pub id: VariantId,
    /// Color label shown to the user
    pub color: String,
    /// Image reference for this variant
    pub image: String,
    /// Available quantity; never negative by construction
    pub quantity: u32,
}

impl Variant {
    /// Creates a new variant
    #[must_use]
    pub fn new(
        id: VariantId,
        color: impl Into<String>,
        image: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id,
            color: color.into(),
            image: image.into(),
            quantity,
        }
    }

    /// Whether at least one unit is available
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// Inventory quantity boundaries for stock messaging.
///
/// The boundaries are configuration, not constants: different storefronts
/// draw the "almost sold out" and "in stock" lines differently.
/// Quantities in the gap between `low` and `high` (when `high > low`)
/// classify as [`StockLevel::AlmostSoldOut`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockThresholds {
    /// Quantities at or below this (but above zero) read "Almost sold out!"
    pub low: u32,
    /// Quantities above this read "In stock"
    pub high: u32,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self { low: 10, high: 10 }
    }
}

/// Display state of a variant's inventory
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevel {
    /// Plenty available
    InStock,
    /// Low inventory, nudge the buyer
    AlmostSoldOut,
    /// Nothing left
    OutOfStock,
}

impl StockLevel {
    /// Classify a quantity against the configured thresholds
    #[must_use]
    pub const fn classify(quantity: u32, thresholds: &StockThresholds) -> Self {
        if quantity == 0 {
            Self::OutOfStock
        } else if quantity > thresholds.high {
            Self::InStock
        } else {
            Self::AlmostSoldOut
        }
    }

    /// The display string for this level
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::AlmostSoldOut => "Almost sold out!",
            Self::OutOfStock => "Out of stock",
        }
    }
}

impl std::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Shipping cost configuration
///
/// Premium accounts ship free; everyone else pays the standard charge.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ShippingPolicy {
    /// Flat charge applied to non-premium orders
    pub standard_charge: f64,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            standard_charge: 2.99,
        }
    }
}

impl ShippingPolicy {
    /// The shipping cost label for an account
    #[must_use]
    pub fn label(&self, premium: bool) -> String {
        if premium {
            "Free".to_string()
        } else {
            format!("{:.2}", self.standard_charge)
        }
    }
}

/// A product with its display data and purchasable variants
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Brand name, prefixed onto the title
    pub brand: String,
    /// Product name
    pub name: String,
    /// Short description
    pub description: String,
    /// Alt text for the product image
    pub alt_text: String,
    /// External "more like this" link
    pub link: String,
    /// Material/details bullet list
    pub details: Vec<String>,
    /// Available sizes
    pub sizes: Vec<String>,
    /// Purchasable variants; a product has at least one
    pub variants: Vec<Variant>,
}

impl Product {
    /// Display title: brand followed by name
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} {}", self.brand, self.name)
    }

    /// Sale banner text for the current sale flag
    #[must_use]
    pub fn sale_banner(&self, on_sale: bool) -> String {
        if on_sale {
            format!("{} On Sale!", self.title())
        } else {
            format!("{} Not on Sale", self.title())
        }
    }
}

/// State of the product display component
///
/// Tracks which variant is currently active. The selected index is always
/// valid: out-of-range selections are ignored by the reducer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductState {
    /// The product being displayed
    pub product: Product,
    /// Index of the active variant
    pub selected: usize,
    /// Stock messaging boundaries
    pub thresholds: StockThresholds,
}

impl ProductState {
    /// Creates a new state with the first variant selected
    #[must_use]
    pub fn new(product: Product, thresholds: StockThresholds) -> Self {
        Self {
            product,
            selected: 0,
            thresholds,
        }
    }

    /// The currently selected variant, if the product has any
    #[must_use]
    pub fn selected_variant(&self) -> Option<&Variant> {
        self.product.variants.get(self.selected)
    }

    /// Available quantity of the selected variant
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.selected_variant().map_or(0, |v| v.quantity)
    }

    /// Whether the selected variant has stock
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.selected_variant().is_some_and(Variant::in_stock)
    }

    /// Stock messaging for the selected variant
    #[must_use]
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.quantity(), &self.thresholds)
    }

    /// Image reference of the selected variant
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.selected_variant().map(|v| v.image.as_str())
    }
}

/// Actions for the product display component
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductAction {
    /// Make the variant at this index the active one (hover/click)
    SelectVariant(usize),
}

/// Environment for the product reducer (no external dependencies)
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductEnvironment;

/// Reducer for the product display component
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductReducer;

impl ProductReducer {
    /// Creates a new product reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for ProductReducer {
    type State = ProductState;
    type Action = ProductAction;
    type Environment = ProductEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ProductAction::SelectVariant(index) => {
                if index < state.product.variants.len() {
                    state.selected = index;
                } else {
                    tracing::debug!(index, "ignoring out-of-range variant selection");
                }
            },
        }

        smallvec![Effect::None]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_testing::{ReducerTest, assertions};

    fn socks() -> Product {
        Product {
            brand: "Acme".to_string(),
            name: "Socks".to_string(),
            description: "A pair of warm, fuzzy socks.".to_string(),
            alt_text: "A pair of socks".to_string(),
            link: "https://example.com/socks".to_string(),
            details: vec!["80% cotton".to_string(), "20% polyester".to_string()],
            sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
            variants: vec![
                Variant::new(VariantId::new(2234), "green", "green.jpg", 10),
                Variant::new(VariantId::new(2235), "blue", "blue.jpg", 0),
            ],
        }
    }

    #[test]
    fn classify_zero_is_out_of_stock() {
        let thresholds = StockThresholds::default();
        assert_eq!(
            StockLevel::classify(0, &thresholds),
            StockLevel::OutOfStock
        );
        assert_eq!(StockLevel::classify(0, &thresholds).label(), "Out of stock");
    }

    #[test]
    fn classify_below_low_threshold_is_almost_sold_out() {
        let thresholds = StockThresholds { low: 10, high: 10 };
        assert_eq!(
            StockLevel::classify(5, &thresholds),
            StockLevel::AlmostSoldOut
        );
        assert_eq!(
            StockLevel::classify(10, &thresholds),
            StockLevel::AlmostSoldOut
        );
    }

    #[test]
    fn classify_above_high_threshold_is_in_stock() {
        let thresholds = StockThresholds { low: 10, high: 50 };
        assert_eq!(StockLevel::classify(51, &thresholds), StockLevel::InStock);
        // The gap between low and high stays conservative.
        assert_eq!(
            StockLevel::classify(30, &thresholds),
            StockLevel::AlmostSoldOut
        );
    }

    #[test]
    fn classify_boundary_just_above_default_threshold() {
        let thresholds = StockThresholds::default();
        assert_eq!(StockLevel::classify(11, &thresholds), StockLevel::InStock);
    }

    #[test]
    fn title_joins_brand_and_name() {
        assert_eq!(socks().title(), "Acme Socks");
    }

    #[test]
    fn sale_banner_follows_the_sale_flag() {
        let product = socks();
        assert_eq!(product.sale_banner(true), "Acme Socks On Sale!");
        assert_eq!(product.sale_banner(false), "Acme Socks Not on Sale");
    }

    #[test]
    fn shipping_label_is_free_for_premium() {
        let policy = ShippingPolicy::default();
        assert_eq!(policy.label(true), "Free");
        assert_eq!(policy.label(false), "2.99");
    }

    #[test]
    fn select_variant_updates_derived_values() {
        ReducerTest::new(ProductReducer::new())
            .with_env(ProductEnvironment)
            .given_state(ProductState::new(socks(), StockThresholds::default()))
            .when_action(ProductAction::SelectVariant(1))
            .then_state(|state| {
                assert_eq!(state.selected, 1);
                assert_eq!(state.image(), Some("blue.jpg"));
                assert!(!state.in_stock());
                assert_eq!(state.stock_level(), StockLevel::OutOfStock);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        ReducerTest::new(ProductReducer::new())
            .with_env(ProductEnvironment)
            .given_state(ProductState::new(socks(), StockThresholds::default()))
            .when_action(ProductAction::SelectVariant(7))
            .then_state(|state| {
                assert_eq!(state.selected, 0);
                assert_eq!(state.image(), Some("green.jpg"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn default_selection_classifies_as_almost_sold_out() {
        let state = ProductState::new(socks(), StockThresholds::default());
        assert!(state.in_stock());
        assert_eq!(state.stock_level(), StockLevel::AlmostSoldOut);
        assert_eq!(state.quantity(), 10);
    }
}
