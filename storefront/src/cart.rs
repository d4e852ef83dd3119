//! The cart ledger: tracks the variants a user intends to purchase.
//!
//! The ledger is an ordered sequence of variant identifiers. Insertion order
//! is add order and duplicates are allowed, one entry per unit. Both
//! operations are total: adding always succeeds, and removing from an empty
//! ledger (or removing an id that was never added) is a no-op. The ledger can
//! never underflow; `size() >= 0` holds by construction.

use crate::catalog::VariantId;
use serde::{Deserialize, Serialize};
use storefront_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Contents of the cart, exclusively owned by the ledger
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<VariantId>,
}

impl CartState {
    /// Creates an empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of units in the cart
    #[must_use]
    pub fn size(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The units in the cart, in add order
    #[must_use]
    pub fn items(&self) -> &[VariantId] {
        &self.items
    }

    /// Units of a specific variant
    #[must_use]
    pub fn units_of(&self, id: VariantId) -> usize {
        self.items.iter().filter(|item| **item == id).count()
    }
}

/// Actions for the cart ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartAction {
    /// Append one unit of the variant; always succeeds
    AddItem(VariantId),
    /// Remove the most recently added unit of the variant; no-op when the
    /// cart is empty or holds no such unit
    RemoveItem(VariantId),
    /// Empty the cart
    Clear,
}

/// Environment for the cart reducer (no external dependencies)
#[derive(Clone, Copy, Debug, Default)]
pub struct CartEnvironment;

/// Reducer for the cart ledger
#[derive(Clone, Copy, Debug, Default)]
pub struct CartReducer;

impl CartReducer {
    /// Creates a new cart reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for CartReducer {
    type State = CartState;
    type Action = CartAction;
    type Environment = CartEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CartAction::AddItem(id) => {
                state.items.push(id);
                tracing::debug!(variant = %id, size = state.size(), "added to cart");
            },
            CartAction::RemoveItem(id) => {
                // Last-in-first-out per variant; silently ignore underflow.
                if let Some(position) = state.items.iter().rposition(|item| *item == id) {
                    state.items.remove(position);
                    tracing::debug!(variant = %id, size = state.size(), "removed from cart");
                } else {
                    tracing::debug!(variant = %id, "remove ignored: no such unit in cart");
                }
            },
            CartAction::Clear => {
                state.items.clear();
                tracing::debug!("cart cleared");
            },
        }

        smallvec![Effect::None]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use storefront_testing::{ReducerTest, assertions};

    const GREEN: VariantId = VariantId::new(2234);
    const BLUE: VariantId = VariantId::new(2235);

    fn apply(state: &mut CartState, action: CartAction) {
        let effects = CartReducer::new().reduce(state, action, &CartEnvironment);
        assertions::assert_no_effects(&effects);
    }

    #[test]
    fn add_item_grows_the_ledger_by_one_unit() {
        ReducerTest::new(CartReducer::new())
            .with_env(CartEnvironment)
            .given_state(CartState::new())
            .when_action(CartAction::AddItem(GREEN))
            .then_state(|state| {
                assert_eq!(state.size(), 1);
                assert_eq!(state.items(), &[GREEN]);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn every_cart_action_settles_with_a_single_none_effect() {
        let mut state = CartState::new();
        for action in [
            CartAction::AddItem(GREEN),
            CartAction::RemoveItem(GREEN),
            CartAction::Clear,
        ] {
            let effects = CartReducer::new().reduce(&mut state, action, &CartEnvironment);
            assert_eq!(effects.len(), 1);
            assert!(matches!(effects[0], Effect::None));
        }
    }

    #[test]
    fn duplicates_represent_multiple_units() {
        let mut state = CartState::new();
        apply(&mut state, CartAction::AddItem(GREEN));
        apply(&mut state, CartAction::AddItem(GREEN));
        apply(&mut state, CartAction::AddItem(BLUE));

        assert_eq!(state.size(), 3);
        assert_eq!(state.units_of(GREEN), 2);
        assert_eq!(state.units_of(BLUE), 1);
    }

    #[test]
    fn remove_takes_the_most_recently_added_unit() {
        let mut state = CartState::new();
        apply(&mut state, CartAction::AddItem(GREEN));
        apply(&mut state, CartAction::AddItem(BLUE));
        apply(&mut state, CartAction::AddItem(GREEN));

        apply(&mut state, CartAction::RemoveItem(GREEN));

        // The trailing GREEN went away; the earlier order is untouched.
        assert_eq!(state.items(), &[GREEN, BLUE]);
    }

    #[test]
    fn remove_on_empty_ledger_is_a_no_op() {
        ReducerTest::new(CartReducer::new())
            .with_env(CartEnvironment)
            .given_state(CartState::new())
            .when_action(CartAction::RemoveItem(GREEN))
            .then_state(|state| {
                assert_eq!(state.size(), 0);
                assert!(state.is_empty());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn remove_of_absent_variant_is_a_no_op() {
        let mut state = CartState::new();
        apply(&mut state, CartAction::AddItem(GREEN));
        apply(&mut state, CartAction::RemoveItem(BLUE));

        assert_eq!(state.items(), &[GREEN]);
    }

    #[test]
    fn clear_empties_the_ledger() {
        let mut state = CartState::new();
        apply(&mut state, CartAction::AddItem(GREEN));
        apply(&mut state, CartAction::AddItem(BLUE));
        apply(&mut state, CartAction::Clear);

        assert!(state.is_empty());
    }

    #[test]
    fn adds_then_removes_leave_max_of_zero_and_the_difference() {
        // size == max(0, adds - removes) for add-first sequences
        let mut state = CartState::new();
        for _ in 0..3 {
            apply(&mut state, CartAction::AddItem(GREEN));
        }
        for _ in 0..5 {
            apply(&mut state, CartAction::RemoveItem(GREEN));
        }
        assert_eq!(state.size(), 0);

        for _ in 0..4 {
            apply(&mut state, CartAction::AddItem(GREEN));
        }
        apply(&mut state, CartAction::RemoveItem(GREEN));
        assert_eq!(state.size(), 3);
    }

    proptest! {
        /// For any interleaving of adds and removes of one variant, the
        /// ledger tracks a counter that increments on add and saturates at
        /// zero on remove. In particular it never underflows.
        #[test]
        fn ledger_behaves_like_a_saturating_counter(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut state = CartState::new();
            let mut model: usize = 0;

            for is_add in ops {
                if is_add {
                    model += 1;
                    apply(&mut state, CartAction::AddItem(GREEN));
                } else {
                    model = model.saturating_sub(1);
                    apply(&mut state, CartAction::RemoveItem(GREEN));
                }
                prop_assert_eq!(state.size(), model);
            }
        }
    }
}
