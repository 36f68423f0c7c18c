//! Cart service: the cart aggregate plus persistence and totals publishing.
//!
//! Every mutation recomputes the totals, publishes them on a `watch`
//! channel (late subscribers see the latest value immediately) and writes
//! the full item list to the store under [`CART_ITEMS_KEY`].

use luv2shop_core::cart::Decrement;
use luv2shop_core::{Cart, CartItem, CartTotals, ProductId};
use tokio::sync::watch;
use tracing::instrument;

use crate::storage::KeyValueStore;

/// Store key holding the JSON array of cart items.
pub const CART_ITEMS_KEY: &str = "cartItems";

/// The shopper's cart, persisted to a [`KeyValueStore`].
pub struct CartService<S> {
    cart: Cart,
    store: S,
    totals: watch::Sender<CartTotals>,
}

impl<S: KeyValueStore> CartService<S> {
    /// Hydrate the cart from `store`.
    ///
    /// A missing, unreadable or unparsable snapshot yields an empty cart, as
    /// does one whose totals overflow.
    pub fn new(store: S) -> Self {
        let cart = hydrate(&store);
        let (totals, _) = watch::channel(CartTotals::default());
        let mut service = Self {
            cart,
            store,
            totals,
        };
        if !service.cart.is_empty() {
            service.compute_totals();
        }
        service
    }

    /// Add an item, or bump the quantity of the matching line by one.
    #[instrument(skip(self, item), fields(product_id = %item.id))]
    pub fn add_to_cart(&mut self, item: CartItem) -> CartTotals {
        self.cart.add(item);
        self.compute_totals()
    }

    /// Decrement a line, removing it when the quantity reaches zero.
    ///
    /// Unknown ids are ignored.
    #[instrument(skip(self))]
    pub fn decrement_quantity(&mut self, id: ProductId) -> Decrement {
        let outcome = self.cart.decrement(id);
        if outcome != Decrement::Missing {
            self.compute_totals();
        }
        outcome
    }

    /// Remove a line. Returns `false` (and changes nothing) for unknown ids.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: ProductId) -> bool {
        let removed = self.cart.remove(id);
        if removed {
            self.compute_totals();
        }
        removed
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Latest published totals.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        *self.totals.borrow()
    }

    /// Receiver that starts at the latest totals and sees every update.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartTotals> {
        self.totals.subscribe()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn compute_totals(&mut self) -> CartTotals {
        let totals = self.cart.totals();
        self.totals.send_replace(totals);
        self.log_contents(totals);
        self.persist();
        totals
    }

    fn log_contents(&self, totals: CartTotals) {
        for item in self.cart.items() {
            tracing::debug!(
                name = %item.name,
                quantity = item.quantity,
                unit_price = %item.unit_price,
                subtotal = %item.subtotal(),
                "Cart item"
            );
        }
        tracing::debug!(
            total_price = %totals.total_price,
            total_quantity = totals.total_quantity,
            "Cart totals"
        );
    }

    fn persist(&mut self) {
        let json = match serde_json::to_string(self.cart.items()) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.store.set(CART_ITEMS_KEY, json) {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }
}

fn hydrate(store: &impl KeyValueStore) -> Cart {
    let raw = match store.get(CART_ITEMS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read persisted cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Option<Vec<CartItem>>>(&raw) {
        Ok(items) => {
            let cart = Cart::from_items(items.unwrap_or_default());
            if cart.checked_totals().is_none() {
                tracing::warn!("Persisted cart totals overflow, starting empty");
                return Cart::new();
            }
            cart
        }
        Err(e) => {
            tracing::warn!(error = %e, "Persisted cart is not valid, starting empty");
            Cart::new()
        }
    }
}
