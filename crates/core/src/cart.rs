//! Shopping cart aggregate.
//!
//! The cart is an ordered list of [`CartItem`]s (insertion order) with two
//! derived totals. Items are unique by product id and never hold a quantity
//! of zero: a line that would drop to zero is removed instead.
//!
//! This type only holds state. Persistence and change notification are the
//! storefront's `CartService`.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// A line in the cart.
///
/// `unit_price` is copied from the product when the line is created and is
/// not re-synced with the catalog afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub image_url: String,
    pub unit_price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// Line subtotal (`quantity * unit_price`).
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            unit_price: product.unit_price,
            quantity: 1,
        }
    }
}

/// Totals derived from the cart contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total_price: Price,
    pub total_quantity: u32,
}

/// Result of decrementing a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// Quantity went down and the line is still in the cart.
    Decremented { remaining: u32 },
    /// Quantity reached zero and the line was removed.
    Removed,
    /// No line with that id.
    Missing,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Rebuild a cart from previously persisted items.
    ///
    /// Lines with a zero quantity are dropped and repeated ids are merged
    /// into the first occurrence, so a hand-edited snapshot cannot break the
    /// cart invariants.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items.into_iter().filter(|item| item.quantity > 0) {
            match cart.position(item.id) {
                Some(index) => {
                    if let Some(existing) = cart.items.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Add an item.
    ///
    /// If a line with the same id exists its quantity goes up by exactly one;
    /// otherwise the item is appended as a new line.
    pub fn add(&mut self, item: CartItem) {
        if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            let quantity = item.quantity.max(1);
            self.items.push(CartItem { quantity, ..item });
        }
    }

    /// Decrement the quantity of a line, removing it when it reaches zero.
    pub fn decrement(&mut self, id: ProductId) -> Decrement {
        let Some(index) = self.position(id) else {
            return Decrement::Missing;
        };

        let remaining = match self.items.get_mut(index) {
            Some(line) => {
                line.quantity = line.quantity.saturating_sub(1);
                line.quantity
            }
            None => return Decrement::Missing,
        };

        if remaining == 0 {
            self.items.remove(index);
            Decrement::Removed
        } else {
            Decrement::Decremented { remaining }
        }
    }

    /// Remove a line. Returns `false` if no line had that id.
    pub fn remove(&mut self, id: ProductId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Compute both totals in a single pass, saturating on overflow.
    #[must_use]
    pub fn totals(&self) -> CartTotals {
        self.items
            .iter()
            .fold(CartTotals::default(), |totals, item| CartTotals {
                total_price: totals.total_price + item.subtotal(),
                total_quantity: totals.total_quantity.saturating_add(item.quantity),
            })
    }

    /// Compute both totals, or `None` if the price total overflows.
    #[must_use]
    pub fn checked_totals(&self) -> Option<CartTotals> {
        self.items
            .iter()
            .try_fold(CartTotals::default(), |totals, item| {
                let subtotal = item.unit_price.checked_times(item.quantity)?;
                Some(CartTotals {
                    total_price: totals.total_price.checked_add(subtotal)?,
                    total_quantity: totals.total_quantity.saturating_add(item.quantity),
                })
            })
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns `true` if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}
