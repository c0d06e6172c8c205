//! Shopping cart aggregate.
//!
//! The cart snapshots product name and price at the time a line is added,
//! and rejects quantity changes past the product's available stock when
//! the product tracks stock.

use common::{EntityId, Money};
use serde::{Deserialize, Serialize};
use store::Product;

/// Outcome of a cart mutation, surfaced to the customer as a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartNotice {
    /// The line was added or its quantity changed as requested.
    Added,
    /// The line was removed.
    Removed,
    /// The product is tracked and has no stock; nothing was added.
    OutOfStock,
    /// The requested quantity exceeded available stock; the line is unchanged.
    StockLimit { available: u32 },
}

/// A single cart line with a price snapshot taken when the line was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: EntityId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// Available stock at add time, `None` when the product does not track stock.
    pub stock_cap: Option<u32>,
}

impl CartLine {
    fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            unit_price: product.price,
            quantity: 1,
            stock_cap: product.track_stock.then_some(product.stock_quantity),
        }
    }

    /// Line total at the snapshotted unit price.
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Shopping cart: an ordered list of lines, one per product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of a product, or bumps the existing line by one.
    ///
    /// Tracked products with zero stock are rejected outright; bumping a
    /// line past its stock cap is rejected and the line keeps its quantity.
    pub fn add(&mut self, product: &Product) -> CartNotice {
        if product.track_stock && product.stock_quantity == 0 {
            return CartNotice::OutOfStock;
        }

        match self.line_mut(product.id) {
            Some(line) => {
                let requested = line.quantity + 1;
                match line.stock_cap {
                    Some(cap) if requested > cap => CartNotice::StockLimit { available: cap },
                    _ => {
                        line.quantity = requested;
                        CartNotice::Added
                    }
                }
            }
            None => {
                self.lines.push(CartLine::from_product(product));
                CartNotice::Added
            }
        }
    }

    /// Sets a line's quantity, removing the line when the quantity is zero.
    ///
    /// Quantities above the line's stock cap are rejected and the line
    /// keeps its current quantity. Returns `None` when no line matches
    /// the product id.
    pub fn set_quantity(&mut self, product_id: EntityId, quantity: u32) -> Option<CartNotice> {
        if quantity == 0 {
            self.line_mut(product_id)?;
            self.remove(product_id);
            return Some(CartNotice::Removed);
        }

        let line = self.line_mut(product_id)?;
        match line.stock_cap {
            Some(cap) if quantity > cap => Some(CartNotice::StockLimit { available: cap }),
            _ => {
                line.quantity = quantity;
                Some(CartNotice::Added)
            }
        }
    }

    /// Removes a line entirely. Unknown product ids are a no-op.
    pub fn remove(&mut self, product_id: EntityId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Sum of line totals at snapshotted prices.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::total_price).sum()
    }

    /// Total unit count across all lines.
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    fn line_mut(&mut self, product_id: EntityId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use store::Category;

    fn product(price_dinars: i64, track_stock: bool, stock: u32) -> Product {
        Product {
            id: EntityId::new(),
            name: "Fortnite Account".to_string(),
            description: "Rare skins".to_string(),
            category: Category::Accounts,
            image_url: "https://example.com/img.png".to_string(),
            price: Money::from_dinars(price_dinars),
            original_price: None,
            show_fake_discount: false,
            stock_quantity: stock,
            track_stock,
            low_stock_threshold: 5,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn add_creates_line_with_snapshot() {
        let mut cart = Cart::new();
        let p = product(1500, true, 10);

        assert_eq!(cart.add(&p), CartNotice::Added);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].unit_price, Money::from_dinars(1500));
        assert_eq!(cart.lines()[0].quantity, 1);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn add_same_product_bumps_quantity() {
        let mut cart = Cart::new();
        let p = product(1500, true, 10);

        cart.add(&p);
        assert_eq!(cart.add(&p), CartNotice::Added);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.subtotal(), Money::from_dinars(3000));
    }

    #[test]
    fn out_of_stock_product_is_rejected() {
        let mut cart = Cart::new();
        let p = product(1500, true, 0);

        assert_eq!(cart.add(&p), CartNotice::OutOfStock);
        assert!(cart.is_empty());
    }

    #[test]
    fn untracked_product_ignores_stock() {
        let mut cart = Cart::new();
        let p = product(1500, false, 0);

        assert_eq!(cart.add(&p), CartNotice::Added);
        for _ in 0..20 {
            cart.add(&p);
        }
        assert_eq!(cart.lines()[0].quantity, 21);
    }

    #[test]
    fn add_past_stock_cap_is_rejected() {
        let mut cart = Cart::new();
        let p = product(1500, true, 2);

        cart.add(&p);
        cart.add(&p);
        assert_eq!(cart.add(&p), CartNotice::StockLimit { available: 2 });
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn set_quantity_past_cap_leaves_line_unchanged() {
        let mut cart = Cart::new();
        let p = product(1500, true, 3);
        cart.add(&p);

        assert_eq!(
            cart.set_quantity(p.id, 10),
            Some(CartNotice::StockLimit { available: 3 })
        );
        assert_eq!(cart.lines()[0].quantity, 1);

        assert_eq!(cart.set_quantity(p.id, 3), Some(CartNotice::Added));
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let p = product(1500, true, 3);
        cart.add(&p);

        assert_eq!(cart.set_quantity(p.id, 0), Some(CartNotice::Removed));
        assert!(cart.is_empty());
    }

    #[test]
    fn set_quantity_unknown_product_is_noop() {
        let mut cart = Cart::new();
        let p = product(1500, true, 3);
        cart.add(&p);

        assert_eq!(cart.set_quantity(EntityId::new(), 5), None);
        assert_eq!(cart.set_quantity(EntityId::new(), 0), None);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn remove_and_clear() {
        let mut cart = Cart::new();
        let a = product(1000, false, 0);
        let b = product(2000, false, 0);
        cart.add(&a);
        cart.add(&b);

        cart.remove(a.id);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.subtotal(), Money::from_dinars(2000));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Money::zero());
    }

    #[test]
    fn subtotal_sums_mixed_lines() {
        let mut cart = Cart::new();
        let a = product(750, false, 0);
        let b = product(1200, false, 0);
        cart.add(&a);
        cart.add(&a);
        cart.add(&b);

        assert_eq!(cart.subtotal(), Money::from_dinars(2700));
        assert_eq!(cart.total_items(), 3);
    }
}
