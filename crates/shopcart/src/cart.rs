//! # Cart Collection
//!
//! The ordered `row id → item` mapping that lives in the session.
//!
//! ## Invariants
//! - Exactly one entry per row id
//! - Rows keep the position they were first inserted at; replacing a row
//!   does not move it
//! - The serialized form is a JSON object keyed by the row id string, in
//!   row order

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use shopcart_core::{CartItem, RowId};

/// Ordered collection of cart lines keyed by row id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    pub fn has(&self, row_id: &RowId) -> bool {
        self.position(row_id).is_some()
    }

    pub fn get(&self, row_id: &RowId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.row_id() == *row_id)
    }

    pub fn first(&self) -> Option<&CartItem> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    pub fn row_ids(&self) -> Vec<RowId> {
        self.items.iter().map(CartItem::row_id).collect()
    }

    /// Inserts `item` under its row id, replacing (in place) any existing
    /// row with the same id. Returns the replaced item.
    pub fn put(&mut self, item: CartItem) -> Option<CartItem> {
        match self.position(&item.row_id()) {
            Some(index) => Some(std::mem::replace(&mut self.items[index], item)),
            None => {
                self.items.push(item);
                None
            }
        }
    }

    /// Removes the row with `row_id`, returning it.
    pub fn forget(&mut self, row_id: &RowId) -> Option<CartItem> {
        self.position(row_id).map(|index| self.items.remove(index))
    }

    /// Rows matching `predicate`, in cart order.
    pub fn filter<P>(&self, mut predicate: P) -> Cart
    where
        P: FnMut(&CartItem) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).cloned().collect()
    }

    /// Sums `f` over all rows.
    pub fn sum<F>(&self, f: F) -> f64
    where
        F: Fn(&CartItem) -> f64,
    {
        self.items.iter().map(f).sum()
    }

    /// Plain `(row id, item)` pairs in cart order.
    pub fn keyed(&self) -> Vec<(RowId, CartItem)> {
        self.items
            .iter()
            .map(|item| (item.row_id(), item.clone()))
            .collect()
    }

    /// Structural JSON form: object of row id → item object.
    ///
    /// Non-finite floats serialize as `null`.
    pub fn to_map(&self) -> serde_json::Result<Map<String, Value>> {
        self.items
            .iter()
            .map(|item| Ok((item.row_id().to_string(), serde_json::to_value(item)?)))
            .collect()
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        self.to_map().map(Value::Object)
    }

    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    fn position(&self, row_id: &RowId) -> Option<usize> {
        self.items.iter().position(|item| item.row_id() == *row_id)
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        let mut cart = Cart::new();
        for item in iter {
            cart.put(item);
        }
        cart
    }
}

impl IntoIterator for Cart {
    type Item = CartItem;
    type IntoIter = std::vec::IntoIter<CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for item in &self.items {
            map.serialize_entry(&item.row_id().to_string(), item)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CartVisitor;

        impl<'de> Visitor<'de> for CartVisitor {
            type Value = Cart;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of row id to cart item")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Cart, A::Error> {
                let mut cart = Cart::new();
                while let Some((key, item)) = access.next_entry::<String, CartItem>()? {
                    let row_id: RowId = key.parse().map_err(de::Error::custom)?;
                    if row_id != item.row_id() {
                        return Err(de::Error::custom(format!(
                            "row key {} does not match item row id {}",
                            row_id,
                            item.row_id()
                        )));
                    }
                    cart.put(item);
                }
                Ok(cart)
            }
        }

        deserializer.deserialize_map(CartVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: i64) -> CartItem {
        let mut item = CartItem::make(1, name, quantity, 10.0, Some(0.0)).unwrap();
        item.process();
        item
    }

    #[test]
    fn test_put_keeps_position_on_replace() {
        let a = item("Socks", 1);
        let b = item("Shoes", 1);
        let mut cart: Cart = vec![a.clone(), b.clone()].into_iter().collect();

        let mut changed = a.clone();
        changed.quantity = 5;
        assert_eq!(cart.put(changed), Some(a.clone()));

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.row_ids(), vec![a.row_id(), b.row_id()]);
        assert_eq!(cart.get(&a.row_id()).map(|i| i.quantity), Some(5));
    }

    #[test]
    fn test_forget() {
        let a = item("Socks", 1);
        let mut cart: Cart = std::iter::once(a.clone()).collect();

        assert_eq!(cart.forget(&a.row_id()), Some(a.clone()));
        assert!(cart.is_empty());
        assert_eq!(cart.forget(&a.row_id()), None);
    }

    #[test]
    fn test_json_is_keyed_and_ordered() {
        let items: Vec<CartItem> = ["Socks", "Shoes", "Pants", "Shirts"]
            .iter()
            .map(|name| item(name, 2))
            .collect();
        let cart: Cart = items.iter().cloned().collect();

        let value = cart.to_value().unwrap();
        let keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        let expected: Vec<String> = items.iter().map(|i| i.row_id().to_string()).collect();
        assert_eq!(keys, expected);

        let back = Cart::from_value(value).unwrap();
        assert_eq!(back, cart);

        let text = serde_json::to_string(&cart).unwrap();
        let reparsed: Cart = serde_json::from_str(&text).unwrap();
        assert_eq!(reparsed.row_ids(), cart.row_ids());
    }

    #[test]
    fn test_mismatched_key_is_rejected() {
        let a = item("Socks", 1);
        let mut map = Map::new();
        map.insert(RowId::new().to_string(), serde_json::to_value(&a).unwrap());

        assert!(Cart::from_value(Value::Object(map)).is_err());
    }

    #[test]
    fn test_sum_and_filter() {
        let cart: Cart = vec![item("Socks", 1), item("Shoes", 3)].into_iter().collect();
        assert_eq!(cart.sum(|i| i.quantity as f64), 4.0);
        assert_eq!(cart.filter(|i| i.quantity > 1).len(), 1);
    }
}
