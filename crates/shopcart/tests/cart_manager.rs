mod common;

use common::{empty_cart, stocked_cart, Stocked};
use serde_json::json;
use shopcart::{
    number_format, CartAction, CartError, CartItem, CartManager, CoreError, MemorySession,
    NullDispatcher, NumberFormatOverrides, RoundMode, RowId, SessionStore, ShopCartConfig,
    ValidationError,
};

// =============================================================================
// Item validation
// =============================================================================

#[test]
fn test_empty_name_is_rejected() {
    let err = CartItem::make(1, "", 1, 1.00, None).unwrap_err();
    assert_eq!(
        err.validation(),
        Some(&ValidationError::Required {
            field: "name".into()
        })
    );
}

#[test]
fn test_zero_quantity_is_rejected() {
    let err = CartItem::make(1, "Test Item", 0, 1.00, None).unwrap_err();
    assert!(matches!(err, CoreError::InvalidItem(_)));
    assert_eq!(err.validation().map(|e| e.field()), Some("quantity"));
}

#[test]
fn test_non_finite_values_never_reach_the_session() {
    let err = CartItem::make(1, "Socks", 1, 10.0, Some(f64::NAN)).unwrap_err();
    assert_eq!(err.validation().map(|e| e.field()), Some("tax"));

    let Stocked {
        mut cart, socks, ..
    } = stocked_cart();
    let yacht = CartItem::make(2, "Yacht", 2, f64::MAX, Some(0.0)).unwrap();
    assert!(matches!(
        cart.add(yacht),
        Err(CartError::Core(CoreError::NonFiniteTotal { .. }))
    ));

    assert_eq!(cart.count().unwrap(), 5);
    assert_eq!(cart.get(&socks.row_id()).unwrap(), socks);
    assert_eq!(cart.total("price").unwrap(), "793.01");
}

// =============================================================================
// Reads
// =============================================================================

#[test]
fn test_get_returns_stored_item() {
    let Stocked {
        cart,
        socks,
        shoes,
        pants,
        ..
    } = stocked_cart();

    assert_eq!(cart.get(&socks.row_id()).unwrap().id, socks.id);
    assert_eq!(cart.get(&shoes.row_id()).unwrap().name, shoes.name);
    assert_eq!(cart.get(&pants.row_id()).unwrap().quantity, pants.quantity);
    assert_eq!(cart.get(&pants.row_id()).unwrap().price, pants.price);
    assert_eq!(cart.get(&pants.row_id()).unwrap(), pants);
}

#[test]
fn test_has_and_count() {
    let Stocked { cart, shades, .. } = stocked_cart();

    assert!(cart.has(&shades.row_id()).unwrap());
    assert!(!cart.has(&RowId::new()).unwrap());
    assert_eq!(cart.count().unwrap(), 5);
    assert!(cart.is_not_empty().unwrap());
}

#[test]
fn test_all_keeps_insertion_order() {
    let Stocked {
        cart,
        socks,
        shoes,
        pants,
        shirts,
        shades,
        ..
    } = stocked_cart();

    let expected: Vec<RowId> = [&socks, &shoes, &pants, &shirts, &shades]
        .iter()
        .map(|item| item.row_id())
        .collect();
    assert_eq!(cart.all().unwrap().row_ids(), expected);

    let keyed = cart.all_keyed().unwrap();
    assert_eq!(keyed[1].0, shoes.row_id());
    assert_eq!(keyed[1].1.name, "Shoes");
}

#[test]
fn test_where_strict_id() {
    let Stocked { cart, shoes, .. } = stocked_cart();

    let found = cart.where_("id", "===", 2).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found.first().map(|item| item.row_id()), Some(shoes.row_id()));

    assert!(cart.where_("id", "===", "2").unwrap().is_empty());
    assert_eq!(cart.where_("id", "==", "2").unwrap().len(), 1);
    assert_eq!(cart.where_("price", "<", 50).unwrap().len(), 3);
}

// =============================================================================
// Totals
// =============================================================================

#[test]
fn test_update_recomputes_totals() {
    let Stocked { mut cart, .. } = stocked_cart();

    let mut shoes = cart
        .where_("id", "===", 2)
        .unwrap()
        .first()
        .cloned()
        .unwrap();

    shoes.quantity = 3;
    cart.update(shoes.clone()).unwrap();
    assert_eq!(cart.total("price").unwrap(), "922.86");
    assert_eq!(cart.total_raw("quantity").unwrap(), 24.0);

    shoes.price = 15.00;
    cart.update(shoes.clone()).unwrap();
    assert_eq!(cart.total("price").unwrap(), "582.03");

    shoes.quantity = 5;
    cart.update(shoes.clone()).unwrap();
    assert_eq!(cart.total("price").unwrap(), "614.51");
    assert_eq!(cart.total_raw("quantity").unwrap(), 26.0);

    // update keeps the row where it was
    assert_eq!(cart.all().unwrap().row_ids()[1], shoes.row_id());
}

#[test]
fn test_three_item_total() {
    let (mut cart, _) = empty_cart();
    cart.add(CartItem::make(1, "Socks", 1, 10.0, Some(0.0)).unwrap())
        .unwrap();
    cart.add(CartItem::make(2, "Shoes", 2, 20.0, Some(0.0)).unwrap())
        .unwrap();
    cart.add(CartItem::make(3, "Pants", 3, 30.0, Some(7.25)).unwrap())
        .unwrap();

    let expected = 10.0 + 40.0 + (90.0 + 90.0 * 0.0725);
    assert!((cart.total_raw("price").unwrap() - expected).abs() < 1e-9);
    assert_eq!(cart.total("price").unwrap(), number_format(expected, 2, ".", ","));
    assert_eq!(cart.total("price").unwrap(), "146.53");
    assert_eq!(cart.total("subtotal").unwrap(), "140.00");
    assert_eq!(cart.total("tax").unwrap(), "6.53");
    assert_eq!(cart.total_raw("quantity").unwrap(), 6.0);
}

#[test]
fn test_total_formatted_overrides() {
    let (mut cart, _) = empty_cart();
    cart.add(CartItem::make(1, "Hat", 1, 1295.0, None).unwrap())
        .unwrap();

    assert_eq!(cart.total("price").unwrap(), "1,295.00");
    assert_eq!(
        cart.total_formatted(
            "price",
            &NumberFormatOverrides::new()
                .decimal_separator(",")
                .thousands_separator(".")
        )
        .unwrap(),
        "1.295,00"
    );
    assert_eq!(
        cart.total_formatted("price", &NumberFormatOverrides::new().decimals(0))
            .unwrap(),
        "1,295"
    );
}

#[test]
fn test_unknown_total_property_sums_price() {
    let Stocked { cart, .. } = stocked_cart();
    assert_eq!(
        cart.total("shipping").unwrap(),
        cart.total("price").unwrap()
    );
    assert_eq!(
        cart.total("Subtotal").unwrap(),
        cart.total("price").unwrap()
    );
    assert_ne!(
        cart.total("subtotal").unwrap(),
        cart.total("price").unwrap()
    );
}

// =============================================================================
// Tax
// =============================================================================

#[test]
fn test_item_specific_tax_rate() {
    let (mut cart, _) = empty_cart();
    let plain = cart
        .add(CartItem::make(1, "Socks", 1, 10.00, None).unwrap())
        .unwrap();
    let taxed = cart
        .add(CartItem::make(1, "Socks", 1, 10.00, Some(6.25)).unwrap())
        .unwrap();

    assert_eq!(plain.tax, Some(0.0));
    assert_eq!(taxed.tax, Some(6.25));
    assert_eq!(cart.count().unwrap(), 2);
}

#[test]
fn test_configured_default_tax() {
    let mut cart = CartManager::new(
        MemorySession::new(),
        NullDispatcher,
        ShopCartConfig::default().with_default_tax(8.25),
    );
    let item = cart
        .add(CartItem::make(1, "Socks", 2, 50.00, None).unwrap())
        .unwrap();

    assert_eq!(item.tax, Some(8.25));
    assert_eq!(cart.total("tax").unwrap(), "8.25");
    assert_eq!(cart.total("price").unwrap(), "108.25");
}

#[test]
fn test_calculated_tax_rate() {
    let (mut cart, _) = empty_cart();
    let plain = cart
        .add(CartItem::make(1, "Socks", 1, 10.00, None).unwrap())
        .unwrap();
    let taxed = cart
        .add(CartItem::make(1, "Socks", 1, 10.00, Some(6.25)).unwrap())
        .unwrap();

    assert_eq!(
        plain.calculated_tax_rate(true, 2, RoundMode::HalfUp).unwrap(),
        0.0
    );
    assert_eq!(
        taxed.calculated_tax_rate(true, 2, RoundMode::HalfUp).unwrap(),
        6.25
    );
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn test_remove_deletes_row() {
    let Stocked {
        mut cart, pants, ..
    } = stocked_cart();

    let removed = cart.remove(&pants).unwrap();
    assert_eq!(removed, pants);
    assert!(!cart.has(&pants.row_id()).unwrap());
    assert_eq!(cart.count().unwrap(), 4);

    assert!(matches!(
        cart.remove(&pants),
        Err(CartError::ItemNotFound(id)) if id == pants.row_id()
    ));
}

#[test]
fn test_forget_empties_cart() {
    let Stocked { mut cart, .. } = stocked_cart();

    cart.forget().unwrap();

    assert!(cart.is_empty().unwrap());
    assert_eq!(cart.total("price").unwrap(), "0.00");
    assert!(!cart.session().contains(cart.session_key()));
}

// =============================================================================
// Events
// =============================================================================

#[test]
fn test_lifecycle_events() {
    let (mut cart, events) = empty_cart();

    let item = cart
        .add(CartItem::make(10, "Socks", 1, 10.00, None).unwrap())
        .unwrap();
    cart.update(item.clone()).unwrap();
    cart.remove(&item).unwrap();
    cart.forget().unwrap();

    assert_eq!(
        events.actions(),
        vec![
            CartAction::Add,
            CartAction::Update,
            CartAction::Remove,
            CartAction::Forget
        ]
    );

    let recorded = events.events();
    for event in &recorded[..3] {
        assert_eq!(event.item.as_ref().map(|i| i.id), Some(item.id));
        assert_eq!(event.session_key, "shopcart.default");
    }
    assert_eq!(recorded[3].name(), "shopcart.forget");
    assert!(recorded[3].item.is_none());
}

#[test]
fn test_failed_operations_do_not_dispatch() {
    let Stocked {
        mut cart,
        events,
        mut socks,
        ..
    } = stocked_cart();

    cart.remove_by_id(&RowId::new()).unwrap_err();

    socks.name = "x".into();
    let err = cart.update(socks.clone()).unwrap_err();
    assert!(err.to_string().contains("at least 3 characters"));

    assert!(events.events().is_empty());
    assert_eq!(cart.get(&socks.row_id()).unwrap().name, "Socks");
}

// =============================================================================
// Serialization & sessions
// =============================================================================

#[test]
fn test_to_json_and_to_array() {
    let Stocked { cart, socks, .. } = stocked_cart();

    let array = cart.to_array().unwrap();
    assert_eq!(array.len(), 5);

    let row = &array[&socks.row_id().to_string()];
    assert_eq!(row["name"], json!("Socks"));
    assert_eq!(row["rowId"], json!(socks.row_id().to_string()));
    assert_eq!(row["subTotal"], json!(120.0));
    assert_eq!(row["tax"], json!(0.0));

    let parsed: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
    assert_eq!(parsed, serde_json::Value::Object(array));
}

#[test]
fn test_named_carts_are_independent() {
    let mut session = MemorySession::new();

    {
        let mut wishlist = CartManager::new(
            &mut session,
            NullDispatcher,
            ShopCartConfig::default().with_session_key("shopcart.wishlist"),
        );
        wishlist
            .add(CartItem::make(1, "Boots", 1, 150.0, None).unwrap())
            .unwrap();
    }

    let cart = CartManager::new(session, NullDispatcher, ShopCartConfig::default());
    assert!(cart.is_empty().unwrap());
    assert!(cart.session().contains("shopcart.wishlist"));

    let stored = cart.session().get("shopcart.wishlist").unwrap().unwrap();
    assert_eq!(stored.as_object().map(|m| m.len()), Some(1));
}

#[test]
fn test_cart_survives_new_manager() {
    let Stocked { cart, shirts, .. } = stocked_cart();
    let config = cart.config().clone();
    let session = cart.into_session();

    let reopened = CartManager::new(session, NullDispatcher, config);
    assert_eq!(reopened.count().unwrap(), 5);
    assert_eq!(reopened.get(&shirts.row_id()).unwrap(), shirts);
}
