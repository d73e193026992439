mod common;

use engine::{
    ConsumableNew, ConsumableUpdate, EngineError, Money, ProductUpdate, PurchaseNew, SaleItem,
    UsageSave,
};

use common::{admin, clerk, consumable, date, engine_with_db, product};

#[tokio::test]
async fn catalog_writes_require_privilege() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_consumable(
            &clerk(),
            ConsumableNew {
                name: "Bread".to_string(),
                price: Money::new(500),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert!(engine.list_consumables().await.unwrap().is_empty());
}

#[tokio::test]
async fn names_are_unique_ignoring_case() {
    let (engine, _db) = engine_with_db().await;
    consumable(&engine, "Harissa Jar", 1_200).await;

    let err = engine
        .create_consumable(
            &admin(),
            ConsumableNew {
                name: "  harissa   JAR ".to_string(),
                price: Money::new(900),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn prices_must_be_positive() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_consumable(
            &admin(),
            ConsumableNew {
                name: "Bread".to_string(),
                price: Money::ZERO,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn rename_keeps_id_and_rejects_taken_name() {
    let (engine, _db) = engine_with_db().await;
    let bread = consumable(&engine, "Bread", 500).await;
    consumable(&engine, "Eggs", 250).await;

    let renamed = engine
        .update_consumable(
            &admin(),
            bread.id,
            ConsumableUpdate {
                name: Some("Baguette".to_string()),
                price: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.id, bread.id);
    assert_eq!(renamed.price, Money::new(500));

    let err = engine
        .update_consumable(
            &admin(),
            bread.id,
            ConsumableUpdate {
                name: Some("eggs".to_string()),
                price: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn referenced_consumable_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let bread = consumable(&engine, "Bread", 500).await;
    let spare = consumable(&engine, "Spare", 100).await;
    let day = date(2024, 1, 10);
    engine
        .save_usage(
            &clerk(),
            UsageSave {
                record_date: day,
                consumable_id: bread.id,
                start_count: 5,
                end_count: 1,
            },
        )
        .await
        .unwrap();

    let err = engine.delete_consumable(&admin(), bread.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InUse(_)));
    assert_eq!(engine.list_usage(day).await.unwrap().len(), 1);
    assert!(engine.consumable(bread.id).await.is_ok());

    engine.delete_consumable(&admin(), spare.id).await.unwrap();
    let err = engine.consumable(spare.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn sold_product_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let sandwich = product(&engine, "Kaskrout", 3_500).await;
    engine
        .create_sale(
            &clerk(),
            &[SaleItem {
                product_id: sandwich.id,
                quantity: 1,
            }],
        )
        .await
        .unwrap();

    let err = engine
        .delete_product(&admin(), sandwich.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InUse(_)));
}

#[tokio::test]
async fn product_update_changes_price_and_category() {
    let (engine, _db) = engine_with_db().await;
    let sandwich = product(&engine, "Kaskrout", 3_500).await;

    let updated = engine
        .update_product(
            &admin(),
            sandwich.id,
            ProductUpdate {
                name: None,
                category: Some("Street food".to_string()),
                price: Some(Money::new(4_000)),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, Money::new(4_000));
    assert_eq!(updated.category.as_deref(), Some("Street food"));
    assert_eq!(updated.name, "Kaskrout");
}

#[tokio::test]
async fn purchase_raises_stock() {
    let (engine, _db) = engine_with_db().await;
    let bread = consumable(&engine, "Bread", 500).await;

    let purchase = engine
        .create_purchase(
            &clerk(),
            PurchaseNew {
                consumable_id: bread.id,
                quantity: 40,
                cost: Money::new(18_000),
                purchase_date: Some(date(2024, 1, 9)),
            },
        )
        .await
        .unwrap();
    assert_eq!(purchase.consumable_name, "Bread");
    engine
        .create_purchase(
            &clerk(),
            PurchaseNew {
                consumable_id: bread.id,
                quantity: 10,
                cost: Money::new(4_500),
                purchase_date: Some(date(2024, 1, 10)),
            },
        )
        .await
        .unwrap();

    assert_eq!(engine.consumable(bread.id).await.unwrap().current_stock, 50);
    let purchases = engine.list_purchases().await.unwrap();
    assert_eq!(purchases.len(), 2);
    assert_eq!(purchases[0].purchase_date, date(2024, 1, 10));
}

#[tokio::test]
async fn purchase_of_unknown_consumable_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_purchase(
            &clerk(),
            PurchaseNew {
                consumable_id: 7,
                quantity: 1,
                cost: Money::new(100),
                purchase_date: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.list_purchases().await.unwrap().is_empty());
}
