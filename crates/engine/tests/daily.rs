mod common;

use engine::{ConsumableUpdate, CountsPatch, EarningsSave, EngineError, Money, UsageSave};

use common::{admin, clerk, consumable, date, engine_with_db};

fn usage(record_date: chrono::NaiveDate, consumable_id: i32, start: i32, end: i32) -> UsageSave {
    UsageSave {
        record_date,
        consumable_id,
        start_count: start,
        end_count: end,
    }
}

#[tokio::test]
async fn usage_write_reconciles_cost_and_net_profit() {
    let (engine, _db) = engine_with_db().await;
    let bread = consumable(&engine, "Bread", 500).await;
    let day = date(2024, 1, 10);

    let write = engine
        .save_usage(&clerk(), usage(day, bread.id, 50, 12))
        .await
        .unwrap();
    assert!(write.reconciled);
    assert_eq!(write.value.counts.used, 38);

    let earnings = engine
        .save_earnings(
            &clerk(),
            EarningsSave {
                record_date: day,
                total_earnings: Money::new(120_000),
                notes: Some("market day".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(earnings.consumables_cost, Money::new(19_000));
    assert_eq!(earnings.net_profit, Money::new(101_000));

    // A later usage change keeps the takings and the notes.
    engine
        .save_usage(&clerk(), usage(day, bread.id, 50, 40))
        .await
        .unwrap();
    let earnings = engine.earnings(day).await.unwrap();
    assert_eq!(earnings.total_earnings, Money::new(120_000));
    assert_eq!(earnings.consumables_cost, Money::new(5_000));
    assert_eq!(earnings.net_profit, Money::new(115_000));
    assert_eq!(earnings.notes, "market day");
}

#[tokio::test]
async fn usage_without_earnings_creates_zero_takings_row() {
    let (engine, _db) = engine_with_db().await;
    let eggs = consumable(&engine, "Eggs", 250).await;
    let day = date(2024, 1, 11);

    engine
        .save_usage(&clerk(), usage(day, eggs.id, 30, 10))
        .await
        .unwrap();

    let earnings = engine.earnings(day).await.unwrap();
    assert_eq!(earnings.total_earnings, Money::ZERO);
    assert_eq!(earnings.consumables_cost, Money::new(5_000));
    assert_eq!(earnings.net_profit, Money::new(-5_000));
}

#[tokio::test]
async fn saving_twice_upserts_one_row() {
    let (engine, _db) = engine_with_db().await;
    let bread = consumable(&engine, "Bread", 500).await;
    let day = date(2024, 1, 10);

    let first = engine
        .save_usage(&clerk(), usage(day, bread.id, 50, 12))
        .await
        .unwrap();
    let second = engine
        .save_usage(&clerk(), usage(day, bread.id, 40, 30))
        .await
        .unwrap();
    assert_eq!(first.value.id, second.value.id);

    let lines = engine.list_usage(day).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].usage.counts.used, 10);
    assert_eq!(lines[0].cost, Money::new(5_000));
}

#[tokio::test]
async fn end_above_start_clamps_used_to_zero() {
    let (engine, _db) = engine_with_db().await;
    let bread = consumable(&engine, "Bread", 500).await;

    let write = engine
        .save_usage(&clerk(), usage(date(2024, 1, 10), bread.id, 3, 10))
        .await
        .unwrap();
    assert_eq!(write.value.counts.used, 0);
}

#[tokio::test]
async fn negative_counts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let bread = consumable(&engine, "Bread", 500).await;

    let err = engine
        .save_usage(&clerk(), usage(date(2024, 1, 10), bread.id, -1, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidCount(_)));
    assert!(engine.list_usage(date(2024, 1, 10)).await.unwrap().is_empty());
}

#[tokio::test]
async fn usage_for_unknown_consumable_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .save_usage(&clerk(), usage(date(2024, 1, 10), 42, 5, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn partial_update_recomputes_used_from_stored_sibling() {
    let (engine, _db) = engine_with_db().await;
    let bread = consumable(&engine, "Bread", 500).await;
    let day = date(2024, 1, 10);
    let saved = engine
        .save_usage(&clerk(), usage(day, bread.id, 50, 12))
        .await
        .unwrap();

    let write = engine
        .update_usage(
            &clerk(),
            saved.value.id,
            CountsPatch {
                start: None,
                end: Some(20),
            },
        )
        .await
        .unwrap();
    assert_eq!(write.value.counts.start, 50);
    assert_eq!(write.value.counts.used, 30);
    assert!(write.reconciled);
    assert_eq!(
        engine.earnings(day).await.unwrap().consumables_cost,
        Money::new(15_000)
    );

    let err = engine
        .update_usage(&clerk(), saved.value.id, CountsPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn deleting_usage_drops_its_cost() {
    let (engine, _db) = engine_with_db().await;
    let bread = consumable(&engine, "Bread", 500).await;
    let eggs = consumable(&engine, "Eggs", 250).await;
    let day = date(2024, 1, 10);
    let bread_row = engine
        .save_usage(&clerk(), usage(day, bread.id, 50, 12))
        .await
        .unwrap();
    engine
        .save_usage(&clerk(), usage(day, eggs.id, 10, 6))
        .await
        .unwrap();

    let write = engine
        .delete_usage(&clerk(), bread_row.value.id)
        .await
        .unwrap();
    assert!(write.reconciled);
    assert_eq!(
        engine.earnings(day).await.unwrap().consumables_cost,
        Money::new(1_000)
    );

    let err = engine
        .delete_usage(&clerk(), bread_row.value.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn reconcile_is_idempotent_and_uses_current_prices() {
    let (engine, _db) = engine_with_db().await;
    let bread = consumable(&engine, "Bread", 500).await;
    let day = date(2024, 1, 10);
    engine
        .save_usage(&clerk(), usage(day, bread.id, 50, 12))
        .await
        .unwrap();

    let first = engine.reconcile(day).await.unwrap();
    let second = engine.reconcile(day).await.unwrap();
    assert_eq!(first, second);

    // A price edit does not touch past days until they are reconciled again.
    engine
        .update_consumable(
            &admin(),
            bread.id,
            ConsumableUpdate {
                name: None,
                price: Some(Money::new(600)),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        engine.earnings(day).await.unwrap().consumables_cost,
        Money::new(19_000)
    );
    let repriced = engine.reconcile(day).await.unwrap();
    assert_eq!(repriced.consumables_cost, Money::new(22_800));
}

#[tokio::test]
async fn failed_reconciliation_is_queued_and_repaired() {
    let (engine, _db) = engine_with_db().await;
    let gold = consumable(&engine, "Saffron", i64::MAX / 2).await;
    let day = date(2024, 1, 12);

    let write = engine
        .save_usage(&clerk(), usage(day, gold.id, 10, 7))
        .await
        .unwrap();
    assert!(!write.reconciled);
    assert_eq!(write.value.counts.used, 3);
    assert_eq!(engine.pending_dates().await.unwrap(), vec![day]);

    // Still broken: stays queued.
    assert_eq!(engine.repair_pending().await.unwrap(), 0);
    assert_eq!(engine.pending_dates().await.unwrap(), vec![day]);

    engine
        .update_consumable(
            &admin(),
            gold.id,
            ConsumableUpdate {
                name: None,
                price: Some(Money::new(1_000)),
            },
        )
        .await
        .unwrap();
    assert_eq!(engine.repair_pending().await.unwrap(), 1);
    assert!(engine.pending_dates().await.unwrap().is_empty());
    assert_eq!(
        engine.earnings(day).await.unwrap().consumables_cost,
        Money::new(3_000)
    );
}

#[tokio::test]
async fn manual_reconciliation_requires_privilege() {
    let (engine, _db) = engine_with_db().await;
    let day = date(2024, 1, 10);

    let err = engine.reconcile_for(&clerk(), day).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    let err = engine.repair_pending_for(&clerk()).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let earnings = engine.reconcile_for(&admin(), day).await.unwrap();
    assert_eq!(earnings.consumables_cost, Money::ZERO);
}

#[tokio::test]
async fn negative_takings_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .save_earnings(
            &clerk(),
            EarningsSave {
                record_date: date(2024, 1, 10),
                total_earnings: Money::new(-1),
                notes: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
}

#[tokio::test]
async fn baguettes_upsert_by_date() {
    let (engine, _db) = engine_with_db().await;
    let day = date(2024, 1, 10);

    let empty = engine.baguettes(day).await.unwrap();
    assert_eq!(empty.counts.used, 0);

    engine.save_baguettes(&clerk(), day, 40, 5).await.unwrap();
    let saved = engine.save_baguettes(&clerk(), day, 40, 8).await.unwrap();
    assert_eq!(saved.counts.used, 32);
    assert_eq!(engine.baguettes(day).await.unwrap(), saved);
}
