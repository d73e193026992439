#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{Database, DatabaseConnection};

use engine::{Actor, Consumable, ConsumableNew, Engine, Money, Product, ProductNew, Role};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn admin() -> Actor {
    Actor::new(1, "boss", Role::Admin)
}

pub fn clerk() -> Actor {
    Actor::new(2, "sami", Role::User)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn consumable(engine: &Engine, name: &str, price_minor: i64) -> Consumable {
    engine
        .create_consumable(
            &admin(),
            ConsumableNew {
                name: name.to_string(),
                price: Money::new(price_minor),
            },
        )
        .await
        .unwrap()
}

pub async fn product(engine: &Engine, name: &str, price_minor: i64) -> Product {
    engine
        .create_product(
            &admin(),
            ProductNew {
                name: name.to_string(),
                category: Some("Sandwich".to_string()),
                price: Money::new(price_minor),
            },
        )
        .await
        .unwrap()
}
