//! Initial schema: catalog, daily records, ledgers and users.
//!
//! - `users`: accounts and roles
//! - `consumables`, `products`: the catalog
//! - `consumable_usage`: one row per `(record_date, consumable_id)`
//! - `daily_baguettes`, `daily_earnings`, `daily_leftovers`: one row per date
//! - `purchases`, `sales`, `expenses`: append-only ledgers

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    PasswordHash,
    Role,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Consumables {
    Table,
    Id,
    Name,
    NameKey,
    PriceMinor,
    CurrentStock,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    Name,
    NameKey,
    Category,
    PriceMinor,
}

#[derive(Iden)]
enum ConsumableUsage {
    Table,
    Id,
    RecordDate,
    ConsumableId,
    StartCount,
    EndCount,
    UsedCount,
}

#[derive(Iden)]
enum DailyBaguettes {
    Table,
    Id,
    RecordDate,
    StartCount,
    EndCount,
    UsedCount,
}

#[derive(Iden)]
enum DailyEarnings {
    Table,
    Id,
    RecordDate,
    TotalEarningsMinor,
    ConsumablesCostMinor,
    NetProfitMinor,
    Notes,
}

#[derive(Iden)]
enum Purchases {
    Table,
    Id,
    ConsumableId,
    Quantity,
    CostMinor,
    PurchaseDate,
}

#[derive(Iden)]
enum Sales {
    Table,
    Id,
    ProductId,
    Quantity,
    TotalPriceMinor,
    SaleTimestamp,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Kind,
    AmountMinor,
    Description,
    ExpenseDate,
}

#[derive(Iden)]
enum DailyLeftovers {
    Table,
    Id,
    RecordDate,
    BreadBaguettes,
    CookedEggs,
    SalamiPieces,
    Notes,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string()
                            .not_null()
                            .default("user"),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Catalog
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Consumables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Consumables::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Consumables::Name).string().not_null())
                    .col(
                        ColumnDef::new(Consumables::NameKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Consumables::PriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Consumables::CurrentStock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(
                        ColumnDef::new(Products::NameKey)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Products::Category).string())
                    .col(ColumnDef::new(Products::PriceMinor).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Consumable usage
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ConsumableUsage::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ConsumableUsage::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ConsumableUsage::RecordDate).date().not_null())
                    .col(
                        ColumnDef::new(ConsumableUsage::ConsumableId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ConsumableUsage::StartCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ConsumableUsage::EndCount).integer().not_null())
                    .col(
                        ColumnDef::new(ConsumableUsage::UsedCount)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-consumable_usage-consumable_id")
                            .from(ConsumableUsage::Table, ConsumableUsage::ConsumableId)
                            .to(Consumables::Table, Consumables::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-consumable_usage-record_date-consumable_id-unique")
                    .table(ConsumableUsage::Table)
                    .col(ConsumableUsage::RecordDate)
                    .col(ConsumableUsage::ConsumableId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Per-date records
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(DailyBaguettes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyBaguettes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyBaguettes::RecordDate)
                            .date()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(DailyBaguettes::StartCount).integer().not_null())
                    .col(ColumnDef::new(DailyBaguettes::EndCount).integer().not_null())
                    .col(ColumnDef::new(DailyBaguettes::UsedCount).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DailyEarnings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyEarnings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyEarnings::RecordDate)
                            .date()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DailyEarnings::TotalEarningsMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyEarnings::ConsumablesCostMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyEarnings::NetProfitMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyEarnings::Notes)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DailyLeftovers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DailyLeftovers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DailyLeftovers::RecordDate)
                            .date()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DailyLeftovers::BreadBaguettes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyLeftovers::CookedEggs)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyLeftovers::SalamiPieces)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(DailyLeftovers::Notes)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Ledgers
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Purchases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Purchases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Purchases::ConsumableId).integer().not_null())
                    .col(ColumnDef::new(Purchases::Quantity).integer().not_null())
                    .col(ColumnDef::new(Purchases::CostMinor).big_integer().not_null())
                    .col(ColumnDef::new(Purchases::PurchaseDate).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-purchases-consumable_id")
                            .from(Purchases::Table, Purchases::ConsumableId)
                            .to(Consumables::Table, Consumables::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-purchases-purchase_date")
                    .table(Purchases::Table)
                    .col(Purchases::PurchaseDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sales::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sales::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sales::ProductId).integer().not_null())
                    .col(ColumnDef::new(Sales::Quantity).integer().not_null())
                    .col(
                        ColumnDef::new(Sales::TotalPriceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sales::SaleTimestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sales-product_id")
                            .from(Sales::Table, Sales::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sales-sale_timestamp")
                    .table(Sales::Table)
                    .col(Sales::SaleTimestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Kind).string().not_null())
                    .col(ColumnDef::new(Expenses::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::Description).string())
                    .col(ColumnDef::new(Expenses::ExpenseDate).date().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-expense_date")
                    .table(Expenses::Table)
                    .col(Expenses::ExpenseDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sales::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Purchases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyLeftovers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyEarnings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DailyBaguettes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConsumableUsage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Consumables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
