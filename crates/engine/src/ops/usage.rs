use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};

use crate::{
    Actor, Baguettes, Consumable, Counts, CountsPatch, EngineError, Resource, ResultEngine, Usage,
    UsageLine, UsageSave, UsageWrite, consumable_usage, consumables, daily_baguettes,
};

use super::{Engine, with_tx};

impl Engine {
    /// Usage rows for `date` joined with the catalog, sorted by consumable name.
    pub async fn list_usage(&self, date: NaiveDate) -> ResultEngine<Vec<UsageLine>> {
        usage_lines(&self.database, date).await
    }

    /// Upserts the usage row keyed by `(record_date, consumable_id)`, then
    /// reconciles the date.
    pub async fn save_usage(&self, actor: &Actor, cmd: UsageSave) -> ResultEngine<UsageWrite<Usage>> {
        actor.require_write(Resource::DailyRecords)?;
        let counts = Counts::new(cmd.start_count, cmd.end_count)?;

        let usage = with_tx!(self, |db_tx| {
            consumables::Entity::find_by_id(cmd.consumable_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("consumable".to_string()))?;

            let active = consumable_usage::ActiveModel {
                id: ActiveValue::NotSet,
                record_date: ActiveValue::Set(cmd.record_date),
                consumable_id: ActiveValue::Set(cmd.consumable_id),
                start_count: ActiveValue::Set(counts.start),
                end_count: ActiveValue::Set(counts.end),
                used_count: ActiveValue::Set(counts.used),
            };
            consumable_usage::Entity::insert(active)
                .on_conflict(
                    OnConflict::columns([
                        consumable_usage::Column::RecordDate,
                        consumable_usage::Column::ConsumableId,
                    ])
                    .update_columns([
                        consumable_usage::Column::StartCount,
                        consumable_usage::Column::EndCount,
                        consumable_usage::Column::UsedCount,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(&db_tx)
                .await?;

            let model = consumable_usage::Entity::find()
                .filter(consumable_usage::Column::RecordDate.eq(cmd.record_date))
                .filter(consumable_usage::Column::ConsumableId.eq(cmd.consumable_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("usage".to_string()))?;
            Ok::<_, EngineError>(Usage::from(model))
        })?;

        tracing::debug!(
            date = %usage.key.record_date,
            consumable_id = usage.key.consumable_id,
            used = usage.counts.used,
            "usage saved"
        );
        let reconciled = self.reconcile_after_write(usage.key.record_date).await;
        Ok(UsageWrite {
            value: usage,
            reconciled,
        })
    }

    /// Applies a partial count update. The used count is always recomputed.
    pub async fn update_usage(
        &self,
        actor: &Actor,
        id: i32,
        patch: CountsPatch,
    ) -> ResultEngine<UsageWrite<Usage>> {
        actor.require_write(Resource::DailyRecords)?;
        if patch.is_empty() {
            return Err(EngineError::InvalidInput(
                "start_count or end_count is required".to_string(),
            ));
        }

        let usage = with_tx!(self, |db_tx| {
            let model = consumable_usage::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("usage".to_string()))?;
            let current = Usage::from(model.clone());
            let counts = patch.resolve(current.counts)?;

            let mut active: consumable_usage::ActiveModel = model.into();
            active.start_count = ActiveValue::Set(counts.start);
            active.end_count = ActiveValue::Set(counts.end);
            active.used_count = ActiveValue::Set(counts.used);
            let updated = active.update(&db_tx).await?;
            Ok::<_, EngineError>(Usage::from(updated))
        })?;

        let reconciled = self.reconcile_after_write(usage.key.record_date).await;
        Ok(UsageWrite {
            value: usage,
            reconciled,
        })
    }

    /// Deletes a usage row and returns it.
    pub async fn delete_usage(&self, actor: &Actor, id: i32) -> ResultEngine<UsageWrite<Usage>> {
        actor.require_write(Resource::DailyRecords)?;

        let usage = with_tx!(self, |db_tx| {
            let model = consumable_usage::Entity::find_by_id(id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("usage".to_string()))?;
            consumable_usage::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok::<_, EngineError>(Usage::from(model))
        })?;

        let reconciled = self.reconcile_after_write(usage.key.record_date).await;
        Ok(UsageWrite {
            value: usage,
            reconciled,
        })
    }

    /// Bread counts for `date`; zero counts when nothing was recorded.
    pub async fn baguettes(&self, date: NaiveDate) -> ResultEngine<Baguettes> {
        baguettes_on(&self.database, date).await
    }

    pub async fn save_baguettes(
        &self,
        actor: &Actor,
        record_date: NaiveDate,
        start_count: i32,
        end_count: i32,
    ) -> ResultEngine<Baguettes> {
        actor.require_write(Resource::DailyRecords)?;
        let counts = Counts::new(start_count, end_count)?;

        with_tx!(self, |db_tx| {
            let active = daily_baguettes::ActiveModel {
                id: ActiveValue::NotSet,
                record_date: ActiveValue::Set(record_date),
                start_count: ActiveValue::Set(counts.start),
                end_count: ActiveValue::Set(counts.end),
                used_count: ActiveValue::Set(counts.used),
            };
            daily_baguettes::Entity::insert(active)
                .on_conflict(
                    OnConflict::column(daily_baguettes::Column::RecordDate)
                        .update_columns([
                            daily_baguettes::Column::StartCount,
                            daily_baguettes::Column::EndCount,
                            daily_baguettes::Column::UsedCount,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&db_tx)
                .await?;
            Ok(Baguettes {
                record_date,
                counts,
            })
        })
    }
}

/// Loads the usage lines of a date, each priced at the current catalog price.
pub(super) async fn usage_lines<C: ConnectionTrait>(
    db: &C,
    date: NaiveDate,
) -> ResultEngine<Vec<UsageLine>> {
    let rows = consumable_usage::Entity::find()
        .find_also_related(consumables::Entity)
        .filter(consumable_usage::Column::RecordDate.eq(date))
        .order_by_asc(consumables::Column::Name)
        .all(db)
        .await?;

    rows.into_iter()
        .map(|(usage, consumable)| {
            let consumable = consumable.ok_or_else(|| {
                EngineError::KeyNotFound(format!("consumable {}", usage.consumable_id))
            })?;
            UsageLine::new(Usage::from(usage), Consumable::from(consumable))
        })
        .collect()
}

pub(super) async fn baguettes_on<C: ConnectionTrait>(
    db: &C,
    date: NaiveDate,
) -> ResultEngine<Baguettes> {
    let model = daily_baguettes::Entity::find()
        .filter(daily_baguettes::Column::RecordDate.eq(date))
        .one(db)
        .await?;
    Ok(model.map_or_else(|| Baguettes::empty(date), Baguettes::from))
}
