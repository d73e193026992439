use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    Actor, EarningsSave, Earnings, EngineError, Resource, ResultEngine, daily_earnings,
    util::normalize_optional_text,
};

use super::{
    Engine,
    reconcile::{total_cost, upsert_earnings},
    usage::usage_lines,
    with_tx,
};

impl Engine {
    /// Earnings for `date`; zero values when nothing was recorded.
    pub async fn earnings(&self, date: NaiveDate) -> ResultEngine<Earnings> {
        earnings_on(&self.database, date).await
    }

    /// Stores the day's takings.
    ///
    /// The cost side is recomputed from the current usage rows in the same
    /// transaction, so the stored net profit is always consistent.
    pub async fn save_earnings(&self, actor: &Actor, cmd: EarningsSave) -> ResultEngine<Earnings> {
        actor.require_write(Resource::DailyRecords)?;
        if cmd.total_earnings.is_negative() {
            return Err(EngineError::InvalidAmount(
                "total_earnings must be >= 0".to_string(),
            ));
        }
        let notes = normalize_optional_text(cmd.notes.as_deref()).unwrap_or_default();

        let earnings = with_tx!(self, |db_tx| {
            let lines = usage_lines(&db_tx, cmd.record_date).await?;
            let cost = total_cost(&lines)?;
            let net = cmd.total_earnings.checked_sub(cost).ok_or_else(|| {
                EngineError::InvalidAmount("net profit overflow".to_string())
            })?;

            let earnings = Earnings {
                record_date: cmd.record_date,
                total_earnings: cmd.total_earnings,
                consumables_cost: cost,
                net_profit: net,
                notes,
            };
            upsert_earnings(&db_tx, &earnings, true).await?;
            Ok::<_, EngineError>(earnings)
        })?;

        tracing::info!(
            date = %earnings.record_date,
            total = %earnings.total_earnings,
            net = %earnings.net_profit,
            by = %actor.name,
            "earnings saved"
        );
        Ok(earnings)
    }
}

pub(super) async fn earnings_on<C: ConnectionTrait>(
    db: &C,
    date: NaiveDate,
) -> ResultEngine<Earnings> {
    let model = daily_earnings::Entity::find()
        .filter(daily_earnings::Column::RecordDate.eq(date))
        .one(db)
        .await?;
    Ok(model.map_or_else(|| Earnings::empty(date), Earnings::from))
}
