//! Earnings reconciliation.
//!
//! A usage write commits first; [`Engine::reconcile`] then recomputes the
//! derived `consumables_cost` and `net_profit` of its date as a separate step.
//! When that step fails the date is parked in `pending_reconciliations` and
//! picked up again by [`Engine::repair_pending`].

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};

use crate::{
    Actor, Earnings, EngineError, Money, Resource, ResultEngine, UsageLine, daily_earnings,
    pending_reconciliations,
};

use super::{Engine, now, usage::usage_lines, with_tx};

impl Engine {
    /// Recomputes the derived earnings fields for `date` from its usage rows.
    ///
    /// `total_earnings` and `notes` are preserved; a missing row is created
    /// with zero earnings. Running it again without a usage change stores the
    /// same values.
    pub async fn reconcile(&self, date: NaiveDate) -> ResultEngine<Earnings> {
        let earnings = with_tx!(self, |db_tx| {
            let lines = usage_lines(&db_tx, date).await?;
            let cost = total_cost(&lines)?;

            let existing = daily_earnings::Entity::find()
                .filter(daily_earnings::Column::RecordDate.eq(date))
                .one(&db_tx)
                .await?
                .map(Earnings::from);
            let (total, notes) = existing
                .map(|e| (e.total_earnings, e.notes))
                .unwrap_or((Money::ZERO, String::new()));
            let net = total
                .checked_sub(cost)
                .ok_or_else(|| EngineError::InvalidAmount("net profit overflow".to_string()))?;

            let earnings = Earnings {
                record_date: date,
                total_earnings: total,
                consumables_cost: cost,
                net_profit: net,
                notes,
            };
            upsert_earnings(&db_tx, &earnings, false).await?;

            pending_reconciliations::Entity::delete_many()
                .filter(pending_reconciliations::Column::RecordDate.eq(date))
                .exec(&db_tx)
                .await?;
            Ok::<_, EngineError>(earnings)
        })?;

        tracing::debug!(
            %date,
            cost = %earnings.consumables_cost,
            net = %earnings.net_profit,
            "earnings reconciled"
        );
        Ok(earnings)
    }

    /// [`Engine::reconcile`] on behalf of a caller.
    pub async fn reconcile_for(&self, actor: &Actor, date: NaiveDate) -> ResultEngine<Earnings> {
        actor.require_write(Resource::Reconciliation)?;
        tracing::info!(%date, by = %actor.name, "manual reconciliation");
        self.reconcile(date).await
    }

    /// Dates whose reconciliation failed and has not been repaired yet.
    pub async fn pending_dates(&self) -> ResultEngine<Vec<NaiveDate>> {
        let rows = pending_reconciliations::Entity::find()
            .order_by_asc(pending_reconciliations::Column::RecordDate)
            .all(&self.database)
            .await?;
        Ok(rows.into_iter().map(|row| row.record_date).collect())
    }

    /// Reconciles every pending date and returns how many were repaired.
    ///
    /// A date that fails again stays pending with its error refreshed.
    pub async fn repair_pending(&self) -> ResultEngine<usize> {
        let dates = self.pending_dates().await?;
        let mut repaired = 0;
        for date in dates {
            match self.reconcile(date).await {
                Ok(_) => repaired += 1,
                Err(err) => {
                    tracing::warn!(%date, error = %err, "reconciliation still failing");
                    self.mark_pending(date, &err).await?;
                }
            }
        }
        if repaired > 0 {
            tracing::info!(repaired, "pending reconciliations repaired");
        }
        Ok(repaired)
    }

    /// [`Engine::repair_pending`] on behalf of a caller.
    pub async fn repair_pending_for(&self, actor: &Actor) -> ResultEngine<usize> {
        actor.require_write(Resource::Reconciliation)?;
        self.repair_pending().await
    }

    /// Second phase of a usage write. Never fails: errors are logged and the
    /// date is queued for repair.
    pub(super) async fn reconcile_after_write(&self, date: NaiveDate) -> bool {
        match self.reconcile(date).await {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(%date, error = %err, "reconciliation failed after usage write");
                if let Err(mark_err) = self.mark_pending(date, &err).await {
                    tracing::error!(%date, error = %mark_err, "cannot queue reconciliation");
                }
                false
            }
        }
    }

    async fn mark_pending(&self, date: NaiveDate, err: &EngineError) -> ResultEngine<()> {
        let active = pending_reconciliations::ActiveModel {
            record_date: ActiveValue::Set(date),
            failed_at: ActiveValue::Set(now()),
            last_error: ActiveValue::Set(err.to_string()),
        };
        pending_reconciliations::Entity::insert(active)
            .on_conflict(
                OnConflict::column(pending_reconciliations::Column::RecordDate)
                    .update_columns([
                        pending_reconciliations::Column::FailedAt,
                        pending_reconciliations::Column::LastError,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.database)
            .await?;
        Ok(())
    }
}

/// Σ `used × price` over the lines.
pub(super) fn total_cost(lines: &[UsageLine]) -> ResultEngine<Money> {
    lines.iter().try_fold(Money::ZERO, |acc, line| {
        acc.checked_add(line.cost)
            .ok_or_else(|| EngineError::InvalidAmount("daily cost overflow".to_string()))
    })
}

/// Writes an earnings row keyed by date.
///
/// With `caller_fields` unset only the derived columns are overwritten on
/// conflict, leaving `total_earnings` and `notes` to their owner.
pub(super) async fn upsert_earnings<C: ConnectionTrait>(
    db: &C,
    earnings: &Earnings,
    caller_fields: bool,
) -> ResultEngine<()> {
    let active = daily_earnings::ActiveModel {
        id: ActiveValue::NotSet,
        record_date: ActiveValue::Set(earnings.record_date),
        total_earnings_minor: ActiveValue::Set(earnings.total_earnings.minor()),
        consumables_cost_minor: ActiveValue::Set(earnings.consumables_cost.minor()),
        net_profit_minor: ActiveValue::Set(earnings.net_profit.minor()),
        notes: ActiveValue::Set(earnings.notes.clone()),
    };

    let mut columns = vec![
        daily_earnings::Column::ConsumablesCostMinor,
        daily_earnings::Column::NetProfitMinor,
    ];
    if caller_fields {
        columns.push(daily_earnings::Column::TotalEarningsMinor);
        columns.push(daily_earnings::Column::Notes);
    }

    daily_earnings::Entity::insert(active)
        .on_conflict(
            OnConflict::column(daily_earnings::Column::RecordDate)
                .update_columns(columns)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(())
}
