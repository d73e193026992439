//! Daily records: usage, baguettes, earnings, summary and reconciliation.

use api_types::daily::{
    BaguettesSave, BaguettesView, DailySummaryView, EarningsSave, EarningsView, RepairResponse,
    UsageLineView, UsagePatch, UsageSave, UsageWriteResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::NaiveDate;
use engine::{Actor, CountsPatch, Money, Usage, UsageWrite};

use crate::{ServerError, server::ServerState, views};

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, ServerError> {
    Ok(engine::parse_date(value)?)
}

fn parse_id(value: &str) -> Result<i32, ServerError> {
    value
        .parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid id '{value}'")))
}

fn usage_response(write: UsageWrite<Usage>) -> UsageWriteResponse {
    UsageWriteResponse {
        usage: views::usage(write.value),
        reconciled: write.reconciled,
    }
}

/// `GET /daily/consumables/{date}`
pub async fn list_usage(
    State(state): State<ServerState>,
    WithRejection(Path(date), _): WithRejection<Path<String>, ServerError>,
) -> Result<Json<Vec<UsageLineView>>, ServerError> {
    let date = parse_date(&date)?;
    let lines = state
        .engine
        .list_usage(date)
        .await?
        .into_iter()
        .map(views::usage_line)
        .collect();
    Ok(Json(lines))
}

pub async fn save_usage(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<UsageSave>, ServerError>,
) -> Result<(StatusCode, Json<UsageWriteResponse>), ServerError> {
    let write = state
        .engine
        .save_usage(
            &actor,
            engine::UsageSave {
                record_date: payload.record_date,
                consumable_id: payload.consumable_id,
                start_count: payload.start_count,
                end_count: payload.end_count,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(usage_response(write))))
}

/// `PUT /daily/consumables/{id}`
pub async fn update_usage(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<UsagePatch>, ServerError>,
) -> Result<Json<UsageWriteResponse>, ServerError> {
    let id = parse_id(&id)?;
    let patch = CountsPatch {
        start: payload.start_count,
        end: payload.end_count,
    };
    let write = state.engine.update_usage(&actor, id, patch).await?;
    Ok(Json(usage_response(write)))
}

/// `DELETE /daily/consumables/{id}`
pub async fn delete_usage(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<String>, ServerError>,
) -> Result<Json<UsageWriteResponse>, ServerError> {
    let id = parse_id(&id)?;
    let write = state.engine.delete_usage(&actor, id).await?;
    Ok(Json(usage_response(write)))
}

pub async fn baguettes(
    State(state): State<ServerState>,
    WithRejection(Path(date), _): WithRejection<Path<String>, ServerError>,
) -> Result<Json<BaguettesView>, ServerError> {
    let date = parse_date(&date)?;
    let baguettes = state.engine.baguettes(date).await?;
    Ok(Json(views::baguettes(baguettes)))
}

pub async fn save_baguettes(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<BaguettesSave>, ServerError>,
) -> Result<(StatusCode, Json<BaguettesView>), ServerError> {
    let baguettes = state
        .engine
        .save_baguettes(
            &actor,
            payload.record_date,
            payload.start_count,
            payload.end_count,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(views::baguettes(baguettes))))
}

pub async fn earnings(
    State(state): State<ServerState>,
    WithRejection(Path(date), _): WithRejection<Path<String>, ServerError>,
) -> Result<Json<EarningsView>, ServerError> {
    let date = parse_date(&date)?;
    let earnings = state.engine.earnings(date).await?;
    Ok(Json(views::earnings(earnings)))
}

pub async fn save_earnings(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<EarningsSave>, ServerError>,
) -> Result<(StatusCode, Json<EarningsView>), ServerError> {
    let earnings = state
        .engine
        .save_earnings(
            &actor,
            engine::EarningsSave {
                record_date: payload.record_date,
                total_earnings: Money::new(payload.total_earnings_minor),
                notes: payload.notes,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(views::earnings(earnings))))
}

pub async fn summary(
    State(state): State<ServerState>,
    WithRejection(Path(date), _): WithRejection<Path<String>, ServerError>,
) -> Result<Json<DailySummaryView>, ServerError> {
    let date = parse_date(&date)?;
    let summary = state.engine.summarize(date).await?;
    Ok(Json(views::summary(summary)))
}

pub async fn reconcile(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Path(date), _): WithRejection<Path<String>, ServerError>,
) -> Result<Json<EarningsView>, ServerError> {
    let date = parse_date(&date)?;
    let earnings = state.engine.reconcile_for(&actor, date).await?;
    Ok(Json(views::earnings(earnings)))
}

pub async fn repair_pending(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<RepairResponse>, ServerError> {
    let repaired = state.engine.repair_pending_for(&actor).await?;
    let pending = state.engine.pending_dates().await?;
    Ok(Json(RepairResponse { repaired, pending }))
}
