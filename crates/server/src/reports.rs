use api_types::reports::WeeklySummaryView;
use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;

use crate::{ServerError, daily::parse_date, server::ServerState, views};

/// `GET /reports/weekly/{date}`: the Monday-to-Sunday week containing `date`.
pub async fn weekly(
    State(state): State<ServerState>,
    WithRejection(Path(date), _): WithRejection<Path<String>, ServerError>,
) -> Result<Json<WeeklySummaryView>, ServerError> {
    let anchor = parse_date(&date)?;
    let report = state.engine.weekly_report(anchor).await?;
    Ok(Json(views::weekly(report)))
}
