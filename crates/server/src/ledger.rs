//! Purchases, sales, expenses and leftovers endpoints.

use api_types::ledger::{
    ExpenseNew, ExpenseView, LeftoversQuery, LeftoversSave, LeftoversView, PeriodQuery,
    PurchaseNew, PurchaseView, SaleBatchView, SaleNew, SaleView,
};
use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use chrono::Local;
use engine::{Actor, Money, Period, SaleItem};

use crate::{ServerError, daily::parse_date, server::ServerState, views};

fn period(query: &PeriodQuery) -> Result<Option<Period>, ServerError> {
    query
        .date
        .as_deref()
        .map(|value| Period::parse(value, Local::now().date_naive()))
        .transpose()
        .map_err(ServerError::from)
}

pub async fn list_purchases(
    State(state): State<ServerState>,
) -> Result<Json<Vec<PurchaseView>>, ServerError> {
    let purchases = state
        .engine
        .list_purchases()
        .await?
        .into_iter()
        .map(views::purchase)
        .collect();
    Ok(Json(purchases))
}

pub async fn create_purchase(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<PurchaseNew>, ServerError>,
) -> Result<(StatusCode, Json<PurchaseView>), ServerError> {
    let purchase = state
        .engine
        .create_purchase(
            &actor,
            engine::PurchaseNew {
                consumable_id: payload.consumable_id,
                quantity: payload.quantity,
                cost: Money::new(payload.cost_minor),
                purchase_date: payload.purchase_date,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(views::purchase(purchase))))
}

pub async fn list_sales(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<PeriodQuery>, ServerError>,
) -> Result<Json<Vec<SaleView>>, ServerError> {
    let sales = state
        .engine
        .list_sales(period(&query)?)
        .await?
        .into_iter()
        .map(views::sale)
        .collect();
    Ok(Json(sales))
}

pub async fn create_sale(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<SaleNew>, ServerError>,
) -> Result<(StatusCode, Json<SaleBatchView>), ServerError> {
    let items: Vec<SaleItem> = payload
        .items
        .iter()
        .map(|item| SaleItem {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();
    let batch = state.engine.create_sale(&actor, &items).await?;
    Ok((StatusCode::CREATED, Json(views::sale_batch(batch))))
}

pub async fn list_expenses(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<PeriodQuery>, ServerError>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(period(&query)?)
        .await?
        .into_iter()
        .map(views::expense)
        .collect();
    Ok(Json(expenses))
}

pub async fn create_expense(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<ExpenseNew>, ServerError>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .create_expense(
            &actor,
            engine::ExpenseNew {
                kind: payload.kind,
                amount: Money::new(payload.amount_minor),
                description: payload.description,
                expense_date: payload.expense_date,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(views::expense(expense))))
}

/// `GET /leftovers?date=YYYY-MM-DD`; the date is required.
pub async fn leftovers(
    State(state): State<ServerState>,
    query: Result<Query<LeftoversQuery>, QueryRejection>,
) -> Result<Json<LeftoversView>, ServerError> {
    let Ok(Query(query)) = query else {
        return Err(ServerError::BadRequest(
            "query parameter 'date' is required".to_string(),
        ));
    };
    let date = parse_date(&query.date)?;
    let leftovers = state.engine.leftovers(date).await?;
    Ok(Json(views::leftovers(leftovers)))
}

pub async fn save_leftovers(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<LeftoversSave>, ServerError>,
) -> Result<(StatusCode, Json<LeftoversView>), ServerError> {
    let leftovers = state
        .engine
        .save_leftovers(
            &actor,
            engine::LeftoversSave {
                record_date: payload.record_date,
                bread_baguettes: payload.bread_baguettes,
                cooked_eggs: payload.cooked_eggs,
                salami_pieces: payload.salami_pieces,
                notes: payload.notes,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(views::leftovers(leftovers))))
}
