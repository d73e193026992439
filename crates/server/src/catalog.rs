//! Consumables and products endpoints.

use api_types::catalog::{
    ConsumableNew, ConsumableUpdate, ConsumableView, ProductNew, ProductUpdate, ProductView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::{Actor, Money};

use crate::{ServerError, server::ServerState, views};

pub async fn list_consumables(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ConsumableView>>, ServerError> {
    let consumables = state
        .engine
        .list_consumables()
        .await?
        .into_iter()
        .map(views::consumable)
        .collect();
    Ok(Json(consumables))
}

pub async fn create_consumable(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<ConsumableNew>, ServerError>,
) -> Result<(StatusCode, Json<ConsumableView>), ServerError> {
    let consumable = state
        .engine
        .create_consumable(
            &actor,
            engine::ConsumableNew {
                name: payload.name,
                price: Money::new(payload.price_minor),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(views::consumable(consumable))))
}

pub async fn update_consumable(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<ConsumableUpdate>, ServerError>,
) -> Result<Json<ConsumableView>, ServerError> {
    let consumable = state
        .engine
        .update_consumable(
            &actor,
            id,
            engine::ConsumableUpdate {
                name: payload.name,
                price: payload.price_minor.map(Money::new),
            },
        )
        .await?;
    Ok(Json(views::consumable(consumable)))
}

pub async fn delete_consumable(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_consumable(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_products(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ProductView>>, ServerError> {
    let products = state
        .engine
        .list_products()
        .await?
        .into_iter()
        .map(views::product)
        .collect();
    Ok(Json(products))
}

pub async fn create_product(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<ProductNew>, ServerError>,
) -> Result<(StatusCode, Json<ProductView>), ServerError> {
    let product = state
        .engine
        .create_product(
            &actor,
            engine::ProductNew {
                name: payload.name,
                category: payload.category,
                price: Money::new(payload.price_minor),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(views::product(product))))
}

pub async fn update_product(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<ProductUpdate>, ServerError>,
) -> Result<Json<ProductView>, ServerError> {
    let product = state
        .engine
        .update_product(
            &actor,
            id,
            engine::ProductUpdate {
                name: payload.name,
                category: payload.category,
                price: payload.price_minor.map(Money::new),
            },
        )
        .await?;
    Ok(Json(views::product(product)))
}

pub async fn delete_product(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_product(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
