//! Authentication and account endpoints.

use api_types::{
    auth::{Credentials, ProfileResponse, ProfileUpdate, TokenResponse},
    user::{UserNew, UserUpdate, UserView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use engine::Actor;

use crate::{ServerError, server::ServerState, views};

pub async fn register(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Credentials>, ServerError>,
) -> Result<(StatusCode, Json<TokenResponse>), ServerError> {
    let user = state
        .engine
        .register(&payload.name, &payload.password)
        .await?;
    let token = state.tokens.issue(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token,
            user: views::user(user),
        }),
    ))
}

pub async fn login(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Credentials>, ServerError>,
) -> Result<Json<TokenResponse>, ServerError> {
    let user = state
        .engine
        .verify_credentials(&payload.name, &payload.password)
        .await?;
    let token = state.tokens.issue(&user)?;
    tracing::info!(id = user.id, name = %user.name, "login");
    Ok(Json(TokenResponse {
        token,
        user: views::user(user),
    }))
}

pub async fn profile(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.profile(actor.id).await?;
    Ok(Json(views::user(user)))
}

/// Tokens carry the name, so a rename answers with a fresh one.
pub async fn update_profile(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<ProfileUpdate>, ServerError>,
) -> Result<Json<ProfileResponse>, ServerError> {
    let user = state
        .engine
        .update_profile(
            &actor,
            engine::ProfileUpdate {
                name: payload.name,
                current_password: payload.current_password,
                new_password: payload.new_password,
            },
        )
        .await?;
    let token = if user.name != actor.name {
        Some(state.tokens.issue(&user)?)
    } else {
        None
    };
    Ok(Json(ProfileResponse {
        user: views::user(user),
        token,
    }))
}

pub async fn list(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<UserView>>, ServerError> {
    let users = state
        .engine
        .list_users(&actor)
        .await?
        .into_iter()
        .map(views::user)
        .collect();
    Ok(Json(users))
}

pub async fn create(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<UserNew>, ServerError>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let user = state
        .engine
        .create_user(
            &actor,
            engine::UserNew {
                name: payload.name,
                password: payload.password,
                role: views::engine_role(payload.role),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(views::user(user))))
}

pub async fn update(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<UserUpdate>, ServerError>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .update_user(
            &actor,
            id,
            engine::UserUpdate {
                name: payload.name,
                role: payload.role.map(views::engine_role),
                new_password: payload.new_password,
            },
        )
        .await?;
    Ok(Json(views::user(user)))
}

pub async fn delete(
    Extension(actor): Extension<Actor>,
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
