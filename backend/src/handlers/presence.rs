use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiResult, AppState};
use crate::{db::SocialStore, models::PresenceState};

#[derive(Debug, Deserialize)]
pub struct JoinSpaceBody {
    pub space_id: Uuid,
}

pub async fn get_presence<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<PresenceState>> {
    Ok(Json(repo.presence_of(user_id).await?))
}

pub async fn connect<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repo.set_online(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn disconnect<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repo.clear_online(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn join_space<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<JoinSpaceBody>,
) -> ApiResult<StatusCode> {
    repo.set_space(user_id, body.space_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn leave_space<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repo.clear_space(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
