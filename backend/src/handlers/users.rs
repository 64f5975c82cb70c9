use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use super::{ApiResult, AppState};
use crate::{db::SocialStore, models::{ProfileUpdate, User}};

pub async fn get_user<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    Ok(Json(repo.find_user(user_id).await?))
}

pub async fn update_user<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<User>> {
    Ok(Json(repo.update_profile(user_id, update).await?))
}
