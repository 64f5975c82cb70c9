use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{ApiResult, AppState};
use crate::{
    db::SocialStore,
    models::{FriendRequest, FriendWithStatus, IncomingFriendRequest},
};

#[derive(Debug, Deserialize)]
pub struct UsernameBody {
    pub username: String,
}

pub async fn list_friends<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<FriendWithStatus>>> {
    Ok(Json(repo.list_friends(user_id).await?))
}

pub async fn add_friend<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UsernameBody>,
) -> ApiResult<StatusCode> {
    repo.add_friend(user_id, &body.username).await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove_friend<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path((user_id, friend_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    repo.remove_friendship(user_id, friend_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_friend_requests<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<IncomingFriendRequest>>> {
    Ok(Json(repo.list_incoming_friend_requests(user_id).await?))
}

pub async fn send_friend_request<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UsernameBody>,
) -> ApiResult<(StatusCode, Json<FriendRequest>)> {
    let request = repo.create_friend_request(user_id, &body.username).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn accept_friend_request<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path((user_id, request_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    repo.accept_friend_request(user_id, request_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reject_friend_request<S: SocialStore>(
    State(repo): State<AppState<S>>,
    Path(request_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    repo.reject_friend_request(request_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
