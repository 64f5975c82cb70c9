//! JSON surface over [`SocialRepository`]. No authentication happens here;
//! the acting user is taken from the path.

pub mod friends;
pub mod presence;
pub mod users;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;

use crate::db::SocialStore;
use crate::error::{ErrorKind, SocialError};
use crate::services::SocialRepository;

pub type AppState<S> = Arc<SocialRepository<S>>;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

#[derive(Debug)]
pub struct ApiError(pub SocialError);

impl From<SocialError> for ApiError {
    fn from(e: SocialError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match self.0.kind() {
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "conflict"),
            ErrorKind::Validation => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
            ErrorKind::Storage => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
        };
        // storage detail stays in the logs
        let error = match self.0.kind() {
            ErrorKind::Storage => "Internal storage failure".to_string(),
            _ => self.0.to_string(),
        };
        (status, Json(ErrorBody { error, kind })).into_response()
    }
}

pub fn create_router<S: SocialStore>(repo: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/users/{user_id}", get(users::get_user::<S>).patch(users::update_user::<S>))
        .route(
            "/api/users/{user_id}/friends",
            get(friends::list_friends::<S>).post(friends::add_friend::<S>),
        )
        .route("/api/users/{user_id}/friends/{friend_id}", delete(friends::remove_friend::<S>))
        .route(
            "/api/users/{user_id}/friend-requests",
            get(friends::list_friend_requests::<S>).post(friends::send_friend_request::<S>),
        )
        .route(
            "/api/users/{user_id}/friend-requests/{request_id}/accept",
            post(friends::accept_friend_request::<S>),
        )
        .route("/api/friend-requests/{request_id}", delete(friends::reject_friend_request::<S>))
        .route(
            "/api/users/{user_id}/presence",
            get(presence::get_presence::<S>)
                .put(presence::connect::<S>)
                .delete(presence::disconnect::<S>),
        )
        .route(
            "/api/users/{user_id}/presence/space",
            put(presence::join_space::<S>).delete(presence::leave_space::<S>),
        )
        .with_state(repo)
}

async fn health_check() -> &'static str {
    "OK"
}
