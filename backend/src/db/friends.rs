use crate::error::SocialResult;
use crate::models::{FriendEdge, FriendRequest, IncomingFriendRequest, IncomingFriendRequestRow};
use sqlx::PgExecutor;
use uuid::Uuid;

// Friend request operations
pub async fn get_friend_request<'e, E: PgExecutor<'e>>(
    executor: E,
    requester_id: Uuid,
    target_id: Uuid,
) -> SocialResult<Option<FriendRequest>> {
    let request = sqlx::query_as::<_, FriendRequest>(
        r#"
        SELECT id, user_id, friend_id, created_at
        FROM friend_requests
        WHERE user_id = $1 AND friend_id = $2
        LIMIT 1
        "#,
    )
    .bind(requester_id)
    .bind(target_id)
    .fetch_optional(executor)
    .await?;

    Ok(request)
}

pub async fn create_friend_request<'e, E: PgExecutor<'e>>(
    executor: E,
    requester_id: Uuid,
    target_id: Uuid,
) -> SocialResult<FriendRequest> {
    let request = sqlx::query_as::<_, FriendRequest>(
        r#"
        INSERT INTO friend_requests (user_id, friend_id)
        VALUES ($1, $2)
        RETURNING id, user_id, friend_id, created_at
        "#,
    )
    .bind(requester_id)
    .bind(target_id)
    .fetch_one(executor)
    .await?;

    Ok(request)
}

pub async fn delete_friend_request<'e, E: PgExecutor<'e>>(executor: E, request_id: Uuid) -> SocialResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM friend_requests
        WHERE id = $1
        "#,
    )
    .bind(request_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Deletes a request and hands back the deleted row. At most one caller can
/// observe `Some` for a given id.
pub async fn delete_friend_request_returning<'e, E: PgExecutor<'e>>(
    executor: E,
    request_id: Uuid,
) -> SocialResult<Option<FriendRequest>> {
    let request = sqlx::query_as::<_, FriendRequest>(
        r#"
        DELETE FROM friend_requests
        WHERE id = $1
        RETURNING id, user_id, friend_id, created_at
        "#,
    )
    .bind(request_id)
    .fetch_optional(executor)
    .await?;

    Ok(request)
}

pub async fn get_incoming_friend_requests<'e, E: PgExecutor<'e>>(
    executor: E,
    target_id: Uuid,
) -> SocialResult<Vec<IncomingFriendRequest>> {
    let rows = sqlx::query_as::<_, IncomingFriendRequestRow>(
        r#"
        SELECT
            fr.id,
            u.id AS requester_id,
            u.username AS requester_username,
            u.profile_picture AS requester_profile_picture
        FROM friend_requests fr
        LEFT JOIN users u ON u.id = fr.user_id
        WHERE fr.friend_id = $1
        ORDER BY fr.created_at ASC
        "#,
    )
    .bind(target_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(IncomingFriendRequest::from).collect())
}

// Friend edge operations
pub async fn create_friend_edge<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    friend_id: Uuid,
) -> SocialResult<FriendEdge> {
    let edge = sqlx::query_as::<_, FriendEdge>(
        r#"
        INSERT INTO friends (user_id, friend_id)
        VALUES ($1, $2)
        RETURNING id, user_id, friend_id, created_at
        "#,
    )
    .bind(user_id)
    .bind(friend_id)
    .fetch_one(executor)
    .await?;

    Ok(edge)
}

pub async fn delete_friend_edge<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    friend_id: Uuid,
) -> SocialResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM friends
        WHERE user_id = $1 AND friend_id = $2
        "#,
    )
    .bind(user_id)
    .bind(friend_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn get_friend_edges<'e, E: PgExecutor<'e>>(executor: E, user_id: Uuid) -> SocialResult<Vec<FriendEdge>> {
    let edges = sqlx::query_as::<_, FriendEdge>(
        r#"
        SELECT id, user_id, friend_id, created_at
        FROM friends
        WHERE user_id = $1 OR friend_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(edges)
}

pub async fn check_friendship_exists<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    other_id: Uuid,
) -> SocialResult<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM friends
            WHERE (user_id = $1 AND friend_id = $2)
               OR (user_id = $2 AND friend_id = $1)
        )
        "#,
    )
    .bind(user_id)
    .bind(other_id)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}
