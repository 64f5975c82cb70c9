use crate::error::SocialResult;
use crate::models::{FriendProfile, ProfileUpdate, User};
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn get_user_by_id<'e, E: PgExecutor<'e>>(executor: E, user_id: Uuid) -> SocialResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, nickname, profile_picture, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn get_user_by_username<'e, E: PgExecutor<'e>>(executor: E, username: &str) -> SocialResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, nickname, profile_picture, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(executor)
    .await?;

    Ok(user)
}

pub async fn get_friend_profiles<'e, E: PgExecutor<'e>>(executor: E, ids: &[Uuid]) -> SocialResult<Vec<FriendProfile>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let profiles = sqlx::query_as::<_, FriendProfile>(
        r#"
        SELECT id, username, nickname, profile_picture
        FROM users
        WHERE id = ANY($1)
        ORDER BY username ASC NULLS LAST, id ASC
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await?;

    Ok(profiles)
}

// Fields left as None keep their stored value.
pub async fn update_user<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    update: &ProfileUpdate,
) -> SocialResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET username = COALESCE($2, username),
            nickname = COALESCE($3, nickname),
            profile_picture = COALESCE($4, profile_picture)
        WHERE id = $1
        RETURNING id, username, nickname, profile_picture, created_at
        "#,
    )
    .bind(user_id)
    .bind(update.username.as_deref())
    .bind(update.nickname.as_deref())
    .bind(update.profile_picture.as_deref())
    .fetch_optional(executor)
    .await?;

    Ok(user)
}
