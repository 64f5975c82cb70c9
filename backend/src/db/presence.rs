use crate::error::SocialResult;
use crate::models::UserStatus;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn get_statuses<'e, E: PgExecutor<'e>>(executor: E, user_ids: &[Uuid]) -> SocialResult<Vec<UserStatus>> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    let statuses = sqlx::query_as::<_, UserStatus>(
        r#"
        SELECT id, user_id, space_id, created_at
        FROM user_status
        WHERE user_id = ANY($1)
        "#,
    )
    .bind(user_ids)
    .fetch_all(executor)
    .await?;

    Ok(statuses)
}

pub async fn insert_status_if_absent<'e, E: PgExecutor<'e>>(executor: E, user_id: Uuid) -> SocialResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_status (user_id)
        VALUES ($1)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn upsert_status_space<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: Uuid,
    space_id: Uuid,
) -> SocialResult<()> {
    sqlx::query(
        r#"
        INSERT INTO user_status (user_id, space_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO UPDATE SET space_id = EXCLUDED.space_id
        "#,
    )
    .bind(user_id)
    .bind(space_id)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn clear_status_space<'e, E: PgExecutor<'e>>(executor: E, user_id: Uuid) -> SocialResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE user_status
        SET space_id = NULL
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete_status<'e, E: PgExecutor<'e>>(executor: E, user_id: Uuid) -> SocialResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM user_status
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn count_statuses<'e, E: PgExecutor<'e>>(executor: E) -> SocialResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_status")
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// Drops every presence row. Only meaningful while no client is connected.
pub async fn delete_all_statuses<'e, E: PgExecutor<'e>>(executor: E) -> SocialResult<u64> {
    let result = sqlx::query("DELETE FROM user_status")
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
