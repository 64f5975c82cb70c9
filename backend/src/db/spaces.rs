use crate::error::SocialResult;
use crate::models::SpaceSummary;
use sqlx::PgExecutor;
use uuid::Uuid;

pub async fn get_space_summaries<'e, E: PgExecutor<'e>>(
    executor: E,
    space_ids: &[Uuid],
) -> SocialResult<Vec<SpaceSummary>> {
    if space_ids.is_empty() {
        return Ok(Vec::new());
    }

    let spaces = sqlx::query_as::<_, SpaceSummary>(
        r#"
        SELECT id, name
        FROM spaces
        WHERE id = ANY($1)
        "#,
    )
    .bind(space_ids)
    .fetch_all(executor)
    .await?;

    Ok(spaces)
}
