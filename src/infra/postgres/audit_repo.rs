use {crate::domain::audit::NewActivityLog, crate::domain::error::ReconcileError};

pub async fn insert_activity_log(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    entry: &NewActivityLog,
) -> Result<i32, ReconcileError> {
    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO activity_logs (user_id, action, details, ip_address)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(entry.user_id)
    .bind(&entry.action)
    .bind(&entry.details)
    .bind(entry.ip_address.as_deref())
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}
