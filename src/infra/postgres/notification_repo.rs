use {crate::domain::audit::NewNotification, crate::domain::error::ReconcileError};

/// Inserted unread.
pub async fn insert_notification(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    notification: &NewNotification,
) -> Result<i32, ReconcileError> {
    let id = sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO notifications (user_id, title, message, type, link_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(notification.user_id)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(&notification.notification_type)
    .bind(&notification.link_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}
