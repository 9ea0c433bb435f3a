use {
    super::{audit_repo::insert_activity_log, notification_repo::insert_notification},
    crate::domain::{
        error::ReconcileError,
        id::PaymentId,
        money::MoneyAmount,
        payment::{
            BookingSnapshot, FieldSnapshot, FieldStatus, PaymentContext, PaymentMethod,
            PaymentSnapshot, PaymentStatus, UserSnapshot,
        },
        store::{Persisted, ReconciliationWrite},
    },
    chrono::{DateTime, NaiveDate, NaiveTime, Utc},
    sqlx::PgPool,
};

#[derive(Debug, sqlx::FromRow)]
struct PaymentContextRow {
    payment_id: i32,
    booking_id: i32,
    payment_user_id: i32,
    amount_minor: i64,
    payment_method: String,
    payment_status: String,
    transaction_id: Option<String>,
    payment_created_at: DateTime<Utc>,
    booking_user_id: i32,
    field_id: i32,
    booking_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    field_name: String,
    price_day_minor: i64,
    price_night_minor: i64,
    field_status: String,
    user_id: i32,
    user_name: String,
}

impl TryFrom<PaymentContextRow> for PaymentContext {
    type Error = ReconcileError;

    fn try_from(row: PaymentContextRow) -> Result<Self, Self::Error> {
        Ok(Self {
            payment: PaymentSnapshot {
                id: PaymentId::new(row.payment_id),
                booking_id: row.booking_id,
                user_id: row.payment_user_id,
                amount: MoneyAmount::new(row.amount_minor)?,
                method: PaymentMethod::try_from(row.payment_method.as_str())?,
                status: PaymentStatus::try_from(row.payment_status.as_str())?,
                transaction_id: row.transaction_id,
                created_at: row.payment_created_at,
            },
            booking: BookingSnapshot {
                id: row.booking_id,
                user_id: row.booking_user_id,
                field_id: row.field_id,
                booking_date: row.booking_date,
                start_time: row.start_time,
                end_time: row.end_time,
            },
            field: FieldSnapshot {
                id: row.field_id,
                name: row.field_name,
                price_day: MoneyAmount::new(row.price_day_minor)?,
                price_night: MoneyAmount::new(row.price_night_minor)?,
                status: FieldStatus::try_from(row.field_status.as_str())?,
            },
            user: UserSnapshot {
                id: row.user_id,
                name: row.user_name,
            },
        })
    }
}

pub async fn find_payment_context(
    pool: &PgPool,
    id: PaymentId,
) -> Result<Option<PaymentContext>, ReconcileError> {
    let row = sqlx::query_as::<_, PaymentContextRow>(
        r#"
        SELECT p.id AS payment_id,
               p.booking_id,
               p.user_id AS payment_user_id,
               (p.amount * 100)::BIGINT AS amount_minor,
               p.payment_method,
               p.status AS payment_status,
               p.transaction_id,
               p.created_at AS payment_created_at,
               b.user_id AS booking_user_id,
               b.field_id,
               b.booking_date,
               b.start_time,
               b.end_time,
               f.name AS field_name,
               (f.price_day * 100)::BIGINT AS price_day_minor,
               (f.price_night * 100)::BIGINT AS price_night_minor,
               f.status AS field_status,
               u.id AS user_id,
               u.name AS user_name
        FROM payments p
        JOIN bookings b ON b.id = p.booking_id
        JOIN fields f ON f.id = b.field_id
        JOIN users u ON u.id = b.user_id
        WHERE p.id = $1
        "#,
    )
    .bind(id.get())
    .fetch_optional(pool)
    .await?;

    row.map(PaymentContext::try_from)
        .transpose()
        .map_err(|e| ReconcileError::CorruptRecord(format!("payment {id}: {e}")))
}

/// Apply one reconciliation in a single transaction. The payment row lock
/// serializes deliveries for the same payment; whichever commits last wins.
/// The field row is only written when the outcome forces a status.
pub async fn apply_reconciliation(
    pool: &PgPool,
    write: &ReconciliationWrite,
) -> Result<Persisted, ReconcileError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SET LOCAL lock_timeout = '5s'")
        .execute(&mut *tx)
        .await?;

    let locked = sqlx::query_scalar::<_, i32>("SELECT id FROM payments WHERE id = $1 FOR UPDATE")
        .bind(write.payment_id.get())
        .fetch_optional(&mut *tx)
        .await?;

    if locked.is_none() {
        // Deleted between load and apply. Dropping the transaction rolls back.
        return Err(ReconcileError::PaymentNotFound(write.payment_id));
    }

    sqlx::query(
        r#"
        UPDATE payments
        SET status = $1,
            payment_method = $2,
            transaction_id = COALESCE($3, transaction_id),
            updated_at = now()
        WHERE id = $4
        "#,
    )
    .bind(write.status.as_str())
    .bind(write.method.as_str())
    .bind(write.transaction_id.as_deref())
    .bind(write.payment_id.get())
    .execute(&mut *tx)
    .await?;

    // Pending outcomes never write the field: the value loaded before the
    // lock may already be stale.
    if let Some(field_status) = write.field_status {
        let field = sqlx::query("UPDATE fields SET status = $1 WHERE id = $2")
            .bind(field_status.as_str())
            .bind(write.field_id)
            .execute(&mut *tx)
            .await?;

        if field.rows_affected() == 0 {
            return Err(ReconcileError::Persistence(sqlx::Error::RowNotFound));
        }
    }

    let activity_log_id = insert_activity_log(&mut tx, &write.activity).await?;
    let notification_id = insert_notification(&mut tx, &write.notification).await?;

    tx.commit().await?;

    Ok(Persisted {
        notification_id,
        activity_log_id,
    })
}
