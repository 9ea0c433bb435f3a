use {
    super::MidtransNotification,
    crate::{
        AppState,
        adapters::api_errors::{ApiError, WebhookResponse},
        domain::error::ReconcileError,
    },
    axum::{Json, extract::State, http::HeaderMap},
};

#[tracing::instrument(
    name = "webhook",
    skip_all,
    fields(order_id = tracing::field::Empty, transaction_status = tracing::field::Empty)
)]
pub async fn midtrans_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, ApiError> {
    let payload: MidtransNotification = serde_json::from_str(&body)
        .map_err(|e| ReconcileError::Validation(format!("malformed notification body: {e}")))?;

    tracing::Span::current()
        .record("order_id", tracing::field::display(&payload.order_id))
        .record(
            "transaction_status",
            tracing::field::display(&payload.transaction_status),
        );

    if let Some(server_key) = state.midtrans_server_key.as_deref() {
        payload.verify_signature(server_key)?;
    }

    let notification = payload.into_notification(forwarded_for(&headers));
    let result = state.reconciler.reconcile(&notification).await?;

    Ok(Json(WebhookResponse {
        success: true,
        message: result.message,
        payment_id: Some(result.payment_id.get()),
        status: Some(result.status.as_str().to_string()),
        field_status: Some(result.field_status.as_str().to_string()),
        error: None,
    }))
}

/// First hop of `X-Forwarded-For`, if any.
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
