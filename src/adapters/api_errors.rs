use {
    crate::domain::error::ReconcileError,
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::Serialize,
};

/// Body returned to the gateway for every webhook delivery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WebhookResponse {
    fn failure(message: &str, error: &ReconcileError) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            payment_id: None,
            status: None,
            field_status: None,
            error: Some(error.to_string()),
        }
    }
}

pub struct ApiError(pub ReconcileError);

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        Self(err)
    }
}

/// Gateway acknowledgment policy: malformed input is 400, an unknown payment
/// is 404, and every failure past that point is acknowledged with 200 and
/// `success: false`. A non-200 makes the gateway redeliver indefinitely.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ReconcileError::InvalidPaymentIdentifier(_) => {
                (StatusCode::BAD_REQUEST, "invalid payment identifier")
            }
            ReconcileError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid notification"),
            ReconcileError::WebhookSignature(_) => {
                (StatusCode::BAD_REQUEST, "invalid webhook signature")
            }
            ReconcileError::PaymentNotFound(_) => (StatusCode::NOT_FOUND, "payment not found"),
            ReconcileError::CorruptRecord(_) | ReconcileError::Persistence(_) => {
                (StatusCode::OK, "notification acknowledged but not applied")
            }
        };

        if self.0.is_rejection() {
            tracing::warn!(error = %self.0, status = status.as_u16(), "webhook rejected");
        } else {
            tracing::error!(error = %self.0, "reconciliation failed, acknowledged to stop redelivery");
        }

        (status, Json(WebhookResponse::failure(message, &self.0))).into_response()
    }
}
