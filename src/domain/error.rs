use {super::id::PaymentId, thiserror::Error};

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("invalid payment identifier: {0}")]
    InvalidPaymentIdentifier(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("payment not found: {0}")]
    PaymentNotFound(PaymentId),

    #[error("webhook signature: {0}")]
    WebhookSignature(String),

    #[error("corrupt record: {0}")]
    CorruptRecord(String),

    #[error("persistence: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl ReconcileError {
    /// Errors raised before the engine has touched any state and that the
    /// gateway should see as a rejection rather than an acknowledgment.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidPaymentIdentifier(_)
                | Self::Validation(_)
                | Self::PaymentNotFound(_)
                | Self::WebhookSignature(_)
        )
    }
}
