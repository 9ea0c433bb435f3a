pub mod webhook;

use {
    crate::{
        domain::{
            error::ReconcileError,
            gateway::{FraudStatus, TransactionStatus},
        },
        services::reconciliation::GatewayNotification,
    },
    serde::Deserialize,
    sha2::{Digest, Sha512},
};

/// HTTP notification body as posted by the gateway. Only the fields the
/// reconciliation uses are decoded; the rest is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MidtransNotification {
    pub order_id: String,
    pub transaction_status: String,
    #[serde(default)]
    pub fraud_status: Option<String>,
    pub gross_amount: Amount,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub signature_key: Option<String>,
}

/// `gross_amount` is documented as a string but some sandboxes send a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl Amount {
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

impl MidtransNotification {
    /// `signature_key` must equal `sha512(order_id + status_code + gross_amount + server_key)`.
    pub fn verify_signature(&self, server_key: &str) -> Result<(), ReconcileError> {
        let provided = self
            .signature_key
            .as_deref()
            .ok_or_else(|| ReconcileError::WebhookSignature("missing signature_key".into()))?;
        let status_code = self
            .status_code
            .as_deref()
            .ok_or_else(|| ReconcileError::WebhookSignature("missing status_code".into()))?;

        let expected = signature(
            &self.order_id,
            status_code,
            &self.gross_amount.as_text(),
            server_key,
        );

        if constant_time_eq(expected.as_bytes(), provided.to_ascii_lowercase().as_bytes()) {
            Ok(())
        } else {
            Err(ReconcileError::WebhookSignature(
                "signature_key does not match".into(),
            ))
        }
    }

    pub fn into_notification(self, source_ip: Option<String>) -> GatewayNotification {
        GatewayNotification {
            gross_amount: self.gross_amount.as_text(),
            order_id: self.order_id,
            transaction_status: TransactionStatus::parse(&self.transaction_status),
            fraud_status: self
                .fraud_status
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .map(FraudStatus::parse),
            payment_type: self.payment_type,
            transaction_id: self.transaction_id,
            source_ip,
        }
    }
}

pub fn signature(order_id: &str, status_code: &str, gross_amount: &str, server_key: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
