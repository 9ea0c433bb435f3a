//! Gateway vocabulary and the pure rules that translate it into payment and
//! field state.

use {
    super::money::MoneyAmount,
    super::payment::{FieldStatus, PaymentMethod, PaymentStatus},
    std::fmt,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Capture,
    Settlement,
    Pending,
    Expire,
    Cancel,
    Deny,
    Failure,
    Unrecognized(String),
}

impl TransactionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "capture" => Self::Capture,
            "settlement" => Self::Settlement,
            "pending" => Self::Pending,
            "expire" => Self::Expire,
            "cancel" => Self::Cancel,
            "deny" => Self::Deny,
            "failure" => Self::Failure,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Capture => "capture",
            Self::Settlement => "settlement",
            Self::Pending => "pending",
            Self::Expire => "expire",
            Self::Cancel => "cancel",
            Self::Deny => "deny",
            Self::Failure => "failure",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FraudStatus {
    Accept,
    Challenge,
    Deny,
    Unrecognized(String),
}

impl FraudStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "accept" => Self::Accept,
            "challenge" => Self::Challenge,
            "deny" => Self::Deny,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Accept => "accept",
            Self::Challenge => "challenge",
            Self::Deny => "deny",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for FraudStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translate a gateway notification into a payment status.
///
/// Captured or settled funds under fraud challenge stay `Pending`. Otherwise a
/// payment short of the slot price is a down payment and anything at or above
/// it is full. Unknown statuses never move a payment towards paid.
pub fn map_status(
    transaction: &TransactionStatus,
    fraud: Option<&FraudStatus>,
    amount_paid: MoneyAmount,
    full_price: MoneyAmount,
) -> PaymentStatus {
    match transaction {
        TransactionStatus::Capture | TransactionStatus::Settlement => {
            if matches!(fraud, Some(FraudStatus::Challenge)) {
                PaymentStatus::Pending
            } else if amount_paid < full_price {
                PaymentStatus::DpPaid
            } else {
                PaymentStatus::Paid
            }
        }
        TransactionStatus::Pending => PaymentStatus::Pending,
        TransactionStatus::Expire
        | TransactionStatus::Cancel
        | TransactionStatus::Deny
        | TransactionStatus::Failure => PaymentStatus::Failed,
        TransactionStatus::Unrecognized(raw) => {
            tracing::warn!(transaction_status = %raw, "unrecognized transaction status, treating as pending");
            PaymentStatus::Pending
        }
    }
}

const CARD_TOKENS: &[&str] = &["credit_card", "credit", "card"];
const WALLET_TOKENS: &[&str] = &[
    "gopay",
    "shopeepay",
    "qris",
    "ovo",
    "dana",
    "linkaja",
    "wallet",
];
const TRANSFER_TOKENS: &[&str] = &[
    "bank_transfer",
    "transfer",
    "echannel",
    "permata",
    "_va",
    "bank",
];

/// Best-effort mapping of the gateway's instrument label (`payment_type`).
pub fn map_payment_method(label: &str) -> PaymentMethod {
    let label = label.to_ascii_lowercase();
    let has = |tokens: &[&str]| tokens.iter().any(|t| label.contains(t));

    if has(CARD_TOKENS) {
        PaymentMethod::CreditCard
    } else if has(WALLET_TOKENS) {
        PaymentMethod::EWallet
    } else if has(TRANSFER_TOKENS) {
        PaymentMethod::Transfer
    } else {
        PaymentMethod::Gateway
    }
}

/// Field status a payment outcome forces, if any. `None` means the stored
/// status must be left as it is.
pub fn field_status_for(new_status: PaymentStatus) -> Option<FieldStatus> {
    match new_status {
        PaymentStatus::Paid | PaymentStatus::DpPaid => Some(FieldStatus::Booked),
        PaymentStatus::Failed => Some(FieldStatus::Available),
        PaymentStatus::Pending | PaymentStatus::Refunded => None,
    }
}

/// Field availability that follows from a payment outcome.
pub fn derive_field_status(new_status: PaymentStatus, current: FieldStatus) -> FieldStatus {
    field_status_for(new_status).unwrap_or(current)
}
