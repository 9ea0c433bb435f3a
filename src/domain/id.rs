use {
    super::error::ReconcileError,
    derive_more::Display,
    serde::{Deserialize, Serialize},
};

/// Prefix the booking flow puts in front of the payment id when it opens a
/// gateway transaction (`PAY-42`, `PAY-42-RETRY-1690000000000`).
pub const ORDER_ID_PREFIX: &str = "PAY-";

/// Primary key of a `payments` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(i32);

impl PaymentId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i32 {
        self.0
    }

    /// Extract the payment id from a gateway `order_id`.
    ///
    /// `PAY-<id>` and `PAY-<id>-<anything>` yield `<id>`; anything without the
    /// prefix must be a bare integer. Any integer is accepted here; ids with
    /// no matching row surface as not found at lookup.
    pub fn from_order_id(order_id: &str) -> Result<Self, ReconcileError> {
        let order_id = order_id.trim();
        let digits = match order_id.strip_prefix(ORDER_ID_PREFIX) {
            Some(rest) => rest.split('-').next().unwrap_or(""),
            None => order_id,
        };

        digits
            .parse::<i32>()
            .map(Self)
            .map_err(|_| ReconcileError::InvalidPaymentIdentifier(order_id.to_string()))
    }
}

/// Room name the real-time channel uses for one user's private events.
pub fn room_for_user(user_id: i32) -> String {
    format!("user_{user_id}")
}
