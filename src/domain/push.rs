use thiserror::Error;

/// Room that receives every notification, regardless of recipient.
pub const NOTIFICATIONS_ROOM: &str = "notifications";

pub const EVENT_PAYMENT_UPDATE: &str = "payment_update";
pub const EVENT_BOOKING_CONFIRMED: &str = "booking_confirmed";
pub const EVENT_NOTIFICATION: &str = "new_notification";

#[derive(Debug, Error)]
pub enum PushError {
    #[error("push channel closed")]
    Closed,

    #[error("push: {0}")]
    Other(String),
}

/// Real-time delivery to connected clients. Delivery is best-effort.
pub trait PushChannel: Send + Sync {
    fn emit(&self, room: &str, event: &str, payload: serde_json::Value) -> Result<(), PushError>;
}
