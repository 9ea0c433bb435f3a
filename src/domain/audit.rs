use serde::Serialize;

pub const NOTIFICATION_TYPE_PAYMENT: &str = "PAYMENT";

#[derive(Debug, Clone, Serialize)]
pub struct NewActivityLog {
    pub user_id: i32,
    pub action: String,
    pub details: serde_json::Value,
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNotification {
    pub user_id: i32,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub link_id: String,
}
