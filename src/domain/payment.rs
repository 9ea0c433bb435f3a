use {
    super::error::ReconcileError,
    super::id::PaymentId,
    super::money::MoneyAmount,
    chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc},
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Hour from which a field is billed at its night rate. A booking starting at
/// or after this hour is compared against `price_night`, earlier ones against
/// `price_day`. Fixed here rather than per branch.
pub const NIGHT_RATE_FROM_HOUR: u32 = 18;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    DpPaid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::DpPaid => "dp_paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Paid in full or by down payment: the slot is held for the user.
    pub fn secures_booking(&self) -> bool {
        matches!(self, Self::Paid | Self::DpPaid)
    }

    /// Tail of the user-facing notification sentence.
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Paid => "has been completed successfully",
            Self::DpPaid => "down payment has been received",
            Self::Pending => "is awaiting confirmation",
            Self::Failed => "has failed",
            _ => "status has been updated",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = ReconcileError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "dp_paid" => Ok(Self::DpPaid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(ReconcileError::Validation(format!(
                "unknown payment status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Gateway,
    Cash,
    Transfer,
    CreditCard,
    EWallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Cash => "cash",
            Self::Transfer => "transfer",
            Self::CreditCard => "credit_card",
            Self::EWallet => "e_wallet",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = ReconcileError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "gateway" => Ok(Self::Gateway),
            "cash" => Ok(Self::Cash),
            "transfer" => Ok(Self::Transfer),
            "credit_card" => Ok(Self::CreditCard),
            "e_wallet" => Ok(Self::EWallet),
            other => Err(ReconcileError::Validation(format!(
                "unknown payment method: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldStatus {
    Available,
    Booked,
    Maintenance,
    Closed,
}

impl FieldStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Maintenance => "maintenance",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for FieldStatus {
    type Error = ReconcileError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "available" => Ok(Self::Available),
            "booked" => Ok(Self::Booked),
            "maintenance" => Ok(Self::Maintenance),
            "closed" => Ok(Self::Closed),
            other => Err(ReconcileError::Validation(format!(
                "unknown field status: {other}"
            ))),
        }
    }
}

/// Payment together with the booking, field and user it belongs to.
/// This is everything the reconciliation engine reads.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentContext {
    pub payment: PaymentSnapshot,
    pub booking: BookingSnapshot,
    pub field: FieldSnapshot,
    pub user: UserSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentSnapshot {
    pub id: PaymentId,
    pub booking_id: i32,
    pub user_id: i32,
    pub amount: MoneyAmount,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingSnapshot {
    pub id: i32,
    pub user_id: i32,
    pub field_id: i32,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSnapshot {
    pub id: i32,
    pub name: String,
    pub price_day: MoneyAmount,
    pub price_night: MoneyAmount,
    pub status: FieldStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSnapshot {
    pub id: i32,
    pub name: String,
}

impl PaymentContext {
    /// Price of the booked slot: night rate from `NIGHT_RATE_FROM_HOUR`.
    pub fn full_price(&self) -> MoneyAmount {
        if self.booking.start_time.hour() >= NIGHT_RATE_FROM_HOUR {
            self.field.price_night
        } else {
            self.field.price_day
        }
    }
}
