use {
    super::audit::{NewActivityLog, NewNotification},
    super::error::ReconcileError,
    super::id::PaymentId,
    super::payment::{FieldStatus, PaymentContext, PaymentMethod, PaymentStatus},
    std::{future::Future, pin::Pin},
};

/// Every write one reconciliation makes. Applied as a single unit.
#[derive(Debug, Clone)]
pub struct ReconciliationWrite {
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub field_id: i32,
    /// `None` leaves the stored field status untouched.
    pub field_status: Option<FieldStatus>,
    pub activity: NewActivityLog,
    pub notification: NewNotification,
}

/// Ids of the rows appended by a committed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persisted {
    pub notification_id: i32,
    pub activity_log_id: i32,
}

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ReconcileError>> + Send + 'a>>;

pub trait ReconciliationStore: Send + Sync {
    /// Payment joined with its booking, field and user.
    fn load_payment(&self, id: PaymentId) -> StoreFuture<'_, Option<PaymentContext>>;

    /// Commit every part of `write` or none of it.
    fn apply<'a>(&'a self, write: &'a ReconciliationWrite) -> StoreFuture<'a, Persisted>;
}
