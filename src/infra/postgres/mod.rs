pub mod audit_repo;
pub mod notification_repo;
pub mod payment_repo;

use {
    crate::domain::{
        id::PaymentId,
        payment::PaymentContext,
        store::{Persisted, ReconciliationStore, ReconciliationWrite, StoreFuture},
    },
    sqlx::PgPool,
};

/// Postgres-backed store: one transaction per applied reconciliation.
#[derive(Clone)]
pub struct PgReconciliationStore {
    pool: PgPool,
}

impl PgReconciliationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ReconciliationStore for PgReconciliationStore {
    fn load_payment(&self, id: PaymentId) -> StoreFuture<'_, Option<PaymentContext>> {
        Box::pin(async move { payment_repo::find_payment_context(&self.pool, id).await })
    }

    fn apply<'a>(&'a self, write: &'a ReconciliationWrite) -> StoreFuture<'a, Persisted> {
        Box::pin(async move { payment_repo::apply_reconciliation(&self.pool, write).await })
    }
}
