use {
    crate::domain::{
        audit::{NOTIFICATION_TYPE_PAYMENT, NewActivityLog, NewNotification},
        error::ReconcileError,
        gateway::{
            FraudStatus, TransactionStatus, derive_field_status, field_status_for,
            map_payment_method, map_status,
        },
        id::{PaymentId, room_for_user},
        money::MoneyAmount,
        payment::{FieldStatus, PaymentContext, PaymentMethod, PaymentStatus},
        push::{
            EVENT_BOOKING_CONFIRMED, EVENT_NOTIFICATION, EVENT_PAYMENT_UPDATE, NOTIFICATIONS_ROOM,
            PushChannel,
        },
        store::{Persisted, ReconciliationStore, ReconciliationWrite},
    },
    serde::Serialize,
    std::sync::Arc,
    uuid::Uuid,
};

pub const ACTION_PAYMENT_STATUS_UPDATED: &str = "payment_status_updated";
const NOTIFICATION_TITLE: &str = "Payment Status Update";

/// A gateway callback after transport decoding. Status vocabulary is already
/// typed; identifiers and amounts are still raw and validated by the engine.
#[derive(Debug, Clone)]
pub struct GatewayNotification {
    pub order_id: String,
    pub transaction_status: TransactionStatus,
    pub fraud_status: Option<FraudStatus>,
    pub gross_amount: String,
    pub payment_type: Option<String>,
    pub transaction_id: Option<String>,
    pub source_ip: Option<String>,
}

impl GatewayNotification {
    fn gateway_details(&self) -> serde_json::Value {
        serde_json::json!({
            "transactionStatus": self.transaction_status.as_str(),
            "fraudStatus": self.fraud_status.as_ref().map(|f| f.as_str()),
            "grossAmount": self.gross_amount,
            "paymentType": self.payment_type,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub delivery_id: Uuid,
    pub payment_id: PaymentId,
    pub booking_id: i32,
    pub previous_status: PaymentStatus,
    pub status: PaymentStatus,
    pub field_status: FieldStatus,
    pub payment_method: PaymentMethod,
    pub message: String,
    pub notification_id: i32,
}

/// Applies gateway callbacks to payments, fields and the user's inbox.
///
/// Transports decode their payload into a [`GatewayNotification`] and hand it
/// to [`Reconciler::reconcile`]. The push channel is fixed at construction.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn ReconciliationStore>,
    push: Arc<dyn PushChannel>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ReconciliationStore>, push: Arc<dyn PushChannel>) -> Self {
        Self { store, push }
    }

    #[tracing::instrument(
        name = "reconcile",
        skip_all,
        fields(order_id = %notification.order_id, delivery_id = tracing::field::Empty)
    )]
    pub async fn reconcile(
        &self,
        notification: &GatewayNotification,
    ) -> Result<ReconciliationResult, ReconcileError> {
        let delivery_id = Uuid::now_v7();
        tracing::Span::current().record("delivery_id", tracing::field::display(delivery_id));

        let payment_id = PaymentId::from_order_id(&notification.order_id)?;
        let amount_paid = MoneyAmount::parse_decimal(&notification.gross_amount)?;

        let ctx = self
            .store
            .load_payment(payment_id)
            .await?
            .ok_or(ReconcileError::PaymentNotFound(payment_id))?;

        let status = map_status(
            &notification.transaction_status,
            notification.fraud_status.as_ref(),
            amount_paid,
            ctx.full_price(),
        );
        let method = notification
            .payment_type
            .as_deref()
            .map(map_payment_method)
            .unwrap_or(ctx.payment.method);
        let field_status = derive_field_status(status, ctx.field.status);
        let message = format!("Payment for booking #{} {}", ctx.booking.id, status.phrase());

        let write = ReconciliationWrite {
            payment_id,
            status,
            method,
            transaction_id: notification.transaction_id.clone(),
            field_id: ctx.field.id,
            field_status: field_status_for(status),
            activity: NewActivityLog {
                user_id: ctx.booking.user_id,
                action: ACTION_PAYMENT_STATUS_UPDATED.to_string(),
                details: serde_json::json!({
                    "delivery_id": delivery_id,
                    "booking_id": ctx.booking.id,
                    "payment_id": payment_id,
                    "previous_status": ctx.payment.status.as_str(),
                    "new_status": status.as_str(),
                    "field_status": field_status.as_str(),
                    "transaction_status": notification.transaction_status.as_str(),
                    "fraud_status": notification.fraud_status.as_ref().map(|f| f.as_str()),
                    "gross_amount": notification.gross_amount,
                    "payment_type": notification.payment_type,
                    "transaction_id": notification.transaction_id,
                }),
                ip_address: notification.source_ip.clone(),
            },
            notification: NewNotification {
                user_id: ctx.booking.user_id,
                title: NOTIFICATION_TITLE.to_string(),
                message: message.clone(),
                notification_type: NOTIFICATION_TYPE_PAYMENT.to_string(),
                link_id: payment_id.to_string(),
            },
        };

        let persisted = self.store.apply(&write).await?;

        tracing::info!(
            payment_id = %payment_id,
            booking_id = ctx.booking.id,
            from = %ctx.payment.status,
            to = %status,
            field_status = %field_status,
            "payment reconciled"
        );

        self.publish(&ctx, notification, &write, persisted);

        Ok(ReconciliationResult {
            delivery_id,
            payment_id,
            booking_id: ctx.booking.id,
            previous_status: ctx.payment.status,
            status,
            field_status,
            payment_method: method,
            message,
            notification_id: persisted.notification_id,
        })
    }

    fn publish(
        &self,
        ctx: &PaymentContext,
        notification: &GatewayNotification,
        write: &ReconciliationWrite,
        persisted: Persisted,
    ) {
        let room = room_for_user(ctx.booking.user_id);

        self.emit(
            &room,
            EVENT_PAYMENT_UPDATE,
            serde_json::json!({
                "paymentId": write.payment_id,
                "bookingId": ctx.booking.id,
                "newStatus": write.status.as_str(),
                "message": write.notification.message,
                "details": notification.gateway_details(),
            }),
        );

        if write.status.secures_booking() {
            self.emit(
                &room,
                EVENT_BOOKING_CONFIRMED,
                serde_json::json!({
                    "bookingId": ctx.booking.id,
                    "fieldName": ctx.field.name,
                    "bookingDate": ctx.booking.booking_date,
                    "paymentStatus": write.status.as_str(),
                }),
            );
        }

        self.emit(
            NOTIFICATIONS_ROOM,
            EVENT_NOTIFICATION,
            serde_json::json!({
                "id": persisted.notification_id,
                "userId": write.notification.user_id,
                "title": write.notification.title,
                "message": write.notification.message,
                "type": write.notification.notification_type,
                "linkId": write.notification.link_id,
                "isRead": false,
            }),
        );
    }

    fn emit(&self, room: &str, event: &str, payload: serde_json::Value) {
        if let Err(e) = self.push.emit(room, event, payload) {
            tracing::warn!(room, event, error = %e, "real-time emit failed");
        }
    }
}
