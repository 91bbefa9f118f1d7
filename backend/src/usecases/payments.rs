use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use crates::{
    domain::{
        repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
        value_objects::{
            payments::{CreateOrderModel, VerifyPaymentModel},
            subscriptions::InsertSubscriptionModel,
        },
    },
    vendors::{
        error::VendorCallError,
        razorpay_client::{CreateOrderBody, RazorpayClient},
    },
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RazorpayGateway: Send + Sync {
    async fn create_order(&self, body: CreateOrderBody) -> Result<serde_json::Value, VendorCallError>;

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;

    async fn fetch_payment(&self, payment_id: &str) -> Result<serde_json::Value, VendorCallError>;
}

#[async_trait]
impl RazorpayGateway for RazorpayClient {
    async fn create_order(
        &self,
        body: CreateOrderBody,
    ) -> Result<serde_json::Value, VendorCallError> {
        self.create_order(&body).await
    }

    fn verify_payment_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        self.verify_payment_signature(order_id, payment_id, signature)
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<serde_json::Value, VendorCallError> {
        self.fetch_payment(payment_id).await
    }
}

/// Largest accepted order amount in major units. Keeps the paise conversion
/// far away from `i64` saturation; anything above this is a caller mistake,
/// not an order.
const MAX_ORDER_AMOUNT: f64 = 1_000_000_000_000.0;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("amount must be a positive number no greater than {MAX_ORDER_AMOUNT}")]
    InvalidAmount,
    #[error("payment signature verification failed")]
    SignatureMismatch,
    #[error("plan not found")]
    PlanNotFound,
    #[error("payment verified but subscription activation failed, contact support")]
    ActivationFailed(#[source] anyhow::Error),
    #[error("payment vendor request timed out")]
    VendorTimeout,
    #[error("payment vendor unreachable")]
    VendorUnreachable,
    #[error("malformed payment vendor response: {0}")]
    MalformedVendorResponse(String),
    #[error("payment vendor rejected the request: status {0}")]
    Vendor(u16),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::MissingFields(_) | PaymentError::InvalidAmount => StatusCode::BAD_REQUEST,
            PaymentError::SignatureMismatch => StatusCode::UNAUTHORIZED,
            PaymentError::PlanNotFound => StatusCode::NOT_FOUND,
            PaymentError::VendorTimeout => StatusCode::GATEWAY_TIMEOUT,
            PaymentError::VendorUnreachable | PaymentError::MalformedVendorResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            PaymentError::ActivationFailed(_)
            | PaymentError::Vendor(_)
            | PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn from_vendor(err: VendorCallError) -> Self {
        match err {
            VendorCallError::Timeout => PaymentError::VendorTimeout,
            VendorCallError::Unreachable(_) => PaymentError::VendorUnreachable,
            VendorCallError::MalformedResponse(msg) => PaymentError::MalformedVendorResponse(msg),
            VendorCallError::Api { status, .. } => PaymentError::Vendor(status),
            VendorCallError::Other(err) => PaymentError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentError>;

#[derive(Debug)]
pub struct VerifiedPayment {
    pub payment: serde_json::Value,
    pub subscription_id: Uuid,
}

pub struct PaymentUseCase<S, P, G>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    G: RazorpayGateway + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    plan_repo: Arc<P>,
    razorpay: Arc<G>,
}

impl<S, P, G> PaymentUseCase<S, P, G>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
    G: RazorpayGateway + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>, plan_repo: Arc<P>, razorpay: Arc<G>) -> Self {
        Self {
            subscription_repo,
            plan_repo,
            razorpay,
        }
    }

    /// Creates a vendor order and returns it untouched. Nothing is persisted
    /// at this stage; an abandoned checkout leaves no local record.
    pub async fn create_order(&self, model: CreateOrderModel) -> UseCaseResult<serde_json::Value> {
        let amount = model.amount.ok_or_else(|| {
            let err = PaymentError::MissingFields(vec!["amount"]);
            warn!(
                status = err.status_code().as_u16(),
                "payments: create order called without amount"
            );
            err
        })?;

        if !amount.is_finite() || amount <= 0.0 || amount > MAX_ORDER_AMOUNT {
            let err = PaymentError::InvalidAmount;
            warn!(
                amount,
                status = err.status_code().as_u16(),
                "payments: rejected out-of-range order amount"
            );
            return Err(err);
        }

        // Razorpay bills in the smallest currency unit.
        let amount_minor = (amount * 100.0).round() as i64;
        let currency = model.currency.unwrap_or_else(|| "INR".to_string());
        let receipt = model
            .receipt
            .unwrap_or_else(|| format!("rcpt_{}", Utc::now().timestamp_millis()));

        info!(
            amount_minor,
            %currency,
            %receipt,
            "payments: creating vendor order"
        );

        let order = self
            .razorpay
            .create_order(CreateOrderBody {
                amount: amount_minor,
                currency,
                receipt,
                notes: model.notes,
            })
            .await
            .map_err(|err| {
                error!(error = %err, "payments: vendor order creation failed");
                PaymentError::from_vendor(err)
            })?;

        Ok(order)
    }

    /// Verifies the checkout signature, then persists the subscription. The
    /// signature check happens before any repository access.
    pub async fn verify_payment(&self, model: VerifyPaymentModel) -> UseCaseResult<VerifiedPayment> {
        let mut missing = Vec::new();
        if model.razorpay_order_id.is_none() {
            missing.push("razorpay_order_id");
        }
        if model.razorpay_payment_id.is_none() {
            missing.push("razorpay_payment_id");
        }
        if model.razorpay_signature.is_none() {
            missing.push("razorpay_signature");
        }
        if model.user_id.is_none() {
            missing.push("user_id");
        }
        if model.plan_id.is_none() {
            missing.push("plan_id");
        }
        if !missing.is_empty() {
            let err = PaymentError::MissingFields(missing);
            warn!(
                status = err.status_code().as_u16(),
                "payments: verify called with missing fields"
            );
            return Err(err);
        }

        let order_id = model.razorpay_order_id.unwrap_or_default();
        let payment_id = model.razorpay_payment_id.unwrap_or_default();
        let signature = model.razorpay_signature.unwrap_or_default();
        let user_id = model.user_id.unwrap_or_default();
        let plan_id = model.plan_id.unwrap_or_default();

        if !self
            .razorpay
            .verify_payment_signature(&order_id, &payment_id, &signature)
        {
            let err = PaymentError::SignatureMismatch;
            warn!(
                %order_id,
                %payment_id,
                status = err.status_code().as_u16(),
                "payments: signature verification failed"
            );
            return Err(err);
        }

        info!(%order_id, %payment_id, %user_id, "payments: signature verified");

        let plan = self
            .plan_repo
            .find_active_plan_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(
                    %plan_id,
                    db_error = ?err,
                    "payments: failed to load plan after verification"
                );
                PaymentError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = PaymentError::PlanNotFound;
                warn!(
                    %plan_id,
                    status = err.status_code().as_u16(),
                    "payments: verified payment references unknown plan"
                );
                err
            })?;

        let starts_at = Utc::now();
        let ends_at = starts_at
            .checked_add_signed(Duration::days(plan.duration_days.into()))
            .context("failed to compute subscription end date")?;

        let insert_model = InsertSubscriptionModel {
            user_id,
            plan_id,
            plan_name: plan.name.clone(),
            amount_minor: plan.amount_minor,
            payment_id: payment_id.clone(),
            starts_at,
            ends_at,
        };

        // Single point where payment success becomes durable state. If this
        // write fails the vendor has already captured the payment; surface the
        // distinct contact-support error instead of retrying.
        let subscription_id = self
            .subscription_repo
            .create(insert_model.to_entity())
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %plan_id,
                    %payment_id,
                    db_error = ?err,
                    "payments: payment captured but subscription persistence failed"
                );
                PaymentError::ActivationFailed(err)
            })?;

        let payment = match self.razorpay.fetch_payment(&payment_id).await {
            Ok(payment) => payment,
            Err(err) => {
                warn!(
                    %payment_id,
                    error = %err,
                    "payments: post-verification payment fetch failed; responding with payment id only"
                );
                serde_json::json!({ "id": payment_id })
            }
        };

        info!(
            %subscription_id,
            %user_id,
            %plan_id,
            "payments: subscription activated with kyc pending"
        );

        Ok(VerifiedPayment {
            payment,
            subscription_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        entities::plans::PlanEntity,
        repositories::{plans::MockPlanRepository, subscriptions::MockSubscriptionRepository},
        value_objects::enums::{
            kyc_statuses::KycStatus, subscription_statuses::SubscriptionStatus,
        },
    };

    fn plan_fixture(plan_id: Uuid) -> PlanEntity {
        PlanEntity {
            id: plan_id,
            name: "Premium Advisory".to_string(),
            amount_minor: 499900,
            duration_days: 30,
            is_active: true,
        }
    }

    fn verify_model(user_id: Uuid, plan_id: Uuid) -> VerifyPaymentModel {
        VerifyPaymentModel {
            razorpay_order_id: Some("order_ABC".to_string()),
            razorpay_payment_id: Some("pay_XYZ".to_string()),
            razorpay_signature: Some("a".repeat(64)),
            user_id: Some(user_id),
            plan_id: Some(plan_id),
        }
    }

    #[tokio::test]
    async fn create_order_rejects_missing_amount() {
        let usecase = PaymentUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockPlanRepository::new()),
            Arc::new(MockRazorpayGateway::new()),
        );

        let err = usecase
            .create_order(CreateOrderModel {
                amount: None,
                currency: None,
                receipt: None,
                notes: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::MissingFields(ref fields) if fields == &vec!["amount"]));
        assert_eq!(err.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn create_order_rejects_non_positive_amount() {
        let usecase = PaymentUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockPlanRepository::new()),
            Arc::new(MockRazorpayGateway::new()),
        );

        let err = usecase
            .create_order(CreateOrderModel {
                amount: Some(-10.0),
                currency: None,
                receipt: None,
                notes: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::InvalidAmount));
    }

    #[tokio::test]
    async fn create_order_rejects_amount_above_upper_bound() {
        // The gateway has no expectations; saturating inputs must never
        // reach the paise conversion or the vendor.
        let usecase = PaymentUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockPlanRepository::new()),
            Arc::new(MockRazorpayGateway::new()),
        );

        for amount in [MAX_ORDER_AMOUNT * 10.0, 1.0e18, f64::MAX] {
            let err = usecase
                .create_order(CreateOrderModel {
                    amount: Some(amount),
                    currency: None,
                    receipt: None,
                    notes: None,
                })
                .await
                .unwrap_err();

            assert!(matches!(err, PaymentError::InvalidAmount));
            assert_eq!(err.status_code().as_u16(), 400);
        }
    }

    #[tokio::test]
    async fn create_order_converts_to_smallest_unit_and_defaults_receipt() {
        let mut gateway = MockRazorpayGateway::new();
        gateway
            .expect_create_order()
            .withf(|body| {
                body.amount == 49900
                    && body.currency == "INR"
                    && body.receipt.starts_with("rcpt_")
            })
            .times(1)
            .returning(|body| Ok(serde_json::json!({ "id": "order_ABC", "amount": body.amount })));

        let usecase = PaymentUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockPlanRepository::new()),
            Arc::new(gateway),
        );

        let order = usecase
            .create_order(CreateOrderModel {
                amount: Some(499.0),
                currency: None,
                receipt: None,
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(order["id"], "order_ABC");
        assert_eq!(order["amount"], 49900);
    }

    #[tokio::test]
    async fn create_order_maps_vendor_timeout_to_504() {
        let mut gateway = MockRazorpayGateway::new();
        gateway
            .expect_create_order()
            .returning(|_| Err(VendorCallError::Timeout));

        let usecase = PaymentUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockPlanRepository::new()),
            Arc::new(gateway),
        );

        let err = usecase
            .create_order(CreateOrderModel {
                amount: Some(100.0),
                currency: None,
                receipt: None,
                notes: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code().as_u16(), 504);
    }

    #[tokio::test]
    async fn verify_lists_every_missing_field() {
        let usecase = PaymentUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockPlanRepository::new()),
            Arc::new(MockRazorpayGateway::new()),
        );

        let err = usecase
            .verify_payment(VerifyPaymentModel {
                razorpay_order_id: Some("order_ABC".to_string()),
                razorpay_payment_id: None,
                razorpay_signature: None,
                user_id: Some(Uuid::new_v4()),
                plan_id: Some(Uuid::new_v4()),
            })
            .await
            .unwrap_err();

        match err {
            PaymentError::MissingFields(fields) => {
                assert_eq!(fields, vec!["razorpay_payment_id", "razorpay_signature"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn verify_rejects_bad_signature_without_touching_repositories() {
        let mut gateway = MockRazorpayGateway::new();
        gateway
            .expect_verify_payment_signature()
            .times(1)
            .returning(|_, _, _| false);

        // Repository mocks have no expectations; any call would panic.
        let usecase = PaymentUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(MockPlanRepository::new()),
            Arc::new(gateway),
        );

        let err = usecase
            .verify_payment(verify_model(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::SignatureMismatch));
        assert_eq!(err.status_code().as_u16(), 401);
    }

    #[tokio::test]
    async fn verify_creates_active_subscription_with_pending_kyc() {
        let user_id = Uuid::new_v4();
        let plan_id = Uuid::new_v4();
        let subscription_id = Uuid::new_v4();

        let mut gateway = MockRazorpayGateway::new();
        gateway
            .expect_verify_payment_signature()
            .withf(|order_id, payment_id, _| order_id == "order_ABC" && payment_id == "pay_XYZ")
            .returning(|_, _, _| true);
        gateway
            .expect_fetch_payment()
            .returning(|payment_id| Ok(serde_json::json!({ "id": payment_id, "status": "captured" })));

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_active_plan_by_id()
            .returning(move |id| Ok(Some(plan_fixture(id))));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_create()
            .withf(move |entity| {
                entity.user_id == user_id
                    && entity.plan_id == plan_id
                    && entity.payment_id == "pay_XYZ"
                    && entity.status == SubscriptionStatus::Active.to_string()
                    && entity.kyc_status == KycStatus::Pending.to_string()
                    && entity.ends_at - entity.starts_at == Duration::days(30)
            })
            .times(1)
            .returning(move |_| Ok(subscription_id));

        let usecase = PaymentUseCase::new(
            Arc::new(subscription_repo),
            Arc::new(plan_repo),
            Arc::new(gateway),
        );

        let verified = usecase
            .verify_payment(verify_model(user_id, plan_id))
            .await
            .unwrap();

        assert_eq!(verified.subscription_id, subscription_id);
        assert_eq!(verified.payment["status"], "captured");
    }

    #[tokio::test]
    async fn verify_surfaces_activation_failure_distinctly() {
        let mut gateway = MockRazorpayGateway::new();
        gateway
            .expect_verify_payment_signature()
            .returning(|_, _, _| true);

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_active_plan_by_id()
            .returning(move |id| Ok(Some(plan_fixture(id))));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_create()
            .returning(|_| Err(anyhow::anyhow!("connection reset")));

        let usecase = PaymentUseCase::new(
            Arc::new(subscription_repo),
            Arc::new(plan_repo),
            Arc::new(gateway),
        );

        let err = usecase
            .verify_payment(verify_model(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::ActivationFailed(_)));
        assert!(err.to_string().contains("contact support"));
        assert_eq!(err.status_code().as_u16(), 500);
    }

    #[tokio::test]
    async fn verify_succeeds_even_if_post_verification_fetch_fails() {
        let mut gateway = MockRazorpayGateway::new();
        gateway
            .expect_verify_payment_signature()
            .returning(|_, _, _| true);
        gateway
            .expect_fetch_payment()
            .returning(|_| Err(VendorCallError::Timeout));

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_active_plan_by_id()
            .returning(move |id| Ok(Some(plan_fixture(id))));

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_create()
            .returning(|_| Ok(Uuid::new_v4()));

        let usecase = PaymentUseCase::new(
            Arc::new(subscription_repo),
            Arc::new(plan_repo),
            Arc::new(gateway),
        );

        let verified = usecase
            .verify_payment(verify_model(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap();

        assert_eq!(verified.payment["id"], "pay_XYZ");
    }

    #[tokio::test]
    async fn verify_rejects_unknown_plan() {
        let mut gateway = MockRazorpayGateway::new();
        gateway
            .expect_verify_payment_signature()
            .returning(|_, _, _| true);

        let mut plan_repo = MockPlanRepository::new();
        plan_repo
            .expect_find_active_plan_by_id()
            .returning(|_| Ok(None));

        let usecase = PaymentUseCase::new(
            Arc::new(MockSubscriptionRepository::new()),
            Arc::new(plan_repo),
            Arc::new(gateway),
        );

        let err = usecase
            .verify_payment(verify_model(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::PlanNotFound));
        assert_eq!(err.status_code().as_u16(), 404);
    }
}
