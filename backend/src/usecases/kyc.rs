use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use crates::{
    domain::{
        repositories::subscriptions::SubscriptionRepository,
        value_objects::{
            enums::kyc_statuses::KycStatus,
            kyc::{KycInitModel, KycWebhookPayload},
        },
    },
    vendors::{
        digio_client::{DigioClient, KycInitiation, KycRequestBody},
        error::VendorCallError,
    },
};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const DIGIO_SIGNATURE_HEADER: &str = "x-digio-signature-256";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DigioGateway: Send + Sync {
    async fn create_kyc_request(
        &self,
        body: KycRequestBody,
    ) -> Result<KycInitiation, VendorCallError>;

    fn verify_webhook_signature(&self, raw_body: &[u8], provided_hex: &str) -> bool;
}

#[async_trait]
impl DigioGateway for DigioClient {
    async fn create_kyc_request(
        &self,
        body: KycRequestBody,
    ) -> Result<KycInitiation, VendorCallError> {
        self.create_kyc_request(&body).await
    }

    fn verify_webhook_signature(&self, raw_body: &[u8], provided_hex: &str) -> bool {
        self.verify_webhook_signature(raw_body, provided_hex)
    }
}

#[derive(Debug, Error)]
pub enum KycError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
    #[error("fields must not be blank: {}", .0.join(", "))]
    BlankFields(Vec<&'static str>),
    #[error("reference_id is not a valid subscription id")]
    InvalidReferenceId,
    #[error("webhook signature verification failed")]
    InvalidSignature,
    #[error("malformed webhook payload: {0}")]
    MalformedWebhookPayload(String),
    #[error("unrecognized kyc status in webhook: {0}")]
    UnknownWebhookStatus(String),
    #[error("no subscription matches kyc reference {0}")]
    ReferenceNotFound(String),
    #[error("subscription {0} not found")]
    SubscriptionNotFound(Uuid),
    #[error("malformed kyc vendor response: {0}")]
    MalformedVendorResponse(String),
    #[error("kyc vendor request timed out")]
    VendorTimeout,
    #[error("kyc vendor unreachable")]
    VendorUnreachable,
    #[error("kyc vendor rejected the request: status {0}")]
    Vendor(u16),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl KycError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            KycError::MissingFields(_)
            | KycError::BlankFields(_)
            | KycError::InvalidReferenceId
            | KycError::MalformedWebhookPayload(_)
            | KycError::UnknownWebhookStatus(_) => StatusCode::BAD_REQUEST,
            KycError::InvalidSignature => StatusCode::UNAUTHORIZED,
            KycError::ReferenceNotFound(_) | KycError::SubscriptionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            KycError::VendorTimeout => StatusCode::GATEWAY_TIMEOUT,
            KycError::VendorUnreachable | KycError::MalformedVendorResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
            KycError::Vendor(_) | KycError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn from_vendor(err: VendorCallError) -> Self {
        match err {
            VendorCallError::Timeout => KycError::VendorTimeout,
            VendorCallError::Unreachable(_) => KycError::VendorUnreachable,
            VendorCallError::MalformedResponse(msg) => KycError::MalformedVendorResponse(msg),
            VendorCallError::Api { status, .. } => KycError::Vendor(status),
            VendorCallError::Other(err) => KycError::Internal(err),
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, KycError>;

#[derive(Debug)]
pub struct KycInitiated {
    pub kyc_url: String,
    pub reference_id: Uuid,
}

pub struct KycUseCase<S, D>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    D: DigioGateway + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    digio: Arc<D>,
    template_name: String,
    frontend_base_url: String,
}

impl<S, D> KycUseCase<S, D>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    D: DigioGateway + Send + Sync + 'static,
{
    pub fn new(
        subscription_repo: Arc<S>,
        digio: Arc<D>,
        template_name: String,
        frontend_base_url: String,
    ) -> Self {
        Self {
            subscription_repo,
            digio,
            template_name,
            frontend_base_url,
        }
    }

    /// Starts a vendor KYC session for an existing subscription. The vendor's
    /// own session id is stored as the webhook join key; the subscription id
    /// travels to the vendor as reference_id.
    pub async fn initiate(&self, model: KycInitModel) -> UseCaseResult<KycInitiated> {
        let mut missing = Vec::new();
        if model.customer_identifier.is_none() {
            missing.push("customer_identifier");
        }
        if model.customer_name.is_none() {
            missing.push("customer_name");
        }
        if model.reference_id.is_none() {
            missing.push("reference_id");
        }
        if !missing.is_empty() {
            let err = KycError::MissingFields(missing);
            warn!(
                status = err.status_code().as_u16(),
                "kyc: initiation called with missing fields"
            );
            return Err(err);
        }

        let customer_identifier = model.customer_identifier.unwrap_or_default();
        let customer_name = model.customer_name.unwrap_or_default();
        let reference_id = model.reference_id.unwrap_or_default();

        // A present-but-whitespace field is a different caller mistake than an
        // absent one; report it as such.
        let mut blank = Vec::new();
        if customer_identifier.trim().is_empty() {
            blank.push("customer_identifier");
        }
        if customer_name.trim().is_empty() {
            blank.push("customer_name");
        }
        if reference_id.trim().is_empty() {
            blank.push("reference_id");
        }
        if !blank.is_empty() {
            let err = KycError::BlankFields(blank);
            warn!(
                status = err.status_code().as_u16(),
                "kyc: initiation called with blank fields"
            );
            return Err(err);
        }

        let subscription_id = Uuid::parse_str(reference_id.trim()).map_err(|_| {
            warn!(%reference_id, "kyc: reference_id is not a uuid");
            KycError::InvalidReferenceId
        })?;

        let redirect_url = format!(
            "{}/kyc/callback",
            self.frontend_base_url.trim_end_matches('/')
        );

        let initiation = self
            .digio
            .create_kyc_request(KycRequestBody {
                customer_identifier: customer_identifier.trim().to_string(),
                customer_name: customer_name.trim().to_string(),
                reference_id: subscription_id.to_string(),
                template_name: self.template_name.clone(),
                notify_customer: model.notify_customer.unwrap_or(true),
                generate_access_token: model.generate_access_token.unwrap_or(true),
                request_details: model.request_details,
                redirect_url,
            })
            .await
            .map_err(|err| {
                error!(%subscription_id, error = %err, "kyc: vendor initiation failed");
                KycError::from_vendor(err)
            })?;

        let updated = self
            .subscription_repo
            .mark_kyc_initiated(subscription_id, &initiation.vendor_session_id)
            .await
            .map_err(KycError::Internal)?;

        if updated == 0 {
            // Vendor session exists but no local subscription to attach it to.
            // Do not hand the customer a kyc url that can never reconcile.
            error!(
                %subscription_id,
                vendor_session_id = %initiation.vendor_session_id,
                "kyc: vendor session created for unknown subscription"
            );
            return Err(KycError::SubscriptionNotFound(subscription_id));
        }

        info!(
            %subscription_id,
            vendor_session_id = %initiation.vendor_session_id,
            "kyc: session initiated"
        );

        Ok(KycInitiated {
            kyc_url: initiation.kyc_url,
            reference_id: subscription_id,
        })
    }

    /// Applies a vendor webhook. Order is fixed: authenticate the raw body,
    /// then parse, then locate the subscription, then apply.
    pub async fn handle_webhook(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> UseCaseResult<()> {
        let provided = signature_header.ok_or_else(|| {
            warn!("kyc: webhook arrived without signature header");
            KycError::InvalidSignature
        })?;

        if !self.digio.verify_webhook_signature(raw_body, provided) {
            warn!("kyc: webhook signature verification failed");
            return Err(KycError::InvalidSignature);
        }

        let payload: KycWebhookPayload = serde_json::from_slice(raw_body).map_err(|err| {
            warn!(error = %err, "kyc: authenticated webhook body failed to parse");
            KycError::MalformedWebhookPayload(err.to_string())
        })?;

        let mut missing = Vec::new();
        if payload.reference_id.is_none() {
            missing.push("reference_id");
        }
        if payload.status.is_none() {
            missing.push("status");
        }
        if !missing.is_empty() {
            return Err(KycError::MalformedWebhookPayload(format!(
                "missing fields: {}",
                missing.join(", ")
            )));
        }

        let vendor_session_id = payload.reference_id.unwrap_or_default();
        let vendor_status = payload.status.unwrap_or_default();

        let kyc_status = KycStatus::from_webhook(&vendor_status).ok_or_else(|| {
            warn!(%vendor_status, "kyc: webhook carried unrecognized status");
            KycError::UnknownWebhookStatus(vendor_status.clone())
        })?;

        let subscription = self
            .subscription_repo
            .find_by_vendor_kyc_session_id(&vendor_session_id)
            .await
            .map_err(KycError::Internal)?
            .ok_or_else(|| {
                // Authenticated webhook for a session we never recorded. Worth
                // an operator's attention.
                warn!(
                    %vendor_session_id,
                    "kyc: authenticated webhook references unknown session"
                );
                KycError::ReferenceNotFound(vendor_session_id.clone())
            })?;

        let completed_at = kyc_status.is_terminal().then(Utc::now);

        self.subscription_repo
            .apply_kyc_result(subscription.id, kyc_status, payload.kyc_details, completed_at)
            .await
            .map_err(KycError::Internal)?;

        info!(
            subscription_id = %subscription.id,
            %vendor_session_id,
            kyc_status = %kyc_status,
            "kyc: webhook applied"
        );

        Ok(())
    }
}
