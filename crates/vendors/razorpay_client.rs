use std::time::Duration;

use serde::Serialize;
use tracing::error;

use super::{error::VendorCallError, signature};

const RAZORPAY_API_BASE: &str = "https://api.razorpay.com";
const VENDOR_TIMEOUT_SECS: u64 = 30;

/// Minimal Razorpay client built on reqwest.
pub struct RazorpayClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
}

/// Order creation body. `amount` is already converted to the smallest
/// currency unit (paise).
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderBody {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<serde_json::Value>,
}

impl RazorpayClient {
    pub fn new(key_id: String, key_secret: String) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(VENDOR_TIMEOUT_SECS))
                .build()
                .expect("failed to build http client"),
            key_id,
            key_secret,
        }
    }

    async fn ensure_success(
        resp: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, VendorCallError> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        error!(
            status = %status,
            response_body = %body,
            context = %context,
            "razorpay api request failed"
        );

        Err(VendorCallError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Creates an order and returns the vendor's order object untouched.
    /// https://razorpay.com/docs/api/orders/create
    pub async fn create_order(
        &self,
        body: &CreateOrderBody,
    ) -> Result<serde_json::Value, VendorCallError> {
        let resp = self
            .http
            .post(format!("{}/v1/orders", RAZORPAY_API_BASE))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(body)
            .send()
            .await
            .map_err(VendorCallError::from_reqwest)?;
        let resp = Self::ensure_success(resp, "create order").await?;

        let order: serde_json::Value = resp
            .json()
            .await
            .map_err(|err| VendorCallError::MalformedResponse(err.to_string()))?;
        Ok(order)
    }

    /// https://razorpay.com/docs/api/payments/fetch-with-id
    pub async fn fetch_payment(
        &self,
        payment_id: &str,
    ) -> Result<serde_json::Value, VendorCallError> {
        let resp = self
            .http
            .get(format!("{}/v1/payments/{}", RAZORPAY_API_BASE, payment_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await
            .map_err(VendorCallError::from_reqwest)?;
        let resp = Self::ensure_success(resp, "fetch payment").await?;

        let payment: serde_json::Value = resp
            .json()
            .await
            .map_err(|err| VendorCallError::MalformedResponse(err.to_string()))?;
        Ok(payment)
    }

    /// Recomputes the checkout signature over `"{order_id}|{payment_id}"` and
    /// compares constant-time against the value the client supplied.
    /// https://razorpay.com/docs/payments/payment-gateway/web-integration/standard/build-integration
    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        provided_signature: &str,
    ) -> bool {
        let signed_payload = format!("{}|{}", order_id, payment_id);
        signature::verify_hmac_sha256_hex(
            self.key_secret.as_bytes(),
            signed_payload.as_bytes(),
            provided_signature,
        )
    }
}
