use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::error;

use super::{error::VendorCallError, signature};

const VENDOR_TIMEOUT_SECS: u64 = 30;

/// Digio KYC client. Requests authenticate with HTTP Basic over the client
/// id/secret pair; inbound webhooks are authenticated separately with the
/// shared webhook secret.
pub struct DigioClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    webhook_secret: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KycRequestBody {
    pub customer_identifier: String,
    pub customer_name: String,
    pub reference_id: String,
    pub template_name: String,
    pub notify_customer: bool,
    pub generate_access_token: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_details: Option<String>,
    pub redirect_url: String,
}

/// The two fields the rest of the system needs from a successful initiation:
/// where to send the user, and the vendor session id later echoed in webhooks.
#[derive(Debug, Clone)]
pub struct KycInitiation {
    pub kyc_url: String,
    pub vendor_session_id: String,
}

#[derive(Debug, Deserialize)]
struct KycRequestResponse {
    id: Option<String>,
    url: Option<String>,
}

impl DigioClient {
    pub fn new(
        base_url: String,
        client_id: String,
        client_secret: String,
        webhook_secret: String,
    ) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(VENDOR_TIMEOUT_SECS))
                .build()
                .expect("failed to build http client"),
            base_url,
            client_id,
            client_secret,
            webhook_secret,
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
            "digio api request failed"
        );

        Err(VendorCallError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Creates a KYC verification request. The response must carry both the
    /// redirect `url` and the vendor session `id`; a missing field is a
    /// malformed upstream response, never silently tolerated.
    pub async fn create_kyc_request(
        &self,
        body: &KycRequestBody,
    ) -> Result<KycInitiation, VendorCallError> {
        let resp = self
            .http
            .post(format!(
                "{}/client/kyc/v2/request",
                self.base_url.trim_end_matches('/')
            ))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .json(body)
            .send()
            .await
            .map_err(VendorCallError::from_reqwest)?;
        let resp = Self::ensure_success(resp, "create kyc request").await?;

        let parsed: KycRequestResponse = resp
            .json()
            .await
            .map_err(|err| VendorCallError::MalformedResponse(err.to_string()))?;

        let kyc_url = parsed.url.ok_or_else(|| {
            VendorCallError::MalformedResponse("kyc response is missing `url`".to_string())
        })?;
        let vendor_session_id = parsed.id.ok_or_else(|| {
            VendorCallError::MalformedResponse("kyc response is missing `id`".to_string())
        })?;

        Ok(KycInitiation {
            kyc_url,
            vendor_session_id,
        })
    }

    /// Verifies the webhook signature header: hex HMAC-SHA256 over the raw
    /// request body, keyed by the shared webhook secret.
    pub fn verify_webhook_signature(&self, payload: &[u8], signature_header: &str) -> bool {
        signature::verify_hmac_sha256_hex(
            self.webhook_secret.as_bytes(),
            payload,
            signature_header,
        )
    }
}
