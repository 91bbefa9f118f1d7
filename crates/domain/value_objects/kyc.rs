use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct KycInitModel {
    pub customer_identifier: Option<String>,
    pub customer_name: Option<String>,
    pub reference_id: Option<String>,
    pub notify_customer: Option<bool>,
    pub generate_access_token: Option<bool>,
    pub request_details: Option<String>,
}

/// Raw webhook body shape. Fields are optional so that "absent" can be
/// reported distinctly after the signature has been verified.
#[derive(Debug, Clone, Deserialize)]
pub struct KycWebhookPayload {
    pub reference_id: Option<String>,
    pub status: Option<String>,
    pub kyc_details: Option<serde_json::Value>,
}
