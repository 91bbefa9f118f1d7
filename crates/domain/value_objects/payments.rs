use serde::Deserialize;
use uuid::Uuid;

/// Body of the create-order endpoint. `amount` is in major currency units;
/// the vendor client converts to the smallest unit.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderModel {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub receipt: Option<String>,
    pub notes: Option<serde_json::Value>,
}

/// Body of the payment verification endpoint. The three `razorpay_*` tokens
/// come back from the vendor widget; `user_id`/`plan_id` tie the verified
/// payment to the subscription that gets created.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentModel {
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    pub user_id: Option<Uuid>,
    pub plan_id: Option<Uuid>,
}
