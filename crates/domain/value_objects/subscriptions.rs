use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::InsertSubscriptionEntity,
    value_objects::enums::{kyc_statuses::KycStatus, subscription_statuses::SubscriptionStatus},
};

/// Everything needed to persist a subscription once payment verification has
/// succeeded. New subscriptions always start `active` with KYC `pending`.
#[derive(Debug, Clone)]
pub struct InsertSubscriptionModel {
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub plan_name: String,
    pub amount_minor: i64,
    pub payment_id: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl InsertSubscriptionModel {
    pub fn to_entity(self) -> InsertSubscriptionEntity {
        InsertSubscriptionEntity {
            user_id: self.user_id,
            plan_id: self.plan_id,
            plan_name: self.plan_name,
            status: SubscriptionStatus::Active.to_string(),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            payment_id: self.payment_id,
            amount_minor: self.amount_minor,
            kyc_status: KycStatus::Pending.to_string(),
        }
    }
}
