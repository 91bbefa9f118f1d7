use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
    value_objects::enums::kyc_statuses::KycStatus,
};

#[automock]
#[async_trait]
pub trait SubscriptionRepository {
    async fn create(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<Uuid>;

    /// Stamps the vendor session id and moves `kyc_status` to `initiated`.
    /// Returns the number of rows updated; zero means the reference id did not
    /// match any subscription.
    async fn mark_kyc_initiated(
        &self,
        subscription_id: Uuid,
        vendor_kyc_session_id: &str,
    ) -> Result<usize>;

    /// Webhook join: the vendor echoes back the session id it issued at
    /// initiation, not our subscription id.
    async fn find_by_vendor_kyc_session_id(
        &self,
        vendor_kyc_session_id: &str,
    ) -> Result<Option<SubscriptionEntity>>;

    async fn apply_kyc_result(
        &self,
        subscription_id: Uuid,
        kyc_status: KycStatus,
        kyc_details: Option<serde_json::Value>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<()>;
}
