use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

#[automock]
#[async_trait]
pub trait SubscriptionExpiryRepository {
    /// Transitions every `active` subscription whose `ends_at` is strictly
    /// before `now` to `expired` in one batched write, returning the affected
    /// ids. Re-running once caught up affects nothing.
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>>;
}
