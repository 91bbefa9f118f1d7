use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        repositories::subscription_expiry::SubscriptionExpiryRepository,
        value_objects::enums::subscription_statuses::SubscriptionStatus,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::subscriptions},
};

pub struct SubscriptionExpiryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionExpiryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionExpiryRepository for SubscriptionExpiryPostgres {
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Uuid>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let expired_ids = update(subscriptions::table)
            .filter(subscriptions::status.eq(SubscriptionStatus::Active.to_string()))
            .filter(subscriptions::ends_at.lt(now))
            .set((
                subscriptions::status.eq(SubscriptionStatus::Expired.to_string()),
                subscriptions::updated_at.eq(Utc::now()),
            ))
            .returning(subscriptions::id)
            .get_results::<Uuid>(&mut conn)?;

        Ok(expired_ids)
    }
}
