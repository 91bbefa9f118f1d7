use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::{
    domain::{
        entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        repositories::subscriptions::SubscriptionRepository,
        value_objects::enums::kyc_statuses::KycStatus,
    },
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::subscriptions},
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn create(&self, insert_subscription_entity: InsertSubscriptionEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(subscriptions::table)
            .values(&insert_subscription_entity)
            .returning(subscriptions::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn mark_kyc_initiated(
        &self,
        subscription_id: Uuid,
        vendor_kyc_session_id: &str,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(subscriptions::table)
            .filter(subscriptions::id.eq(subscription_id))
            .set((
                subscriptions::vendor_kyc_session_id.eq(Some(vendor_kyc_session_id)),
                subscriptions::kyc_status.eq(KycStatus::Initiated.to_string()),
                subscriptions::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    async fn find_by_vendor_kyc_session_id(
        &self,
        vendor_kyc_session_id: &str,
    ) -> Result<Option<SubscriptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = subscriptions::table
            .filter(subscriptions::vendor_kyc_session_id.eq(vendor_kyc_session_id))
            .select(SubscriptionEntity::as_select())
            .first::<SubscriptionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn apply_kyc_result(
        &self,
        subscription_id: Uuid,
        kyc_status: KycStatus,
        kyc_details: Option<serde_json::Value>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(subscriptions::table)
            .filter(subscriptions::id.eq(subscription_id))
            .set((
                subscriptions::kyc_status.eq(kyc_status.to_string()),
                subscriptions::kyc_details.eq(kyc_details),
                subscriptions::kyc_completed_at.eq(completed_at),
                subscriptions::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
