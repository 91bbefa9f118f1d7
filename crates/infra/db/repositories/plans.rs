use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    domain::{entities::plans::PlanEntity, repositories::plans::PlanRepository},
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::plans},
};

pub struct PlanPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlanPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlanRepository for PlanPostgres {
    async fn find_active_plan_by_id(&self, plan_id: Uuid) -> Result<Option<PlanEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = plans::table
            .filter(plans::id.eq(plan_id))
            .filter(plans::is_active.eq(true))
            .select(PlanEntity::as_select())
            .first::<PlanEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }
}
