use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::plans;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanEntity {
    pub id: Uuid,
    pub name: String,
    pub amount_minor: i64,
    pub duration_days: i32,
    pub is_active: bool,
}
