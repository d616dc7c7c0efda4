use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RoleType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    #[sea_orm(unique)]
    pub national_id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: Vec<u8>,
    pub role: RoleType,
    pub salary: i64,
    pub afp: String,
    pub health_system: String,
    pub meal_allowance: i64,
    pub transport_allowance: i64,
    pub join_date: Option<Date>,
    pub termination_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
