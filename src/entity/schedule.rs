use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One weekday's shift pair for an employee. `day_of_week` is 0 = Monday
/// through 6 = Sunday; no row for a weekday means no schedule that day.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub employee_id: Uuid,
    pub day_of_week: i16,
    pub shift1_start: Option<Time>,
    pub shift1_end: Option<Time>,
    pub shift2_start: Option<Time>,
    pub shift2_end: Option<Time>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::EmployeeId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
