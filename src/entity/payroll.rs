use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PayrollStatus;

/// One generated payslip per (employee, month, year). All amounts are whole
/// CLP, rounded line by line when the slip was computed. `Deleted` is a
/// soft-delete marker that filters the record out of every read.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub employee_id: Uuid,
    pub month: i16,
    pub year: i16,
    pub base_salary: i64,
    #[sea_orm(column_type = "Double")]
    pub overtime_hours: f64,
    pub overtime_pay: i64,
    pub gratification: i64,
    pub taxable_income: i64,
    pub non_taxable_income: i64,
    pub afp_amount: i64,
    pub health_amount: i64,
    pub unemployment_insurance_amount: i64,
    pub income_tax: i64,
    pub total_deductions: i64,
    pub net_salary: i64,
    pub status: PayrollStatus,
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
