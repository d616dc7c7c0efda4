use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, ConnectionTrait as _, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::{setup_user_table_fk, util::{default_table_statement, default_user_table_statement, DefaultColumn}};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager
            .create_type(
                schema.create_enum_from_active_enum::<RoleType>()
            ).await.unwrap();
        manager
            .create_type(
                schema.create_enum_from_active_enum::<LeaveType>()
            ).await.unwrap();
        manager
            .create_type(
                schema.create_enum_from_active_enum::<RequestStatus>()
            ).await.unwrap();
        manager
            .create_type(
                schema.create_enum_from_active_enum::<PayrollStatus>()
            ).await.unwrap();

        manager
            .create_table(default_table_statement()
                .table(User::Table)
                .col(ColumnDef::new(User::NationalId)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(User::Name)
                    .text()
                    .not_null())
                .col(ColumnDef::new(User::Email)
                    .text()
                    .unique_key()
                    .not_null())
                .col(ColumnDef::new(User::Password)
                    .binary()
                    .not_null()) // Password should be in a hashed format
                .col(ColumnDef::new(User::Role)
                    .custom(RoleType::name())
                    .not_null())
                .col(ColumnDef::new(User::Salary)
                    .big_integer()
                    .not_null()) // Whole CLP; PostgreSQL has no unsigned integers
                .col(ColumnDef::new(User::Afp)
                    .text()
                    .not_null())
                .col(ColumnDef::new(User::HealthSystem)
                    .text()
                    .not_null())
                .col(ColumnDef::new(User::MealAllowance)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(User::TransportAllowance)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(User::JoinDate)
                    .date())
                .col(ColumnDef::new(User::TerminationDate)
                    .date())
                .take()
            ).await.unwrap();

        manager
            .create_table(default_user_table_statement()
                .table(Schedule::Table)
                .col(ColumnDef::new(Schedule::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Schedule::DayOfWeek)
                    .small_integer()
                    .not_null())
                .col(ColumnDef::new(Schedule::Shift1Start)
                    .time())
                .col(ColumnDef::new(Schedule::Shift1End)
                    .time())
                .col(ColumnDef::new(Schedule::Shift2Start)
                    .time())
                .col(ColumnDef::new(Schedule::Shift2End)
                    .time())
                .take()
        ).await.unwrap();
        setup_user_table_fk!(manager, Schedule::Table);

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Schedule::Table, Schedule::EmployeeId)
            .to(User::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        // One schedule row per employee per weekday
        manager.create_index(IndexCreateStatement::new()
            .name("idx-schedule-employee-weekday")
            .table(Schedule::Table)
            .col(Schedule::EmployeeId)
            .col(Schedule::DayOfWeek)
            .unique()
            .take()
        ).await.unwrap();

        manager
            .create_table(default_user_table_statement()
                .table(Attendance::Table)
                .col(ColumnDef::new(Attendance::Date)
                    .date()
                    .not_null())
                .col(ColumnDef::new(Attendance::CheckIn)
                    .time()
                    .not_null())
                .col(ColumnDef::new(Attendance::CheckOut)
                    .time())
                .col(ColumnDef::new(Attendance::Status)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Attendance::Observation)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Attendance::BalanceMinutes)
                    .integer()
                    .not_null())
                .take()
        ).await.unwrap();
        setup_user_table_fk!(manager, Attendance::Table);

        // At most one open record per employee per day, enforced by the
        // store so concurrent check-ins cannot both land
        manager.get_connection().execute_unprepared(
            r#"CREATE UNIQUE INDEX "idx-attendance-open" ON "attendance" ("created_by", "date") WHERE "check_out" IS NULL"#
        ).await.unwrap();

        manager
            .create_table(default_user_table_statement()
                .table(LeaveRequest::Table)
                .col(ColumnDef::new(LeaveRequest::Kind)
                    .custom(LeaveType::name())
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::StartDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::EndDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::StartTime)
                    .time())
                .col(ColumnDef::new(LeaveRequest::EndTime)
                    .time())
                .col(ColumnDef::new(LeaveRequest::Reason)
                    .text()
                    .not_null())
                .col(ColumnDef::new(LeaveRequest::Status)
                    .custom(RequestStatus::name())
                    .not_null())
                .take()
        ).await.unwrap();
        setup_user_table_fk!(manager, LeaveRequest::Table);

        manager
            .create_table(default_user_table_statement()
                .table(Payroll::Table)
                .col(ColumnDef::new(Payroll::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payroll::Month)
                    .small_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::Year)
                    .small_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::BaseSalary)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::OvertimeHours)
                    .double()
                    .not_null())
                .col(ColumnDef::new(Payroll::OvertimePay)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::Gratification)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::TaxableIncome)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::NonTaxableIncome)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::AfpAmount)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::HealthAmount)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::UnemploymentInsuranceAmount)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::IncomeTax)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::TotalDeductions)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::NetSalary)
                    .big_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::Status)
                    .custom(PayrollStatus::name())
                    .not_null())
                .take()
        ).await.unwrap();
        setup_user_table_fk!(manager, Payroll::Table);

        manager.create_foreign_key(ForeignKeyCreateStatement::new()
            .from(Payroll::Table, Payroll::EmployeeId)
            .to(User::Table, DefaultColumn::Id)
            .take()
        ).await.unwrap();

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(
            TableDropStatement::new()
                .table(Payroll::Table)
                .take()
        ).await.unwrap();

        manager.drop_table(
            TableDropStatement::new()
                .table(LeaveRequest::Table)
                .take()
        ).await.unwrap();

        manager.drop_table(
            TableDropStatement::new()
                .table(Attendance::Table)
                .take()
        ).await.unwrap();

        manager.drop_table(
            TableDropStatement::new()
                .table(Schedule::Table)
                .take()
        ).await.unwrap();

        manager.drop_table(
            TableDropStatement::new()
                .table(User::Table)
                .take()
        ).await.unwrap();

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(PayrollStatus::name())
                    .to_owned()
            ).await.unwrap();
        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(RequestStatus::name())
                    .to_owned()
            ).await.unwrap();
        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(LeaveType::name())
                    .to_owned()
            ).await.unwrap();
        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(RoleType::name())
                    .to_owned()
            ).await.unwrap();

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum User {
    Table,
    NationalId,
    Name,
    Email,
    Password,
    Role,
    Salary,
    Afp,
    HealthSystem,
    MealAllowance,
    TransportAllowance,
    JoinDate,
    TerminationDate,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "role_type")]
enum RoleType {
    #[sea_orm(string_value = "employee")]
    Employee,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "leave_type")]
enum LeaveType {
    #[sea_orm(string_value = "vacation")]
    Vacation,
    #[sea_orm(string_value = "sick_leave")]
    SickLeave,
    #[sea_orm(string_value = "personal")]
    Personal,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "request_status")]
enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payroll_status")]
enum PayrollStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

#[derive(Iden)]
enum Schedule {
    Table,
    EmployeeId,
    DayOfWeek,
    Shift1Start,
    Shift1End,
    Shift2Start,
    Shift2End,
}

#[derive(Iden)]
enum Attendance {
    Table,
    Date,
    CheckIn,
    CheckOut,
    Status,
    Observation,
    BalanceMinutes,
}

#[derive(Iden)]
enum LeaveRequest {
    Table,
    Kind,
    StartDate,
    EndDate,
    StartTime,
    EndTime,
    Reason,
    Status,
}

#[derive(Iden)]
enum Payroll {
    Table,
    EmployeeId,
    Month,
    Year,
    BaseSalary,
    OvertimeHours,
    OvertimePay,
    Gratification,
    TaxableIncome,
    NonTaxableIncome,
    AfpAmount,
    HealthAmount,
    UnemploymentInsuranceAmount,
    IncomeTax,
    TotalDeductions,
    NetSalary,
    Status,
}
