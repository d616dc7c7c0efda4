use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Local;
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{auth::Admin, entity::{attendance, payroll, prelude::*, sea_orm_active_enums::{PayrollStatus, RoleType}, user}, error::ApiError, holidays::HolidayCalendar, utils};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(generate_payroll)
        .service(list_payroll)
        .service(set_payroll_status)
        .service(delete_payroll);
}

#[derive(Debug, Serialize, Deserialize)]
struct GeneratePayroll {
    employee_id: Uuid,
    month: u32,
    year: i32,
}

#[derive(Debug, Serialize, Deserialize)]
struct SetPayrollStatus {
    status: PayrollStatus,
}

#[derive(Debug, Serialize, Deserialize)]
struct PayrollQuery {
    month: Option<i16>,
    year: Option<i16>,
}

/// Computes and persists one payslip for (employee, month, year) in Pending
/// status. Present days are the month's attendance rows.
#[post("")]
async fn generate_payroll(
    db: web::Data<DatabaseConnection>,
    holidays: web::Data<HolidayCalendar>,
    admin: Admin,
    payload: web::Json<GeneratePayroll>,
) -> Result<HttpResponse, ApiError> {
    if !(1..=12).contains(&payload.month) {
        return Err(ApiError::Validation(format!("`month` must be 1 through 12, got {}", payload.month)));
    }

    let Some(employee) = User::find_by_id(payload.employee_id).one(db.as_ref()).await? else {
        return Err(ApiError::EmployeeNotFound);
    };

    let (first_day, last_day) = utils::month_bounds(payload.year, payload.month);

    let present_days = Attendance::find()
        .filter(attendance::Column::CreatedBy.eq(employee.id))
        .filter(attendance::Column::Date.between(first_day, last_day))
        .all(db.as_ref()).await?
        .len() as u64;

    let business_days = holidays.business_days_in_month(payload.month, payload.year).await;
    info!(
        "generating payroll for {} {}/{}: {present_days} attendance records over {business_days} business days",
        employee.national_id, payload.month, payload.year,
    );

    let breakdown = crate::payroll::compute_payroll(&employee, present_days);

    let record = Payroll::insert(payroll::ActiveModel {
        created_by: Set(Some(admin.id)),
        updated_by: Set(Some(admin.id)),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        employee_id: Set(employee.id),
        month: Set(payload.month as i16),
        year: Set(payload.year as i16),
        base_salary: Set(employee.salary),
        overtime_hours: Set(breakdown.overtime_hours),
        overtime_pay: Set(breakdown.overtime_pay),
        gratification: Set(breakdown.gratification),
        taxable_income: Set(breakdown.taxable_income),
        non_taxable_income: Set(breakdown.non_taxable_income),
        afp_amount: Set(breakdown.afp_amount),
        health_amount: Set(breakdown.health_amount),
        unemployment_insurance_amount: Set(breakdown.unemployment_insurance_amount),
        income_tax: Set(breakdown.income_tax),
        total_deductions: Set(breakdown.total_deductions),
        net_salary: Set(breakdown.net_salary),
        status: Set(PayrollStatus::Pending),
        ..Default::default()
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(web::Json(record)))
}

#[get("")]
async fn list_payroll(db: web::Data<DatabaseConnection>, user: user::Model, query: web::Query<PayrollQuery>) -> Result<HttpResponse, ApiError> {
    let mut select = Payroll::find()
        .filter(payroll::Column::Status.ne(PayrollStatus::Deleted))
        .order_by_asc(payroll::Column::CreatedAt);

    if user.role != RoleType::Admin {
        select = select.filter(payroll::Column::EmployeeId.eq(user.id));
    }

    if let Some(month) = query.month {
        select = select.filter(payroll::Column::Month.eq(month));
    }

    if let Some(year) = query.year {
        select = select.filter(payroll::Column::Year.eq(year));
    }

    Ok(HttpResponse::Ok().json(web::Json(select.all(db.as_ref()).await?)))
}

/// Pending → Approved | Rejected, no recomputation.
#[put("/{payroll_id}")]
async fn set_payroll_status(db: web::Data<DatabaseConnection>, admin: Admin, payroll_id: web::Path<Uuid>, payload: web::Json<SetPayrollStatus>) -> Result<HttpResponse, ApiError> {
    if !matches!(payload.status, PayrollStatus::Approved | PayrollStatus::Rejected) {
        return Err(ApiError::Validation("status must be `Approved` or `Rejected`".to_string()));
    }

    let record = Payroll::find_by_id(*payroll_id)
        .one(db.as_ref()).await?
        .filter(|record| record.status != PayrollStatus::Deleted)
        .ok_or(ApiError::NotFound("payroll record"))?;

    if record.status != PayrollStatus::Pending {
        return Err(ApiError::Validation("payroll record is already resolved".to_string()));
    }

    let record = Payroll::update(payroll::ActiveModel {
        id: Unchanged(record.id),
        updated_at: Set(Local::now().fixed_offset()),
        updated_by: Set(Some(admin.id)),
        status: Set(payload.status.clone()),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(web::Json(record)))
}

/// Soft delete: the record stays in the store but disappears from reads.
#[delete("/{payroll_id}")]
async fn delete_payroll(db: web::Data<DatabaseConnection>, admin: Admin, payroll_id: web::Path<Uuid>) -> Result<HttpResponse, ApiError> {
    let record = Payroll::find_by_id(*payroll_id)
        .one(db.as_ref()).await?
        .filter(|record| record.status != PayrollStatus::Deleted)
        .ok_or(ApiError::NotFound("payroll record"))?;

    let record = Payroll::update(payroll::ActiveModel {
        id: Unchanged(record.id),
        updated_at: Set(Local::now().fixed_offset()),
        updated_by: Set(Some(admin.id)),
        status: Set(PayrollStatus::Deleted),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(web::Json(record)))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::{NaiveDate, NaiveTime};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::{auth::Authority, consts, error::ErrorBody};

    use super::*;

    fn sample_user(role: RoleType, salary: i64) -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            national_id: "12.345.678-5".to_string(),
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            password: Vec::new(),
            role,
            salary,
            afp: "PLAN VITAL".to_string(),
            health_system: "FONASA".to_string(),
            meal_allowance: 30_000,
            transport_allowance: 30_000,
            join_date: None,
            termination_date: None,
        }
    }

    fn attended_day(employee: &user::Model, date: NaiveDate) -> attendance::Model {
        attendance::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            created_by: Some(employee.id),
            updated_by: Some(employee.id),
            date,
            check_in: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            check_out: Some(NaiveTime::from_hms_opt(18, 0, 0).unwrap()),
            status: consts::STATUS_PRESENT.to_string(),
            observation: String::new(),
            balance_minutes: 0,
        }
    }

    fn sample_payroll(admin: &user::Model, employee: &user::Model) -> payroll::Model {
        payroll::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            created_by: Some(admin.id),
            updated_by: Some(admin.id),
            employee_id: employee.id,
            month: 6,
            year: 2024,
            base_salary: employee.salary,
            overtime_hours: 1.0,
            overtime_pay: 3_298,
            gratification: 87_943,
            taxable_income: 443_012,
            non_taxable_income: 60_000,
            afp_amount: 49_440,
            health_amount: 31_011,
            unemployment_insurance_amount: 2_658,
            income_tax: 0,
            total_deductions: 83_109,
            net_salary: 419_903,
            status: PayrollStatus::Pending,
        }
    }

    #[actix_web::test]
    async fn test_generate_for_unknown_employee() {
        let secret = b"secret";
        let admin = sample_user(RoleType::Admin, 0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ Vec::<user::Model>::new() ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .app_data(web::Data::new(HolidayCalendar::preloaded(2024, [])))
                .service(web::scope("/payroll").service(generate_payroll))
        ).await;

        let token = Authority::new(secret).issue_for(&admin);

        let req = test::TestRequest::post()
            .uri("/payroll")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(GeneratePayroll { employee_id: Uuid::new_v4(), month: 6, year: 2024 })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: ErrorBody = test::read_body_json(response).await;
        assert_eq!(body.error, "EMPLOYEE_NOT_FOUND");
    }

    #[actix_web::test]
    async fn test_generate_persists_a_pending_record() {
        let secret = b"secret";
        let admin = sample_user(RoleType::Admin, 0);
        let employee = sample_user(RoleType::Employee, 351_771);

        let attendance_rows = vec![
            attended_day(&employee, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()),
            attended_day(&employee, NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()),
        ];
        let inserted = sample_payroll(&admin, &employee);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ employee.clone() ] ])
            .append_query_results([ attendance_rows ])
            .append_query_results([ vec![ inserted.clone() ] ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .app_data(web::Data::new(HolidayCalendar::preloaded(2024, [])))
                .service(web::scope("/payroll").service(generate_payroll))
        ).await;

        let token = Authority::new(secret).issue_for(&admin);

        let req = test::TestRequest::post()
            .uri("/payroll")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(GeneratePayroll { employee_id: employee.id, month: 6, year: 2024 })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let returned: payroll::Model = test::read_body_json(response).await;
        assert_eq!(returned, inserted);
        assert_eq!(returned.status, PayrollStatus::Pending);
    }

    #[actix_web::test]
    async fn test_month_out_of_range_is_rejected() {
        let secret = b"secret";
        let admin = sample_user(RoleType::Admin, 0);

        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .app_data(web::Data::new(HolidayCalendar::preloaded(2024, [])))
                .service(web::scope("/payroll").service(generate_payroll))
        ).await;

        let token = Authority::new(secret).issue_for(&admin);

        let req = test::TestRequest::post()
            .uri("/payroll")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(GeneratePayroll { employee_id: Uuid::new_v4(), month: 13, year: 2024 })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_status_transition_is_one_shot() {
        let secret = b"secret";
        let admin = sample_user(RoleType::Admin, 0);
        let employee = sample_user(RoleType::Employee, 351_771);

        let approved = payroll::Model {
            status: PayrollStatus::Approved,
            ..sample_payroll(&admin, &employee)
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ approved.clone() ] ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").service(set_payroll_status))
        ).await;

        let token = Authority::new(secret).issue_for(&admin);

        let req = test::TestRequest::put()
            .uri(&format!("/payroll/{}", approved.id))
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(SetPayrollStatus { status: PayrollStatus::Rejected })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_deleting_a_missing_record() {
        let secret = b"secret";
        let admin = sample_user(RoleType::Admin, 0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ Vec::<payroll::Model>::new() ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/payroll").service(delete_payroll))
        ).await;

        let token = Authority::new(secret).issue_for(&admin);

        let req = test::TestRequest::delete()
            .uri(&format!("/payroll/{}", Uuid::new_v4()))
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
