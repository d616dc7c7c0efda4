use std::collections::HashSet;

use actix_web::{get, post, put, web, HttpResponse};
use chrono::{Datelike as _, Local, NaiveDate, NaiveTime};
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Admin, consts, entity::{leave_request, prelude::*, sea_orm_active_enums::{LeaveType, RequestStatus, RoleType}, user}, error::ApiError, holidays::HolidayCalendar, utils};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(create_request)
        .service(resolve_request)
        .service(list_requests)
        .service(vacation_balance);
}

#[derive(Debug, Serialize, Deserialize)]
struct CreateRequest {
    kind: LeaveType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    /// Set together with `end_time` for hourly requests.
    start_time: Option<String>,
    end_time: Option<String>,
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResolveRequest {
    status: RequestStatus,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct VacationBalance {
    total: u32,
    used: u32,
    pending: u32,
    available: i64,
}

fn parse_request_time(field: &str, value: &Option<String>) -> Result<Option<NaiveTime>, ApiError> {
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => utils::parse_time(value)
            .map(Some)
            .ok_or_else(|| ApiError::Validation(format!("invalid `{field}` time `{value}`, expected HH:MM"))),
    }
}

#[post("")]
async fn create_request(db: web::Data<DatabaseConnection>, employee: user::Model, payload: web::Json<CreateRequest>) -> Result<HttpResponse, ApiError> {
    if payload.end_date < payload.start_date {
        return Err(ApiError::Validation("`end_date` is earlier than `start_date`".to_string()));
    }

    let start_time = parse_request_time("start_time", &payload.start_time)?;
    let end_time = parse_request_time("end_time", &payload.end_time)?;

    let request = LeaveRequest::insert(leave_request::ActiveModel {
        created_by: Set(Some(employee.id)),
        updated_by: Set(Some(employee.id)),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        kind: Set(payload.kind.clone()),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        start_time: Set(start_time),
        end_time: Set(end_time),
        reason: Set(payload.reason.clone()),
        status: Set(RequestStatus::Pending),
        ..Default::default()
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(web::Json(request)))
}

/// Admin approval/rejection. A request is transitioned exactly once and is
/// immutable afterwards.
#[put("/{request_id}")]
async fn resolve_request(db: web::Data<DatabaseConnection>, admin: Admin, request_id: web::Path<Uuid>, payload: web::Json<ResolveRequest>) -> Result<HttpResponse, ApiError> {
    if payload.status == RequestStatus::Pending {
        return Err(ApiError::Validation("status must be `Approved` or `Rejected`".to_string()));
    }

    let request = LeaveRequest::find_by_id(*request_id)
        .one(db.as_ref()).await?
        .ok_or(ApiError::NotFound("leave request"))?;

    if request.status != RequestStatus::Pending {
        return Err(ApiError::Validation("request is already resolved".to_string()));
    }

    let request = LeaveRequest::update(leave_request::ActiveModel {
        id: Unchanged(request.id),
        updated_at: Set(Local::now().fixed_offset()),
        updated_by: Set(Some(admin.id)),
        status: Set(payload.status.clone()),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(web::Json(request)))
}

#[get("")]
async fn list_requests(db: web::Data<DatabaseConnection>, user: user::Model) -> Result<HttpResponse, ApiError> {
    let mut query = LeaveRequest::find().order_by_asc(leave_request::Column::CreatedAt);

    if user.role != RoleType::Admin {
        query = query.filter(leave_request::Column::CreatedBy.eq(user.id));
    }

    Ok(HttpResponse::Ok().json(web::Json(query.all(db.as_ref()).await?)))
}

/// Available vacation days: the fixed allowance minus business days consumed
/// by approved requests and held by pending ones. Weekends and holidays
/// never count against the allowance.
#[get("/vacation")]
async fn vacation_balance(db: web::Data<DatabaseConnection>, holidays: web::Data<HolidayCalendar>, employee: user::Model) -> Result<HttpResponse, ApiError> {
    let requests = LeaveRequest::find()
        .filter(leave_request::Column::CreatedBy.eq(employee.id))
        .filter(leave_request::Column::Kind.eq(LeaveType::Vacation))
        .all(db.as_ref()).await?;

    let mut used = 0;
    let mut pending = 0;

    for request in &requests {
        let mut festive = HashSet::new();
        for year in request.start_date.year()..=request.end_date.year() {
            festive.extend(holidays.holidays_for(year).await.iter().copied());
        }

        let days = utils::business_days_between(request.start_date, request.end_date, &festive);

        match request.status {
            RequestStatus::Pending => pending += days,
            RequestStatus::Approved => used += days,
            RequestStatus::Rejected => {},
        }
    }

    let total = consts::VACATION_ALLOWANCE_DAYS;

    Ok(HttpResponse::Ok().json(web::Json(VacationBalance {
        total,
        used,
        pending,
        available: total as i64 - used as i64 - pending as i64,
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::auth::Authority;

    use super::*;

    fn sample_employee() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            national_id: "12.345.678-5".to_string(),
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            password: Vec::new(),
            role: RoleType::Employee,
            salary: 1_000_000,
            afp: "HABITAT".to_string(),
            health_system: "FONASA".to_string(),
            meal_allowance: 30_000,
            transport_allowance: 30_000,
            join_date: None,
            termination_date: None,
        }
    }

    fn vacation_request(employee: &user::Model, status: RequestStatus, start: NaiveDate, end: NaiveDate) -> leave_request::Model {
        leave_request::Model {
            id: Uuid::new_v4(),
            created_at: Local::now().into(),
            updated_at: Local::now().into(),
            created_by: Some(employee.id),
            updated_by: Some(employee.id),
            kind: LeaveType::Vacation,
            start_date: start,
            end_date: end,
            start_time: None,
            end_time: None,
            reason: "vacaciones".to_string(),
            status,
        }
    }

    #[actix_web::test]
    async fn test_reversed_date_range_is_rejected() {
        let secret = b"secret";

        let db = MockDatabase::new(DatabaseBackend::Postgres);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/requests").service(create_request))
        ).await;

        let token = Authority::new(secret).issue_for(&sample_employee());

        let req = test::TestRequest::post()
            .uri("/requests")
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(CreateRequest {
                kind: LeaveType::Vacation,
                start_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                start_time: None,
                end_time: None,
                reason: String::new(),
            })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_resolving_twice_is_rejected() {
        let secret = b"secret";
        let employee = sample_employee();
        let admin = user::Model { role: RoleType::Admin, ..sample_employee() };

        let approved = vacation_request(
            &employee,
            RequestStatus::Approved,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        );

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ approved.clone() ] ]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .service(web::scope("/requests").service(resolve_request))
        ).await;

        let token = Authority::new(secret).issue_for(&admin);

        let req = test::TestRequest::put()
            .uri(&format!("/requests/{}", approved.id))
            .insert_header(("Authorization", format!("JWT {token}")))
            .set_json(ResolveRequest { status: RequestStatus::Rejected })
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_vacation_balance_excludes_weekends_and_holidays() {
        let secret = b"secret";
        let employee = sample_employee();

        // A full approved week in January and a pending March week holding
        // a holiday on the Wednesday.
        let requests = vec![
            vacation_request(
                &employee,
                RequestStatus::Approved,
                NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            ),
            vacation_request(
                &employee,
                RequestStatus::Pending,
                NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            ),
            vacation_request(
                &employee,
                RequestStatus::Rejected,
                NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(),
                NaiveDate::from_ymd_opt(2025, 2, 7).unwrap(),
            ),
        ];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ requests ]);

        let holidays = HolidayCalendar::preloaded(2025, [NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()]);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Authority::new(secret)))
                .app_data(web::Data::new(db.into_connection()))
                .app_data(web::Data::new(holidays))
                .service(web::scope("/requests").service(vacation_balance))
        ).await;

        let token = Authority::new(secret).issue_for(&employee);

        let req = test::TestRequest::get()
            .uri("/requests/vacation")
            .insert_header(("Authorization", format!("JWT {token}")))
            .to_request();

        let balance: VacationBalance = test::call_and_read_body_json(&app, req).await;
        assert_eq!(balance, VacationBalance { total: 15, used: 5, pending: 4, available: 6 });
    }
}
