use actix_web::{get, post, put, web, HttpResponse};
use chrono::{Datelike as _, Local, NaiveDate, Utc};
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Admin, consts, entity::{attendance, prelude::*, schedule, sea_orm_active_enums::RoleType, user}, error::ApiError, holidays::HolidayCalendar, shift::{self, DaySchedule}, utils};

use model::*;

mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(check_in)
        .service(check_out)
        .service(override_attendance)
        .service(attendance_history);
}

/// The latest open record (no check-out yet) for an employee on a date.
async fn find_open_record(
    db: &DatabaseConnection,
    employee_id: Uuid,
    date: NaiveDate,
) -> Result<Option<attendance::Model>, ApiError> {
    let record = Attendance::find()
        .filter(attendance::Column::CreatedBy.eq(employee_id))
        .filter(attendance::Column::Date.eq(date))
        .filter(attendance::Column::CheckOut.is_null())
        .order_by_desc(attendance::Column::CreatedAt)
        .one(db).await?;

    Ok(record)
}

async fn find_day_schedule(
    db: &DatabaseConnection,
    employee_id: Uuid,
    day_of_week: i16,
) -> Result<Option<schedule::Model>, ApiError> {
    let schedule = Schedule::find()
        .filter(schedule::Column::EmployeeId.eq(employee_id))
        .filter(schedule::Column::DayOfWeek.eq(day_of_week))
        .one(db).await?;

    Ok(schedule)
}

/// Entry label for `observed - target` minutes. A positive difference on a
/// holiday is relabeled as worked-holiday instead of lateness.
fn classify_entry(diff_minutes: i32, is_holiday: bool) -> Option<&'static str> {
    if diff_minutes < 0 {
        Some(consts::OBS_TIME_IN_FAVOR)
    } else if diff_minutes == 0 {
        None
    } else if is_holiday {
        Some(consts::OBS_WORKED_HOLIDAY)
    } else if diff_minutes <= consts::LATE_TOLERANCE_MINUTES {
        Some(consts::OBS_LATE)
    } else {
        Some(consts::OBS_DISCOUNT)
    }
}

fn classify_exit(diff_minutes: i32) -> Option<&'static str> {
    if diff_minutes < 0 {
        Some(consts::OBS_INCOMPLETE_SHIFT)
    } else if diff_minutes == 0 {
        None
    } else if diff_minutes <= consts::LATE_TOLERANCE_MINUTES {
        Some(consts::OBS_TIME_IN_FAVOR)
    } else {
        Some(consts::OBS_OVERTIME)
    }
}

/// Check-out labels join the check-in observation, comma-separated.
fn append_observation(existing: &str, label: Option<&'static str>) -> String {
    match label {
        None => existing.to_string(),
        Some(label) if existing.is_empty() => label.to_string(),
        Some(label) => format!("{existing}, {label}"),
    }
}

#[post("/check-in")]
async fn check_in(
    db: web::Data<DatabaseConnection>,
    holidays: web::Data<HolidayCalendar>,
    employee: user::Model,
    payload: web::Json<CheckIn>,
) -> Result<HttpResponse, ApiError> {
    let now = Utc::now().with_timezone(&consts::company_tz());
    let today = now.date_naive();

    if find_open_record(db.as_ref(), employee.id, today).await?.is_some() {
        return Err(ApiError::AlreadyCheckedIn);
    }

    let day_of_week = today.weekday().num_days_from_monday() as i16;
    let schedule = find_day_schedule(db.as_ref(), employee.id, day_of_week).await?;

    let (observation, balance_minutes) = match schedule {
        None if !payload.authorized => return Err(ApiError::NoSchedule),
        // Authorized overtime on an unscheduled day; balance accrues at
        // check-out from the worked duration.
        None => (consts::OBS_PENDING_AUTHORIZATION.to_string(), 0),
        Some(schedule) => {
            let day = DaySchedule::from(&schedule);

            match shift::resolve_entry_target(&day, now.time()) {
                None => (String::new(), 0),
                Some(target) => {
                    let diff_minutes = utils::minutes_of_day(now.time()) - utils::minutes_of_day(target);
                    let label = classify_entry(diff_minutes, holidays.is_holiday(today).await);

                    (label.unwrap_or_default().to_string(), -diff_minutes)
                },
            }
        },
    };

    let record = Attendance::insert(attendance::ActiveModel {
        created_by: Set(Some(employee.id)),
        updated_by: Set(Some(employee.id)),
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        date: Set(today),
        check_in: Set(now.time()),
        status: Set(consts::STATUS_PRESENT.to_string()),
        observation: Set(observation),
        balance_minutes: Set(balance_minutes),
        ..Default::default()
    }).exec_with_returning(db.as_ref()).await?;

    Ok(HttpResponse::Created().json(web::Json(record)))
}

#[post("/check-out")]
async fn check_out(db: web::Data<DatabaseConnection>, employee: user::Model) -> Result<HttpResponse, ApiError> {
    let now = Utc::now().with_timezone(&consts::company_tz());
    let today = now.date_naive();

    let Some(record) = find_open_record(db.as_ref(), employee.id, today).await? else {
        return Err(ApiError::NoActiveCheckIn);
    };

    let day_of_week = today.weekday().num_days_from_monday() as i16;
    let schedule = find_day_schedule(db.as_ref(), employee.id, day_of_week).await?;

    let (observation, balance_minutes) = match schedule {
        // Unscheduled day (authorized check-in): the whole worked duration
        // is the balance, the pending-authorization label stays.
        None => (
            record.observation.clone(),
            utils::minutes_of_day(now.time()) - utils::minutes_of_day(record.check_in),
        ),
        Some(schedule) => {
            let day = DaySchedule::from(&schedule);

            match shift::resolve_exit_target(&day, now.time()) {
                None => (record.observation.clone(), record.balance_minutes),
                Some(target) => {
                    let diff_minutes = utils::minutes_of_day(now.time()) - utils::minutes_of_day(target);

                    (
                        append_observation(&record.observation, classify_exit(diff_minutes)),
                        record.balance_minutes + diff_minutes,
                    )
                },
            }
        },
    };

    let record = Attendance::update(attendance::ActiveModel {
        id: Unchanged(record.id),
        updated_at: Set(Local::now().fixed_offset()),
        updated_by: Set(Some(employee.id)),
        check_out: Set(Some(now.time())),
        status: Set(consts::STATUS_PRESENT.to_string()),
        observation: Set(observation),
        balance_minutes: Set(balance_minutes),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(web::Json(record)))
}

/// Admin correction of a day's record: observation and balance are
/// overwritten as given, no business-rule validation.
#[put("")]
async fn override_attendance(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<OverrideAttendance>) -> Result<HttpResponse, ApiError> {
    let record = Attendance::find()
        .filter(attendance::Column::CreatedBy.eq(payload.employee_id))
        .filter(attendance::Column::Date.eq(payload.date))
        .order_by_desc(attendance::Column::CreatedAt)
        .one(db.as_ref()).await?
        .ok_or(ApiError::NotFound("attendance record"))?;

    let record = Attendance::update(attendance::ActiveModel {
        id: Unchanged(record.id),
        updated_at: Set(Local::now().fixed_offset()),
        updated_by: Set(Some(admin.id)),
        observation: Set(payload.observation.clone()),
        balance_minutes: Set(payload.balance_minutes),
        ..Default::default()
    }).exec(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(web::Json(record)))
}

#[get("")]
async fn attendance_history(db: web::Data<DatabaseConnection>, user: user::Model) -> Result<HttpResponse, ApiError> {
    let mut query = Attendance::find().order_by_asc(attendance::Column::CreatedAt);

    if user.role != RoleType::Admin {
        query = query.filter(attendance::Column::CreatedBy.eq(user.id));
    }

    Ok(HttpResponse::Ok().json(web::Json(query.all(db.as_ref()).await?)))
}
