use actix_web::{get, post, web, HttpResponse};
use chrono::{Local, NaiveTime};
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::Admin, entity::{prelude::*, schedule}, error::ApiError, utils};

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(get_schedules)
        .service(set_schedules);
}

#[derive(Debug, Serialize, Deserialize)]
struct ScheduleQuery {
    employee_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
struct SetSchedules {
    employee_id: Uuid,
    days: Vec<DaySchedules>,
}

/// One weekday's shift pair, times as `HH:MM`. Empty or missing boundaries
/// mean the shift (or half of it) is unset.
#[derive(Debug, Serialize, Deserialize)]
struct DaySchedules {
    day_of_week: i16,
    shift1_start: Option<String>,
    shift1_end: Option<String>,
    shift2_start: Option<String>,
    shift2_end: Option<String>,
}

fn parse_boundary(field: &str, value: &Option<String>) -> Result<Option<NaiveTime>, ApiError> {
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => utils::parse_time(value)
            .map(Some)
            .ok_or_else(|| ApiError::Validation(format!("invalid `{field}` time `{value}`, expected HH:MM"))),
    }
}

#[get("")]
async fn get_schedules(db: web::Data<DatabaseConnection>, _admin: Admin, query: web::Query<ScheduleQuery>) -> Result<HttpResponse, ApiError> {
    let schedules = Schedule::find()
        .filter(schedule::Column::EmployeeId.eq(query.employee_id))
        .order_by_asc(schedule::Column::DayOfWeek)
        .all(db.as_ref()).await?;

    Ok(HttpResponse::Ok().json(web::Json(schedules)))
}

/// Upserts one schedule row per submitted weekday. The whole payload is
/// validated before the first store write.
#[post("")]
async fn set_schedules(db: web::Data<DatabaseConnection>, admin: Admin, payload: web::Json<SetSchedules>) -> Result<HttpResponse, ApiError> {
    let mut rows = Vec::with_capacity(payload.days.len());

    for day in &payload.days {
        if !(0..7).contains(&day.day_of_week) {
            return Err(ApiError::Validation(format!(
                "`day_of_week` must be 0 (Monday) through 6 (Sunday), got {}",
                day.day_of_week,
            )));
        }

        rows.push((
            day.day_of_week,
            parse_boundary("shift1_start", &day.shift1_start)?,
            parse_boundary("shift1_end", &day.shift1_end)?,
            parse_boundary("shift2_start", &day.shift2_start)?,
            parse_boundary("shift2_end", &day.shift2_end)?,
        ));
    }

    let mut saved = Vec::with_capacity(rows.len());

    for (day_of_week, shift1_start, shift1_end, shift2_start, shift2_end) in rows {
        let existing = Schedule::find()
            .filter(schedule::Column::EmployeeId.eq(payload.employee_id))
            .filter(schedule::Column::DayOfWeek.eq(day_of_week))
            .one(db.as_ref()).await?;

        let model = match existing {
            Some(existing) => Schedule::update(schedule::ActiveModel {
                id: Unchanged(existing.id),
                updated_at: Set(Local::now().fixed_offset()),
                updated_by: Set(Some(admin.id)),
                shift1_start: Set(shift1_start),
                shift1_end: Set(shift1_end),
                shift2_start: Set(shift2_start),
                shift2_end: Set(shift2_end),
                ..Default::default()
            }).exec(db.as_ref()).await?,
            None => Schedule::insert(schedule::ActiveModel {
                created_by: Set(Some(admin.id)),
                updated_by: Set(Some(admin.id)),
                created_at: Set(Local::now().fixed_offset()),
                updated_at: Set(Local::now().fixed_offset()),
                employee_id: Set(payload.employee_id),
                day_of_week: Set(day_of_week),
                shift1_start: Set(shift1_start),
                shift1_end: Set(shift1_end),
                shift2_start: Set(shift2_start),
                shift2_end: Set(shift2_end),
                ..Default::default()
            }).exec_with_returning(db.as_ref()).await?,
        };

        saved.push(model);
    }

    Ok(HttpResponse::Ok().json(web::Json(saved)))
}
