use actix_web::{body, http::StatusCode, HttpResponse};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Business-rule and infrastructure failures surfaced to API clients.
///
/// Every variant carries a stable machine-readable kind so clients can react
/// to it (the NO_SCHEDULE flow re-submits with authorization, for example).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("already checked in")]
    AlreadyCheckedIn,

    #[error("no active check-in found")]
    NoActiveCheckIn,

    #[error("no schedule assigned for today, re-submit with `authorized` to register overtime")]
    NoSchedule,

    #[error("employee not found")]
    EmployeeNotFound,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("record store unavailable")]
    Database(#[from] DbErr),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::AlreadyCheckedIn => "ALREADY_CHECKED_IN",
            ApiError::NoActiveCheckIn => "NO_ACTIVE_CHECKIN",
            ApiError::NoSchedule => "NO_SCHEDULE",
            ApiError::EmployeeNotFound => "EMPLOYEE_NOT_FOUND",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Validation(_) => "VALIDATION",
            ApiError::Database(_) => "STORE_UNAVAILABLE",
        }
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        if let ApiError::Database(err) = self {
            error!("record store failure: {err}");
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::AlreadyCheckedIn
            | ApiError::NoActiveCheckIn
            | ApiError::NoSchedule => StatusCode::CONFLICT,
            ApiError::EmployeeNotFound | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
