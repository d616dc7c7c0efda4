pub mod prelude;

pub mod attendance;
pub mod leave_request;
pub mod payroll;
pub mod schedule;
pub mod sea_orm_active_enums;
pub mod user;
