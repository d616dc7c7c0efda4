pub use super::attendance::Entity as Attendance;
pub use super::leave_request::Entity as LeaveRequest;
pub use super::payroll::Entity as Payroll;
pub use super::schedule::Entity as Schedule;
pub use super::user::Entity as User;
