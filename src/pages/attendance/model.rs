use super::*;

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CheckIn {
    /// Asserted by the client to register overtime on an unscheduled day.
    #[serde(default)]
    pub(super) authorized: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct OverrideAttendance {
    pub(super) employee_id: Uuid,
    pub(super) date: NaiveDate,
    pub(super) observation: String,
    pub(super) balance_minutes: i32,
}
