use std::{collections::{HashMap, HashSet}, sync::Arc};

use chrono::{Datelike as _, NaiveDate};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::warn;

use crate::utils;

/// Public-holiday calendar backed by the Chilean government API, memoized
/// per year. Fetch failures degrade to "no holidays known" so attendance and
/// payroll never block on calendar availability.
pub struct HolidayCalendar {
    base_url: String,
    http: reqwest::Client,
    cache: RwLock<HashMap<i32, Arc<HashSet<NaiveDate>>>>,
}

/// Wire format of `apis.digital.gob.cl/fl/feriados/{year}` entries.
#[derive(Debug, Deserialize)]
struct Holiday {
    fecha: NaiveDate,
}

impl HolidayCalendar {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The holiday set for a year. At most one fetch per year; errors are
    /// not cached, so a later call may retry.
    pub async fn holidays_for(&self, year: i32) -> Arc<HashSet<NaiveDate>> {
        if let Some(holidays) = self.cache.read().await.get(&year) {
            return holidays.clone();
        }

        match self.fetch(year).await {
            Ok(holidays) => {
                let holidays = Arc::new(holidays);
                self.cache.write().await.insert(year, holidays.clone());

                holidays
            },
            Err(err) => {
                warn!("unable to fetch holiday calendar for {year}, treating all days as regular: {err}");

                Arc::new(HashSet::new())
            },
        }
    }

    pub async fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays_for(date.year()).await.contains(&date)
    }

    pub async fn business_days_in_month(&self, month: u32, year: i32) -> u32 {
        let holidays = self.holidays_for(year).await;
        let (first, last) = utils::month_bounds(year, month);

        utils::business_days_between(first, last, &holidays)
    }

    async fn fetch(&self, year: i32) -> Result<HashSet<NaiveDate>, reqwest::Error> {
        let holidays: Vec<Holiday> = self.http
            .get(format!("{}/{}", self.base_url, year))
            .send().await?
            .error_for_status()?
            .json().await?;

        Ok(holidays.into_iter().map(|holiday| holiday.fecha).collect())
    }

    /// Calendar with a pre-filled cache and no reachable backend, so tests
    /// never leave the process.
    #[cfg(test)]
    pub(crate) fn preloaded(year: i32, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self::new("http://127.0.0.1:1").preload(year, holidays)
    }

    #[cfg(test)]
    pub(crate) fn preload(mut self, year: i32, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.cache.get_mut().insert(year, Arc::new(holidays.into_iter().collect()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[actix_web::test]
    async fn test_is_holiday_against_cached_year() {
        let calendar = HolidayCalendar::preloaded(2024, [d(2024, 9, 18), d(2024, 9, 19)]);

        assert!(calendar.is_holiday(d(2024, 9, 18)).await);
        assert!(!calendar.is_holiday(d(2024, 9, 20)).await);
    }

    #[actix_web::test]
    async fn test_cached_year_is_served_without_a_fetch() {
        // The preloaded calendar points at an unreachable backend; getting
        // the set back proves the lookup never left the cache.
        let calendar = HolidayCalendar::preloaded(2024, [d(2024, 1, 1)]);

        let holidays = calendar.holidays_for(2024).await;
        assert_eq!(holidays.len(), 1);
        assert!(holidays.contains(&d(2024, 1, 1)));
    }

    #[actix_web::test]
    async fn test_fetch_failure_degrades_to_no_holidays() {
        let calendar = HolidayCalendar::new("http://127.0.0.1:1");

        assert!(calendar.holidays_for(2024).await.is_empty());
        assert!(!calendar.is_holiday(d(2024, 9, 18)).await);
    }

    #[actix_web::test]
    async fn test_business_days_in_month() {
        let calendar = HolidayCalendar::preloaded(2024, [d(2024, 6, 20), d(2024, 6, 29)]);

        // June 2024 has 20 weekdays; the 20th is festive, the 29th is a
        // Saturday and subtracts nothing.
        assert_eq!(calendar.business_days_in_month(6, 2024).await, 19);
    }
}
