//! Daily scheduler for recurring crawls
//!
//! This module handles:
//! - Computing the next local wall-clock occurrence of the configured start time
//! - Polling at a fixed interval, independent of how long a crawl takes
//! - Invoking a persisting crawl whenever the start time has passed

use crate::config::{parse_start_time, ScheduleConfig};
use crate::crawler::coordinator::Coordinator;
use crate::ConfigError;
use chrono::{Days, Local, NaiveDateTime, NaiveTime};
use std::time::Duration;

/// Runs a persisting crawl once per day at a fixed local time
#[derive(Debug, Clone)]
pub struct Scheduler {
    start_time: NaiveTime,
    poll_interval: Duration,
}

impl Scheduler {
    /// Creates a scheduler from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scheduler)` - Valid start time
    /// * `Err(ConfigError)` - `start-time` is not `HH:MM`
    pub fn new(config: &ScheduleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            start_time: parse_start_time(&config.start_time)?,
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
        })
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the first occurrence of the start time at or after `now`
    pub fn next_run_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(self.start_time);
        if today >= now {
            today
        } else {
            today
                .checked_add_days(Days::new(1))
                .unwrap_or(NaiveDateTime::MAX)
        }
    }

    /// Moves a due run to the same time on the following day
    pub fn advance(&self, next_run: NaiveDateTime) -> NaiveDateTime {
        next_run
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Returns true once `now` has reached `next_run`
    pub fn is_due(&self, next_run: NaiveDateTime, now: NaiveDateTime) -> bool {
        now >= next_run
    }

    /// Polls forever, running a persisting crawl each time the start time passes
    ///
    /// Only returns if the surrounding task is cancelled.
    pub async fn run(&self, coordinator: &Coordinator) {
        let mut next_run = self.next_run_after(Local::now().naive_local());
        tracing::info!(
            "Scheduled daily crawl at {}, next run {}",
            self.start_time.format("%H:%M"),
            next_run
        );

        loop {
            let now = Local::now().naive_local();
            if self.is_due(next_run, now) {
                tracing::info!("Starting scheduled crawl");
                let outcome = coordinator.run(true).await;
                tracing::info!(
                    "Scheduled crawl collected {} records",
                    outcome.records.len()
                );

                next_run = self.advance(next_run);
                tracing::info!("Next scheduled crawl at {}", next_run);
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn scheduler(start: &str) -> Scheduler {
        Scheduler::new(&ScheduleConfig {
            start_time: start.to_string(),
            poll_interval_secs: 60,
        })
        .unwrap()
    }

    #[test]
    fn test_next_run_later_today() {
        assert_eq!(scheduler("19:00").next_run_after(at(17, 8, 30)), at(17, 19, 0));
    }

    #[test]
    fn test_next_run_tomorrow_when_passed() {
        assert_eq!(scheduler("19:00").next_run_after(at(17, 19, 1)), at(18, 19, 0));
    }

    #[test]
    fn test_next_run_exactly_now() {
        assert_eq!(scheduler("06:15").next_run_after(at(17, 6, 15)), at(17, 6, 15));
    }

    #[test]
    fn test_next_run_crosses_month() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 31)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2026, 11, 1)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        assert_eq!(scheduler("19:00").next_run_after(now), expected);
    }

    #[test]
    fn test_is_due() {
        let s = scheduler("19:00");
        assert!(!s.is_due(at(17, 19, 0), at(17, 18, 59)));
        assert!(s.is_due(at(17, 19, 0), at(17, 19, 0)));
        assert!(s.is_due(at(17, 19, 0), at(17, 19, 5)));
    }

    #[test]
    fn test_advance_moves_one_day() {
        let s = scheduler("19:00");
        let next_run = s.next_run_after(at(17, 8, 30));
        assert_eq!(s.advance(next_run), at(18, 19, 0));

        let month_end = NaiveDate::from_ymd_opt(2026, 10, 31)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2026, 11, 1)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        assert_eq!(s.advance(month_end), expected);
    }

    #[test]
    fn test_invalid_start_time() {
        let result = Scheduler::new(&ScheduleConfig {
            start_time: "7pm".to_string(),
            poll_interval_secs: 60,
        });
        assert!(matches!(result, Err(ConfigError::InvalidTime(_))));
    }

    #[test]
    fn test_poll_interval_from_config() {
        let s = Scheduler::new(&ScheduleConfig {
            start_time: "00:00".to_string(),
            poll_interval_secs: 5,
        })
        .unwrap();
        assert_eq!(s.poll_interval(), Duration::from_secs(5));
        assert_eq!(s.start_time(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }
}
