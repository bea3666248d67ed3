//! Care Log Recency
//!
//! A gecko is `Urgent` when its latest FEEDING or latest CLEANING log is
//! missing or older than the threshold. Derived from the logs on every call.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::care_log::{CareLog, CareType};
use super::gecko::Gecko;
use super::rack::Rack;

/// Days without feeding or cleaning before a gecko needs attention
pub const CARE_THRESHOLD_DAYS: i64 = 3;

pub fn care_threshold() -> TimeDelta {
    TimeDelta::days(CARE_THRESHOLD_DAYS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareStatus {
    Empty,
    Good,
    Urgent,
}

impl CareStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CareStatus::Empty => "empty",
            CareStatus::Good => "good",
            CareStatus::Urgent => "urgent",
        }
    }
}

/// Log of `care_type` with the greatest `created_at`; input order is irrelevant
pub fn latest_log(logs: &[CareLog], care_type: CareType) -> Option<&CareLog> {
    logs.iter()
        .filter(|log| log.care_type == care_type)
        .max_by_key(|log| log.created_at)
}

/// True when no `care_type` log exists or the latest is older than the threshold
pub fn needs_attention(logs: &[CareLog], care_type: CareType, now: DateTime<Utc>) -> bool {
    let cutoff = now - care_threshold();
    match latest_log(logs, care_type) {
        Some(log) => log.created_at < cutoff,
        None => true,
    }
}

pub fn gecko_status(gecko: &Gecko, now: DateTime<Utc>) -> CareStatus {
    CareReport::for_logs(&gecko.care_logs, now).status()
}

pub fn cell_status(occupant: Option<&Gecko>, now: DateTime<Utc>) -> CareStatus {
    occupant.map_or(CareStatus::Empty, |gecko| gecko_status(gecko, now))
}

/// Per-dimension breakdown behind a gecko's status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CareReport {
    pub last_feeding: Option<DateTime<Utc>>,
    pub last_cleaning: Option<DateTime<Utc>>,
    pub feeding_overdue: bool,
    pub cleaning_overdue: bool,
}

impl CareReport {
    pub fn for_logs(logs: &[CareLog], now: DateTime<Utc>) -> Self {
        Self {
            last_feeding: latest_log(logs, CareType::Feeding).map(|l| l.created_at),
            last_cleaning: latest_log(logs, CareType::Cleaning).map(|l| l.created_at),
            feeding_overdue: needs_attention(logs, CareType::Feeding, now),
            cleaning_overdue: needs_attention(logs, CareType::Cleaning, now),
        }
    }

    pub fn status(&self) -> CareStatus {
        if self.feeding_overdue || self.cleaning_overdue {
            CareStatus::Urgent
        } else {
            CareStatus::Good
        }
    }
}

/// Header counts for the rack screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionSummary {
    pub total: usize,
    pub urgent: usize,
}

impl CollectionSummary {
    pub fn from_racks(racks: &[Rack], now: DateTime<Utc>) -> Self {
        racks
            .iter()
            .flat_map(|rack| rack.geckos.iter())
            .fold(Self::default(), |mut acc, gecko| {
                acc.total += 1;
                if gecko_status(gecko, now) == CareStatus::Urgent {
                    acc.urgent += 1;
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
    }

    fn log(id: u32, care_type: CareType, age: TimeDelta) -> CareLog {
        CareLog::new(id, care_type, now() - age)
    }

    fn gecko_with(logs: Vec<CareLog>) -> Gecko {
        Gecko::new(1, "G", 1, 1, 1).with_logs(logs)
    }

    #[test]
    fn test_no_logs_is_urgent() {
        assert_eq!(gecko_status(&gecko_with(vec![]), now()), CareStatus::Urgent);
    }

    #[test]
    fn test_fed_and_cleaned_today_is_good() {
        let gecko = gecko_with(vec![
            log(1, CareType::Feeding, TimeDelta::hours(2)),
            log(2, CareType::Cleaning, TimeDelta::minutes(5)),
        ]);
        assert_eq!(gecko_status(&gecko, now()), CareStatus::Good);
    }

    #[test]
    fn test_missing_dimension_is_urgent() {
        let gecko = gecko_with(vec![log(1, CareType::Feeding, TimeDelta::hours(1))]);
        let report = CareReport::for_logs(&gecko.care_logs, now());
        assert!(!report.feeding_overdue);
        assert!(report.cleaning_overdue);
        assert_eq!(report.status(), CareStatus::Urgent);
    }

    #[test]
    fn test_threshold_boundary() {
        let exactly = vec![
            log(1, CareType::Feeding, care_threshold()),
            log(2, CareType::Cleaning, care_threshold()),
        ];
        assert_eq!(gecko_status(&gecko_with(exactly), now()), CareStatus::Good);

        let just_over = vec![
            log(1, CareType::Feeding, care_threshold() + TimeDelta::seconds(1)),
            log(2, CareType::Cleaning, TimeDelta::hours(1)),
        ];
        assert_eq!(gecko_status(&gecko_with(just_over), now()), CareStatus::Urgent);
    }

    #[test]
    fn test_latest_wins_regardless_of_order() {
        // oldest first on purpose
        let logs = vec![
            log(1, CareType::Feeding, TimeDelta::days(10)),
            log(2, CareType::Cleaning, TimeDelta::days(9)),
            log(3, CareType::Feeding, TimeDelta::hours(3)),
            log(4, CareType::Cleaning, TimeDelta::days(1)),
        ];
        assert_eq!(latest_log(&logs, CareType::Feeding).map(|l| l.id), Some(3));
        assert_eq!(gecko_status(&gecko_with(logs), now()), CareStatus::Good);
    }

    #[test]
    fn test_unmonitored_types_do_not_count() {
        let logs = vec![
            log(1, CareType::Shedding, TimeDelta::hours(1)),
            log(2, CareType::Weight, TimeDelta::hours(1)),
            log(3, CareType::Cleaning, TimeDelta::hours(1)),
        ];
        assert!(needs_attention(&logs, CareType::Feeding, now()));
        assert_eq!(gecko_status(&gecko_with(logs), now()), CareStatus::Urgent);
    }

    #[test]
    fn test_urgent_iff_a_monitored_log_is_stale_or_missing() {
        let ages = [None, Some(TimeDelta::hours(1)), Some(TimeDelta::days(2)), Some(TimeDelta::days(4))];
        for feeding in ages {
            for cleaning in ages {
                let mut logs = Vec::new();
                if let Some(age) = feeding {
                    logs.push(log(1, CareType::Feeding, age));
                }
                if let Some(age) = cleaning {
                    logs.push(log(2, CareType::Cleaning, age));
                }
                let stale = |age: Option<TimeDelta>| age.map_or(true, |a| a > care_threshold());
                let expected = if stale(feeding) || stale(cleaning) {
                    CareStatus::Urgent
                } else {
                    CareStatus::Good
                };
                assert_eq!(gecko_status(&gecko_with(logs), now()), expected);
            }
        }
    }

    #[test]
    fn test_empty_cell_status() {
        assert_eq!(cell_status(None, now()), CareStatus::Empty);
    }

    #[test]
    fn test_collection_summary() {
        let fresh = vec![
            log(1, CareType::Feeding, TimeDelta::hours(1)),
            log(2, CareType::Cleaning, TimeDelta::hours(1)),
        ];
        let racks = vec![
            Rack::new(1, "A", 2, 2).with_geckos(vec![
                Gecko::new(1, "a", 1, 1, 1).with_logs(fresh.clone()),
                Gecko::new(2, "b", 1, 1, 2),
            ]),
            Rack::new(2, "B", 1, 1).with_geckos(vec![Gecko::new(3, "c", 2, 1, 1)]),
        ];
        let summary = CollectionSummary::from_racks(&racks, now());
        assert_eq!(summary, CollectionSummary { total: 3, urgent: 2 });
    }
}
