//! Care Log Entity
//!
//! Timestamped care events (feeding, cleaning, weighing, ...). Logs are
//! immutable once created; they can only be deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};
use super::gecko::GeckoId;

pub type CareLogId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CareType {
    Feeding,
    Cleaning,
    Shedding,
    Weight,
    Mating,
    Laying,
    Other,
}

impl CareType {
    pub const ALL: [CareType; 7] = [
        CareType::Feeding,
        CareType::Cleaning,
        CareType::Shedding,
        CareType::Weight,
        CareType::Mating,
        CareType::Laying,
        CareType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CareType::Feeding => "FEEDING",
            CareType::Cleaning => "CLEANING",
            CareType::Shedding => "SHEDDING",
            CareType::Weight => "WEIGHT",
            CareType::Mating => "MATING",
            CareType::Laying => "LAYING",
            CareType::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CareType::Feeding => "Feeding",
            CareType::Cleaning => "Cleaning",
            CareType::Shedding => "Shedding",
            CareType::Weight => "Weight",
            CareType::Mating => "Mating",
            CareType::Laying => "Laying",
            CareType::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CareType::Feeding => "🍽️",
            CareType::Cleaning => "🧹",
            CareType::Shedding => "🦎",
            CareType::Weight => "⚖️",
            CareType::Mating => "💕",
            CareType::Laying => "🥚",
            CareType::Other => "📝",
        }
    }

    /// Types recorded with a single tap, without extra input
    pub fn is_one_tap(&self) -> bool {
        matches!(self, CareType::Feeding | CareType::Cleaning | CareType::Shedding)
    }
}

/// A single care event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareLog {
    pub id: CareLogId,
    #[serde(rename = "type")]
    pub care_type: CareType,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub gecko_id: Option<GeckoId>,
    pub created_at: DateTime<Utc>,
}

impl CareLog {
    pub fn new(id: CareLogId, care_type: CareType, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            care_type,
            value: None,
            note: None,
            gecko_id: None,
            created_at,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// One-line description, e.g. `Weight (42g) - after shed`
    pub fn summary(&self) -> String {
        let mut line = self.care_type.label().to_string();
        if let Some(value) = self.value.as_deref().filter(|v| !v.is_empty()) {
            line.push_str(&format!(" ({value})"));
        }
        if let Some(note) = self.note.as_deref().filter(|n| !n.is_empty()) {
            line.push_str(&format!(" - {note}"));
        }
        line
    }
}

impl Entity for CareLog {
    type Id = CareLogId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Egg outcome recorded with a laying log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EggKind {
    Fertile,
    Infertile,
    Unknown,
}

impl EggKind {
    pub const ALL: [EggKind; 3] = [EggKind::Fertile, EggKind::Infertile, EggKind::Unknown];

    pub fn label(&self) -> &'static str {
        match self {
            EggKind::Fertile => "Fertile",
            EggKind::Infertile => "Infertile",
            EggKind::Unknown => "Not sure",
        }
    }
}

/// Payload for `POST /geckos/:id/logs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareLogDraft {
    #[serde(rename = "type")]
    pub care_type: CareType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CareLogDraft {
    fn plain(care_type: CareType) -> Self {
        Self {
            care_type,
            note: None,
            value: None,
            created_at: None,
        }
    }

    /// Feeding, cleaning or shedding
    pub fn quick(care_type: CareType) -> DomainResult<Self> {
        if !care_type.is_one_tap() {
            return Err(DomainError::InvalidInput(format!(
                "{} needs additional input",
                care_type.label()
            )));
        }
        Ok(Self::plain(care_type))
    }

    /// Weight in grams, stored as `"<grams>g"`
    pub fn weight(grams: f64) -> DomainResult<Self> {
        if !grams.is_finite() || grams <= 0.0 {
            return Err(DomainError::InvalidInput("weight must be positive".to_string()));
        }
        Ok(Self {
            value: Some(format!("{grams}g")),
            ..Self::plain(CareType::Weight)
        })
    }

    /// Mating, optionally naming the male
    pub fn mating(partner: Option<&str>) -> Self {
        let note = partner
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| format!("Male: {p}"));
        Self {
            note,
            ..Self::plain(CareType::Mating)
        }
    }

    pub fn laying(kind: EggKind) -> Self {
        Self {
            note: Some(kind.label().to_string()),
            ..Self::plain(CareType::Laying)
        }
    }

    /// Free-form entry; the note is required
    pub fn other(note: &str) -> DomainResult<Self> {
        let note = note.trim();
        if note.is_empty() {
            return Err(DomainError::InvalidInput("note is required".to_string()));
        }
        Ok(Self {
            note: Some(note.to_string()),
            ..Self::plain(CareType::Other)
        })
    }

    /// Record the event at a past time instead of now
    pub fn backdated(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

/// Parse a weight typed by the user ("42", "42.5g")
pub fn parse_weight_input(input: &str) -> DomainResult<f64> {
    parse_grams(input).ok_or_else(|| DomainError::InvalidInput("weight must be a number".to_string()))
}

fn parse_grams(raw: &str) -> Option<f64> {
    raw.trim()
        .trim_end_matches('g')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|g| g.is_finite())
}

/// Newest first, as shown in the log list
pub fn sort_newest_first(logs: &mut [CareLog]) {
    logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Whole days elapsed between `at` and `now`
pub fn days_since(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - at).num_days()
}

/// A weight measurement extracted from a WEIGHT log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightPoint {
    pub recorded_at: DateTime<Utc>,
    pub grams: f64,
}

/// WEIGHT logs with a readable value, oldest first
pub fn weight_history(logs: &[CareLog]) -> Vec<WeightPoint> {
    let mut points: Vec<WeightPoint> = logs
        .iter()
        .filter(|log| log.care_type == CareType::Weight)
        .filter_map(|log| {
            let grams = parse_grams(log.value.as_deref()?)?;
            Some(WeightPoint {
                recorded_at: log.created_at,
                grams,
            })
        })
        .collect();
    points.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at));
    points
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightSummary {
    pub first: f64,
    pub latest: f64,
    pub change: f64,
    pub average: f64,
    pub count: usize,
}

impl WeightSummary {
    pub fn from_points(points: &[WeightPoint]) -> Option<Self> {
        let first = points.first()?.grams;
        let latest = points.last()?.grams;
        let total: f64 = points.iter().map(|p| p.grams).sum();
        Some(Self {
            first,
            latest,
            change: latest - first,
            average: total / points.len() as f64,
            count: points.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_care_type_wire_names() {
        for care_type in CareType::ALL {
            let json = serde_json::to_string(&care_type).unwrap();
            assert_eq!(json, format!("\"{}\"", care_type.as_str()));
        }
    }

    #[test]
    fn test_care_log_deserialize() {
        let log: CareLog = serde_json::from_str(
            r#"{"id":1,"type":"WEIGHT","value":"41g","geckoId":3,"createdAt":"2024-06-02T08:30:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(log.care_type, CareType::Weight);
        assert_eq!(log.gecko_id, Some(3));
        assert_eq!(log.summary(), "Weight (41g)");
    }

    #[test]
    fn test_summary_with_note() {
        let log = CareLog::new(1, CareType::Laying, at(1)).with_note("Fertile");
        assert_eq!(log.summary(), "Laying - Fertile");
    }

    #[test]
    fn test_drafts() {
        assert!(CareLogDraft::quick(CareType::Feeding).is_ok());
        assert!(CareLogDraft::quick(CareType::Weight).is_err());

        let weight = CareLogDraft::weight(42.5).unwrap();
        assert_eq!(weight.value.as_deref(), Some("42.5g"));
        assert!(CareLogDraft::weight(0.0).is_err());

        assert_eq!(CareLogDraft::mating(Some(" Rex ")).note.as_deref(), Some("Male: Rex"));
        assert_eq!(CareLogDraft::mating(Some("  ")).note, None);
        assert_eq!(CareLogDraft::laying(EggKind::Infertile).note.as_deref(), Some("Infertile"));
        assert!(CareLogDraft::other("   ").is_err());
    }

    #[test]
    fn test_draft_wire_format() {
        let draft = CareLogDraft::quick(CareType::Cleaning).unwrap().backdated(at(3));
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["type"], "CLEANING");
        assert_eq!(json["createdAt"], "2024-06-03T12:00:00Z");
        assert!(json.get("note").is_none());
    }

    #[test]
    fn test_sort_newest_first() {
        let mut logs = vec![
            CareLog::new(1, CareType::Feeding, at(1)),
            CareLog::new(2, CareType::Feeding, at(5)),
            CareLog::new(3, CareType::Cleaning, at(3)),
        ];
        sort_newest_first(&mut logs);
        let ids: Vec<_> = logs.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_days_since_floors() {
        let now = at(10);
        assert_eq!(days_since(at(10), now), 0);
        assert_eq!(days_since(at(7), now), 3);
        assert_eq!(days_since(at(7) + chrono::TimeDelta::hours(1), now), 2);
    }

    #[test]
    fn test_weight_history_and_summary() {
        let logs = vec![
            CareLog::new(1, CareType::Weight, at(9)).with_value("44g"),
            CareLog::new(2, CareType::Weight, at(1)).with_value("40"),
            CareLog::new(3, CareType::Weight, at(5)).with_value("heavy"),
            CareLog::new(4, CareType::Feeding, at(2)).with_value("12"),
            CareLog::new(5, CareType::Weight, at(3)),
        ];
        let points = weight_history(&logs);
        let grams: Vec<_> = points.iter().map(|p| p.grams).collect();
        assert_eq!(grams, vec![40.0, 44.0]);

        let summary = WeightSummary::from_points(&points).unwrap();
        assert_eq!(summary.first, 40.0);
        assert_eq!(summary.latest, 44.0);
        assert_eq!(summary.change, 4.0);
        assert_eq!(summary.average, 42.0);
        assert_eq!(summary.count, 2);

        assert!(WeightSummary::from_points(&[]).is_none());
    }

    #[test]
    fn test_parse_weight_input() {
        assert_eq!(parse_weight_input("42.5g").unwrap(), 42.5);
        assert!(parse_weight_input("abc").is_err());
    }
}
