//! Gecko Entity
//!
//! An individual animal placed in exactly one rack cell.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::care_log::CareLog;
use super::entity::{DomainError, DomainResult, Entity};
use super::grid::Position;
use super::rack::RackId;

pub type GeckoId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Unknown => "UNKNOWN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Unknown => "Unknown",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "MALE" => Gender::Male,
            "FEMALE" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

/// A gecko and its most recent care history
///
/// `row`/`column` change only through move and swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gecko {
    pub id: GeckoId,
    pub name: String,
    #[serde(default)]
    pub morph: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub rack_id: RackId,
    pub row: u32,
    pub column: u32,
    #[serde(default)]
    pub care_logs: Vec<CareLog>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Gecko {
    pub fn new(id: GeckoId, name: impl Into<String>, rack_id: RackId, row: u32, column: u32) -> Self {
        Self {
            id,
            name: name.into(),
            morph: None,
            birth_date: None,
            gender: Gender::Unknown,
            weight: None,
            notes: None,
            photo_url: None,
            rack_id,
            row,
            column,
            care_logs: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_logs(mut self, logs: Vec<CareLog>) -> Self {
        self.care_logs = logs;
        self
    }

    pub fn position(&self) -> Position {
        Position::new(self.rack_id, self.row, self.column)
    }
}

impl Entity for Gecko {
    type Id = GeckoId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Editable gecko fields as entered in the gecko form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeckoProfile {
    pub name: String,
    pub morph: String,
    pub birth_date: String,
    pub gender: Gender,
    pub weight: String,
    pub notes: String,
}

impl GeckoProfile {
    /// Prefill the form from an existing gecko
    pub fn from_gecko(gecko: &Gecko) -> Self {
        Self {
            name: gecko.name.clone(),
            morph: gecko.morph.clone().unwrap_or_default(),
            birth_date: gecko.birth_date.clone().unwrap_or_default(),
            gender: gecko.gender,
            weight: gecko.weight.map(|w| w.to_string()).unwrap_or_default(),
            notes: gecko.notes.clone().unwrap_or_default(),
        }
    }

    /// Payload for `POST /geckos` placing the new gecko at `position`
    pub fn into_create(self, position: Position) -> DomainResult<CreateGecko> {
        let fields = self.validate()?;
        Ok(CreateGecko {
            name: fields.name,
            morph: fields.morph,
            birth_date: fields.birth_date,
            gender: Some(fields.gender),
            weight: fields.weight,
            notes: fields.notes,
            rack_id: position.rack_id,
            row: position.row,
            column: position.column,
        })
    }

    /// Payload for `PUT /geckos/:id`
    pub fn into_update(self) -> DomainResult<UpdateGecko> {
        let fields = self.validate()?;
        Ok(UpdateGecko {
            name: Some(fields.name),
            morph: fields.morph,
            birth_date: fields.birth_date,
            gender: Some(fields.gender),
            weight: fields.weight,
            notes: fields.notes,
        })
    }

    fn validate(self) -> DomainResult<ValidProfile> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("gecko name is required".to_string()));
        }

        let weight = match self.weight.trim() {
            "" => None,
            raw => {
                let grams = raw
                    .trim_end_matches('g')
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| DomainError::InvalidInput("weight must be a number".to_string()))?;
                if !grams.is_finite() || grams <= 0.0 {
                    return Err(DomainError::InvalidInput("weight must be positive".to_string()));
                }
                Some(grams)
            }
        };

        Ok(ValidProfile {
            name,
            morph: non_blank(self.morph),
            birth_date: non_blank(self.birth_date),
            gender: self.gender,
            weight,
            notes: non_blank(self.notes),
        })
    }
}

struct ValidProfile {
    name: String,
    morph: Option<String>,
    birth_date: Option<String>,
    gender: Gender,
    weight: Option<f64>,
    notes: Option<String>,
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Payload for `POST /geckos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGecko {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morph: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub rack_id: RackId,
    pub row: u32,
    pub column: u32,
}

/// Payload for `PUT /geckos/:id`
///
/// Optional profile fields are always sent; `null` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGecko {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub morph: Option<String>,
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

/// Payload for `PATCH /geckos/:id/move`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveGecko {
    pub rack_id: RackId,
    pub row: u32,
    pub column: u32,
}

impl From<Position> for MoveGecko {
    fn from(p: Position) -> Self {
        Self {
            rack_id: p.rack_id,
            row: p.row,
            column: p.column,
        }
    }
}

/// Payload for `POST /geckos/swap`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapGeckos {
    #[serde(rename = "geckoId1")]
    pub gecko_id1: GeckoId,
    #[serde(rename = "geckoId2")]
    pub gecko_id2: GeckoId,
}

/// Response of `POST /geckos/swap`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapResult {
    pub gecko1: Gecko,
    pub gecko2: Gecko,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gecko_wire_format() {
        let gecko: Gecko = serde_json::from_str(
            r#"{"id":4,"name":"Kiwi","gender":"FEMALE","rackId":2,"row":1,"column":3,"photoUrl":"/uploads/k.jpg"}"#,
        )
        .unwrap();
        assert_eq!(gecko.gender, Gender::Female);
        assert_eq!(gecko.position(), Position::new(2, 1, 3));
        assert!(gecko.care_logs.is_empty());
        assert_eq!(gecko.photo_url.as_deref(), Some("/uploads/k.jpg"));
    }

    #[test]
    fn test_missing_gender_defaults_unknown() {
        let gecko: Gecko =
            serde_json::from_str(r#"{"id":1,"name":"A","rackId":1,"row":1,"column":1}"#).unwrap();
        assert_eq!(gecko.gender, Gender::Unknown);
    }

    #[test]
    fn test_swap_payload_keys() {
        let json = serde_json::to_value(SwapGeckos { gecko_id1: 3, gecko_id2: 8 }).unwrap();
        assert_eq!(json, serde_json::json!({"geckoId1": 3, "geckoId2": 8}));
    }

    #[test]
    fn test_move_payload_keys() {
        let json = serde_json::to_value(MoveGecko::from(Position::new(5, 2, 1))).unwrap();
        assert_eq!(json, serde_json::json!({"rackId": 5, "row": 2, "column": 1}));
    }

    #[test]
    fn test_profile_into_create() {
        let profile = GeckoProfile {
            name: " Mango ".to_string(),
            morph: "Lilly White".to_string(),
            weight: "42.5g".to_string(),
            ..Default::default()
        };
        let create = profile.into_create(Position::new(1, 2, 3)).unwrap();
        assert_eq!(create.name, "Mango");
        assert_eq!(create.morph.as_deref(), Some("Lilly White"));
        assert_eq!(create.weight, Some(42.5));
        assert_eq!(create.notes, None);
        assert_eq!((create.rack_id, create.row, create.column), (1, 2, 3));

        let json = serde_json::to_value(&create).unwrap();
        assert!(json.get("notes").is_none());
        assert_eq!(json["rackId"], 1);
    }

    #[test]
    fn test_profile_rejects_bad_input() {
        let blank = GeckoProfile::default();
        assert!(blank.into_update().is_err());

        let negative = GeckoProfile {
            name: "A".to_string(),
            weight: "-3".to_string(),
            ..Default::default()
        };
        assert!(negative.into_update().is_err());
    }

    #[test]
    fn test_profile_roundtrip_from_gecko() {
        let mut gecko = Gecko::new(1, "Pico", 1, 1, 1);
        gecko.weight = Some(30.0);
        gecko.gender = Gender::Male;
        let update = GeckoProfile::from_gecko(&gecko).into_update().unwrap();
        assert_eq!(update.name.as_deref(), Some("Pico"));
        assert_eq!(update.weight, Some(30.0));
        assert_eq!(update.gender, Some(Gender::Male));
    }

    #[test]
    fn test_cleared_profile_fields_sent_as_null() {
        let mut gecko = Gecko::new(1, "Pico", 1, 1, 1);
        gecko.morph = Some("Lilly White".to_string());
        gecko.notes = Some("calm".to_string());
        gecko.weight = Some(30.0);

        let mut profile = GeckoProfile::from_gecko(&gecko);
        profile.morph = "  ".to_string();
        profile.notes.clear();
        profile.weight.clear();

        let body = serde_json::to_value(profile.into_update().unwrap()).unwrap();
        assert_eq!(body["name"], "Pico");
        assert!(body["morph"].is_null());
        assert!(body.as_object().unwrap().contains_key("morph"));
        assert!(body.as_object().unwrap().contains_key("notes"));
        assert!(body.as_object().unwrap().contains_key("weight"));
        assert!(body.as_object().unwrap().contains_key("birthDate"));
    }
}
