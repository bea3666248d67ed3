//! Rack Entity
//!
//! A named grid enclosure with fixed rows and columns holding geckos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};
use super::gecko::Gecko;
use super::user::UserId;

pub type RackId = u32;

/// Largest row or column count accepted by the rack form
pub const MAX_RACK_DIMENSION: u32 = 20;

/// A rack of cells, `rows` shelves high and `columns` cells wide
///
/// Row 1 is the bottom shelf; columns count from the left starting at 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rack {
    pub id: RackId,
    pub name: String,
    pub rows: u32,
    pub columns: u32,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub geckos: Vec<Gecko>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Rack {
    /// Create an empty rack
    pub fn new(id: RackId, name: impl Into<String>, rows: u32, columns: u32) -> Self {
        Self {
            id,
            name: name.into(),
            rows,
            columns,
            user_id: None,
            geckos: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Replace the occupant list
    pub fn with_geckos(mut self, geckos: Vec<Gecko>) -> Self {
        self.geckos = geckos;
        self
    }

    /// Whether (row, column) lies inside this rack
    pub fn contains(&self, row: u32, column: u32) -> bool {
        (1..=self.rows).contains(&row) && (1..=self.columns).contains(&column)
    }

    /// Number of cells
    /// Cell count; saturates on dimensions the server should never send
    pub fn capacity(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    /// The gecko stored at (row, column), if any
    pub fn occupant_at(&self, row: u32, column: u32) -> Option<&Gecko> {
        self.geckos.iter().find(|g| g.row == row && g.column == column)
    }

    /// Geckos that would fall outside a rack resized to `rows` × `columns`
    pub fn occupants_outside(&self, rows: u32, columns: u32) -> Vec<&Gecko> {
        self.geckos
            .iter()
            .filter(|g| g.row > rows || g.column > columns)
            .collect()
    }
}

impl Entity for Rack {
    type Id = RackId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Parse a rack dimension typed into a form field
pub fn parse_dimension(label: &str, input: &str) -> DomainResult<u32> {
    let value = input
        .trim()
        .parse::<u32>()
        .map_err(|_| DomainError::InvalidInput(format!("{label} must be a number")))?;
    validate_dimension(label, value)
}

fn validate_dimension(label: &str, value: u32) -> DomainResult<u32> {
    if (1..=MAX_RACK_DIMENSION).contains(&value) {
        Ok(value)
    } else {
        Err(DomainError::InvalidInput(format!(
            "{label} must be between 1 and {MAX_RACK_DIMENSION}"
        )))
    }
}

fn validate_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidInput("rack name is required".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Payload for `POST /racks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRack {
    pub name: String,
    pub rows: u32,
    pub columns: u32,
}

impl CreateRack {
    pub fn new(name: &str, rows: u32, columns: u32) -> DomainResult<Self> {
        Ok(Self {
            name: validate_name(name)?,
            rows: validate_dimension("rows", rows)?,
            columns: validate_dimension("columns", columns)?,
        })
    }
}

/// Payload for `PUT /racks/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateRack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
}

impl UpdateRack {
    /// Validate an edit of `rack`; refuses resizes that would strand geckos
    pub fn for_rack(rack: &Rack, name: &str, rows: u32, columns: u32) -> DomainResult<Self> {
        let name = validate_name(name)?;
        let rows = validate_dimension("rows", rows)?;
        let columns = validate_dimension("columns", columns)?;

        let outside = rack.occupants_outside(rows, columns).len();
        if outside > 0 {
            return Err(DomainError::Conflict(format!(
                "{outside} gecko(s) are outside the new size; move them first"
            )));
        }

        Ok(Self {
            name: Some(name),
            rows: Some(rows),
            columns: Some(columns),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rack_with(geckos: Vec<Gecko>) -> Rack {
        Rack::new(1, "Main", 3, 4).with_geckos(geckos)
    }

    #[test]
    fn test_rack_contains_bounds() {
        let rack = Rack::new(1, "Main", 3, 4);
        assert!(rack.contains(1, 1));
        assert!(rack.contains(3, 4));
        assert!(!rack.contains(0, 1));
        assert!(!rack.contains(4, 1));
        assert!(!rack.contains(1, 5));
        assert_eq!(rack.capacity(), 12);
    }

    #[test]
    fn test_capacity_saturates_on_huge_dimensions() {
        let rack = Rack::new(1, "Broken", u32::MAX, 3);
        assert_eq!(rack.capacity(), u32::MAX);
    }

    #[test]
    fn test_occupant_at() {
        let rack = rack_with(vec![Gecko::new(7, "Mango", 1, 2, 3)]);
        assert_eq!(rack.occupant_at(2, 3).map(|g| g.id), Some(7));
        assert!(rack.occupant_at(3, 2).is_none());
    }

    #[test]
    fn test_create_rack_validation() {
        let ok = CreateRack::new("  Shelf A ", 3, 4).unwrap();
        assert_eq!(ok.name, "Shelf A");

        assert!(matches!(CreateRack::new("   ", 3, 4), Err(DomainError::InvalidInput(_))));
        assert!(matches!(CreateRack::new("A", 0, 4), Err(DomainError::InvalidInput(_))));
        assert!(matches!(CreateRack::new("A", 3, 21), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("rows", " 5 ").unwrap(), 5);
        assert!(parse_dimension("rows", "five").is_err());
        assert!(parse_dimension("rows", "-1").is_err());
        assert!(parse_dimension("columns", "25").is_err());
    }

    #[test]
    fn test_update_refuses_stranding_geckos() {
        let rack = rack_with(vec![Gecko::new(1, "A", 1, 3, 1), Gecko::new(2, "B", 1, 1, 4)]);

        assert_eq!(rack.occupants_outside(2, 4).len(), 1);
        assert_eq!(rack.occupants_outside(2, 3).len(), 2);

        let err = UpdateRack::for_rack(&rack, "Main", 2, 3).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(err.detail().starts_with("2 gecko(s)"));

        let update = UpdateRack::for_rack(&rack, "Bigger", 5, 5).unwrap();
        assert_eq!(update.rows, Some(5));
        assert_eq!(update.name.as_deref(), Some("Bigger"));
    }

    #[test]
    fn test_rack_deserializes_without_geckos() {
        let rack: Rack = serde_json::from_str(
            r#"{"id":3,"name":"Tubs","rows":2,"columns":5,"userId":9,"createdAt":"2024-05-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(rack.user_id, Some(9));
        assert!(rack.geckos.is_empty());
        assert!(rack.created_at.is_some());
    }
}
