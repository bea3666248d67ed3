//! Photo Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::gecko::GeckoId;

pub type PhotoId = u32;

/// A gallery photo; at most one per gecko is the main photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: PhotoId,
    pub photo_url: String,
    #[serde(default)]
    pub is_main: bool,
    #[serde(default)]
    pub taken_at: Option<DateTime<Utc>>,
    pub gecko_id: GeckoId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Entity for Photo {
    type Id = PhotoId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
