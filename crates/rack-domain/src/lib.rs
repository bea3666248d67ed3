//! Gecko Rack Domain
//!
//! Core entities and the pure computations over them:
//! - rack grid layout (cells derived from rows × columns and occupants)
//! - care-log recency (per-gecko urgency)
//! - placement state machine (tap / long-press / drag → view, create, move, swap)
//!
//! This crate does no I/O. Time is always passed in by the caller.

mod entity;
mod rack;
mod gecko;
mod care_log;
mod care_status;
mod photo;
mod user;
mod grid;
mod placement;

pub use entity::{Entity, DomainError, DomainResult};
pub use rack::{Rack, RackId, CreateRack, UpdateRack, MAX_RACK_DIMENSION, parse_dimension};
pub use gecko::{Gecko, GeckoId, Gender, GeckoProfile, CreateGecko, UpdateGecko, MoveGecko, SwapGeckos, SwapResult};
pub use care_log::{
    CareLog, CareLogId, CareType, CareLogDraft, EggKind, WeightPoint, WeightSummary,
    days_since, parse_weight_input, sort_newest_first, weight_history,
};
pub use care_status::{
    CareStatus, CareReport, CollectionSummary, CARE_THRESHOLD_DAYS,
    care_threshold, cell_status, gecko_status, latest_log, needs_attention,
};
pub use photo::{Photo, PhotoId};
pub use user::{User, UserId, Alert, AuthResponse, LoginRequest, RegisterRequest};
pub use grid::{Position, GridCell, GridRow, RackGrid, GridError, validate_occupants};
pub use placement::{
    CellTarget, OccupantRef, Selection, Gesture, PlacementAction, PlacementState, PlacementMachine, Outcome,
};
