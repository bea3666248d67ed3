//! Placement State Machine
//!
//! Turns cell gestures into view / create / move / swap decisions.
//!
//! ```text
//! Idle ──long-press / drag occupied──▶ Selected ──target──▶ Pending ──complete──▶ Idle
//!   ▲                                     │
//!   └────────── cancel / same cell ◀──────┘
//! ```
//!
//! `Pending` covers the time a move or swap request is in flight; every
//! gesture is ignored until [`PlacementMachine::complete`] is called, which
//! always returns to `Idle` whether the request succeeded or not.

use super::gecko::GeckoId;
use super::grid::{GridCell, Position};

/// The occupant of a touched cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupantRef {
    pub id: GeckoId,
    pub name: String,
}

/// What the UI knows about the cell under a gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellTarget {
    pub position: Position,
    pub occupant: Option<OccupantRef>,
}

impl CellTarget {
    pub fn empty(position: Position) -> Self {
        Self { position, occupant: None }
    }

    pub fn occupied(position: Position, id: GeckoId, name: impl Into<String>) -> Self {
        Self {
            position,
            occupant: Some(OccupantRef { id, name: name.into() }),
        }
    }
}

impl From<&GridCell> for CellTarget {
    fn from(cell: &GridCell) -> Self {
        Self {
            position: cell.position(),
            occupant: cell.occupant.as_ref().map(|g| OccupantRef {
                id: g.id,
                name: g.name.clone(),
            }),
        }
    }
}

/// The gecko picked up for relocation and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub gecko_id: GeckoId,
    pub gecko_name: String,
    pub source: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    Tap(CellTarget),
    LongPress(CellTarget),
    DragStart(CellTarget),
    /// Drag released; `None` when released outside every cell
    Drop(Option<CellTarget>),
    Cancel,
}

/// Request the caller must send to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementAction {
    Move { gecko_id: GeckoId, target: Position },
    Swap { gecko_id: GeckoId, other_id: GeckoId },
}

impl PlacementAction {
    /// The gecko that was selected
    pub fn gecko_id(&self) -> GeckoId {
        match self {
            PlacementAction::Move { gecko_id, .. } | PlacementAction::Swap { gecko_id, .. } => *gecko_id,
        }
    }

    pub fn involves(&self, id: GeckoId) -> bool {
        match self {
            PlacementAction::Move { gecko_id, .. } => *gecko_id == id,
            PlacementAction::Swap { gecko_id, other_id } => *gecko_id == id || *other_id == id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlacementState {
    #[default]
    Idle,
    Selected(Selection),
    Pending { selection: Selection, action: PlacementAction },
}

/// Result of feeding one gesture to the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Show the gecko's detail screen
    OpenDetail { gecko_id: GeckoId, position: Position },
    /// Start the creation flow for an empty cell
    OpenCreate(Position),
    Selected(Selection),
    Cancelled,
    /// Send this request; the machine is now `Pending`
    Dispatch(PlacementAction),
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementMachine {
    state: PlacementState,
}

impl PlacementMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, PlacementState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, PlacementState::Pending { .. })
    }

    /// Selection while picking a target or waiting on the server
    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            PlacementState::Idle => None,
            PlacementState::Selected(selection) | PlacementState::Pending { selection, .. } => Some(selection),
        }
    }

    pub fn selected_gecko(&self) -> Option<GeckoId> {
        self.selection().map(|s| s.gecko_id)
    }

    pub fn handle(&mut self, gesture: Gesture) -> Outcome {
        match std::mem::take(&mut self.state) {
            PlacementState::Idle => self.from_idle(gesture),
            PlacementState::Selected(selection) => self.from_selected(selection, gesture),
            pending @ PlacementState::Pending { .. } => {
                self.state = pending;
                Outcome::Ignored
            }
        }
    }

    /// Finish the in-flight request. Returns to `Idle` on success and on failure.
    pub fn complete(&mut self) -> Option<PlacementAction> {
        match std::mem::take(&mut self.state) {
            PlacementState::Pending { action, .. } => Some(action),
            other => {
                self.state = other;
                None
            }
        }
    }

    fn from_idle(&mut self, gesture: Gesture) -> Outcome {
        match gesture {
            Gesture::Tap(target) => match target.occupant {
                Some(occupant) => Outcome::OpenDetail {
                    gecko_id: occupant.id,
                    position: target.position,
                },
                None => Outcome::OpenCreate(target.position),
            },
            Gesture::LongPress(target) | Gesture::DragStart(target) => self.select(target),
            Gesture::Drop(_) | Gesture::Cancel => Outcome::Ignored,
        }
    }

    fn from_selected(&mut self, selection: Selection, gesture: Gesture) -> Outcome {
        match gesture {
            Gesture::Tap(target) | Gesture::Drop(Some(target)) => self.target(selection, target),
            Gesture::LongPress(target) | Gesture::DragStart(target) => {
                if target.occupant.is_some() {
                    self.select(target)
                } else {
                    self.state = PlacementState::Selected(selection);
                    Outcome::Ignored
                }
            }
            Gesture::Drop(None) | Gesture::Cancel => Outcome::Cancelled,
        }
    }

    fn select(&mut self, target: CellTarget) -> Outcome {
        let Some(occupant) = target.occupant else {
            return Outcome::Ignored;
        };
        let selection = Selection {
            gecko_id: occupant.id,
            gecko_name: occupant.name,
            source: target.position,
        };
        self.state = PlacementState::Selected(selection.clone());
        Outcome::Selected(selection)
    }

    fn target(&mut self, selection: Selection, target: CellTarget) -> Outcome {
        if target.position == selection.source {
            return Outcome::Cancelled;
        }

        let action = match target.occupant {
            None => PlacementAction::Move {
                gecko_id: selection.gecko_id,
                target: target.position,
            },
            Some(other) if other.id != selection.gecko_id => PlacementAction::Swap {
                gecko_id: selection.gecko_id,
                other_id: other.id,
            },
            // the selected gecko reported at another cell: stale layout
            Some(_) => return Outcome::Cancelled,
        };

        self.state = PlacementState::Pending { selection, action };
        Outcome::Dispatch(action)
    }
}
