//! Placement driver
//!
//! Feeds gestures to the [`PlacementMachine`], sends the resulting move or
//! swap to the server, re-fetches racks and always settles back to idle.

use std::cell::{Ref, RefCell};

use rack_domain::{
    GeckoId, Gesture, MoveGecko, Outcome, PlacementAction, PlacementMachine, Position, Rack, Selection,
};
use tracing::{debug, info, warn};

use crate::api::PlacementApi;
use crate::error::{ApiError, ApiOperation};

/// What the screen should do after a gesture
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementEvent {
    OpenDetail { gecko_id: GeckoId, position: Position },
    OpenCreate(Position),
    Selected(Selection),
    Cancelled,
    Ignored,
    /// Server accepted the action; `racks` is the refreshed collection
    Completed { action: PlacementAction, racks: Vec<Rack> },
    /// Server accepted the action but re-fetching racks failed; the shown grid is stale
    Unrefreshed { action: PlacementAction, error: ApiError, message: String },
    /// Server refused or was unreachable; positions are unchanged
    Failed { action: PlacementAction, error: ApiError, message: String },
}

/// Owner of the machine between awaits
///
/// Borrowed only for the synchronous step, so the request can be awaited
/// without holding it. Returns `None` once the owner is gone.
pub trait MachineSlot {
    fn with_machine<R>(&self, f: impl FnOnce(&mut PlacementMachine) -> R) -> Option<R>;
}

impl MachineSlot for RefCell<PlacementMachine> {
    fn with_machine<R>(&self, f: impl FnOnce(&mut PlacementMachine) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

pub fn operation_for(action: &PlacementAction) -> ApiOperation {
    match action {
        PlacementAction::Move { .. } => ApiOperation::MoveGecko,
        PlacementAction::Swap { .. } => ApiOperation::SwapGeckos,
    }
}

async fn send<A: PlacementApi + ?Sized>(api: &A, action: &PlacementAction) -> Result<(), ApiError> {
    match *action {
        PlacementAction::Move { gecko_id, target } => {
            info!(gecko_id, rack_id = target.rack_id, row = target.row, column = target.column, "moving gecko");
            api.move_gecko(gecko_id, &MoveGecko::from(target)).await?;
        }
        PlacementAction::Swap { gecko_id, other_id } => {
            info!(gecko_id, other_id, "swapping geckos");
            api.swap_geckos(gecko_id, other_id).await?;
        }
    }
    Ok(())
}

/// Send `action`, then re-fetch every rack
///
/// A refused action is `Failed`; an accepted one is never reported as
/// failed, even when the re-fetch is.
pub async fn execute_action<A: PlacementApi + ?Sized>(api: &A, action: PlacementAction) -> PlacementEvent {
    if let Err(error) = send(api, &action).await {
        let message = error.user_message(operation_for(&action));
        warn!(?action, error = %error, "placement failed");
        return PlacementEvent::Failed { action, error, message };
    }

    match api.list_racks().await {
        Ok(racks) => PlacementEvent::Completed { action, racks },
        Err(error) => {
            let message = error.user_message(ApiOperation::LoadRacks);
            warn!(?action, error = %error, "placement applied but racks could not be re-fetched");
            PlacementEvent::Unrefreshed { action, error, message }
        }
    }
}

fn event_for(outcome: Outcome) -> PlacementEvent {
    match outcome {
        Outcome::OpenDetail { gecko_id, position } => PlacementEvent::OpenDetail { gecko_id, position },
        Outcome::OpenCreate(position) => PlacementEvent::OpenCreate(position),
        Outcome::Selected(selection) => PlacementEvent::Selected(selection),
        Outcome::Cancelled => PlacementEvent::Cancelled,
        Outcome::Ignored | Outcome::Dispatch(_) => PlacementEvent::Ignored,
    }
}

/// Run one gesture: step the machine, send any dispatched action, settle back to idle
pub async fn run_gesture<A, S>(api: &A, slot: &S, gesture: Gesture) -> PlacementEvent
where
    A: PlacementApi + ?Sized,
    S: MachineSlot,
{
    debug!(?gesture, "gesture");
    let Some(outcome) = slot.with_machine(|m| m.handle(gesture)) else {
        return PlacementEvent::Ignored;
    };
    let Outcome::Dispatch(action) = outcome else {
        return event_for(outcome);
    };

    let event = execute_action(api, action).await;
    slot.with_machine(|m| {
        m.complete();
    });
    event
}

pub struct PlacementController<A> {
    api: A,
    machine: RefCell<PlacementMachine>,
}

impl<A: PlacementApi> PlacementController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            machine: RefCell::new(PlacementMachine::new()),
        }
    }

    pub fn machine(&self) -> Ref<'_, PlacementMachine> {
        self.machine.borrow()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn handle(&self, gesture: Gesture) -> PlacementEvent {
        run_gesture(&self.api, &self.machine, gesture).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rack_domain::{CellTarget, Gecko, RackGrid, SwapResult};
    use std::cell::{Cell, RefCell};

    /// In-memory server holding the one-gecko-per-cell rule
    struct FakeApi {
        racks: RefCell<Vec<Rack>>,
        mutations: Cell<usize>,
        reject_with: Cell<Option<u16>>,
        refresh_fails: Cell<bool>,
    }

    impl FakeApi {
        fn new(racks: Vec<Rack>) -> Self {
            Self {
                racks: RefCell::new(racks),
                mutations: Cell::new(0),
                reject_with: Cell::new(None),
                refresh_fails: Cell::new(false),
            }
        }

        fn gecko(&self, id: GeckoId) -> Gecko {
            self.racks
                .borrow()
                .iter()
                .flat_map(|r| r.geckos.iter())
                .find(|g| g.id == id)
                .cloned()
                .unwrap()
        }

        fn take(&self, id: GeckoId) -> Option<Gecko> {
            let mut racks = self.racks.borrow_mut();
            for rack in racks.iter_mut() {
                if let Some(idx) = rack.geckos.iter().position(|g| g.id == id) {
                    return Some(rack.geckos.remove(idx));
                }
            }
            None
        }

        fn put(&self, mut gecko: Gecko, at: Position) {
            gecko.rack_id = at.rack_id;
            gecko.row = at.row;
            gecko.column = at.column;
            let mut racks = self.racks.borrow_mut();
            if let Some(rack) = racks.iter_mut().find(|r| r.id == at.rack_id) {
                rack.geckos.push(gecko);
            }
        }

        fn check_rejection(&self) -> Result<(), ApiError> {
            match self.reject_with.get() {
                Some(status) => Err(ApiError::Server {
                    status,
                    message: Some("Target cell is occupied".to_string()),
                }),
                None => Ok(()),
            }
        }
    }

    #[async_trait(?Send)]
    impl PlacementApi for FakeApi {
        async fn list_racks(&self) -> Result<Vec<Rack>, ApiError> {
            if self.refresh_fails.get() {
                return Err(ApiError::Timeout);
            }
            Ok(self.racks.borrow().clone())
        }

        async fn move_gecko(&self, id: GeckoId, target: &MoveGecko) -> Result<Gecko, ApiError> {
            self.mutations.set(self.mutations.get() + 1);
            self.check_rejection()?;
            let at = Position::new(target.rack_id, target.row, target.column);
            let occupied = self
                .racks
                .borrow()
                .iter()
                .find(|r| r.id == at.rack_id)
                .map(|r| !r.contains(at.row, at.column) || r.occupant_at(at.row, at.column).is_some())
                .unwrap_or(true);
            if occupied {
                return Err(ApiError::from_status(409, r#"{"message":"Cell unavailable"}"#));
            }
            let gecko = self.take(id).ok_or_else(|| ApiError::from_status(404, "{}"))?;
            self.put(gecko, at);
            Ok(self.gecko(id))
        }

        async fn swap_geckos(&self, first: GeckoId, second: GeckoId) -> Result<SwapResult, ApiError> {
            self.mutations.set(self.mutations.get() + 1);
            self.check_rejection()?;
            let a = self.take(first).ok_or_else(|| ApiError::from_status(404, "{}"))?;
            let b = self.take(second).ok_or_else(|| ApiError::from_status(404, "{}"))?;
            let (pa, pb) = (a.position(), b.position());
            self.put(a, pb);
            self.put(b, pa);
            Ok(SwapResult { gecko1: self.gecko(first), gecko2: self.gecko(second) })
        }
    }

    fn collection() -> Vec<Rack> {
        vec![
            Rack::new(1, "Top", 2, 2).with_geckos(vec![
                Gecko::new(10, "Mango", 1, 1, 1),
                Gecko::new(11, "Kiwi", 1, 2, 2),
            ]),
            Rack::new(2, "Bottom", 1, 3).with_geckos(vec![Gecko::new(12, "Olive", 2, 1, 3)]),
        ]
    }

    fn target(racks: &[Rack], rack_id: u32, row: u32, column: u32) -> CellTarget {
        let rack = racks.iter().find(|r| r.id == rack_id).unwrap();
        let grid = RackGrid::build(rack).unwrap();
        CellTarget::from(grid.cell(row, column).unwrap())
    }

    #[tokio::test]
    async fn test_tap_empty_opens_create_without_calls() {
        let racks = collection();
        let controller = PlacementController::new(FakeApi::new(racks.clone()));

        let event = controller.handle(Gesture::Tap(target(&racks, 1, 2, 1))).await;
        assert_eq!(event, PlacementEvent::OpenCreate(Position::new(1, 2, 1)));
        assert_eq!(controller.api().mutations.get(), 0);
        assert!(controller.machine().is_idle());
    }

    #[tokio::test]
    async fn test_move_places_gecko_alone_at_target() {
        let racks = collection();
        let controller = PlacementController::new(FakeApi::new(racks.clone()));

        controller.handle(Gesture::LongPress(target(&racks, 1, 1, 1))).await;
        let event = controller.handle(Gesture::Tap(target(&racks, 2, 1, 1))).await;

        let PlacementEvent::Completed { action, racks } = event else {
            panic!("expected completion, got {event:?}");
        };
        assert_eq!(action, PlacementAction::Move { gecko_id: 10, target: Position::new(2, 1, 1) });

        let bottom = RackGrid::build(racks.iter().find(|r| r.id == 2).unwrap()).unwrap();
        assert_eq!(bottom.cell(1, 1).unwrap().occupant_id(), Some(10));
        let top = RackGrid::build(racks.iter().find(|r| r.id == 1).unwrap()).unwrap();
        assert!(top.locate(10).is_none());
        assert!(controller.machine().is_idle());
    }

    #[tokio::test]
    async fn test_swap_exchanges_and_twice_restores() {
        let racks = collection();
        let controller = PlacementController::new(FakeApi::new(racks.clone()));

        controller.handle(Gesture::LongPress(target(&racks, 1, 1, 1))).await;
        let event = controller.handle(Gesture::Tap(target(&racks, 2, 1, 3))).await;
        assert_eq!(controller.api().mutations.get(), 1);

        let PlacementEvent::Completed { action, racks: swapped } = event else {
            panic!("expected completion, got {event:?}");
        };
        assert_eq!(action, PlacementAction::Swap { gecko_id: 10, other_id: 12 });
        let top = swapped.iter().find(|r| r.id == 1).unwrap();
        let bottom = swapped.iter().find(|r| r.id == 2).unwrap();
        assert_eq!(top.occupant_at(1, 1).map(|g| g.id), Some(12));
        assert_eq!(bottom.occupant_at(1, 3).map(|g| g.id), Some(10));

        controller.handle(Gesture::LongPress(target(&swapped, 1, 1, 1))).await;
        let event = controller.handle(Gesture::Tap(target(&swapped, 2, 1, 3))).await;
        let PlacementEvent::Completed { racks: restored, .. } = event else {
            panic!("expected completion, got {event:?}");
        };
        for original in collection().iter().flat_map(|r| r.geckos.iter()) {
            let now = restored.iter().flat_map(|r| r.geckos.iter()).find(|g| g.id == original.id).unwrap();
            assert_eq!(now.position(), original.position());
        }
    }

    #[tokio::test]
    async fn test_rejected_move_leaves_position_and_goes_idle() {
        let racks = collection();
        let api = FakeApi::new(racks.clone());
        api.reject_with.set(Some(409));
        let controller = PlacementController::new(api);

        controller.handle(Gesture::LongPress(target(&racks, 1, 1, 1))).await;
        let event = controller.handle(Gesture::Tap(target(&racks, 1, 2, 1))).await;

        let PlacementEvent::Failed { error, message, .. } = event else {
            panic!("expected failure, got {event:?}");
        };
        assert_eq!(error.status(), Some(409));
        assert_eq!(message, "Target cell is occupied");
        assert!(controller.machine().is_idle());
        assert_eq!(controller.api().gecko(10).position(), Position::new(1, 1, 1));
    }

    #[tokio::test]
    async fn test_tap_source_cancels_without_calls() {
        let racks = collection();
        let controller = PlacementController::new(FakeApi::new(racks.clone()));

        let event = controller.handle(Gesture::LongPress(target(&racks, 1, 2, 2))).await;
        assert!(matches!(event, PlacementEvent::Selected(ref s) if s.gecko_id == 11));

        let event = controller.handle(Gesture::Tap(target(&racks, 1, 2, 2))).await;
        assert_eq!(event, PlacementEvent::Cancelled);
        assert_eq!(controller.api().mutations.get(), 0);
    }

    #[tokio::test]
    async fn test_refused_swap_uses_fallback_message() {
        let api = FakeApi::new(collection());
        api.refresh_fails.set(true);

        // unknown gecko: the swap itself is refused
        let event = execute_action(&api, PlacementAction::Swap { gecko_id: 99, other_id: 10 }).await;
        let PlacementEvent::Failed { message, .. } = event else {
            panic!("expected failure, got {event:?}");
        };
        assert_eq!(message, "Failed to swap the geckos.");
    }

    #[tokio::test]
    async fn test_swap_applied_but_refresh_failed_is_not_a_failure() {
        let racks = collection();
        let api = FakeApi::new(racks.clone());
        api.refresh_fails.set(true);
        let controller = PlacementController::new(api);

        controller.handle(Gesture::LongPress(target(&racks, 1, 1, 1))).await;
        let event = controller.handle(Gesture::Tap(target(&racks, 2, 1, 3))).await;

        let PlacementEvent::Unrefreshed { action, error, message } = event else {
            panic!("expected a stale-grid event, got {event:?}");
        };
        assert_eq!(action, PlacementAction::Swap { gecko_id: 10, other_id: 12 });
        assert_eq!(error, ApiError::Timeout);
        assert!(message.starts_with("Failed to load racks."));
        assert_eq!(controller.api().gecko(10).position(), Position::new(2, 1, 3));
        assert_eq!(controller.api().mutations.get(), 1);
        assert!(controller.machine().is_idle());
    }

    /// Slot whose owner has gone away
    struct Dropped;

    impl MachineSlot for Dropped {
        fn with_machine<R>(&self, _f: impl FnOnce(&mut PlacementMachine) -> R) -> Option<R> {
            None
        }
    }

    #[tokio::test]
    async fn test_gesture_without_machine_is_ignored() {
        let racks = collection();
        let api = FakeApi::new(racks.clone());

        let event = run_gesture(&api, &Dropped, Gesture::Tap(target(&racks, 1, 1, 1))).await;
        assert_eq!(event, PlacementEvent::Ignored);
        assert_eq!(api.mutations.get(), 0);
    }
}
