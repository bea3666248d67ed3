//! Press tracking without any DOM access
//!
//! One pointer at a time. A press becomes a tap on release, a long press
//! after [`LONG_PRESS_MS`](crate::LONG_PRESS_MS) without movement, or a
//! drag once it moves past [`DRAG_THRESHOLD_PX`](crate::DRAG_THRESHOLD_PX).

use crate::DRAG_THRESHOLD_PX;

/// Gesture reported to the grid owner
#[derive(Clone, Debug, PartialEq)]
pub enum GridGesture<K> {
    Tap(K),
    LongPress(K),
    DragStart(K),
    /// `target` is `None` when released outside every keyed cell
    Drop { source: K, target: Option<K> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressPhase {
    Idle,
    Pressed,
    LongPressed,
    Dragging,
    /// Moved off a cell that cannot be dragged; release reports nothing
    Abandoned,
}

/// Movement beyond the drag threshold on either axis
pub fn exceeds_threshold(dx: i32, dy: i32) -> bool {
    dx.abs() > DRAG_THRESHOLD_PX || dy.abs() > DRAG_THRESHOLD_PX
}

#[derive(Clone, Debug)]
pub struct PressTracker<K> {
    phase: PressPhase,
    key: Option<K>,
    draggable: bool,
    origin: (i32, i32),
    generation: u32,
    hover: Option<K>,
}

impl<K> Default for PressTracker<K> {
    fn default() -> Self {
        Self {
            phase: PressPhase::Idle,
            key: None,
            draggable: false,
            origin: (0, 0),
            generation: 0,
            hover: None,
        }
    }
}

impl<K: Clone + PartialEq> PressTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> PressPhase {
        self.phase
    }

    /// Cell being dragged
    pub fn dragging(&self) -> Option<&K> {
        match self.phase {
            PressPhase::Dragging => self.key.as_ref(),
            _ => None,
        }
    }

    /// Cell under the pointer while dragging
    pub fn hover(&self) -> Option<&K> {
        self.hover.as_ref()
    }

    /// Start a press; returns the generation the long-press timer must present
    pub fn press(&mut self, key: K, draggable: bool, x: i32, y: i32) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.phase = PressPhase::Pressed;
        self.key = Some(key);
        self.draggable = draggable;
        self.origin = (x, y);
        self.hover = None;
        self.generation
    }

    /// Long-press timer fired
    pub fn long_press_elapsed(&mut self, generation: u32) -> Option<GridGesture<K>> {
        if generation != self.generation || self.phase != PressPhase::Pressed {
            return None;
        }
        self.phase = PressPhase::LongPressed;
        self.key.clone().map(GridGesture::LongPress)
    }

    /// Pointer moved to `(x, y)` over `over`
    pub fn movement(&mut self, x: i32, y: i32, over: Option<K>) -> Option<GridGesture<K>> {
        match self.phase {
            PressPhase::Pressed | PressPhase::LongPressed => {
                if !exceeds_threshold(x - self.origin.0, y - self.origin.1) {
                    return None;
                }
                if !self.draggable {
                    self.phase = PressPhase::Abandoned;
                    return None;
                }
                self.phase = PressPhase::Dragging;
                self.hover = over;
                self.key.clone().map(GridGesture::DragStart)
            }
            PressPhase::Dragging => {
                self.hover = over;
                None
            }
            PressPhase::Idle | PressPhase::Abandoned => None,
        }
    }

    /// Pointer released over `target`
    pub fn release(&mut self, target: Option<K>) -> Option<GridGesture<K>> {
        let phase = std::mem::replace(&mut self.phase, PressPhase::Idle);
        let key = self.key.take();
        self.hover = None;
        match phase {
            PressPhase::Pressed => key.map(GridGesture::Tap),
            PressPhase::Dragging => key.map(|source| GridGesture::Drop { source, target }),
            // long press already reported
            PressPhase::LongPressed | PressPhase::Abandoned | PressPhase::Idle => None,
        }
    }

    /// Pointer cancelled by the browser (scroll, lost capture)
    pub fn cancel(&mut self) -> Option<GridGesture<K>> {
        let was_dragging = self.phase == PressPhase::Dragging;
        let key = self.key.take();
        self.phase = PressPhase::Idle;
        self.hover = None;
        match (was_dragging, key) {
            (true, Some(source)) => Some(GridGesture::Drop { source, target: None }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        assert!(!exceeds_threshold(10, -10));
        assert!(exceeds_threshold(11, 0));
        assert!(exceeds_threshold(0, -11));
    }

    #[test]
    fn test_quick_release_is_tap() {
        let mut t = PressTracker::new();
        t.press(3u32, true, 100, 100);
        assert_eq!(t.movement(104, 98, Some(3)), None);
        assert_eq!(t.release(Some(3)), Some(GridGesture::Tap(3)));
        assert_eq!(t.phase(), PressPhase::Idle);
    }

    #[test]
    fn test_long_press_then_release_reports_once() {
        let mut t = PressTracker::new();
        let generation = t.press(3u32, true, 0, 0);
        assert_eq!(t.long_press_elapsed(generation), Some(GridGesture::LongPress(3)));
        assert_eq!(t.long_press_elapsed(generation), None);
        assert_eq!(t.release(Some(3)), None);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut t = PressTracker::new();
        let first = t.press(1u32, true, 0, 0);
        t.release(Some(1));
        t.press(2u32, true, 0, 0);
        assert_eq!(t.long_press_elapsed(first), None);
    }

    #[test]
    fn test_drag_and_drop() {
        let mut t = PressTracker::new();
        t.press(1u32, true, 0, 0);
        assert_eq!(t.movement(20, 0, Some(1)), Some(GridGesture::DragStart(1)));
        assert_eq!(t.dragging(), Some(&1));

        assert_eq!(t.movement(60, 5, Some(2)), None);
        assert_eq!(t.hover(), Some(&2));

        assert_eq!(t.release(Some(2)), Some(GridGesture::Drop { source: 1, target: Some(2) }));
        assert_eq!(t.dragging(), None);
        assert_eq!(t.hover(), None);
    }

    #[test]
    fn test_drag_after_long_press() {
        let mut t = PressTracker::new();
        let generation = t.press(1u32, true, 0, 0);
        t.long_press_elapsed(generation);
        assert_eq!(t.movement(0, 30, None), Some(GridGesture::DragStart(1)));
        assert_eq!(t.release(None), Some(GridGesture::Drop { source: 1, target: None }));
    }

    #[test]
    fn test_moving_off_undraggable_cell_abandons() {
        let mut t = PressTracker::new();
        let generation = t.press(5u32, false, 0, 0);
        assert_eq!(t.movement(40, 0, None), None);
        assert_eq!(t.phase(), PressPhase::Abandoned);
        assert_eq!(t.long_press_elapsed(generation), None);
        assert_eq!(t.release(Some(5)), None);
    }

    #[test]
    fn test_cancel_while_dragging_drops_nowhere() {
        let mut t = PressTracker::new();
        t.press(1u32, true, 0, 0);
        t.movement(50, 50, None);
        assert_eq!(t.cancel(), Some(GridGesture::Drop { source: 1, target: None }));

        t.press(1u32, true, 0, 0);
        assert_eq!(t.cancel(), None);
    }
}
