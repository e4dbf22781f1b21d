//! Drag-and-drop over a vertical list of handles.
//!
//! Input sensors (mouse, keyboard) drive a [`DragState`]; a committed drop
//! produces a [`DragEndEvent`] the owner turns into a reorder.

use tracing::trace;

#[derive(Debug, Clone, PartialEq)]
pub struct DragEndEvent {
    pub active_id: String,
    pub over_id: Option<String>,
}

/// Resolves the drop target for a pointer position over the item list.
pub trait CollisionStrategy {
    /// `items` are laid out one per row starting at `top`.
    fn resolve(&self, items: &[String], top: u16, pointer_row: u16) -> Option<String>;
}

/// Picks the item whose row centre is nearest to the pointer. Pointers
/// outside the list resolve to nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClosestCenter;

impl CollisionStrategy for ClosestCenter {
    fn resolve(&self, items: &[String], top: u16, pointer_row: u16) -> Option<String> {
        if items.is_empty() || pointer_row < top {
            return None;
        }
        let offset = usize::from(pointer_row - top);
        if offset >= items.len() {
            return None;
        }
        // Every row is one cell high, so the nearest centre is the row under the pointer.
        items
            .iter()
            .enumerate()
            .min_by_key(|(idx, _)| idx.abs_diff(offset))
            .map(|(_, id)| id.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sensor {
    Mouse,
    Keyboard,
}

#[derive(Debug, Default)]
pub struct DragState {
    active: Option<(String, Sensor)>,
    over: Option<String>,
}

impl DragState {
    pub fn start(&mut self, active_id: &str, sensor: Sensor) {
        trace!("Drag start {active_id} ({sensor:?})");
        self.active = Some((active_id.to_string(), sensor));
        self.over = Some(active_id.to_string());
    }

    pub fn move_over(&mut self, over_id: Option<String>) {
        if self.active.is_some() {
            self.over = over_id;
        }
    }

    /// Finishes the gesture. Returns nothing if no drag was in progress.
    pub fn end(&mut self) -> Option<DragEndEvent> {
        let (active_id, _) = self.active.take()?;
        let over_id = self.over.take();
        trace!("Drag end {active_id} over {over_id:?}");
        Some(DragEndEvent { active_id, over_id })
    }

    pub fn cancel(&mut self) {
        if let Some((active_id, _)) = self.active.take() {
            trace!("Drag cancelled {active_id}");
        }
        self.over = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn sensor(&self) -> Option<Sensor> {
        self.active.as_ref().map(|(_, sensor)| *sensor)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|(id, _)| id.as_str())
    }

    pub fn over_id(&self) -> Option<&str> {
        self.over.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<String> {
        ["a", "b", "c"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn closest_center_resolves_rows() {
        let strategy = ClosestCenter;
        assert_eq!(strategy.resolve(&items(), 4, 4), Some("a".to_string()));
        assert_eq!(strategy.resolve(&items(), 4, 6), Some("c".to_string()));
        assert_eq!(strategy.resolve(&items(), 4, 3), None);
        assert_eq!(strategy.resolve(&items(), 4, 7), None);
        assert_eq!(strategy.resolve(&[], 0, 0), None);
    }

    #[test]
    fn committed_drop_reports_target() {
        let mut drag = DragState::default();
        drag.start("a", Sensor::Mouse);
        drag.move_over(Some("c".to_string()));
        assert_eq!(
            drag.end(),
            Some(DragEndEvent {
                active_id: "a".to_string(),
                over_id: Some("c".to_string()),
            })
        );
        assert!(!drag.is_dragging());
    }

    #[test]
    fn drop_outside_has_no_target() {
        let mut drag = DragState::default();
        drag.start("b", Sensor::Keyboard);
        drag.move_over(None);
        assert_eq!(drag.end().unwrap().over_id, None);
    }

    #[test]
    fn cancelled_drag_commits_nothing() {
        let mut drag = DragState::default();
        drag.start("b", Sensor::Keyboard);
        drag.cancel();
        assert_eq!(drag.end(), None);
    }

    #[test]
    fn moves_without_drag_are_ignored() {
        let mut drag = DragState::default();
        drag.move_over(Some("a".to_string()));
        assert_eq!(drag.over_id(), None);
        assert_eq!(drag.end(), None);
    }
}
