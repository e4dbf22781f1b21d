use tracing::{debug, info, trace};

use crate::columns::{ColumnDef, Person, column_ids, generate_rows, registry};
use crate::domain::{HELP_TEXT, Message, TableConfig};
use crate::drag::{ClosestCenter, CollisionStrategy, DragEndEvent, DragState, Sensor};
use crate::order::{ColumnOrder, default_order, reorder};
use crate::store::PreferenceStore;
use crate::ui::{
    PANEL_HANDLE_END, PANEL_ITEMS_TOP, PANEL_TOGGLE_ALL_ROW, PANEL_WIDTH, STATUSLINE_HEIGHT,
};
use crate::view::{TableGrid, all_columns, visible_columns};
use crate::visibility::{ColumnVisibility, all_visible, is_visible, toggle_all, toggle_one};

#[derive(Debug, PartialEq)]
pub enum Status {
    Ready,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    Panel,
    Popup,
}

/// One row of the settings panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelItem {
    pub id: String,
    pub visible: bool,
    pub dragging: bool,
    pub drop_target: bool,
}

pub struct UIData {
    pub all_visible: bool,
    pub items: Vec<PanelItem>,
    // Row 0 is the "Toggle All" row, column rows follow.
    pub selected_row: usize,
    // Index of the first column row drawn in the panel.
    pub panel_offset: usize,
    pub grid: TableGrid,
    pub show_popup: bool,
    pub popup_message: String,
    pub status_message: String,
}

/// Owns all column state. Everything else only reads it or sends messages.
pub struct Model {
    pub status: Status,
    modus: Modus,
    registry: &'static [ColumnDef],
    all_ids: Vec<String>,
    records: Vec<Person>,
    order: ColumnOrder,
    visibility: ColumnVisibility,
    store: PreferenceStore,
    drag: DragState,
    collision: ClosestCenter,
    curser_row: usize,
    offset_row: usize,
    width: usize,
    height: usize,
    status_message: String,
}

impl Model {
    pub fn init(config: &TableConfig, store: PreferenceStore) -> Self {
        let registry = registry();
        let order = store.load_order(registry);
        let visibility = store.load_visibility(registry);
        info!("Starting with order {order:?}, visibility {visibility:?}");

        Self {
            status: Status::Ready,
            modus: Modus::Panel,
            registry,
            all_ids: column_ids(registry),
            records: generate_rows(config.rows, config.seed),
            order,
            visibility,
            store,
            drag: DragState::default(),
            collision: ClosestCenter,
            curser_row: 0,
            offset_row: 0,
            width: 0,
            height: 0,
            status_message: "Press ? for help".to_string(),
        }
    }

    pub fn order(&self) -> &ColumnOrder {
        &self.order
    }

    pub fn visibility(&self) -> &ColumnVisibility {
        &self.visibility
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn update(&mut self, message: Option<Message>) {
        let Some(msg) = message else {
            return;
        };
        trace!("Update: Modus {:?}, Message {:?}", self.modus, msg);
        match self.modus {
            Modus::Panel => match msg {
                Message::Quit => self.quit(),
                Message::MoveUp => self.move_selection_up(),
                Message::MoveDown => self.move_selection_down(),
                Message::Toggle => self.toggle_selected(),
                Message::ToggleAll => self.toggle_all_columns(),
                Message::Grab => self.grab(),
                Message::Cancel => self.cancel_drag(),
                Message::PointerDown(col, row) => self.pointer_down(col, row),
                Message::PointerDrag(col, row) => self.pointer_drag(col, row),
                Message::PointerUp(col, row) => self.pointer_up(col, row),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Reset => self.reset(),
                Message::Help => self.show_help(),
                Message::Exit => (),
            },
            Modus::Popup => match msg {
                Message::Quit => self.quit(),
                Message::Resize(width, height) => self.ui_resize(width, height),
                Message::Exit | Message::Cancel | Message::Help => self.exit_popup(),
                _ => (),
            },
        }
    }

    pub fn get_uidata(&self) -> UIData {
        let active = self.drag.active_id();
        let over = self.drag.over_id();
        let items = all_columns(self.registry, &self.order)
            .into_iter()
            .map(|c| PanelItem {
                id: c.id.to_string(),
                visible: is_visible(&self.visibility, c.id),
                dragging: active == Some(c.id),
                drop_target: active.is_some() && active != Some(c.id) && over == Some(c.id),
            })
            .collect();
        let columns = visible_columns(self.registry, &self.order, &self.visibility);

        UIData {
            all_visible: all_visible(&self.visibility, &self.all_ids),
            items,
            selected_row: self.curser_row,
            panel_offset: self.offset_row,
            grid: TableGrid::build(&columns, &self.records),
            show_popup: self.modus == Modus::Popup,
            popup_message: HELP_TEXT.to_string(),
            status_message: self.status_message.clone(),
        }
    }

    fn quit(&mut self) {
        self.status = Status::Quitting;
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!(
            "UI was resized! w:{}->{}, h:{}->{}",
            self.width, width, self.height, height
        );
        self.width = width;
        self.height = height;
        self.scroll_to_cursor();
    }

    /// Number of column rows the panel can show. The panel spans everything
    /// above the status line, minus its borders and the "Toggle All" row.
    fn panel_rows(&self) -> usize {
        self.height
            .saturating_sub(usize::from(PANEL_ITEMS_TOP + 1 + STATUSLINE_HEIGHT))
    }

    /// Keeps the row under the cursor inside the drawn part of the panel.
    fn scroll_to_cursor(&mut self) {
        let rows = self.panel_rows().max(1);
        let max_offset = self.order.len().saturating_sub(rows);
        if let Some(idx) = self.curser_row.checked_sub(1) {
            if idx < self.offset_row {
                self.offset_row = idx;
            } else if idx >= self.offset_row + rows {
                self.offset_row = idx + 1 - rows;
            }
        }
        self.offset_row = self.offset_row.min(max_offset);
    }

    /// Column ids currently drawn in the panel, top to bottom.
    fn drawn_items(&self) -> &[String] {
        let begin = self.offset_row.min(self.order.len());
        let end = std::cmp::min(begin + self.panel_rows(), self.order.len());
        &self.order[begin..end]
    }

    fn show_help(&mut self) {
        self.drag.cancel();
        self.modus = Modus::Popup;
    }

    fn exit_popup(&mut self) {
        trace!("Close popup ...");
        self.modus = Modus::Panel;
    }

    // -------------------- Column state changes ---------------------- //

    fn set_visibility(&mut self, visibility: ColumnVisibility) {
        self.visibility = visibility;
        self.store.save_visibility(&self.visibility);
    }

    fn toggle_column(&mut self, id: &str) {
        self.set_visibility(toggle_one(&self.visibility, id));
        let state = if is_visible(&self.visibility, id) {
            "shown"
        } else {
            "hidden"
        };
        self.set_status_message(format!("Column {id} {state}"));
    }

    fn toggle_all_columns(&mut self) {
        self.set_visibility(toggle_all(&self.visibility, &self.all_ids));
        if all_visible(&self.visibility, &self.all_ids) {
            self.set_status_message("All columns shown");
        } else {
            self.set_status_message("All columns hidden");
        }
    }

    fn toggle_selected(&mut self) {
        if self.drag.sensor() == Some(Sensor::Keyboard) {
            self.drop_drag();
            return;
        }
        match self.selected_column() {
            Some(id) => self.toggle_column(&id),
            None => self.toggle_all_columns(),
        }
    }

    fn commit_drop(&mut self, event: DragEndEvent) {
        let Some(over_id) = event.over_id else {
            debug!("Drop of {} outside the list, ignored", event.active_id);
            self.set_status_message("Move cancelled");
            return;
        };
        let reordered = reorder(&self.order, &event.active_id, &over_id);
        if reordered != self.order {
            debug!("Moved {} to {}: {:?}", event.active_id, over_id, reordered);
            self.order = reordered;
            self.store.save_order(&self.order);
            self.set_status_message(format!("Moved {} to the place of {over_id}", event.active_id));
        }
        if let Some(idx) = self.order.iter().position(|id| *id == event.active_id) {
            self.curser_row = idx + 1;
            self.scroll_to_cursor();
        }
    }

    fn reset(&mut self) {
        self.drag.cancel();
        self.order = default_order(self.registry);
        self.visibility = ColumnVisibility::new();
        self.store.clear();
        self.curser_row = 0;
        self.offset_row = 0;
        self.set_status_message("Column order and visibility reset");
    }

    // -------------------- Keyboard sensor ---------------------- //

    fn selected_column(&self) -> Option<String> {
        self.curser_row
            .checked_sub(1)
            .and_then(|idx| self.order.get(idx))
            .cloned()
    }

    fn move_selection_up(&mut self) {
        self.curser_row = self.curser_row.saturating_sub(1);
        if self.drag.is_dragging() {
            // The "Toggle All" row is not a drop target.
            self.curser_row = self.curser_row.max(1);
            self.drag.move_over(self.selected_column());
        }
        self.scroll_to_cursor();
    }

    fn move_selection_down(&mut self) {
        self.curser_row = std::cmp::min(self.curser_row + 1, self.order.len());
        if self.drag.is_dragging() {
            self.drag.move_over(self.selected_column());
        }
        self.scroll_to_cursor();
    }

    fn grab(&mut self) {
        if self.drag.is_dragging() {
            self.drop_drag();
        } else if let Some(id) = self.selected_column() {
            self.drag.start(&id, Sensor::Keyboard);
            self.set_status_message(format!("Picked up {id}, move and press g to drop"));
        }
    }

    fn drop_drag(&mut self) {
        if let Some(event) = self.drag.end() {
            self.commit_drop(event);
        }
    }

    fn cancel_drag(&mut self) {
        if self.drag.is_dragging() {
            self.drag.cancel();
            self.set_status_message("Move cancelled");
        }
    }

    // -------------------- Mouse sensor ---------------------- //

    // Inside the panel borders.
    fn in_panel(&self, col: u16, row: u16) -> bool {
        let bottom_border = self.height.saturating_sub(usize::from(STATUSLINE_HEIGHT) + 1);
        col > 0 && col < PANEL_WIDTH - 1 && row > 0 && usize::from(row) < bottom_border
    }

    fn item_at(&self, col: u16, row: u16) -> Option<usize> {
        if !self.in_panel(col, row) || row < PANEL_ITEMS_TOP {
            return None;
        }
        let local = usize::from(row - PANEL_ITEMS_TOP);
        (local < self.drawn_items().len()).then_some(self.offset_row + local)
    }

    fn pointer_down(&mut self, col: u16, row: u16) {
        if self.in_panel(col, row) && row == PANEL_TOGGLE_ALL_ROW {
            self.curser_row = 0;
            self.toggle_all_columns();
            return;
        }
        let Some(idx) = self.item_at(col, row) else {
            return;
        };
        self.curser_row = idx + 1;
        let id = self.order[idx].clone();
        if col <= PANEL_HANDLE_END {
            self.drag.start(&id, Sensor::Mouse);
        } else {
            self.toggle_column(&id);
        }
    }

    fn pointer_drag(&mut self, col: u16, row: u16) {
        if self.drag.sensor() != Some(Sensor::Mouse) {
            return;
        }
        let over = if self.in_panel(col, row) {
            self.collision.resolve(self.drawn_items(), PANEL_ITEMS_TOP, row)
        } else {
            None
        };
        self.drag.move_over(over);
    }

    fn pointer_up(&mut self, col: u16, row: u16) {
        if self.drag.sensor() != Some(Sensor::Mouse) {
            return;
        }
        self.pointer_drag(col, row);
        self.drop_drag();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStorage, MemoryStorage};

    fn model() -> Model {
        let config = TableConfig::default().with_rows(5).with_seed(11);
        let mut model =
            Model::init(&config, PreferenceStore::new(Box::new(MemoryStorage::default())));
        model.update(Some(Message::Resize(100, 30)));
        model
    }

    fn short_model() -> Model {
        // Room for four column rows: borders at 0 and 6, status line at 7.
        let mut model = model();
        model.update(Some(Message::Resize(80, 8)));
        model
    }

    fn send(model: &mut Model, messages: &[Message]) {
        for msg in messages {
            model.update(Some(msg.clone()));
        }
    }

    fn item_row(idx: usize) -> u16 {
        PANEL_ITEMS_TOP + idx as u16
    }

    fn strs(order: &[String]) -> Vec<&str> {
        order.iter().map(String::as_str).collect()
    }

    #[test]
    fn starts_with_defaults() {
        let model = model();
        assert_eq!(model.order(), &default_order(registry()));
        assert!(model.visibility().is_empty());
        let uidata = model.get_uidata();
        assert!(uidata.all_visible);
        assert_eq!(uidata.items.len(), 6);
        assert_eq!(uidata.grid.headers.len(), 6);
        assert_eq!(uidata.grid.rows.len(), 5);
    }

    #[test]
    fn mouse_drag_age_onto_first_name() {
        let mut model = model();
        send(
            &mut model,
            &[
                Message::PointerDown(1, item_row(2)),
                Message::PointerDrag(1, item_row(1)),
                Message::PointerUp(1, item_row(0)),
            ],
        );
        assert_eq!(
            strs(model.order()),
            vec!["age", "firstName", "lastName", "visits", "status", "progress"]
        );
        assert!(!model.is_dragging());
    }

    #[test]
    fn mouse_drop_outside_the_list_is_a_noop() {
        let mut model = model();
        send(
            &mut model,
            &[
                Message::PointerDown(1, item_row(2)),
                Message::PointerDrag(1, item_row(0)),
                Message::PointerUp(PANEL_WIDTH + 10, item_row(0)),
            ],
        );
        assert_eq!(model.order(), &default_order(registry()));
    }

    #[test]
    fn clicking_a_checkbox_toggles_without_dragging() {
        let mut model = model();
        send(&mut model, &[Message::PointerDown(PANEL_HANDLE_END + 3, item_row(4))]);
        assert!(!model.is_dragging());
        assert_eq!(model.visibility().get("status"), Some(&false));
        send(&mut model, &[Message::PointerDown(2, PANEL_TOGGLE_ALL_ROW)]);
        assert!(all_visible(model.visibility(), &column_ids(registry())));
    }

    #[test]
    fn keyboard_drag_and_drop() {
        let mut model = model();
        // Row 3 is "age", move it down two places onto "status".
        send(
            &mut model,
            &[
                Message::MoveDown,
                Message::MoveDown,
                Message::MoveDown,
                Message::Grab,
                Message::MoveDown,
                Message::MoveDown,
                Message::Grab,
            ],
        );
        assert_eq!(
            strs(model.order()),
            vec!["firstName", "lastName", "visits", "status", "age", "progress"]
        );
        assert_eq!(model.get_uidata().selected_row, 5);
    }

    #[test]
    fn toggle_drops_a_keyboard_drag() {
        let mut model = model();
        send(
            &mut model,
            &[
                Message::MoveDown,
                Message::Grab,
                Message::MoveDown,
                Message::Toggle,
            ],
        );
        assert!(!model.is_dragging());
        assert_eq!(
            strs(model.order()),
            vec!["lastName", "firstName", "age", "visits", "status", "progress"]
        );
        assert!(model.visibility().is_empty());
    }

    #[test]
    fn keyboard_cancel_commits_nothing() {
        let mut model = model();
        send(
            &mut model,
            &[
                Message::MoveDown,
                Message::Grab,
                Message::MoveDown,
                Message::Cancel,
                Message::Grab,
            ],
        );
        // The second grab picks up "lastName" again instead of dropping.
        assert!(model.is_dragging());
        assert_eq!(model.order(), &default_order(registry()));
    }

    #[test]
    fn hide_status_then_toggle_all() {
        let mut model = model();
        send(&mut model, &[Message::PointerDown(1, item_row(2)), Message::PointerUp(1, item_row(0))]);
        // The drop leaves the cursor on "age", "status" is four rows below.
        for _ in 0..4 {
            model.update(Some(Message::MoveDown));
        }
        model.update(Some(Message::Toggle));
        assert_eq!(model.visibility().get("status"), Some(&false));
        assert_eq!(model.visibility().len(), 1);

        let uidata = model.get_uidata();
        assert!(!uidata.all_visible);
        assert_eq!(uidata.grid.headers, vec!["Age", "First Name", "Last Name", "Visits", "Progress"]);
        assert!(uidata.items.iter().any(|i| i.id == "status" && !i.visible));

        model.update(Some(Message::ToggleAll));
        assert!(model.get_uidata().all_visible);
        model.update(Some(Message::ToggleAll));
        assert!(model.get_uidata().grid.is_empty());
    }

    #[test]
    fn toggle_on_first_row_is_toggle_all() {
        let mut model = model();
        model.update(Some(Message::Toggle));
        assert!(model.get_uidata().grid.is_empty());
    }

    #[test]
    fn preferences_survive_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let config = TableConfig::default().with_rows(2);
        let open = || PreferenceStore::new(Box::new(FileStorage::open(path.clone())));

        let mut first = Model::init(&config, open());
        send(
            &mut first,
            &[
                Message::Resize(100, 30),
                Message::PointerDown(1, item_row(5)),
                Message::PointerUp(1, item_row(0)),
                Message::PointerDown(PANEL_HANDLE_END + 3, item_row(1)),
            ],
        );
        let order = first.order().clone();
        drop(first);

        let second = Model::init(&config, open());
        assert_eq!(second.order(), &order);
        assert_eq!(strs(&order)[0], "progress");
        assert_eq!(second.visibility().get("firstName"), Some(&false));
    }

    #[test]
    fn clicks_outside_the_drawn_panel_are_ignored() {
        let mut model = short_model();
        send(
            &mut model,
            &[
                // Status line, bottom border, right border, left border.
                Message::PointerDown(20, 7),
                Message::PointerDown(20, 6),
                Message::PointerDown(PANEL_WIDTH - 1, item_row(1)),
                Message::PointerDown(0, item_row(1)),
                Message::PointerDown(1, 6),
            ],
        );
        assert!(model.visibility().is_empty());
        assert!(!model.is_dragging());

        send(&mut model, &[Message::PointerDown(20, item_row(3))]);
        assert_eq!(model.visibility().get("visits"), Some(&false));
        assert_eq!(model.visibility().len(), 1);
    }

    #[test]
    fn drop_on_the_bottom_border_has_no_target() {
        let mut model = short_model();
        send(
            &mut model,
            &[
                Message::PointerDown(1, item_row(0)),
                Message::PointerDrag(1, item_row(3)),
                Message::PointerUp(1, 6),
            ],
        );
        assert_eq!(model.order(), &default_order(registry()));
    }

    #[test]
    fn panel_scrolls_to_keep_the_cursor_drawn() {
        let mut model = short_model();
        for _ in 0..6 {
            model.update(Some(Message::MoveDown));
        }
        let uidata = model.get_uidata();
        assert_eq!(uidata.selected_row, 6);
        assert_eq!(uidata.panel_offset, 2);

        // The first drawn row is now "age".
        send(&mut model, &[Message::PointerDown(20, item_row(0))]);
        assert_eq!(model.visibility().get("age"), Some(&false));

        // Dragging "progress" onto the top drawn row lands it on "age".
        send(
            &mut model,
            &[
                Message::PointerDown(1, item_row(3)),
                Message::PointerUp(1, item_row(0)),
            ],
        );
        assert_eq!(
            strs(model.order()),
            vec!["firstName", "lastName", "progress", "age", "visits", "status"]
        );

        for _ in 0..5 {
            model.update(Some(Message::MoveUp));
        }
        assert_eq!(model.get_uidata().panel_offset, 0);

        send(&mut model, &[Message::MoveDown, Message::MoveDown, Message::MoveDown]);
        send(&mut model, &[Message::MoveDown, Message::MoveDown, Message::MoveDown]);
        assert_eq!(model.get_uidata().panel_offset, 2);
        model.update(Some(Message::Resize(80, 30)));
        assert_eq!(model.get_uidata().panel_offset, 0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut model = model();
        send(
            &mut model,
            &[
                Message::PointerDown(1, item_row(3)),
                Message::PointerUp(1, item_row(0)),
                Message::ToggleAll,
                Message::Reset,
            ],
        );
        assert_eq!(model.order(), &default_order(registry()));
        assert!(model.visibility().is_empty());
    }

    #[test]
    fn popup_swallows_column_messages() {
        let mut model = model();
        send(&mut model, &[Message::Help, Message::ToggleAll]);
        assert!(model.get_uidata().show_popup);
        assert!(model.visibility().is_empty());
        send(&mut model, &[Message::Exit, Message::Quit]);
        assert!(!model.get_uidata().show_popup);
        assert_eq!(model.status, Status::Quitting);
    }
}
