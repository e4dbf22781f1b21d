use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Cell, Clear, Paragraph, Row, Table, Wrap},
};

use crate::model::{Model, PanelItem, UIData};

// Panel geometry, shared with the mouse hit-testing in the model.
pub const PANEL_WIDTH: u16 = 32;
pub const PANEL_TOGGLE_ALL_ROW: u16 = 1;
pub const PANEL_ITEMS_TOP: u16 = 2;
pub const PANEL_HANDLE_END: u16 = 2;
pub const STATUSLINE_HEIGHT: u16 = 1;

const HANDLE: &str = "≡ ";

#[derive(Debug, Default)]
pub struct TableUI {}

impl TableUI {
    pub fn new() -> Self {
        Self {}
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let uidata = model.get_uidata();
        let [main, statusline] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(STATUSLINE_HEIGHT)])
                .areas(frame.area());
        let [panel, table] =
            Layout::horizontal([Constraint::Length(PANEL_WIDTH), Constraint::Min(0)]).areas(main);

        self.draw_panel(&uidata, panel, frame);
        self.draw_table(&uidata, table, frame);
        self.draw_statusline(&uidata, statusline, frame);
        if uidata.show_popup {
            self.draw_popup(&uidata, frame);
        }
    }

    fn checkbox(checked: bool) -> &'static str {
        if checked { "[x] " } else { "[ ] " }
    }

    fn panel_line(item: &PanelItem, selected: bool) -> Line<'_> {
        let mut style = Style::new();
        if !item.visible {
            style = style.fg(Color::DarkGray);
        }
        if item.drop_target {
            style = style.bg(Color::Blue);
        }
        if item.dragging {
            style = style.fg(Color::Yellow).bold();
        }
        if selected {
            style = style.reversed();
        }
        Line::from(vec![
            Span::from(HANDLE).cyan(),
            Span::from(Self::checkbox(item.visible)),
            Span::from(item.id.as_str()),
        ])
        .style(style)
    }

    fn draw_panel(&self, uidata: &UIData, area: Rect, frame: &mut Frame) {
        let mut toggle_all = Line::from(vec![
            Span::from("  "),
            Span::from(Self::checkbox(uidata.all_visible)),
            Span::from("Toggle All").bold(),
        ]);
        if uidata.selected_row == 0 {
            toggle_all = toggle_all.reversed();
        }

        let rows = usize::from(area.height.saturating_sub(PANEL_ITEMS_TOP + 1));
        let mut lines = vec![toggle_all];
        lines.extend(
            uidata
                .items
                .iter()
                .enumerate()
                .skip(uidata.panel_offset)
                .take(rows)
                .map(|(idx, item)| Self::panel_line(item, uidata.selected_row == idx + 1)),
        );

        let mut block = Block::bordered()
            .title(Line::from(" Reorder & Toggle Columns ".bold()).centered())
            .border_set(border::THICK);
        let total = uidata.items.len();
        if rows < total {
            let first = std::cmp::min(uidata.panel_offset + 1, total);
            let last = std::cmp::min(uidata.panel_offset + rows, total);
            block = block.title_bottom(Line::from(format!(" {first}-{last} of {total} ")).centered());
        }
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_table(&self, uidata: &UIData, area: Rect, frame: &mut Frame) {
        let block = Block::bordered().border_set(border::PLAIN);
        let grid = &uidata.grid;
        if grid.is_empty() {
            let empty = Paragraph::new("No visible columns".dark_gray())
                .centered()
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(grid.headers.iter().map(|h| Cell::from(h.as_str())))
            .style(Style::new().bold().underlined());
        let rows = grid
            .rows
            .iter()
            .map(|r| Row::new(r.iter().map(|c| Cell::from(c.as_str()))));
        let widths = grid.widths.iter().map(|w| Constraint::Length(*w as u16));

        frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
    }

    fn draw_statusline(&self, uidata: &UIData, area: Rect, frame: &mut Frame) {
        let line = Line::from(vec![
            Span::from(format!(" {} ", uidata.status_message)),
            " Help ".into(),
            "<?>".blue().bold(),
            " Quit ".into(),
            "<Q> ".blue().bold(),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_popup(&self, uidata: &UIData, frame: &mut Frame) {
        let area = Self::centered(frame.area(), 70, 16);
        let block = Block::bordered()
            .title(Line::from(" Help ".bold()).centered())
            .title_bottom(Line::from(" <Esc> to close ").centered())
            .border_set(border::THICK);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(uidata.popup_message.as_str())
                .wrap(Wrap { trim: false })
                .block(block),
            area,
        );
    }

    fn centered(area: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(area.width);
        let height = height.min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }
}
