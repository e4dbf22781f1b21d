use std::time::Duration;
use tracing::trace;

use crate::domain::{Message, TableConfig, TableError};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, MouseButton, MouseEvent, MouseEventKind};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &TableConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, TableError> {
        if !event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(None);
        }
        let message = match event::read()? {
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                self.handle_key(key, model.is_dragging())
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                Some(Message::Resize(width as usize, height as usize))
            }
            _ => None,
        };
        Ok(message)
    }

    fn handle_key(&self, key: event::KeyEvent, dragging: bool) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveDown),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Message::Toggle),
            KeyCode::Char('g') => Some(Message::Grab),
            KeyCode::Char('a') => Some(Message::ToggleAll),
            KeyCode::Char('r') => Some(Message::Reset),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Esc if dragging => Some(Message::Cancel),
            KeyCode::Esc => Some(Message::Exit),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }

    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Message> {
        let (col, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Message::PointerDown(col, row)),
            MouseEventKind::Drag(MouseButton::Left) => Some(Message::PointerDrag(col, row)),
            MouseEventKind::Up(MouseButton::Left) => Some(Message::PointerUp(col, row)),
            _ => None,
        }
    }
}
