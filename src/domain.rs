use std::path::PathBuf;

use derive_setters::Setters;

pub const HELP_TEXT: &str = "\
Columns panel
  Up/Down, k/j   Move the cursor (or the drop target while dragging)
  Space/Enter    Toggle the column under the cursor
  g              Grab the column under the cursor, press again to drop
  Esc            Cancel a drag, close this popup
  a              Toggle all columns
  r              Reset column order and visibility
  Mouse          Drag a column by its handle, click a checkbox to toggle

  ?              Show this help
  q              Quit";

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("failed to set up logging: {0}")]
    LoggingFailed(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    Toggle,
    ToggleAll,
    Grab,
    Cancel,
    PointerDown(u16, u16),
    PointerDrag(u16, u16),
    PointerUp(u16, u16),
    Resize(usize, usize),
    Reset,
    Help,
    Exit,
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct TableConfig {
    pub event_poll_time: u64,
    pub rows: usize,
    #[setters(strip_option)]
    pub seed: Option<u64>,
    #[setters(strip_option)]
    pub storage_path: Option<PathBuf>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            rows: 20,
            seed: None,
            storage_path: None,
        }
    }
}
