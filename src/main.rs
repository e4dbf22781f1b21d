use std::io::stdout;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ratatui::DefaultTerminal;
use ratatui::crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use ratatui::crossterm::execute;
use tracing::{info, warn};

mod columns;
mod controller;
mod domain;
mod drag;
mod logging;
mod model;
mod order;
mod store;
mod ui;
mod view;
mod visibility;

use controller::Controller;
use domain::{Message, TableConfig, TableError};
use model::{Model, Status};
use store::{FileStorage, PreferenceStore};
use ui::TableUI;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Preference storage file [default: <data dir>/colview/storage.json]
    #[arg(short, long)]
    storage: Option<String>,

    /// Number of generated rows
    #[arg(short, long, default_value_t = 20)]
    rows: usize,

    /// Seed for reproducible row data
    #[arg(long)]
    seed: Option<u64>,

    /// Forget stored column order and visibility before starting
    #[arg(long)]
    reset: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<String>,

    /// Default log filter, RUST_LOG takes precedence
    #[arg(long, default_value = "colview=info")]
    log_level: String,

    /// Event poll time in milliseconds
    #[arg(long, default_value_t = 100)]
    poll: u64,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand_path(path: &str) -> Result<PathBuf, TableError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| TableError::InvalidArgument(e.to_string()))
}

fn open_store(path: Option<PathBuf>) -> PreferenceStore {
    match path.or_else(FileStorage::default_path) {
        Some(path) => {
            let storage = FileStorage::open(path);
            info!("Preferences are kept in {}", storage.path().display());
            PreferenceStore::new(Box::new(storage))
        }
        None => {
            warn!("No data directory available, preferences will not be kept");
            PreferenceStore::in_memory()
        }
    }
}

fn run(args: Args) -> Result<(), TableError> {
    if let Some(log_file) = &args.log_file {
        logging::init(&expand_path(log_file)?, &args.log_level)?;
    }
    if args.rows == 0 {
        return Err(TableError::InvalidArgument("--rows must be at least 1".into()));
    }

    let mut cfg = TableConfig::default()
        .with_event_poll_time(args.poll)
        .with_rows(args.rows);
    if let Some(seed) = args.seed {
        cfg = cfg.with_seed(seed);
    }
    if let Some(storage) = &args.storage {
        cfg = cfg.with_storage_path(expand_path(storage)?);
    }
    info!("Starting colview with {cfg:?}");

    let mut store = open_store(cfg.storage_path.clone());
    if args.reset {
        store.clear();
    }

    let mut model = Model::init(&cfg, store);
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    install_panic_hook();
    let result = event_loop(&mut terminal, &mut model, &controller);
    disable_mouse_capture();
    ratatui::restore();

    info!("Quitting colview");
    result
}

fn disable_mouse_capture() {
    if let Err(e) = execute!(stdout(), DisableMouseCapture) {
        warn!("Failed to disable mouse capture: {e}");
    }
}

/// Runs before the hook `ratatui::init` installed, which restores the rest
/// of the terminal.
fn install_panic_hook() {
    let restore_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        disable_mouse_capture();
        tracing::error!(panic = %panic_info, "panic");
        restore_hook(panic_info);
    }));
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    controller: &Controller,
) -> Result<(), TableError> {
    execute!(stdout(), EnableMouseCapture)?;
    let size = terminal.size()?;
    model.update(Some(Message::Resize(size.width as usize, size.height as usize)));

    let mut ui = TableUI::new();
    while model.status != Status::Quitting {
        // Render the current view
        terminal.draw(|f| ui.draw(model, f))?;

        // Handle events and map to a Message
        if let Some(message) = controller.handle_event(model)? {
            model.update(Some(message));
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    static RESTORED: AtomicBool = AtomicBool::new(false);

    #[test]
    fn panic_hook_hands_over_to_the_restore_hook() {
        std::panic::set_hook(Box::new(|_| RESTORED.store(true, Ordering::SeqCst)));
        install_panic_hook();

        let result = std::panic::catch_unwind(|| panic!("boom"));
        // Back to the default hook for the rest of the test binary.
        let _ = std::panic::take_hook();

        assert!(result.is_err());
        assert!(RESTORED.load(Ordering::SeqCst));
    }
}
