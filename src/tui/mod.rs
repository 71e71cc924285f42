//! Terminal User Interface for capwatch.
//!
//! Provides the main TUI application loop using ratatui and crossterm.
//! Dashboard refreshes run in a background task so the UI stays responsive
//! while queries poll.

pub mod app;
mod ui;
pub mod widgets;

pub use app::App;

use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::dashboard::{Dashboard, DashboardData};
use crate::error::{CapwatchError, Result};

/// Messages sent from background tasks to the main loop.
#[derive(Debug)]
pub enum AsyncMessage {
    /// A dashboard refresh completed.
    RefreshComplete(DashboardData),
}

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self { terminal })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| CapwatchError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|e| {
            CapwatchError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)
            .map_err(|e| CapwatchError::internal(format!("Failed to create terminal: {e}")))?;

        Ok(terminal)
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| CapwatchError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| CapwatchError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| CapwatchError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main TUI event loop.
    pub async fn run(&mut self, mut app: App, dashboard: Dashboard) -> Result<()> {
        // Set up panic hook to restore terminal on panic
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let dashboard = Arc::new(dashboard);
        let (tx, mut rx) = mpsc::channel::<AsyncMessage>(4);

        let result = self.run_event_loop(&mut app, &dashboard, tx, &mut rx).await;

        // Restore panic hook
        let _ = panic::take_hook();

        result
    }

    /// The main event loop, separated for cleaner error handling.
    async fn run_event_loop(
        &mut self,
        app: &mut App,
        dashboard: &Arc<Dashboard>,
        tx: mpsc::Sender<AsyncMessage>,
        rx: &mut mpsc::Receiver<AsyncMessage>,
    ) -> Result<()> {
        loop {
            if app.take_refresh_request() {
                app.is_refreshing = true;
                let dashboard = Arc::clone(dashboard);
                let tx = tx.clone();
                info!("starting dashboard refresh");
                tokio::spawn(async move {
                    let data = dashboard.refresh().await;
                    if tx.send(AsyncMessage::RefreshComplete(data)).await.is_err() {
                        warn!("main loop gone before refresh completed");
                    }
                });
            }

            // Draw the UI
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| CapwatchError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            // Handle both terminal events and async messages
            tokio::select! {
                event_result = tokio::task::spawn_blocking({
                    let tick_rate = std::time::Duration::from_millis(100);
                    move || {
                        if crossterm::event::poll(tick_rate).unwrap_or(false) {
                            crossterm::event::read().ok()
                        } else {
                            None
                        }
                    }
                }) => {
                    if let Ok(Some(crossterm::event::Event::Key(key))) = event_result {
                        app.handle_key(key);
                    }
                }

                Some(msg) = rx.recv() => {
                    match msg {
                        AsyncMessage::RefreshComplete(data) => app.apply_refresh(data),
                    }
                }
            }
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the TUI dashboard until the user quits.
pub async fn run(dashboard: Dashboard, connection: String) -> Result<()> {
    let app = App::new(connection);
    let mut tui = Tui::new()?;
    tui.run(app, dashboard).await
}
