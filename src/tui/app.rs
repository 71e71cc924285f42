//! Application state for the TUI.
//!
//! Holds the latest dashboard data and the refresh/quit flags driven by key
//! events.

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::dashboard::DashboardData;

/// Mutable state of the running dashboard UI.
pub struct App {
    /// Whether the main loop should keep running.
    pub running: bool,

    /// Whether a refresh task is currently in flight.
    pub is_refreshing: bool,

    /// Latest completed refresh, if any.
    pub data: Option<DashboardData>,

    /// Connection display string for the title bar.
    pub connection: String,

    /// Completion time of the latest refresh.
    pub last_refresh: Option<DateTime<Local>>,

    refresh_requested: bool,
}

impl App {
    /// Creates the initial state. A refresh is requested immediately so the
    /// first loop iteration starts loading data.
    pub fn new(connection: String) -> Self {
        Self {
            running: true,
            is_refreshing: false,
            data: None,
            connection,
            last_refresh: None,
            refresh_requested: true,
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }
            KeyCode::Char('r') => {
                // One refresh at a time; a request while one is in flight is
                // dropped rather than queued.
                if !self.is_refreshing {
                    self.refresh_requested = true;
                }
            }
            _ => {}
        }
    }

    /// Takes the pending refresh request, if any.
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    /// Stores a completed refresh.
    pub fn apply_refresh(&mut self, data: DashboardData) {
        self.data = Some(data);
        self.is_refreshing = false;
        self.last_refresh = Some(Local::now());
    }

    /// Number of panels whose last refresh failed.
    pub fn failed_panel_count(&self) -> usize {
        self.data
            .as_ref()
            .map(|d| d.panels.iter().filter(|p| p.result.is_err()).count())
            .unwrap_or(0)
    }

    /// Text for the status line.
    pub fn status_text(&self) -> String {
        let state = if self.is_refreshing {
            "refreshing...".to_string()
        } else {
            match &self.last_refresh {
                Some(at) => format!("last refresh {}", at.format("%H:%M:%S")),
                None => "no data yet".to_string(),
            }
        };

        let failures = match self.failed_panel_count() {
            0 => String::new(),
            n => format!(" · {n} panel(s) failed"),
        };

        format!("{state}{failures} · r refresh · q quit")
    }
}
