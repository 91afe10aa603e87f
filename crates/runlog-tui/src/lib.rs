//! TUI components for runlog
//!
//! This crate provides the terminal user interface for runlog, including
//! state management, keybindings, event handling, and UI components.

pub mod app;
mod clipboard;
pub mod config;
pub mod tui;
pub mod ui;
mod viewport;

pub use app::{Action, AppState, Focus, LogRow, UiState};
pub use clipboard::copy_osc52;
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{DiagnosticTreePane, HelpOverlay, StatusBar, viewer_hints};
pub use ui::screens::LogViewerScreen;
pub use ui::{Layout, Theme};
pub use viewport::TuiViewport;
