// ABOUTME: Application state machine and event handling for the wizard TUI

pub mod events;
pub mod state;

pub use events::{AppEvent, EventHandler};
pub use state::{App, AppState, WizardStep};
