// ABOUTME: UI components for the wizard TUI: step screens, preview table, and help

pub mod column_select;
pub mod field_select;
pub mod help;
pub mod layout;
pub mod preview_table;

pub use column_select::ColumnSelectComponent;
pub use field_select::FieldSelectComponent;
pub use help::HelpComponent;
pub use layout::LayoutComponent;
pub use preview_table::PreviewTableComponent;

use ratatui::style::Color;

// Color palette shared by all components
pub(crate) const CORNFLOWER_BLUE: Color = Color::Rgb(100, 149, 237);
pub(crate) const GOLD: Color = Color::Rgb(255, 215, 0);
pub(crate) const SELECTION_GREEN: Color = Color::Rgb(100, 200, 100);
pub(crate) const WARNING_ORANGE: Color = Color::Rgb(255, 165, 0);
pub(crate) const DARK_BG: Color = Color::Rgb(25, 25, 35);
pub(crate) const PANEL_BG: Color = Color::Rgb(30, 30, 40);
pub(crate) const SOFT_WHITE: Color = Color::Rgb(220, 220, 230);
pub(crate) const MUTED_GRAY: Color = Color::Rgb(120, 120, 140);
pub(crate) const SUBDUED_BORDER: Color = Color::Rgb(60, 60, 80);
pub(crate) const ERROR_RED: Color = Color::Rgb(220, 80, 80);
