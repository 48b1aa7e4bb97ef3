//! TUI widgets.

pub mod log_view;
pub mod markup_text;
pub mod sidebar;

pub use log_view::LogView;
pub use sidebar::render_sidebar;
