//! Terminal User Interface components

mod app;
pub mod theme;
mod widgets;

pub use app::{format_factor, App, AppState, AppView};
pub use theme::ThemeColors;
pub use widgets::*;
