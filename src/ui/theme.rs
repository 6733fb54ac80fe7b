//! Theme color definitions for the UI
//!
//! Provides dark and light color palettes that can be switched at runtime.

use crate::config::Theme;
use crate::engine::MeasureState;
use ratatui::style::Color;

/// Complete color palette for the UI
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Main background
    pub bg: Color,
    /// Primary foreground text
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (headings, active elements)
    pub cyan: Color,
    /// Success / legible
    pub green: Color,
    /// Warning / status messages
    pub yellow: Color,
    /// Error / illegible
    pub red: Color,
    /// Unjudged table cell background
    pub cell_unknown: Color,
    /// Legible table cell background
    pub cell_right: Color,
    /// Illegible table cell background
    pub cell_wrong: Color,
    /// Active table cell background
    pub cell_active: Color,
    /// Table cell text
    pub cell_text: Color,
    /// Active table cell text
    pub cell_text_active: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Dark theme - original color scheme
    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(22, 22, 30),
            fg: Color::Rgb(200, 200, 210),
            dim: Color::Rgb(90, 90, 110),
            cyan: Color::Rgb(80, 200, 220),
            green: Color::Rgb(80, 200, 120),
            yellow: Color::Rgb(240, 180, 80),
            red: Color::Rgb(240, 90, 100),
            cell_unknown: Color::Rgb(40, 40, 50),
            cell_right: Color::Rgb(35, 90, 55),
            cell_wrong: Color::Rgb(100, 40, 45),
            cell_active: Color::Rgb(80, 200, 220),
            cell_text: Color::Rgb(180, 180, 190),
            cell_text_active: Color::Rgb(20, 20, 25),
        }
    }

    /// Light theme - high contrast for bright terminals
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(245, 245, 248),
            fg: Color::Rgb(30, 30, 40),
            dim: Color::Rgb(130, 130, 150),
            cyan: Color::Rgb(0, 130, 160),
            green: Color::Rgb(30, 150, 70),
            yellow: Color::Rgb(180, 120, 0),
            red: Color::Rgb(200, 50, 60),
            cell_unknown: Color::Rgb(220, 220, 228),
            cell_right: Color::Rgb(170, 220, 185),
            cell_wrong: Color::Rgb(235, 175, 180),
            cell_active: Color::Rgb(0, 130, 160),
            cell_text: Color::Rgb(50, 50, 60),
            cell_text_active: Color::Rgb(255, 255, 255),
        }
    }

    /// Cell background for a measurement state
    pub fn cell_for(&self, state: MeasureState) -> Color {
        match state {
            MeasureState::Unknown => self.cell_unknown,
            MeasureState::Right => self.cell_right,
            MeasureState::Wrong => self.cell_wrong,
        }
    }
}
