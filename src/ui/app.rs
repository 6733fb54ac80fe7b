//! Main application state and logic

use crate::config::Config;
use crate::engine::{
    generate, Classification, EngineError, MeasurementTracker, ScaleModel, SizeList,
};
use ratatui::layout::Rect;
use std::time::Instant;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Calibrate,
    Help,
}

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

/// Main application: owns the engine pieces and session-level UI state.
/// Created on session start, dropped on teardown; nothing survives it.
pub struct App {
    /// Current view
    pub view: AppView,
    /// Application state
    pub state: AppState,
    /// Configuration
    pub config: Config,
    /// Measurement tracker (owns the test sequence and pointer)
    pub tracker: MeasurementTracker,
    /// Scale factor model
    pub scale: ScaleModel,
    /// Edit buffer for the numeric scale field
    pub scale_input: String,
    /// Session start time
    pub start_time: Instant,
    /// Total key events classified (applied or not)
    pub total_events: u64,
    /// Last status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
    /// Table body area from the last draw, for mouse hit-testing
    pub table_area: Option<Rect>,
    sizes: SizeList,
    rng: fastrand::Rng,
}

impl App {
    pub fn new(config: Config) -> Result<Self, EngineError> {
        Self::with_rng(config, fastrand::Rng::new())
    }

    /// Deterministic constructor for tests.
    pub fn with_rng(config: Config, mut rng: fastrand::Rng) -> Result<Self, EngineError> {
        let sizes = config.sequence.size_list();
        let rows = config.sequence.rows.max(1);
        if rows != config.sequence.rows {
            log::warn!("configured rows = 0, using 1");
        }
        let sequence = generate(&sizes, rows, &mut rng)?;
        let tracker = MeasurementTracker::with_policy(sequence, config.sequence.reclassify);
        let scale = ScaleModel::with_factor(config.scale.default_factor);
        let scale_input = format_factor(scale.factor());

        Ok(Self {
            view: AppView::Calibrate,
            state: AppState::Running,
            config,
            tracker,
            scale,
            scale_input,
            start_time: Instant::now(),
            total_events: 0,
            status_message: None,
            status_time: None,
            table_area: None,
            sizes,
            rng,
        })
    }

    /// The size list the current sequence cycles over.
    pub fn sizes(&self) -> &SizeList {
        &self.sizes
    }

    /// Account for a batch of pumped classifications.
    pub fn record_outcomes(&mut self, outcomes: &[Classification]) {
        for outcome in outcomes {
            self.total_events += 1;
            if !outcome.applied {
                self.set_status("Type the shown letter, or Space if unreadable".to_string());
            }
        }
    }

    /// Discard all judgements and start over with a fresh random sequence.
    pub fn regenerate(&mut self) {
        let rows = self.config.sequence.rows.max(1);
        match generate(&self.sizes, rows, &mut self.rng) {
            Ok(sequence) => {
                self.tracker.restart(sequence);
                self.set_status("New sequence generated".to_string());
            }
            Err(e) => self.set_status(format!("Could not regenerate: {}", e)),
        }
    }

    /// Jump the pointer to a table cell, e.g. from a mouse click.
    pub fn select(&mut self, index: usize) {
        match self.tracker.select(index) {
            Ok(()) => log::debug!("selected index {}", index),
            // Unreachable from hit-tested clicks; surfaced rather than ignored.
            Err(e) => self.set_status(format!("{}", e)),
        }
    }

    /// Append a character to the numeric scale field.
    pub fn push_scale_digit(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' {
            self.scale_input.push(c);
        }
    }

    pub fn backspace_scale(&mut self) {
        self.scale_input.pop();
    }

    /// Submit the scale field through the model. Rejected input leaves the
    /// factor untouched and restores the field to the last good value.
    pub fn submit_scale(&mut self) {
        let factor = self.scale.set_scale(&self.scale_input);
        if self.scale.last_input_accepted() {
            self.set_status(format!("Scale set to {} px/mm", format_factor(factor)));
        } else {
            self.set_status(format!("Invalid scale {:?} ignored", self.scale_input));
        }
        self.scale_input = format_factor(factor);
    }

    /// Nudge the factor by `steps` slider steps, clamped to the configured
    /// range. Goes through `set_scale` so the same validation applies.
    pub fn nudge_scale(&mut self, steps: i32) {
        let target = (self.scale.factor() + steps as f64 * self.config.scale.step)
            .clamp(self.config.scale.min_factor, self.config.scale.max_factor);
        let factor = self.scale.set_scale(&format_factor(target));
        self.scale_input = format_factor(factor);
    }

    /// Toggle between the calibration view and help
    pub fn toggle_help(&mut self) {
        self.view = match self.view {
            AppView::Calibrate => AppView::Help,
            AppView::Help => AppView::Calibrate,
        };
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still valid (within 3 seconds)
    pub fn get_status(&self) -> Option<&str> {
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed().as_secs() < 3 => Some(msg),
            _ => None,
        }
    }

    /// Get elapsed time formatted
    pub fn elapsed_formatted(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Render a factor compactly: up to four decimals, no trailing zeros.
pub fn format_factor(factor: f64) -> String {
    let mut s = format!("{:.4}", factor);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MeasureState;

    fn app() -> App {
        App::with_rng(Config::default(), fastrand::Rng::with_seed(5)).unwrap()
    }

    #[test]
    fn new_app_has_full_sequence() {
        let app = app();
        assert_eq!(app.tracker.len(), 100);
        assert_eq!(app.tracker.pointer(), 0);
        assert_eq!(app.scale.factor(), 1.0);
    }

    #[test]
    fn zero_rows_config_is_clamped() {
        let mut config = Config::default();
        config.sequence.rows = 0;
        let app = App::with_rng(config, fastrand::Rng::with_seed(5)).unwrap();
        assert_eq!(app.tracker.len(), 20);
    }

    #[test]
    fn regenerate_resets_judgements() {
        let mut app = app();
        app.tracker.classify(" ");
        assert_eq!(app.tracker.tally().1, 1);

        app.regenerate();
        assert_eq!(app.tracker.tally().2, app.tracker.len());
        assert_eq!(app.tracker.pointer(), 0);
    }

    #[test]
    fn select_out_of_range_sets_status_instead_of_panicking() {
        let mut app = app();
        app.select(1000);
        assert!(app.get_status().is_some());
        assert_eq!(app.tracker.pointer(), 0);
    }

    #[test]
    fn select_in_range_moves_pointer() {
        let mut app = app();
        app.select(42);
        assert_eq!(app.tracker.pointer(), 42);
        assert!(app
            .tracker
            .items()
            .iter()
            .all(|i| i.state == MeasureState::Unknown));
    }

    #[test]
    fn scale_field_edit_and_submit() {
        let mut app = app();
        app.scale_input.clear();
        for c in "2.5".chars() {
            app.push_scale_digit(c);
        }
        app.submit_scale();
        assert_eq!(app.scale.factor(), 2.5);
        assert_eq!(app.scale_input, "2.5");
    }

    #[test]
    fn scale_field_rejects_letters() {
        let mut app = app();
        let before = app.scale_input.clone();
        app.push_scale_digit('x');
        assert_eq!(app.scale_input, before);
    }

    #[test]
    fn invalid_submit_restores_last_good_value() {
        let mut app = app();
        app.scale_input = "3".to_string();
        app.submit_scale();
        app.scale_input = "..".to_string();
        app.submit_scale();
        assert_eq!(app.scale.factor(), 3.0);
        assert_eq!(app.scale_input, "3");
    }

    #[test]
    fn nudge_clamps_to_configured_range() {
        let mut app = app();
        for _ in 0..200 {
            app.nudge_scale(1);
        }
        assert!((app.scale.factor() - app.config.scale.max_factor).abs() < 1e-9);

        for _ in 0..300 {
            app.nudge_scale(-1);
        }
        assert!((app.scale.factor() - app.config.scale.min_factor).abs() < 1e-9);
    }

    #[test]
    fn record_outcomes_counts_events() {
        let mut app = app();
        let first = app.tracker.current_item().character;
        let a = app.tracker.classify(&first.to_string());
        let b = app.tracker.classify("Escape");
        app.record_outcomes(&[a, b]);
        assert_eq!(app.total_events, 2);
    }

    #[test]
    fn help_toggle_roundtrip() {
        let mut app = app();
        assert_eq!(app.view, AppView::Calibrate);
        app.toggle_help();
        assert_eq!(app.view, AppView::Help);
        app.toggle_help();
        assert_eq!(app.view, AppView::Calibrate);
    }

    #[test]
    fn format_factor_trims_zeros() {
        assert_eq!(format_factor(1.0), "1");
        assert_eq!(format_factor(0.1), "0.1");
        assert_eq!(format_factor(2.5), "2.5");
        assert_eq!(format_factor(0.1 + 0.2), "0.3");
    }
}
