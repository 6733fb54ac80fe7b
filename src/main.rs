//! optotype - Interactive display-scale calibration tool
//!
//! Shows a letter at a candidate physical size; the user types what they
//! see (or Space when unreadable) until the scale of the display is pinned
//! down.

use anyhow::{anyhow, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use std::io::stdout;

use optotype::{
    config::Config,
    engine::InputDispatcher,
    ui::{
        table_hit, App, AppState, AppView, HelpPanel, LetterPanel, MeasureTable, ScalePanel,
        StatusBar, ThemeColors,
    },
};

fn main() -> Result<()> {
    env_logger::init();

    // Create application
    let config = Config::load().unwrap_or_default();
    let mut app = App::new(config.clone())?;
    let colors = ThemeColors::from_theme(config.ui.theme);

    // Key event channel: the source is the one listener registration for
    // this session; it is dropped (released) on the way out.
    let mut dispatcher = InputDispatcher::new();
    let source = dispatcher
        .acquire_source()
        .ok_or_else(|| anyhow!("input source already taken"))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let tick_rate = config.refresh_interval();

    loop {
        // Feed queued key events to the tracker, in arrival order
        let outcomes = dispatcher.pump(&mut app.tracker);
        app.record_outcomes(&outcomes);

        // Draw UI
        terminal.draw(|frame| {
            let size = frame.area();

            // Create layout
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(6), // Current letter
                    Constraint::Length(5), // Scale controls
                    Constraint::Min(7),    // Measurement table / help
                    Constraint::Length(1), // Status bar
                ])
                .split(size);

            // Current letter at the calibrated size
            let current = app.tracker.current_item();
            let pixel_size = app.scale.pixel_size(current.size_mm);
            frame.render_widget(LetterPanel::new(current, pixel_size, &colors), chunks[0]);

            // Scale controls
            let scale_panel = ScalePanel::new(
                app.scale.factor(),
                app.config.scale.min_factor,
                app.config.scale.max_factor,
                &app.scale_input,
                app.scale.last_input_accepted(),
                app.scale.pixel_size(100.0),
                &colors,
            );
            frame.render_widget(scale_panel, chunks[1]);

            // Main content area
            match app.view {
                AppView::Help => {
                    app.table_area = None;
                    frame.render_widget(HelpPanel::new(&colors), chunks[2]);
                }
                AppView::Calibrate => {
                    app.table_area = Some(chunks[2]);
                    let table = MeasureTable::new(
                        app.tracker.items(),
                        app.sizes(),
                        app.tracker.pointer(),
                        &colors,
                    );
                    frame.render_widget(table, chunks[2]);
                }
            }

            // Status bar
            let elapsed = app.elapsed_formatted();
            let status = StatusBar::new(&elapsed, app.total_events, app.tracker.tally(), &colors)
                .message(app.get_status());
            frame.render_widget(status, chunks[3]);
        })?;

        // Handle terminal events
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Esc => app.quit(),
                    KeyCode::Tab => app.toggle_help(),
                    KeyCode::Char('r') | KeyCode::Char('R')
                        if key.modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        app.regenerate()
                    }
                    KeyCode::Left => app.nudge_scale(-1),
                    KeyCode::Right => app.nudge_scale(1),
                    KeyCode::Backspace => app.backspace_scale(),
                    KeyCode::Enter => app.submit_scale(),
                    KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => app.push_scale_digit(c),
                    // Letters and space are classification input; they go
                    // through the dispatcher queue, never directly to the
                    // tracker.
                    KeyCode::Char(c) if c.is_ascii_alphabetic() || c == ' ' => {
                        source.send(c.to_string())
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
                        if let Some(area) = app.table_area {
                            if let Some(index) = table_hit(
                                area,
                                app.sizes().len(),
                                app.tracker.len(),
                                mouse.column,
                                mouse.row,
                            ) {
                                app.select(index);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        // Check if we should quit
        if app.state == AppState::Quitting {
            break;
        }
    }

    // Release the listener and drain anything still queued
    drop(source);
    let outcomes = dispatcher.pump(&mut app.tracker);
    app.record_outcomes(&outcomes);

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    let (right, wrong, unknown) = app.tracker.tally();
    println!("\noptotype session complete.");
    println!("Scale factor: {} px/mm", app.scale.factor());
    println!(
        "Read: {}  Unreadable: {}  Unjudged: {}",
        right, wrong, unknown
    );
    println!("Session duration: {}", app.elapsed_formatted());

    Ok(())
}
