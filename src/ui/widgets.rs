//! Custom TUI widgets

use crate::engine::{MeasureState, SizeList, TestItem};
use crate::ui::theme::ThemeColors;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Widget for the current letter: the character, its metric caption, and a
/// bar marking the width it would occupy at the current scale.
pub struct LetterPanel<'a> {
    item: &'a TestItem,
    pixel_size: f64,
    colors: &'a ThemeColors,
}

impl<'a> LetterPanel<'a> {
    pub fn new(item: &'a TestItem, pixel_size: f64, colors: &'a ThemeColors) -> Self {
        Self {
            item,
            pixel_size,
            colors,
        }
    }
}

impl<'a> Widget for LetterPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Current Letter ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.dim));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 || inner.width < 8 {
            return;
        }

        // The rendering side of the contract: refuse a non-finite size
        // instead of drawing garbage.
        if !self.pixel_size.is_finite() {
            let msg = "invalid render size";
            let x = inner.x + (inner.width.saturating_sub(msg.len() as u16)) / 2;
            buf.set_string(x, inner.y + 1, msg, Style::default().fg(self.colors.red));
            return;
        }

        let letter_color = match self.item.state {
            MeasureState::Unknown => self.colors.fg,
            MeasureState::Right => self.colors.green,
            MeasureState::Wrong => self.colors.red,
        };

        // Letter, centered
        let letter = self.item.character.to_string();
        let x = inner.x + inner.width / 2;
        buf.set_string(
            x,
            inner.y,
            &letter,
            Style::default()
                .fg(letter_color)
                .add_modifier(Modifier::BOLD),
        );

        // Metric caption under the letter
        let caption = format!("<- {} mm ->", format_mm(self.item.size_mm));
        let cx = inner.x + (inner.width.saturating_sub(caption.len() as u16)) / 2;
        buf.set_string(cx, inner.y + 1, &caption, Style::default().fg(self.colors.dim));

        // Width marker at the current scale, clamped to the panel
        let px = self.pixel_size.round().max(0.0) as u16;
        let bar_w = px.min(inner.width);
        let bar_y = inner.y + 2;
        let bx = inner.x + (inner.width.saturating_sub(bar_w)) / 2;
        for i in 0..bar_w {
            buf.set_string(bx + i, bar_y, "─", Style::default().fg(self.colors.cyan));
        }
        if inner.height > 3 {
            let label = format!("{} px", px);
            let lx = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
            buf.set_string(lx, bar_y + 1, &label, Style::default().fg(self.colors.dim));
        }
    }
}

/// Table of the full test sequence: one header row of sizes, then one body
/// row per pass over the size list. Cells are colored by state and the
/// active cell is highlighted.
pub struct MeasureTable<'a> {
    items: &'a [TestItem],
    sizes: &'a SizeList,
    pointer: usize,
    colors: &'a ThemeColors,
}

impl<'a> MeasureTable<'a> {
    pub fn new(
        items: &'a [TestItem],
        sizes: &'a SizeList,
        pointer: usize,
        colors: &'a ThemeColors,
    ) -> Self {
        Self {
            items,
            sizes,
            pointer,
            colors,
        }
    }

    /// Cell width used by both rendering and mouse hit-testing.
    pub fn cell_width(area_width: u16, cols: usize) -> u16 {
        if cols == 0 {
            return 1;
        }
        (area_width / cols as u16).max(1)
    }
}

impl<'a> Widget for MeasureTable<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = self.sizes.len();
        if cols == 0 || area.height < 2 {
            return;
        }
        let cell_w = Self::cell_width(area.width, cols);

        // Header: size labels
        for (col, size) in self.sizes.values().iter().enumerate() {
            let x = area.x + col as u16 * cell_w;
            if x + cell_w > area.x + area.width {
                break;
            }
            let label = format_mm(*size);
            buf.set_stringn(
                x,
                area.y,
                &label,
                cell_w as usize,
                Style::default()
                    .fg(self.colors.cyan)
                    .add_modifier(Modifier::BOLD),
            );
        }

        // Body: one cell per item
        for (i, item) in self.items.iter().enumerate() {
            let row = (i / cols) as u16;
            let col = (i % cols) as u16;
            let x = area.x + col * cell_w;
            let y = area.y + 1 + row;
            if y >= area.y + area.height || x + cell_w > area.x + area.width {
                continue;
            }

            let (bg, fg) = if i == self.pointer {
                (self.colors.cell_active, self.colors.cell_text_active)
            } else {
                (self.colors.cell_for(item.state), self.colors.cell_text)
            };

            let style = Style::default().bg(bg).fg(fg);
            for fill in 0..cell_w {
                buf.set_string(x + fill, y, " ", style);
            }
            // Letter centered in the cell
            buf.set_string(
                x + cell_w / 2,
                y,
                item.character.to_string(),
                style.add_modifier(Modifier::BOLD),
            );
        }
    }
}

/// Map a mouse position inside the table area to a flat item index.
///
/// Returns `None` for the header row, gutter columns past the last cell, or
/// positions outside the area, so every returned index is in range.
pub fn table_hit(area: Rect, cols: usize, len: usize, x: u16, y: u16) -> Option<usize> {
    if cols == 0
        || x < area.x
        || y <= area.y // header row
        || x >= area.x + area.width
        || y >= area.y + area.height
    {
        return None;
    }
    let cell_w = MeasureTable::cell_width(area.width, cols);
    let col = ((x - area.x) / cell_w) as usize;
    let row = (y - area.y - 1) as usize;
    if col >= cols {
        return None;
    }
    let index = row * cols + col;
    if index < len {
        Some(index)
    } else {
        None
    }
}

/// Scale factor panel: numeric field, slider-style gauge, and a 100 mm
/// sample bar at the current scale.
pub struct ScalePanel<'a> {
    factor: f64,
    min: f64,
    max: f64,
    input: &'a str,
    accepted: bool,
    sample_px: f64,
    colors: &'a ThemeColors,
}

impl<'a> ScalePanel<'a> {
    pub fn new(
        factor: f64,
        min: f64,
        max: f64,
        input: &'a str,
        accepted: bool,
        sample_px: f64,
        colors: &'a ThemeColors,
    ) -> Self {
        Self {
            factor,
            min,
            max,
            input,
            accepted,
            sample_px,
            colors,
        }
    }
}

impl<'a> Widget for ScalePanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Scale (px / mm) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.dim));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 {
            return;
        }

        // Numeric field
        let field_color = if self.accepted {
            self.colors.fg
        } else {
            self.colors.red
        };
        let line = Line::from(vec![
            Span::styled("value: ", Style::default().fg(self.colors.dim)),
            Span::styled(
                format!("[{}_]", self.input),
                Style::default().fg(field_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  (digits edit, Enter applies, Left/Right nudge)",
                Style::default().fg(self.colors.dim),
            ),
        ]);
        buf.set_line(inner.x, inner.y, &line, inner.width);

        // Slider gauge over the practical range
        if inner.height >= 2 && inner.width > 2 && self.max > self.min {
            let track_w = inner.width.saturating_sub(2);
            let ratio = ((self.factor - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
            let knob = (ratio * (track_w.saturating_sub(1)) as f64).round() as u16;
            for i in 0..track_w {
                let (sym, color) = if i == knob {
                    ("█", self.colors.cyan)
                } else {
                    ("─", self.colors.dim)
                };
                buf.set_string(inner.x + 1 + i, inner.y + 1, sym, Style::default().fg(color));
            }
        }

        // 100 mm sample bar
        if inner.height >= 3 && self.sample_px.is_finite() {
            let px = self.sample_px.round().max(0.0) as u16;
            let bar_w = px.min(inner.width);
            for i in 0..bar_w {
                buf.set_string(
                    inner.x + i,
                    inner.y + 2,
                    "▀",
                    Style::default().fg(self.colors.yellow),
                );
            }
            let label = format!(" 100 mm = {} px", px);
            buf.set_stringn(
                inner.x + bar_w,
                inner.y + 2,
                &label,
                inner.width.saturating_sub(bar_w) as usize,
                Style::default().fg(self.colors.dim),
            );
        }
    }
}

/// Widget for the help screen
pub struct HelpPanel<'a> {
    colors: &'a ThemeColors,
}

impl<'a> HelpPanel<'a> {
    pub fn new(colors: &'a ThemeColors) -> Self {
        Self { colors }
    }
}

impl<'a> Widget for HelpPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Help - optotype ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.cyan));

        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = vec![
            "",
            " CALIBRATION",
            " -----------",
            " Read the large letter and type it. If you cannot make it",
            " out, press Space. Judged cells turn green (read) or red",
            " (unreadable); click any cell to revisit it.",
            "",
            " Adjust the scale until a bar labelled 100 px really is",
            " 100 mm wide on your display, using the numeric field or",
            " the Left/Right arrow keys.",
            "",
            " KEYS",
            " -----------",
            " A-Z              : Confirm the shown letter",
            " Space            : Mark the shown letter unreadable",
            " 0-9 and .        : Edit the scale field",
            " Enter            : Apply the scale field",
            " Left / Right     : Nudge the scale by one step",
            " Backspace        : Delete from the scale field",
            " Mouse click      : Jump to a table cell",
            " Ctrl+R           : Start over with a new sequence",
            " Tab              : Toggle this help",
            " Esc              : Quit",
        ];

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if line.contains("---") {
                Style::default().fg(self.colors.dim)
            } else if line.starts_with(' ')
                && line
                    .trim_start()
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_whitespace())
                && !line.trim().is_empty()
            {
                Style::default()
                    .fg(self.colors.yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.fg)
            };
            buf.set_string(inner.x, inner.y + i as u16, line, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    elapsed: &'a str,
    events: u64,
    tally: (usize, usize, usize),
    message: Option<&'a str>,
    colors: &'a ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(
        elapsed: &'a str,
        events: u64,
        tally: (usize, usize, usize),
        colors: &'a ThemeColors,
    ) -> Self {
        Self {
            elapsed,
            events,
            tally,
            message: None,
            colors,
        }
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Background
        let bg_style = Style::default()
            .bg(self.colors.cell_unknown)
            .fg(self.colors.fg);
        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", bg_style);
        }

        // Left side: progress tally
        let (right, wrong, unknown) = self.tally;
        let left = format!(" read {} | missed {} | open {} ", right, wrong, unknown);
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        // Center: message if any
        if let Some(msg) = self.message {
            let msg_style = Style::default()
                .bg(self.colors.cell_unknown)
                .fg(self.colors.yellow);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        // Right side: elapsed time and events
        let right_text = format!(" {} | Keys: {} ", self.elapsed, self.events);
        let right_x = area.x + area.width.saturating_sub(right_text.len() as u16);
        buf.set_string(right_x, area.y, &right_text, bg_style);
    }
}

/// Format a millimeter value without a trailing `.0` for whole numbers.
fn format_mm(mm: f64) -> String {
    if (mm - mm.round()).abs() < 1e-9 {
        format!("{}", mm.round() as i64)
    } else {
        format!("{:.1}", mm)
    }
}
