use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::field::{legend, AGENT, OBSTACLE};

fn glyph_style(glyph: char) -> Style {
    match glyph {
        AGENT => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        OBSTACLE => Style::default().fg(Color::DarkGray),
        _ => Style::default().fg(Color::Cyan),
    }
}

/// Splits a belief row into runs of equally styled glyphs.
pub fn styled_row(row: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = None;
    for glyph in row.chars() {
        let style = glyph_style(glyph);
        if run_style.is_some_and(|s| s != style) {
            spans.push(Span::styled(std::mem::take(&mut run), run_style.unwrap_or_default()));
        }
        run_style = Some(style);
        run.push(glyph);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style.unwrap_or_default()));
    }
    Line::from(spans)
}

pub fn draw_ui(f: &mut Frame, grid_lines: &[String], hud_info: &str, help: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(0),    // Belief grid
            Constraint::Length(1), // Key help
        ])
        .split(f.area());

    let hud = Paragraph::new(Span::styled(
        hud_info,
        Style::default().add_modifier(Modifier::REVERSED),
    ));
    f.render_widget(hud, chunks[0]);

    let text: Vec<Line> = grid_lines.iter().map(|row| styled_row(row)).collect();
    let panel = Block::default()
        .borders(Borders::ALL)
        .title(" belief ")
        .title_bottom(Line::from(legend()).centered());
    let field = Paragraph::new(text)
        .block(panel)
        .style(Style::default().bg(Color::Black));
    f.render_widget(field, chunks[1]);

    let footer = Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray)));
    f.render_widget(footer, chunks[2]);
}
