//! TUI rendering entry point.

pub mod compose;
pub mod greetings;
pub mod identify;

use chrono::{Local, Utc};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  match app.screen {
    Screen::Identify => identify::draw(f, rows[1], app),
    Screen::Compose => compose::draw(f, rows[1], app),
    Screen::Moderate => greetings::draw_moderation(f, rows[1], app),
    Screen::Gallery => greetings::draw_gallery(f, rows[1], app, Utc::now()),
  }
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let tab = |label: &'static str, active: bool| {
    let style = if active {
      Style::default()
        .fg(Color::Black)
        .bg(Color::Magenta)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::White)
    };
    Span::styled(label, style)
  };

  let compose_active = matches!(app.screen, Screen::Identify | Screen::Compose);
  let mut spans = vec![
    Span::styled(
      " greetbook ",
      Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    tab(" F1 write ", compose_active),
    tab(" F2 moderate ", app.screen == Screen::Moderate),
    tab(" F3 gallery ", app.screen == Screen::Gallery),
  ];

  let right = match app.identity.visitor() {
    Some(v) => format!("{} <{}>  {date} ", v.name, v.email),
    None => format!("{date} "),
  };

  // Simple left-right header: pad the middle.
  let left_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right.chars().count());
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(Span::styled(right, Style::default().fg(Color::Gray)));

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let detail_open = match app.screen {
    Screen::Moderate => app.moderation.selected().is_some(),
    Screen::Gallery => app.gallery.selected().is_some(),
    _ => false,
  };

  let (mode_label, hints) = match app.screen {
    Screen::Identify => (
      "IDENTIFY",
      "Tab switch field  Enter continue  Ctrl-G google  Esc quit",
    ),
    Screen::Compose => ("WRITE", "Enter send  Ctrl-O change account  Esc quit"),
    Screen::Moderate if detail_open => ("DETAIL", "t toggle status  Esc back  q quit"),
    Screen::Moderate => (
      "MODERATE",
      "↑↓/jk navigate  Enter detail  t toggle  f filter  r reload  q quit",
    ),
    Screen::Gallery if detail_open => ("DETAIL", "Esc back  q quit"),
    Screen::Gallery => ("GALLERY", "↑↓/jk navigate  Enter detail  r reload  q quit"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
