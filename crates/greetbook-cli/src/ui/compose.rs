//! Compose screen: the draft and the transient success banner.

use chrono::Utc;
use greetbook_core::flow::SubmissionState;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Min(3), Constraint::Length(1)])
    .split(area);

  let title = match app.identity.visitor() {
    Some(v) => format!(" Your greeting, {} ", v.name),
    None => " Your greeting ".to_string(),
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let text = match app.submission.state() {
    SubmissionState::Composing => format!("{}_", app.submission.draft()),
    SubmissionState::Submitting => app.submission.draft().to_string(),
  };
  f.render_widget(
    Paragraph::new(text).wrap(Wrap { trim: false }).block(block),
    rows[0],
  );

  if app.submission.success_visible(Utc::now()) {
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        " ✔ Greeting sent! It will appear once approved.",
        Style::default()
          .fg(Color::Green)
          .add_modifier(Modifier::BOLD),
      ))),
      rows[1],
    );
  }
}
