//! Identity screen: Google sign-in or the name/email form.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, FormField};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Who is writing? ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(2), // google hint
      Constraint::Length(3), // name
      Constraint::Length(3), // email
      Constraint::Min(0),
    ])
    .split(inner);

  let google = if app.identity.provider().is_configured() {
    "Press Ctrl-G to continue with Google, or fill in the form below."
  } else {
    "Fill in your name and email. (Start with --google-token to use Google.)"
  };
  f.render_widget(
    Paragraph::new(Line::from(Span::styled(
      google,
      Style::default().fg(Color::Gray),
    ))),
    rows[0],
  );

  draw_field(f, rows[1], "Name", &app.form.name, app.form_focus == FormField::Name);
  draw_field(f, rows[2], "Email", &app.form.email, app.form_focus == FormField::Email);
}

fn draw_field(f: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
  let border = if focused {
    Style::default().fg(Color::Yellow)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  let text = if focused {
    format!("{value}_")
  } else {
    value.to_string()
  };
  let block = Block::default()
    .title(format!(" {label} "))
    .borders(Borders::ALL)
    .border_style(border);
  f.render_widget(
    Paragraph::new(text)
      .style(Style::default().add_modifier(Modifier::BOLD))
      .block(block),
    area,
  );
}
