//! Greeting list and detail panes, shared by the moderation view and the
//! gallery.

use chrono::{DateTime, Local, Utc};
use greetbook_core::{
  flow::{LoadState, StatusFilter},
  greeting::{Greeting, GreetingStatus},
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::App;

// ─── Moderation ───────────────────────────────────────────────────────────────

pub fn draw_moderation(f: &mut Frame, area: Rect, app: &App) {
  let flow = &app.moderation;
  let tabs = [StatusFilter::All, StatusFilter::Approved, StatusFilter::Pending]
    .into_iter()
    .map(|filter| {
      let label = format!(" {} ({}) ", filter.label(), flow.count(filter));
      if filter == flow.filter() {
        Span::styled(
          label,
          Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        )
      } else {
        Span::styled(label, Style::default().fg(Color::Gray))
      }
    })
    .collect::<Vec<_>>();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);
  f.render_widget(Paragraph::new(Line::from(tabs)), rows[0]);

  let visible = flow.visible();
  draw_split(
    f,
    rows[1],
    " Greetings ",
    flow.load_state(),
    &visible,
    app.moderation_cursor,
    flow.selected(),
    true,
  );
}

// ─── Gallery ──────────────────────────────────────────────────────────────────

pub fn draw_gallery(f: &mut Frame, area: Rect, app: &App, now: DateTime<Utc>) {
  let flow = &app.gallery;
  let decoration = flow.rotation().current(now).unwrap_or_default();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);
  f.render_widget(
    Paragraph::new(Line::from(Span::styled(
      format!(" {decoration}  Happy birthday!  {decoration}"),
      Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::BOLD),
    ))),
    rows[0],
  );

  let visible: Vec<&Greeting> = flow.visible().iter().collect();
  draw_split(
    f,
    rows[1],
    " Gallery ",
    flow.load_state(),
    &visible,
    app.gallery_cursor,
    flow.selected(),
    false,
  );
}

// ─── Shared panes ─────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
fn draw_split(
  f: &mut Frame,
  area: Rect,
  title: &str,
  load_state: &LoadState,
  greetings: &[&Greeting],
  cursor: usize,
  selected: Option<&Greeting>,
  show_status: bool,
) {
  // Split into left list pane (40%) and right detail pane (60%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(area);

  draw_list(f, cols[0], title, load_state, greetings, cursor, show_status);
  match selected {
    Some(greeting) => draw_detail(f, cols[1], greeting, show_status),
    None => draw_empty_detail(f, cols[1]),
  }
}

fn draw_list(
  f: &mut Frame,
  area: Rect,
  title: &str,
  load_state: &LoadState,
  greetings: &[&Greeting],
  cursor: usize,
  show_status: bool,
) {
  let block = Block::default()
    .title(format!("{title}({}) ", greetings.len()))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let placeholder = match load_state {
    LoadState::NotLoaded | LoadState::Loading => Some("Loading…".to_string()),
    LoadState::Failed(e) => Some(format!("Could not load greetings: {e}")),
    LoadState::Ready if greetings.is_empty() => Some("Nothing here yet.".to_string()),
    LoadState::Ready => None,
  };
  if let Some(text) = placeholder {
    f.render_widget(
      Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = greetings
    .iter()
    .map(|g| {
      let mut spans = Vec::new();
      if show_status {
        spans.push(status_badge(g.status));
        spans.push(Span::raw(" "));
      }
      spans.push(Span::styled(
        g.from.clone(),
        Style::default().add_modifier(Modifier::BOLD),
      ));
      spans.push(Span::styled(
        format!("  {}", first_line(&g.message)),
        Style::default().fg(Color::Gray),
      ));
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(cursor.min(greetings.len().saturating_sub(1))));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}

fn draw_detail(f: &mut Frame, area: Rect, greeting: &Greeting, show_status: bool) {
  let block = Block::default()
    .title(format!(" {} ", greeting.from))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let label = |s: &'static str| {
    Span::styled(
      format!("{s:<8}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )
  };

  let mut lines = vec![
    Line::from(vec![label("from"), Span::raw(greeting.from.clone())]),
    Line::from(vec![label("to"), Span::raw(greeting.to.clone())]),
    Line::from(vec![
      label("date"),
      Span::raw(
        greeting
          .date
          .with_timezone(&Local)
          .format("%Y-%m-%d %H:%M")
          .to_string(),
      ),
    ]),
  ];
  if show_status {
    lines.push(Line::from(vec![label("status"), status_badge(greeting.status)]));
    if !greeting.email.is_empty() {
      lines.push(Line::from(vec![label("email"), Span::raw(greeting.email.clone())]));
    }
  }
  lines.push(Line::from(""));
  lines.extend(greeting.message.lines().map(|l| Line::from(l.to_string())));

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_empty_detail(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(vec![Span::styled(
      "Select a greeting and press Enter.",
      Style::default().fg(Color::DarkGray),
    )])),
    inner,
  );
}

fn status_badge(status: GreetingStatus) -> Span<'static> {
  let color = match status {
    GreetingStatus::Approved => Color::Green,
    GreetingStatus::Pending => Color::Yellow,
  };
  Span::styled(format!("[{status}]"), Style::default().fg(color))
}

fn first_line(message: &str) -> &str { message.lines().next().unwrap_or_default() }
