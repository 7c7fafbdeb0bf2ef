//! Application state machine and event dispatcher.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use greetbook_core::{
  flow::{DisplayFlow, ModerationFlow, Rotation, SubmissionFlow},
  greeting::Greeting,
  identity::IdentitySession,
  visitor::ManualIdentity,
};

use crate::{client::ApiClient, identity::GoogleIdentity};

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Choose an identity: Google or the name/email form.
  Identify,
  /// Write and send a greeting.
  Compose,
  /// Review submitted greetings.
  Moderate,
  /// Approved greetings only.
  Gallery,
}

/// Which field of the manual identity form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
  #[default]
  Name,
  Email,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  pub identity: IdentitySession<GoogleIdentity>,

  /// Contents of the manual identity form.
  pub form: ManualIdentity,
  pub form_focus: FormField,

  pub submission: SubmissionFlow<ApiClient>,
  pub moderation: ModerationFlow<ApiClient>,
  pub gallery:    DisplayFlow<ApiClient>,

  /// Cursor within the moderation view's visible partition.
  pub moderation_cursor: usize,
  /// Cursor within the gallery.
  pub gallery_cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(client: ApiClient, google: GoogleIdentity, now: DateTime<Utc>) -> Self {
    let client = Arc::new(client);
    Self {
      screen: Screen::Identify,
      identity: IdentitySession::new(google),
      form: ManualIdentity::default(),
      form_focus: FormField::default(),
      // The server fills in the recipient.
      submission: SubmissionFlow::new(client.clone(), ""),
      moderation: ModerationFlow::new(client.clone()),
      gallery: DisplayFlow::new(client, Rotation::decorations(now)),
      moderation_cursor: 0,
      gallery_cursor: 0,
      status_msg: String::new(),
    }
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Switch to `screen`, loading its data when it is a read view.
  pub async fn enter(&mut self, screen: Screen) {
    self.status_msg.clear();
    self.screen = match screen {
      Screen::Identify | Screen::Compose if self.identity.visitor().is_some() => {
        Screen::Compose
      }
      Screen::Identify | Screen::Compose => Screen::Identify,
      other => other,
    };
    match self.screen {
      Screen::Moderate => self.reload_moderation().await,
      Screen::Gallery => self.reload_gallery().await,
      Screen::Identify | Screen::Compose => {}
    }
  }

  async fn reload_moderation(&mut self) {
    self.status_msg = "Loading greetings…".into();
    match self.moderation.load().await {
      Ok(()) => {
        self.moderation_cursor = 0;
        self.status_msg.clear();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn reload_gallery(&mut self) {
    self.status_msg = "Loading gallery…".into();
    match self.gallery.load().await {
      Ok(()) => {
        self.gallery_cursor = 0;
        self.status_msg.clear();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  /// Advance time-driven state. Called once per event-loop iteration.
  pub fn tick(&mut self, now: DateTime<Utc>) { self.submission.dismiss_expired(now); }

  // ── Cursors ───────────────────────────────────────────────────────────────

  /// The greeting under the moderation cursor, if any.
  pub fn moderation_cursor_greeting(&self) -> Option<&Greeting> {
    self.moderation.visible().get(self.moderation_cursor).copied()
  }

  /// The greeting under the gallery cursor, if any.
  pub fn gallery_cursor_greeting(&self) -> Option<&Greeting> {
    self.gallery.visible().get(self.gallery_cursor)
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    // Global: function keys switch views.
    match key.code {
      KeyCode::F(1) => {
        self.enter(Screen::Compose).await;
        return Ok(true);
      }
      KeyCode::F(2) => {
        self.enter(Screen::Moderate).await;
        return Ok(true);
      }
      KeyCode::F(3) => {
        self.enter(Screen::Gallery).await;
        return Ok(true);
      }
      _ => {}
    }

    match self.screen {
      Screen::Identify => self.handle_identify_key(key).await,
      Screen::Compose => self.handle_compose_key(key).await,
      Screen::Moderate => self.handle_moderate_key(key).await,
      Screen::Gallery => self.handle_gallery_key(key).await,
    }
  }

  async fn handle_identify_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('g') {
      self.status_msg = "Signing in with Google…".into();
      match self.identity.sign_in_federated().await.map(|_| ()) {
        Ok(()) => self.enter(Screen::Compose).await,
        Err(e) => self.status_msg = format!("Error: {e}"),
      }
      return Ok(true);
    }

    match key.code {
      KeyCode::Esc => return Ok(false),
      KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
        self.form_focus = match self.form_focus {
          FormField::Name => FormField::Email,
          FormField::Email => FormField::Name,
        };
      }
      KeyCode::Backspace => {
        self.focused_field().pop();
      }
      KeyCode::Char(c) => self.focused_field().push(c),
      KeyCode::Enter => match self.identity.sign_in_manual(self.form.clone()).await.map(|_| ()) {
        Ok(()) => {
          self.form = ManualIdentity::default();
          self.form_focus = FormField::default();
          self.enter(Screen::Compose).await;
        }
        Err(e) => self.status_msg = format!("Error: {e}"),
      },
      _ => {}
    }
    Ok(true)
  }

  fn focused_field(&mut self) -> &mut String {
    match self.form_focus {
      FormField::Name => &mut self.form.name,
      FormField::Email => &mut self.form.email,
    }
  }

  async fn handle_compose_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('o') {
      if let Err(e) = self.identity.change_account().await {
        self.status_msg = format!("Sign-out failed: {e}");
      }
      self.screen = Screen::Identify;
      return Ok(true);
    }

    match key.code {
      KeyCode::Esc => return Ok(false),
      KeyCode::Backspace => {
        self.submission.draft_mut().pop();
      }
      KeyCode::Char(c) => self.submission.draft_mut().push(c),
      KeyCode::Enter => {
        let Some(visitor) = self.identity.visitor().cloned() else {
          self.screen = Screen::Identify;
          return Ok(true);
        };
        self.status_msg = "Sending…".into();
        match self.submission.submit(&visitor, Utc::now()).await {
          Ok(_) => self.status_msg.clear(),
          Err(e) => self.status_msg = format!("Error: {e}"),
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn handle_moderate_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if self.moderation.selected().is_some() {
      match key.code {
        KeyCode::Char('q') => return Ok(false),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Left | KeyCode::Char('h') => {
          self.moderation.close_detail();
        }
        KeyCode::Char(' ') | KeyCode::Char('t') => self.toggle_under_cursor().await,
        _ => {}
      }
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.moderation.visible().len();
        if len > 0 && self.moderation_cursor + 1 < len {
          self.moderation_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.moderation_cursor = self.moderation_cursor.saturating_sub(1);
      }
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.moderation_cursor_greeting().map(|g| g.id) {
          self.moderation.select(id);
        }
      }
      KeyCode::Char(' ') | KeyCode::Char('t') => self.toggle_under_cursor().await,
      KeyCode::Char('f') | KeyCode::Tab => {
        let next = self.moderation.filter().next();
        self.moderation.set_filter(next);
        self.moderation_cursor = 0;
      }
      KeyCode::Char('r') => self.reload_moderation().await,
      _ => {}
    }
    Ok(true)
  }

  async fn toggle_under_cursor(&mut self) {
    let id = match self.moderation.selected() {
      Some(g) => g.id,
      None => match self.moderation_cursor_greeting() {
        Some(g) => g.id,
        None => return,
      },
    };
    match self.moderation.toggle(id).await {
      Ok(()) => {
        self.status_msg.clear();
        // The toggled greeting may have left the active partition.
        let len = self.moderation.visible().len();
        if self.moderation_cursor >= len {
          self.moderation_cursor = len.saturating_sub(1);
        }
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  async fn handle_gallery_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if self.gallery.selected().is_some() {
      match key.code {
        KeyCode::Char('q') => return Ok(false),
        KeyCode::Esc | KeyCode::Enter | KeyCode::Left | KeyCode::Char('h') => {
          self.gallery.close_detail();
        }
        _ => {}
      }
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.gallery.visible().len();
        if len > 0 && self.gallery_cursor + 1 < len {
          self.gallery_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.gallery_cursor = self.gallery_cursor.saturating_sub(1);
      }
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.gallery_cursor_greeting().map(|g| g.id) {
          self.gallery.select(id);
        }
      }
      KeyCode::Char('r') => self.reload_gallery().await,
      _ => {}
    }
    Ok(true)
  }
}
