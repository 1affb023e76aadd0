//! Application core: event loop, mutation pipeline, overlays.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use clientele_core::{
    ClientManager, CoreError, DeleteEvent, EditIntent, Notice, NoticeLevel, PreferenceStore,
    Reload, validate_client_input,
};

use crate::action::{Action, ConfirmDelete};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::clients::ClientsScreen;
use crate::theme;
use crate::tui::Tui;

/// Toasts kept on screen at once.
const MAX_TOASTS: usize = 3;
const TOAST_TTL: Duration = Duration::from_secs(4);
const ERROR_TOAST_TTL: Duration = Duration::from_secs(8);

/// Top-level application state and event loop.
pub struct App {
    screen: ClientsScreen,
    manager: ClientManager,
    /// Where sort, search and page size are persisted.
    store: PreferenceStore,
    running: bool,
    help_visible: bool,
    /// A mutation is in flight; further ones are refused.
    busy: bool,
    /// Sidebar-style counter from the appliance's database summary.
    client_count: Option<u64>,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmDelete>,
    /// Newest last.
    toasts: Vec<(Notice, Instant)>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(manager: ClientManager, store: PreferenceStore) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screen = ClientsScreen::new(store.load());

        Self {
            screen,
            manager,
            store,
            running: true,
            help_visible: false,
            busy: false,
            client_count: None,
            pending_confirm: None,
            toasts: Vec::new(),
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.spawn_load();

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(screen = self.screen.id(), "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Tick => self.action_tx.send(Action::Tick)?,
                // Redraw right away on resize.
                Event::Resize | Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        drop(events);
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if !self.screen.captures_input() {
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
                _ => {}
            }
        }

        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Render => {}
            Action::Tick => self.expire_toasts(),
            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Reload => self.spawn_load(),
            Action::ClientCountUpdated(n) => self.client_count = Some(*n),

            Action::Busy(busy) => {
                self.busy = *busy;
                self.forward(action)?;
            }

            Action::SnapshotLoaded(_)
            | Action::SuggestionsLoaded(_)
            | Action::AddSucceeded
            | Action::ClientDeleted(_)
            | Action::DeleteFinished => self.forward(action)?,

            // ── Mutations ────────────────────────────────────────────
            Action::AddClient { client, comment } => self.add_client(client, comment)?,
            Action::EditClient { record, intent } => {
                if self.begin_mutation()? {
                    self.action_tx.send(Action::Notify(
                        Notice::info("Editing client...").with_detail(&record.client),
                    ))?;
                    self.spawn_edit(record.clone(), intent.clone());
                }
            }
            Action::RequestDelete(confirm) => {
                if !self.busy {
                    self.pending_confirm = Some(confirm.clone());
                }
            }
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    if self.begin_mutation()? {
                        self.spawn_delete(confirm);
                    }
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            Action::Notify(notice) => {
                debug!(level = ?notice.level, title = %notice.title, "notice");
                self.toasts.push((notice.clone(), Instant::now()));
                if self.toasts.len() > MAX_TOASTS {
                    self.toasts.remove(0);
                }
            }

            Action::PreferencesChanged(prefs) => {
                if let Err(e) = self.store.save(prefs) {
                    warn!(error = %e, "failed to persist grid state");
                }
            }
        }
        Ok(())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn expire_toasts(&mut self) {
        self.toasts.retain(|(notice, shown)| {
            let ttl = if notice.level == NoticeLevel::Error {
                ERROR_TOAST_TTL
            } else {
                TOAST_TTL
            };
            shown.elapsed() < ttl
        });
    }

    /// Claim the busy flag. `false` when another mutation holds it.
    fn begin_mutation(&mut self) -> Result<bool> {
        if self.busy {
            return Ok(false);
        }
        self.busy = true;
        self.screen.update(&Action::Busy(true))?;
        Ok(true)
    }

    // ── Background tasks ─────────────────────────────────────────────

    /// Initial load and manual refresh. Failures surface as toasts.
    fn spawn_load(&self) {
        let manager = self.manager.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match manager.load().await {
                Ok(snapshot) => {
                    let _ = tx.send(Action::SnapshotLoaded(snapshot));
                }
                Err(e) => {
                    warn!(error = %e, "loading clients failed");
                    let _ = tx.send(Action::Notify(Notice::error(
                        "Error while loading clients",
                        e.detail(),
                    )));
                }
            }
            match manager.client_count().await {
                Ok(n) => {
                    let _ = tx.send(Action::ClientCountUpdated(n));
                }
                Err(e) => warn!(error = %e, "client counter unavailable"),
            }
            let _ = tx.send(Action::SuggestionsLoaded(manager.suggestions().await));
        });
    }

    fn add_client(&mut self, client: &str, comment: &str) -> Result<()> {
        // Rejected input never reaches the network, nor the busy flag.
        let validated = match validate_client_input(client) {
            Ok(v) => v,
            Err(e) => {
                self.action_tx.send(Action::Notify(Notice::warning(e.to_string())))?;
                return Ok(());
            }
        };
        if !self.begin_mutation()? {
            return Ok(());
        }
        self.action_tx.send(Action::Notify(
            Notice::info("Adding client...").with_detail(&validated.value),
        ))?;

        let manager = self.manager.clone();
        let tx = self.action_tx.clone();
        let (client, comment) = (client.to_owned(), comment.to_owned());
        tokio::spawn(async move {
            match manager.add(&client, &comment).await {
                Ok(outcome) => {
                    let _ = tx.send(Action::Notify(outcome.notice));
                    let _ = tx.send(Action::AddSucceeded);
                    let _ = tx.send(Action::SuggestionsLoaded(outcome.suggestions));
                    send_reload(&tx, outcome.reload);
                }
                Err(e) => {
                    warn!(error = %e, %client, "add failed");
                    let _ = tx.send(Action::Notify(Notice::error(
                        "Error while adding new client",
                        e.detail(),
                    )));
                }
            }
            let _ = tx.send(Action::Busy(false));
        });
        Ok(())
    }

    fn spawn_edit(&self, record: clientele_core::ClientRecord, intent: EditIntent) {
        let manager = self.manager.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match manager.edit(&record, &intent).await {
                Ok(outcome) => {
                    let _ = tx.send(Action::Notify(outcome.notice));
                    send_reload(&tx, outcome.reload);
                }
                Err(e) => {
                    warn!(error = %e, client = %record.client, "edit failed");
                    let _ = tx.send(Action::Notify(intent.failure_notice(&record.client, &e)));
                }
            }
            let _ = tx.send(Action::Busy(false));
        });
    }

    fn spawn_delete(&self, confirm: ConfirmDelete) {
        let manager = self.manager.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let events_tx = tx.clone();
            let result = manager
                .delete_batch(&confirm.keys, move |event| {
                    if let DeleteEvent::Deleted { ref key, .. } = event {
                        let _ = events_tx.send(Action::ClientDeleted(key.clone()));
                    }
                    let _ = events_tx.send(Action::Notify(event.notice()));
                })
                .await;

            match result {
                Ok(report) => {
                    // A failed batch keeps the selection so it can be retried.
                    match report.failure {
                        Some(failure) => {
                            let _ = tx.send(Action::Notify(failure.notice()));
                        }
                        None => {
                            let _ = tx.send(Action::DeleteFinished);
                        }
                    }
                    send_reload(&tx, report.reload);
                }
                Err(e) => {
                    let _ = tx.send(Action::Notify(delete_refused(&confirm, &e)));
                }
            }
            let _ = tx.send(Action::Busy(false));
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.screen.render(frame, content);
        self.render_status_bar(frame, status);

        // Overlays: last = topmost
        self.render_toasts(frame, area);
        if let Some(ref confirm) = self.pending_confirm {
            Self::render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let counter = match self.client_count {
            Some(n) => Span::styled(
                format!("● clients: {n}"),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
            None => Span::styled("○ clients: –", Style::default().fg(theme::BORDER_GRAY)),
        };
        let mut spans = vec![Span::raw(" "), counter];
        if self.busy {
            spans.push(Span::styled(
                "  ◐ working…",
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ));
        }
        spans.push(Span::styled(
            " │ ? help  R reload  q quit",
            theme::key_hint(),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Stacked bottom-right, newest at the bottom.
    fn render_toasts(&self, frame: &mut Frame, area: Rect) {
        let mut bottom = area.y + area.height.saturating_sub(1); // above status bar
        for (notice, _) in self.toasts.iter().rev() {
            let (color, icon) = theme::notice(notice.level);
            let text = notice.text();
            let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
            let width = len
                .saturating_add(6)
                .clamp(20, 72)
                .min(area.width.saturating_sub(2));
            let height = 3u16;
            if bottom < area.y + height {
                break;
            }
            let y = bottom - height;
            let x = area.x + area.width.saturating_sub(width + 1);
            let toast = Rect::new(x, y, width, height);
            bottom = y;

            frame.render_widget(Clear, toast);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .style(Style::default().bg(theme::BG_DARK));
            let inner = block.inner(toast);
            frame.render_widget(block, toast);
            let line = Line::from(vec![
                Span::styled(format!(" {icon} "), Style::default().fg(color)),
                Span::styled(text, Style::default().fg(theme::DIM_WHITE)),
            ]);
            frame.render_widget(Paragraph::new(line), inner);
        }
    }

    fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let width = 56u16.min(area.width.saturating_sub(4));
        let height = 5u16;
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let dialog = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(Clear, dialog);
        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ELECTRIC_YELLOW))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let text = vec![
            Line::styled(format!("  {confirm}"), Style::default().fg(theme::DIM_WHITE)),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("delete    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        const KEYS: &[(&str, &str)] = &[
            ("j/k ↑/↓", "Move up/down"),
            ("[ / ]", "Previous / next page"),
            ("+ / -", "More / fewer rows per page"),
            ("/", "Search"),
            ("1-5", "Show / hide column"),
            ("s / S", "Sort column / direction"),
            ("r", "Reset sorting"),
            ("␣", "Select row"),
            ("v / V", "Select page / none"),
            ("n", "Add client"),
            ("c", "Edit comment"),
            ("g", "Edit groups"),
            ("d / D", "Delete row / selected"),
            ("R", "Reload"),
            ("q", "Quit"),
        ];

        let width = 52u16.min(area.width.saturating_sub(4));
        let rows = u16::try_from(KEYS.len()).unwrap_or(u16::MAX);
        let height = rows.saturating_add(5).min(area.height.saturating_sub(2));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let help = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(Clear, help);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help);
        frame.render_widget(block, help);

        let mut lines = vec![Line::from("")];
        lines.extend(KEYS.iter().map(|(key, label)| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(*label, theme::key_hint()),
            ])
        }));
        lines.push(Line::from(""));
        lines.push(Line::styled("  Esc or ? to close", theme::key_hint()));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn send_reload(tx: &mpsc::UnboundedSender<Action>, reload: Reload) {
    if let Some(snapshot) = reload.snapshot {
        let _ = tx.send(Action::SnapshotLoaded(snapshot));
    }
    if let Some(n) = reload.client_count {
        let _ = tx.send(Action::ClientCountUpdated(n));
    }
}

/// The batch never started (another change held the lock).
fn delete_refused(confirm: &ConfirmDelete, error: &CoreError) -> Notice {
    Notice::error(
        format!("Error while deleting client(s): {}", confirm.clients.join(", ")),
        error.detail(),
    )
}
