//! Clients screen: the grid, the add form, the inline editors and the
//! group picker.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table,
    TableState,
};
use tui_input::{Input, InputRequest};

use clientele_core::{
    ClientGrid, ClientRecord, ColumnId, EditIntent, GridPreferences, GroupPicker, SortDirection,
    SuggestionOption,
};

use crate::action::{Action, ConfirmDelete};
use crate::component::Component;
use crate::theme;

// ── Modes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddField {
    Suggestion,
    Client,
    Comment,
}

impl AddField {
    fn next(self) -> Self {
        match self {
            Self::Suggestion => Self::Client,
            Self::Client => Self::Comment,
            Self::Comment => Self::Suggestion,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Suggestion => Self::Comment,
            Self::Client => Self::Suggestion,
            Self::Comment => Self::Client,
        }
    }
}

/// The add form. `choice` indexes the screen's suggestion options; 0 is
/// the blank entry.
struct AddForm {
    choice: usize,
    client: Input,
    comment: Input,
    focus: AddField,
}

impl AddForm {
    fn new() -> Self {
        Self {
            choice: 0,
            client: Input::default(),
            comment: Input::default(),
            focus: AddField::Client,
        }
    }
}

enum Mode {
    Browse,
    Search(Input),
    Add(AddForm),
    Comment {
        record: ClientRecord,
        input: Input,
    },
    Groups {
        record: ClientRecord,
        picker: GroupPicker,
        cursor: usize,
    },
}

// ── Screen ───────────────────────────────────────────────────────────

pub struct ClientsScreen {
    grid: ClientGrid,
    suggestions: Vec<SuggestionOption>,
    mode: Mode,
    /// Cursor within the current page.
    table_state: TableState,
    loaded: bool,
    busy: bool,
}

impl ClientsScreen {
    pub fn new(prefs: GridPreferences) -> Self {
        Self {
            grid: ClientGrid::new(prefs),
            suggestions: vec![SuggestionOption::blank()],
            mode: Mode::Browse,
            table_state: TableState::default().with_selected(Some(0)),
            loaded: false,
            busy: false,
        }
    }

    fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn current(&self) -> Option<ClientRecord> {
        self.grid.page_rows().get(self.cursor()).map(|r| (*r).clone())
    }

    fn clamp_cursor(&mut self) {
        let len = self.grid.page_rows().len();
        let cursor = self.cursor().min(len.saturating_sub(1));
        self.table_state.select(Some(cursor));
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.grid.page_rows().len();
        if len == 0 {
            return;
        }
        let next = self.cursor().saturating_add_signed(delta).min(len - 1);
        self.table_state.select(Some(next));
    }

    fn prefs_changed(&mut self) -> Option<Action> {
        self.clamp_cursor();
        Some(Action::PreferencesChanged(self.grid.preferences().clone()))
    }

    fn close_popup(&mut self) {
        self.mode = Mode::Browse;
    }

    // ── Browse keys ──────────────────────────────────────────────────

    #[allow(clippy::too_many_lines)]
    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_cursor(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_cursor(-1);
                None
            }
            KeyCode::Char(' ') => {
                if let Some(row) = self.current() {
                    self.grid.toggle_selected(&row.key());
                }
                None
            }
            KeyCode::Char('v') => {
                self.grid.select_page();
                None
            }
            KeyCode::Char('V') => {
                self.grid.deselect_all();
                None
            }

            // Sorting, paging, search
            KeyCode::Char('s') => {
                self.grid.cycle_order_column();
                self.prefs_changed()
            }
            KeyCode::Char('S') => {
                self.grid.toggle_order_direction();
                self.prefs_changed()
            }
            KeyCode::Char('r') => {
                if self.grid.is_sort_default() {
                    return None;
                }
                self.grid.reset_sort();
                self.prefs_changed()
            }
            KeyCode::Char(']') => {
                self.grid.next_page();
                self.table_state.select(Some(0));
                None
            }
            KeyCode::Char('[') => {
                self.grid.prev_page();
                self.table_state.select(Some(0));
                None
            }
            KeyCode::Char('+') => {
                self.grid.set_page_size(self.grid.page_size().larger());
                self.prefs_changed()
            }
            KeyCode::Char('-') => {
                self.grid.set_page_size(self.grid.page_size().smaller());
                self.prefs_changed()
            }
            KeyCode::Char('/') => {
                let input = Input::default().with_value(self.grid.search().to_owned());
                self.mode = Mode::Search(input);
                None
            }
            KeyCode::Char(c @ '1'..='5') => {
                let column = match c {
                    '1' => ColumnId::Select,
                    '2' => ColumnId::Client,
                    '3' => ColumnId::Comment,
                    '4' => ColumnId::Groups,
                    _ => ColumnId::Actions,
                };
                self.grid.toggle_column(column);
                self.prefs_changed()
            }
            KeyCode::Char('R') => Some(Action::Reload),

            // Mutations are ignored while one is in flight.
            _ if self.busy => None,

            KeyCode::Char('n') => {
                self.mode = Mode::Add(AddForm::new());
                None
            }
            KeyCode::Char('c') => {
                if let Some(record) = self.current() {
                    let input = Input::default().with_value(record.display_comment());
                    self.mode = Mode::Comment { record, input };
                }
                None
            }
            KeyCode::Char('g') => {
                if let Some(record) = self.current() {
                    let picker = GroupPicker::new(&record.groups);
                    self.mode = Mode::Groups {
                        record,
                        picker,
                        cursor: 0,
                    };
                }
                None
            }
            KeyCode::Char('d') => self.current().map(|row| {
                Action::RequestDelete(ConfirmDelete {
                    keys: vec![row.key()],
                    clients: vec![row.client],
                })
            }),
            KeyCode::Char('D') => {
                if !self.grid.can_bulk_delete() {
                    return None;
                }
                let keys = self.grid.selected_keys();
                let clients = keys
                    .iter()
                    .map(|k| {
                        self.grid
                            .find(k)
                            .map_or_else(|| k.to_string(), |r| r.client.clone())
                    })
                    .collect();
                Some(Action::RequestDelete(ConfirmDelete { keys, clients }))
            }
            _ => None,
        }
    }

    // ── Popup keys ───────────────────────────────────────────────────

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        let Mode::Search(ref mut input) = self.mode else {
            return None;
        };
        match key.code {
            KeyCode::Enter => {
                self.close_popup();
                self.prefs_changed()
            }
            KeyCode::Esc => {
                self.grid.set_search("");
                self.close_popup();
                self.prefs_changed()
            }
            _ => {
                if edit_input(input, key) {
                    let query = input.value().to_owned();
                    self.grid.set_search(query);
                    self.table_state.select(Some(0));
                }
                None
            }
        }
    }

    fn handle_add_key(&mut self, key: KeyEvent) -> Option<Action> {
        let busy = self.busy;
        let options = self.suggestions.len();
        let Mode::Add(ref mut form) = self.mode else {
            return None;
        };
        match key.code {
            KeyCode::Esc => {
                self.close_popup();
                None
            }
            KeyCode::Tab => {
                form.focus = form.focus.next();
                None
            }
            KeyCode::BackTab => {
                form.focus = form.focus.prev();
                None
            }
            KeyCode::Enter if !busy => Some(Action::AddClient {
                client: form.client.value().to_owned(),
                comment: form.comment.value().to_owned(),
            }),
            KeyCode::Up | KeyCode::Down if form.focus == AddField::Suggestion => {
                form.choice = if key.code == KeyCode::Down {
                    (form.choice + 1).min(options.saturating_sub(1))
                } else {
                    form.choice.saturating_sub(1)
                };
                let value = self.suggestions.get(form.choice).map_or("", |o| o.value.as_str());
                overwrite_input(&mut form.client, value);
                None
            }
            _ => {
                match form.focus {
                    AddField::Client => {
                        edit_input(&mut form.client, key);
                    }
                    AddField::Comment => {
                        edit_input(&mut form.comment, key);
                    }
                    AddField::Suggestion => {}
                }
                None
            }
        }
    }

    fn handle_comment_key(&mut self, key: KeyEvent) -> Option<Action> {
        let busy = self.busy;
        let Mode::Comment {
            ref record,
            ref mut input,
        } = self.mode
        else {
            return None;
        };
        match key.code {
            KeyCode::Esc => {
                self.close_popup();
                None
            }
            KeyCode::Enter if !busy => {
                let text = input.value().to_owned();
                let action = (text != record.display_comment()).then(|| Action::EditClient {
                    record: record.clone(),
                    intent: EditIntent::Comment(text),
                });
                self.close_popup();
                action
            }
            _ => {
                edit_input(input, key);
                None
            }
        }
    }

    fn handle_groups_key(&mut self, key: KeyEvent) -> Option<Action> {
        let busy = self.busy;
        let count = self.grid.groups().len();
        let group_ids: Vec<i64> = self.grid.groups().iter().map(|g| g.id).collect();
        let Mode::Groups {
            ref record,
            ref mut picker,
            ref mut cursor,
        } = self.mode
        else {
            return None;
        };
        match key.code {
            KeyCode::Esc => {
                picker.dismiss();
                self.close_popup();
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                *cursor = (*cursor + 1).min(count.saturating_sub(1));
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                *cursor = cursor.saturating_sub(1);
                None
            }
            KeyCode::Char(' ') => {
                if let Some(id) = group_ids.get(*cursor) {
                    picker.toggle(*id);
                }
                None
            }
            KeyCode::Enter if !busy => {
                let action = picker.apply().map(|ids| Action::EditClient {
                    record: record.clone(),
                    intent: EditIntent::Groups(ids),
                });
                self.close_popup();
                action
            }
            _ => None,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let order = self.grid.order();
        let arrow = match order.direction {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        };
        let mut spans = vec![
            Span::styled(" Clients ", theme::title_style()),
            Span::styled(
                format!(
                    " {} shown · {} selected · sorted by {} {arrow}",
                    self.grid.displayed().len(),
                    self.grid.selected_count(),
                    order.column.title(),
                ),
                theme::table_row(),
            ),
        ];
        if !self.grid.is_sort_default() {
            spans.push(Span::styled("  r ", theme::key_hint_key()));
            spans.push(Span::styled("reset sort", theme::key_hint()));
        }
        if !self.grid.search().is_empty() {
            spans.push(Span::styled(
                format!("  search: {}", self.grid.search()),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn cell<'a>(&self, column: ColumnId, row: &'a ClientRecord) -> Cell<'a> {
        match column {
            ColumnId::Id => Cell::from(row.id.to_string()),
            ColumnId::Select => {
                Cell::from(if self.grid.is_selected(&row.key()) { "[x]" } else { "[ ]" })
            }
            ColumnId::Client => {
                let mut lines = vec![Line::styled(row.client.as_str(), theme::identity())];
                if let Some(name) = row.resolved_name() {
                    lines.push(Line::styled(name, theme::secondary()));
                }
                Cell::from(Text::from(lines))
            }
            ColumnId::Comment => Cell::from(row.display_comment()),
            ColumnId::Groups => Cell::from(self.grid.group_names(row)),
            ColumnId::Actions => Cell::from(Line::from(vec![
                Span::styled("d ", theme::key_hint_key()),
                Span::styled("delete", theme::key_hint()),
            ])),
        }
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let rows = self.grid.page_rows();
        if rows.is_empty() {
            let text = if !self.loaded {
                "Loading clients…".to_owned()
            } else if self.grid.search().is_empty() {
                "No clients configured. Press n to add one.".to_owned()
            } else {
                format!("No clients match \"{}\"", self.grid.search())
            };
            let paragraph = Paragraph::new(Line::styled(text, theme::key_hint())).block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let columns = self.grid.visible_columns();
        let order = self.grid.order();
        let header = Row::new(columns.iter().map(|c| {
            let mut title = c.title().to_owned();
            if *c == order.column {
                title.push_str(match order.direction {
                    SortDirection::Asc => " ▲",
                    SortDirection::Desc => " ▼",
                });
            }
            Cell::from(title)
        }))
        .style(theme::table_header());

        let body = rows.iter().map(|row| {
            let height = if row.resolved_name().is_some() { 2 } else { 1 };
            Row::new(columns.iter().map(|c| self.cell(*c, row)))
                .height(height)
                .style(theme::table_row())
        });

        let widths: Vec<Constraint> = columns.iter().map(|c| column_width(*c)).collect();
        let table = Table::new(body, widths)
            .header(header)
            .block(block)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸ ");

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(row) = self.current() else {
            return;
        };
        let text = row.tooltip().replace('\n', "  ·  ");
        frame.render_widget(
            Paragraph::new(Line::styled(format!(" {text}"), theme::key_hint())),
            area,
        );
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        if let Mode::Search(ref input) = self.mode {
            let line = Line::from(vec![
                Span::styled(" / ", Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(input.value(), Style::default().fg(theme::NEON_CYAN)),
                Span::styled("█", Style::default().fg(theme::NEON_CYAN)),
                Span::styled("  Esc clear  Enter done", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let mut spans = vec![Span::styled(
            format!(
                " Page {}/{} · {} per page ",
                self.grid.page() + 1,
                self.grid.page_count(),
                self.grid.page_size().label()
            ),
            theme::table_row(),
        )];
        let mut hint = |key: &'static str, label: &'static str| {
            spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
            spans.push(Span::styled(label, theme::key_hint()));
        };
        hint("n", "add");
        hint("c", "comment");
        hint("g", "groups");
        hint("␣", "select");
        if self.grid.bulk_controls_visible() {
            hint("v/V", "all/none");
        }
        if self.grid.can_bulk_delete() {
            hint("D", "delete selected");
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_add(&self, frame: &mut Frame, area: Rect, form: &AddForm) {
        let popup = centered(area, 64, 13);
        frame.render_widget(Clear, popup);
        let block = popup_block(" Add client ");
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [pick, client, comment, hints] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(inner);

        let label = self
            .suggestions
            .get(form.choice)
            .filter(|o| !o.is_blank())
            .map_or("(pick a discovered device with ↑/↓)", |o| o.label.as_str());
        let pick_block = field_block(
            &format!(
                " Known devices {}/{} ",
                form.choice,
                self.suggestions.len().saturating_sub(1)
            ),
            form.focus == AddField::Suggestion,
        );
        frame.render_widget(
            Paragraph::new(Line::styled(label, theme::table_row())).block(pick_block),
            pick,
        );

        render_input(
            frame,
            client,
            "IP, subnet, MAC or host name",
            &form.client,
            form.focus == AddField::Client,
        );
        render_input(frame, comment, "Comment", &form.comment, form.focus == AddField::Comment);

        let submit = if self.busy { "busy…" } else { "add" };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Tab ", theme::key_hint_key()),
                Span::styled("next field", theme::key_hint()),
                Span::styled("  Enter ", theme::key_hint_key()),
                Span::styled(submit, theme::key_hint()),
                Span::styled("  Esc ", theme::key_hint_key()),
                Span::styled("close", theme::key_hint()),
            ])),
            hints,
        );
    }

    fn render_comment(frame: &mut Frame, area: Rect, record: &ClientRecord, input: &Input) {
        let popup = centered(area, 60, 6);
        frame.render_widget(Clear, popup);
        let block = popup_block(" Edit comment ");
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [field, hints] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(inner);
        render_input(frame, field, &record.client, input, true);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Enter ", theme::key_hint_key()),
                Span::styled("save", theme::key_hint()),
                Span::styled("  Esc ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ])),
            hints,
        );
    }

    fn render_groups(
        &self,
        frame: &mut Frame,
        area: Rect,
        record: &ClientRecord,
        picker: &GroupPicker,
        cursor: usize,
    ) {
        let options = self.grid.group_options();
        let height = u16::try_from(options.len()).unwrap_or(u16::MAX).saturating_add(4).min(20);
        let popup = centered(area, 48, height);
        frame.render_widget(Clear, popup);
        let block = popup_block(&format!(" Groups of {} ", record.client));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [list_area, hints] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let items: Vec<ListItem> = options
            .iter()
            .map(|o| {
                let mark = if picker.is_selected(o.id) { "[x]" } else { "[ ]" };
                let style = if o.disabled {
                    theme::key_hint()
                } else {
                    theme::table_row()
                };
                ListItem::new(Line::styled(format!("{mark} {}", o.label), style))
            })
            .collect();
        let list = List::new(items).highlight_style(theme::table_selected());
        let mut state = ListState::default().with_selected(Some(cursor));
        frame.render_stateful_widget(list, list_area, &mut state);

        let apply_style = if picker.can_apply() {
            theme::key_hint_key()
        } else {
            theme::key_hint().add_modifier(Modifier::CROSSED_OUT)
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" ␣ ", theme::key_hint_key()),
                Span::styled("toggle", theme::key_hint()),
                Span::styled("  Enter ", apply_style),
                Span::styled("apply", theme::key_hint()),
                Span::styled("  Esc ", theme::key_hint_key()),
                Span::styled("discard", theme::key_hint()),
            ])),
            hints,
        );
    }
}

impl Default for ClientsScreen {
    fn default() -> Self {
        Self::new(GridPreferences::default())
    }
}

impl Component for ClientsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search(_) => self.handle_search_key(key),
            Mode::Add(_) => self.handle_add_key(key),
            Mode::Comment { .. } => self.handle_comment_key(key),
            Mode::Groups { .. } => self.handle_groups_key(key),
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SnapshotLoaded(snapshot) => {
                self.grid
                    .set_data(snapshot.groups.clone(), snapshot.clients.clone());
                self.loaded = true;
                self.clamp_cursor();
            }
            Action::SuggestionsLoaded(options) => {
                self.suggestions.clone_from(options);
                if let Mode::Add(ref mut form) = self.mode {
                    form.choice = 0;
                }
            }
            Action::Busy(busy) => self.busy = *busy,
            Action::AddSucceeded => {
                if matches!(self.mode, Mode::Add(_)) {
                    self.close_popup();
                }
                self.grid.deselect_all();
            }
            Action::ClientDeleted(key) => {
                self.grid.remove_row(key);
                self.clamp_cursor();
            }
            Action::DeleteFinished => self.grid.deselect_all(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, table, detail, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header);
        self.render_table(frame, table);
        self.render_detail(frame, detail);
        self.render_footer(frame, footer);

        match self.mode {
            Mode::Add(ref form) => self.render_add(frame, area, form),
            Mode::Comment {
                ref record,
                ref input,
            } => Self::render_comment(frame, area, record, input),
            Mode::Groups {
                ref record,
                ref picker,
                cursor,
            } => self.render_groups(frame, area, record, picker, cursor),
            Mode::Browse | Mode::Search(_) => {}
        }
    }

    fn captures_input(&self) -> bool {
        !matches!(self.mode, Mode::Browse)
    }

    fn id(&self) -> &str {
        "clients"
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Feed a key to a text field. Returns `false` for keys the field ignores.
fn edit_input(input: &mut Input, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let request = match key.code {
        KeyCode::Char('u') if ctrl => InputRequest::DeleteLine,
        KeyCode::Char('w') if ctrl => InputRequest::DeletePrevWord,
        KeyCode::Char(_) if ctrl => return false,
        KeyCode::Char(c) => InputRequest::InsertChar(c),
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return false,
    };
    input.handle(request);
    true
}

/// Replace the text of a field in place, leaving the cursor at the end.
fn overwrite_input(input: &mut Input, value: &str) {
    input.handle(InputRequest::DeleteLine);
    for c in value.chars() {
        input.handle(InputRequest::InsertChar(c));
    }
}

fn column_width(column: ColumnId) -> Constraint {
    match column {
        ColumnId::Id => Constraint::Length(6),
        ColumnId::Select => Constraint::Length(3),
        ColumnId::Client => Constraint::Percentage(30),
        ColumnId::Comment => Constraint::Fill(1),
        ColumnId::Groups => Constraint::Percentage(25),
        ColumnId::Actions => Constraint::Length(8),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

fn popup_block(title: &str) -> Block<'static> {
    Block::default()
        .title(title.to_owned())
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK))
}

fn field_block(title: &str, active: bool) -> Block<'static> {
    Block::default()
        .title(title.to_owned())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if active {
            theme::border_focused()
        } else {
            theme::border_default()
        })
}

fn render_input(frame: &mut Frame, area: Rect, label: &str, input: &Input, active: bool) {
    let block = field_block(&format!(" {label} "), active);
    let inner = block.inner(area);
    let width = usize::from(inner.width.max(1));
    let scroll = input.visual_scroll(width.saturating_sub(1));
    let paragraph = Paragraph::new(input.value())
        .style(theme::table_row())
        .scroll((0, u16::try_from(scroll).unwrap_or(0)))
        .block(block);
    frame.render_widget(paragraph, area);
    if active {
        let x = u16::try_from(input.visual_cursor().saturating_sub(scroll)).unwrap_or(0);
        frame.set_cursor_position((inner.x + x, inner.y));
    }
}
