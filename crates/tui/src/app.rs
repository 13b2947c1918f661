use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gamelist_core::{
    build_page, collection_stats, CatalogPage, CatalogState, FormSubmission, Game, GameDraft,
    GameService,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use tokio::{spawn, sync::mpsc};
use tracing::{error, info};

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Home,
    Form,
    Catalog,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Home, Tab::Form, Tab::Catalog];

    fn title(self) -> &'static str {
        match self {
            Tab::Home => "Home",
            Tab::Form => "Add Game",
            Tab::Catalog => "Catalog",
        }
    }

    fn index(self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Form => 1,
            Tab::Catalog => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Home => Tab::Form,
            Tab::Form => Tab::Catalog,
            Tab::Catalog => Tab::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogMode {
    Browse,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Name,
    Developer,
    Year,
    Rating,
    Finished,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Developer,
            FormField::Developer => FormField::Year,
            FormField::Year => FormField::Rating,
            FormField::Rating => FormField::Finished,
            FormField::Finished => FormField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Finished,
            FormField::Developer => FormField::Name,
            FormField::Year => FormField::Developer,
            FormField::Rating => FormField::Year,
            FormField::Finished => FormField::Rating,
        }
    }

    fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Developer => "Developer",
            FormField::Year => "Year",
            FormField::Rating => "Rating",
            FormField::Finished => "Finished",
        }
    }
}

#[derive(Debug, Clone)]
struct ConfirmDelete {
    id: u64,
    name: String,
}

enum AppEvent {
    Input(Event),
    Tick,
    GamesLoaded(Vec<Game>),
    GameCreated(Option<Game>),
    GameUpdated(Option<Game>),
    GameDeleted { id: u64, ok: bool },
}

/// Top-level application state: the authoritative record list, the transient
/// catalog/form state, and the channel plumbing for in-flight requests.
pub struct GameListApp {
    service: GameService,
    games: Vec<Game>,
    catalog: CatalogState,
    draft: GameDraft,
    tab: Tab,
    catalog_mode: CatalogMode,
    form_field: FormField,
    confirm: Option<ConfirmDelete>,
    banner: Option<String>,
    status: String,
    selected: usize,
    pending_request: bool,
    should_quit: bool,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    theme: Theme,
}

impl GameListApp {
    pub fn new(service: GameService) -> Self {
        Self {
            service,
            games: Vec::new(),
            catalog: CatalogState::default(),
            draft: GameDraft::new(),
            tab: Tab::Home,
            catalog_mode: CatalogMode::Browse,
            form_field: FormField::Name,
            confirm: None,
            banner: None,
            status: "Loading collection…".to_string(),
            selected: 0,
            pending_request: false,
            should_quit: false,
            event_tx: None,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);
        self.dispatch_load();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }

            let maybe_event = event_rx.recv().await;
            if !self.process_app_event(maybe_event) {
                break;
            }

            if self.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(event)) => {
                if let Err(err) = self.handle_input(event) {
                    self.status = format!("Error: {err}");
                }
                true
            }
            Some(AppEvent::Tick) => true,
            Some(AppEvent::GamesLoaded(games)) => {
                self.pending_request = false;
                // the banner is sticky until dismissed, so judge this fetch
                // by the adapter's freshly settled error instead
                let fetch_failed = self.service.last_error().is_some();
                self.sync_banner();
                info!(total = games.len(), "collection loaded");
                self.games = games;
                self.selected = 0;
                self.status = if fetch_failed {
                    "Failed to load collection".to_string()
                } else {
                    format!("Loaded {} games", self.games.len())
                };
                true
            }
            Some(AppEvent::GameCreated(result)) => {
                self.pending_request = false;
                self.sync_banner();
                match result {
                    Some(game) => {
                        info!(id = game.id, name = %game.name, "game created");
                        self.status = format!("Added {}", game.name);
                        self.games.insert(0, game);
                        self.tab = Tab::Catalog;
                    }
                    None => {
                        error!("create failed");
                        self.status = "Failed to add game".to_string();
                    }
                }
                true
            }
            Some(AppEvent::GameUpdated(result)) => {
                self.pending_request = false;
                self.sync_banner();
                match result {
                    Some(updated) => {
                        info!(id = updated.id, "game updated");
                        self.status = format!("Updated {}", updated.name);
                        if let Some(slot) =
                            self.games.iter_mut().find(|game| game.id == updated.id)
                        {
                            *slot = updated;
                        }
                        self.draft = GameDraft::new();
                        self.form_field = FormField::Name;
                        self.tab = Tab::Catalog;
                    }
                    None => {
                        error!("update failed");
                        self.status = "Failed to update game".to_string();
                    }
                }
                true
            }
            Some(AppEvent::GameDeleted { id, ok }) => {
                self.pending_request = false;
                self.sync_banner();
                if ok {
                    info!(id, "game deleted");
                    self.games.retain(|game| game.id != id);
                    self.status = "Game deleted".to_string();
                } else {
                    error!(id, "delete failed");
                    self.status = "Failed to delete game".to_string();
                }
                true
            }
            None => false,
        }
    }

    fn sync_banner(&mut self) {
        if let Some(message) = self.service.last_error() {
            self.banner = Some(message);
        }
    }

    fn dispatch_load(&mut self) {
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        let service = self.service.clone();
        self.pending_request = true;
        spawn(async move {
            let games = service.fetch_games().await;
            let _ = tx.send(AppEvent::GamesLoaded(games)).await;
        });
    }

    fn dispatch_submission(&mut self, submission: FormSubmission) {
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        let service = self.service.clone();
        self.pending_request = true;
        match submission {
            FormSubmission::Create(input) => {
                self.status = format!("Adding {}…", input.name);
                spawn(async move {
                    let created = service.create_game(&input).await;
                    let _ = tx.send(AppEvent::GameCreated(created)).await;
                });
            }
            FormSubmission::Update(game) => {
                self.status = format!("Updating {}…", game.name);
                spawn(async move {
                    let updated = service.update_game(&game).await;
                    let _ = tx.send(AppEvent::GameUpdated(updated)).await;
                });
            }
        }
    }

    fn dispatch_delete(&mut self, id: u64) {
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        let service = self.service.clone();
        self.pending_request = true;
        self.status = "Deleting…".to_string();
        spawn(async move {
            let ok = service.delete_game(id).await;
            let _ = tx.send(AppEvent::GameDeleted { id, ok }).await;
        });
    }

    fn current_page(&self) -> CatalogPage {
        build_page(&self.games, &self.catalog)
    }

    fn selected_game(&self) -> Option<Game> {
        let page = self.current_page();
        page.items.get(self.selected).cloned()
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.current_page().items.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let mut idx = self.selected as isize + delta;
        if idx < 0 {
            idx = 0;
        } else if idx >= len as isize {
            idx = len as isize - 1;
        }
        self.selected = idx as usize;
    }

    fn handle_input(&mut self, event: Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };

        if self.confirm.is_some() {
            self.handle_confirm_key(key);
            return Ok(());
        }

        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match self.tab {
            Tab::Home => self.handle_home_key(key),
            Tab::Catalog => self.handle_catalog_key(key),
            Tab::Form => self.handle_form_key(key),
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let Some(confirm) = self.confirm.clone() else {
            return;
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.confirm = None;
                self.dispatch_delete(confirm.id);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm = None;
                self.status = "Delete cancelled".to_string();
            }
            _ => {}
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Char('1') => self.tab = Tab::Home,
            KeyCode::Char('2') => self.open_create_form(),
            KeyCode::Char('3') => self.tab = Tab::Catalog,
            KeyCode::Char('a') => self.open_create_form(),
            KeyCode::Char('c') => self.tab = Tab::Catalog,
            KeyCode::Char('r') => self.dispatch_load(),
            KeyCode::Char('x') => self.dismiss_banner(),
            _ => {}
        }
    }

    fn handle_catalog_key(&mut self, key: KeyEvent) {
        if self.catalog_mode == CatalogMode::Search {
            self.handle_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Char('1') => self.tab = Tab::Home,
            KeyCode::Char('2') => self.open_create_form(),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Char('h') | KeyCode::Left => {
                self.catalog.prev_page();
                self.selected = 0;
            }
            KeyCode::Char('l') | KeyCode::Right => {
                let total = self.current_page().total_pages;
                if self.catalog.page() < total {
                    self.catalog.next_page();
                    self.selected = 0;
                }
            }
            KeyCode::Char('/') => {
                self.catalog_mode = CatalogMode::Search;
                self.status = "Type to search; Enter to apply, Esc to clear".to_string();
            }
            KeyCode::Char('f') => {
                self.catalog.cycle_filter();
                self.selected = 0;
                self.status = format!("Filter: {}", self.catalog.filter().label());
            }
            KeyCode::Char('s') => {
                self.catalog.cycle_sort();
                self.selected = 0;
                self.status = format!("Sort: {}", self.catalog.sort().label());
            }
            KeyCode::Char('a') => self.open_create_form(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_form(),
            KeyCode::Char('d') => self.prompt_delete(),
            KeyCode::Char('r') => {
                self.status = "Reloading…".to_string();
                self.dispatch_load();
            }
            KeyCode::Char('x') => self.dismiss_banner(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.catalog.set_search("");
                self.catalog_mode = CatalogMode::Browse;
                self.selected = 0;
                self.status = "Search cleared".to_string();
            }
            KeyCode::Enter => {
                self.catalog_mode = CatalogMode::Browse;
                self.status = format!("Search: {}", self.catalog.search());
            }
            KeyCode::Backspace => {
                self.catalog.pop_search_char();
                self.selected = 0;
            }
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.catalog.push_search_char(ch);
                    self.selected = 0;
                }
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.draft.is_editing() {
                    self.draft = GameDraft::new();
                    self.status = "Edit cancelled".to_string();
                }
                self.form_field = FormField::Name;
                self.tab = Tab::Catalog;
            }
            KeyCode::Tab | KeyCode::Down => self.form_field = self.form_field.next(),
            KeyCode::BackTab | KeyCode::Up => self.form_field = self.form_field.prev(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Backspace => match self.form_field {
                FormField::Name => {
                    self.draft.name.pop();
                }
                FormField::Developer => {
                    self.draft.developer.pop();
                }
                FormField::Year => {
                    self.draft.year /= 10;
                }
                _ => {}
            },
            KeyCode::Left => match self.form_field {
                FormField::Rating => self.draft.adjust_rating(-0.5),
                FormField::Year => self.draft.adjust_year(-1),
                _ => {}
            },
            KeyCode::Right => match self.form_field {
                FormField::Rating => self.draft.adjust_rating(0.5),
                FormField::Year => self.draft.adjust_year(1),
                _ => {}
            },
            KeyCode::Char(' ') if self.form_field == FormField::Finished => {
                self.draft.toggle_finished();
            }
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    match self.form_field {
                        FormField::Name => self.draft.name.push(ch),
                        FormField::Developer => self.draft.developer.push(ch),
                        FormField::Year => {
                            if let Some(digit) = ch.to_digit(10) {
                                self.draft.year = self
                                    .draft
                                    .year
                                    .saturating_mul(10)
                                    .saturating_add(digit as i32);
                            }
                        }
                        FormField::Rating => {
                            if let Some(digit) = ch.to_digit(10) {
                                self.draft.star_rating = (digit as f64).clamp(0.0, 5.0);
                            }
                        }
                        FormField::Finished => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        if self.pending_request {
            self.status = "A request is already in flight".to_string();
            return;
        }
        match self.draft.submit() {
            Some(submission) => self.dispatch_submission(submission),
            // invalid drafts are silently ignored, matching the form contract
            None => {
                self.status = "Name and developer are required".to_string();
            }
        }
    }

    fn open_create_form(&mut self) {
        self.draft = GameDraft::new();
        self.form_field = FormField::Name;
        self.tab = Tab::Form;
        self.status = "Fill in the new game".to_string();
    }

    fn open_edit_form(&mut self) {
        let Some(game) = self.selected_game() else {
            self.status = "No game selected".to_string();
            return;
        };
        self.status = format!("Editing {}", game.name);
        self.draft = GameDraft::edit(&game);
        self.form_field = FormField::Name;
        self.tab = Tab::Form;
    }

    fn prompt_delete(&mut self) {
        let Some(game) = self.selected_game() else {
            self.status = "No game selected".to_string();
            return;
        };
        self.confirm = Some(ConfirmDelete {
            id: game.id,
            name: game.name,
        });
    }

    fn dismiss_banner(&mut self) {
        self.banner = None;
        self.service.clear_error();
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let mut constraints = vec![Constraint::Length(3)];
        if self.banner.is_some() {
            constraints.push(Constraint::Length(4));
        }
        constraints.push(Constraint::Min(6));
        constraints.push(Constraint::Length(3));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let mut chunk_iter = chunks.iter().copied();
        let tabs_area = chunk_iter.next().unwrap_or(area);
        let banner_area = if self.banner.is_some() {
            chunk_iter.next()
        } else {
            None
        };
        let body_area = chunk_iter.next().unwrap_or(area);
        let status_area = chunk_iter.next().unwrap_or(area);

        self.render_tabs(frame, tabs_area);
        if let (Some(message), Some(banner_area)) = (self.banner.clone(), banner_area) {
            self.render_banner(frame, banner_area, &message);
        }
        match self.tab {
            Tab::Home => self.render_home(frame, body_area),
            Tab::Form => self.render_form(frame, body_area),
            Tab::Catalog => self.render_catalog(frame, body_area),
        }
        self.render_status(frame, status_area);

        if let Some(confirm) = self.confirm.clone() {
            self.render_confirm(frame, &confirm);
        }
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .map(|tab| Line::from(format!(" {} ", tab.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .block(Block::default().borders(Borders::ALL).title("MyGameList"))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect, message: &str) {
        let lines = vec![
            Line::from(Span::styled(
                format!("API error: {message}"),
                Style::default().fg(self.theme.danger),
            )),
            Line::from(Span::styled(
                "Press x to dismiss",
                Style::default().fg(self.theme.muted),
            )),
        ];
        let banner = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.danger)),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(banner, area);
    }

    fn render_home(&self, frame: &mut Frame, area: Rect) {
        let stats = collection_stats(&self.games);
        let lines = vec![
            Line::from(Span::styled(
                "MyGameList",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from("Your personal game collection manager"),
            Line::from(""),
            Line::from(format!("Total games      {}", stats.total)),
            Line::from(format!("Finished         {}", stats.finished)),
            Line::from(format!("Unfinished       {}", stats.unfinished)),
            Line::from(format!("Average rating   {:.1}", stats.average_rating)),
            Line::from(""),
            Line::from(Span::styled(
                "a add  c catalog  r reload  Tab switch  q quit",
                Style::default().fg(self.theme.muted),
            )),
        ];
        let home = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Home"))
            .alignment(Alignment::Center);
        frame.render_widget(home, area);
    }

    fn render_catalog(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let page = self.current_page();
        if self.selected >= page.items.len() {
            self.selected = page.items.len().saturating_sub(1);
        }

        let search_style = if self.catalog_mode == CatalogMode::Search {
            Style::default().fg(self.theme.accent)
        } else {
            Style::default().fg(self.theme.primary_fg)
        };
        let header = Paragraph::new(Line::from(vec![
            Span::styled(format!("/{}", self.catalog.search()), search_style),
            Span::raw("   "),
            Span::styled(
                format!("filter: {}", self.catalog.filter().label()),
                Style::default().fg(self.theme.muted),
            ),
            Span::raw("   "),
            Span::styled(
                format!("sort: {}", self.catalog.sort().label()),
                Style::default().fg(self.theme.muted),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Search"));
        frame.render_widget(header, chunks[0]);

        let title = format!(
            "Catalog — page {}/{} ({} matches)",
            page.page, page.total_pages, page.total_matches
        );
        let block = Block::default().borders(Borders::ALL).title(title);

        if page.items.is_empty() {
            let message = if self.games.is_empty() {
                "No games yet. Press a to add the first one!"
            } else {
                "No games match the current search."
            };
            let empty = Paragraph::new(Line::from(message))
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(empty, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = page
            .items
            .iter()
            .enumerate()
            .map(|(idx, game)| {
                let marker = if idx == self.selected {
                    Span::styled("▶ ", Style::default().fg(self.theme.accent))
                } else {
                    Span::raw("  ")
                };
                let finished = if game.finished {
                    Span::styled("✔ ", Style::default().fg(self.theme.success))
                } else {
                    Span::styled("· ", Style::default().fg(self.theme.muted))
                };
                let rating = match game.star_rating {
                    Some(value) => format!("{value:.1}★"),
                    None => "unrated".to_string(),
                };
                ListItem::new(Line::from(vec![
                    marker,
                    finished,
                    Span::raw(format!(
                        "{}  — {} ({})  {}",
                        game.name, game.developer, game.year, rating
                    )),
                ]))
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let title = if self.draft.is_editing() {
            "Edit Game"
        } else {
            "Add Game"
        };

        let field_line = |field: FormField, value: String| -> Line {
            let focused = self.form_field == field;
            let marker = if focused {
                Span::styled("▶ ", Style::default().fg(self.theme.accent))
            } else {
                Span::raw("  ")
            };
            let label_style = if focused {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.primary_fg)
            };
            Line::from(vec![
                marker,
                Span::styled(format!("{:<10} ", field.label()), label_style),
                Span::raw(value),
            ])
        };

        let stars = "★".repeat(self.draft.star_rating.round() as usize);
        let mut lines = vec![
            field_line(FormField::Name, self.draft.name.clone()),
            field_line(FormField::Developer, self.draft.developer.clone()),
            field_line(FormField::Year, self.draft.year.to_string()),
            field_line(
                FormField::Rating,
                format!("{:.1}/5 {}", self.draft.star_rating, stars),
            ),
            field_line(
                FormField::Finished,
                if self.draft.finished { "yes" } else { "no" }.to_string(),
            ),
            Line::from(""),
        ];
        if !self.draft.is_valid() {
            lines.push(Line::from(Span::styled(
                "Name and developer are required",
                Style::default().fg(self.theme.warning),
            )));
        }
        lines.push(Line::from(Span::styled(
            "Tab/↓ next field  ←/→ adjust  Space toggle  Enter save  Esc back",
            Style::default().fg(self.theme.muted),
        )));

        let form = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false });
        frame.render_widget(form, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let spinner = if self.pending_request || self.service.is_loading() {
            "⏳ "
        } else {
            ""
        };
        let status = Paragraph::new(Line::from(format!("{spinner}{}", self.status)))
            .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(status, area);
    }

    fn render_confirm(&self, frame: &mut Frame, confirm: &ConfirmDelete) {
        let frame_area = frame.size();
        let width = 46u16.min(frame_area.width.saturating_sub(4)).max(24);
        let height = 6u16.min(frame_area.height.saturating_sub(2)).max(5);
        let area = centered_rect(width, height, frame_area);

        frame.render_widget(Clear, area);
        let lines = vec![
            Line::from(format!("Delete \"{}\"?", confirm.name)),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" delete  "),
                Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" cancel"),
            ]),
        ];
        let dialog = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Confirm")
                    .border_style(Style::default().fg(self.theme.danger)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(dialog, area);
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamelist_core::GameApi;

    fn test_app() -> GameListApp {
        // nothing listens on this port; no request is actually dispatched in
        // these tests, the handlers are fed completion events directly
        GameListApp::new(GameService::new(GameApi::new("http://127.0.0.1:9")))
    }

    fn game(id: u64, name: &str) -> Game {
        Game {
            id,
            name: name.to_string(),
            developer: "Studio".to_string(),
            year: 2020,
            star_rating: Some(4.0),
            finished: false,
        }
    }

    fn loaded_app() -> GameListApp {
        let mut app = test_app();
        app.process_app_event(Some(AppEvent::GamesLoaded(vec![
            game(1, "Celeste"),
            game(2, "Hades"),
            game(3, "Tunic"),
        ])));
        app
    }

    #[test]
    fn created_games_are_prepended() {
        let mut app = loaded_app();
        app.process_app_event(Some(AppEvent::GameCreated(Some(game(4, "Outer Wilds")))));

        assert_eq!(app.games.len(), 4);
        assert_eq!(app.games[0].id, 4);
        assert_eq!(app.games[0].name, "Outer Wilds");
        assert_eq!(app.tab, Tab::Catalog);
    }

    #[test]
    fn failed_create_leaves_the_list_unchanged() {
        let mut app = loaded_app();
        app.process_app_event(Some(AppEvent::GameCreated(None)));

        assert_eq!(app.games.len(), 3);
        assert_eq!(app.status, "Failed to add game");
    }

    #[test]
    fn updates_replace_in_place_preserving_position() {
        let mut app = loaded_app();
        let mut updated = game(2, "Hades");
        updated.finished = true;
        app.process_app_event(Some(AppEvent::GameUpdated(Some(updated))));

        assert_eq!(app.games.len(), 3);
        assert_eq!(app.games[1].id, 2);
        assert!(app.games[1].finished);
        assert_eq!(app.games[0].id, 1);
        assert_eq!(app.games[2].id, 3);
    }

    #[test]
    fn deletes_remove_by_id() {
        let mut app = loaded_app();
        app.process_app_event(Some(AppEvent::GameDeleted { id: 2, ok: true }));

        assert_eq!(app.games.len(), 2);
        assert!(app.games.iter().all(|entry| entry.id != 2));
    }

    #[test]
    fn failed_delete_keeps_the_record() {
        let mut app = loaded_app();
        app.process_app_event(Some(AppEvent::GameDeleted { id: 2, ok: false }));

        assert_eq!(app.games.len(), 3);
        assert_eq!(app.status, "Failed to delete game");
    }

    #[test]
    fn successful_reload_reports_success_despite_stale_banner() {
        let mut app = test_app();
        app.banner = Some("API error from earlier".to_string());

        app.process_app_event(Some(AppEvent::GamesLoaded(vec![game(1, "Celeste")])));

        // banner stays until dismissed, but the status reflects this fetch
        assert!(app.banner.is_some());
        assert_eq!(app.status, "Loaded 1 games");
    }
}
