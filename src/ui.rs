use crate::detail::DetailState;
use crate::fetch::PokeApi;
use crate::list::ListState;
use crate::models::Pokemon;
use crate::pages::{DetailPage, ListPage};
use crate::router::{History, Location, Route};
use crate::sprite::{SpriteCache, SpriteEntry};
use crate::utils::{
    format_measure, format_name, pokemon_id_from_url, range_label, visible_pages, PageSlot,
};
use crossterm::event::KeyCode;
use futures::future::BoxFuture;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans};
use ratatui::widgets::{Block, Borders, List, ListItem as ListEntry, ListState as Selection, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::io;
use std::io::Stdout;

/// Highest possible base stat; bars are drawn relative to it.
const MAX_BASE_STAT: u32 = 255;

pub enum Screen {
    List(ListPage),
    Detail(DetailPage),
    Missing(Location),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    GotoPage,
}

pub struct App {
    api: PokeApi,
    pub history: History,
    pub screen: Screen,
    mounted: Option<Route>,
    pub input_mode: InputMode,
    pub input: String,
    pub selected: usize,
    pub show_help: bool,
    pub should_quit: bool,
    sprites: SpriteCache,
}

fn spawn(pending: BoxFuture<'static, ()>) {
    tokio::spawn(pending);
}

impl App {
    /// Build the app at `location` and mount its screen. Must run inside a tokio runtime.
    pub fn new(api: PokeApi, location: Location) -> Self {
        let mut app = Self {
            sprites: SpriteCache::new(api.clone()),
            api,
            history: History::new(location.clone()),
            screen: Screen::Missing(location),
            mounted: None,
            input_mode: InputMode::Normal,
            input: String::new(),
            selected: 0,
            show_help: false,
            should_quit: false,
        };
        app.mount_current();
        app
    }

    fn mount_current(&mut self) {
        let location = self.history.current().clone();
        let route = location.route();
        self.selected = 0;
        self.input_mode = InputMode::Normal;
        self.input.clear();
        self.screen = match &route {
            Some(Route::List) => {
                let (page, pending) = ListPage::mount(self.api.clone(), &location);
                spawn(pending);
                Screen::List(page)
            }
            Some(Route::Detail { name }) => {
                let (page, pending) = DetailPage::mount(self.api.clone(), name);
                spawn(pending);
                Screen::Detail(page)
            }
            None => {
                log::warn!("no route for {}", location);
                Screen::Missing(location)
            }
        };
        self.mounted = route;
    }

    /// Remount when the history moved to a different route.
    fn sync_route(&mut self) {
        if self.history.current().route() != self.mounted {
            self.mount_current();
        }
    }

    /// Per-frame housekeeping: keep the selection in range and queue sprite downloads.
    pub fn tick(&mut self) {
        if let Some(pending) = self.sprite_url().and_then(|u| self.sprites.request(&u)) {
            spawn(pending);
        }
    }

    /// Image shown for the selected entry or the loaded Pokémon.
    fn sprite_url(&mut self) -> Option<String> {
        match &self.screen {
            Screen::List(page) => {
                let state = page.state();
                if self.selected >= state.items.len() {
                    self.selected = state.items.len().saturating_sub(1);
                }
                state
                    .items
                    .get(self.selected)
                    .map(|item| self.api.config().sprite_url(pokemon_id_from_url(&item.url)))
            }
            Screen::Detail(page) => page.state().pokemon().map(|p| p.image_url.clone()),
            Screen::Missing(_) => None,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(code),
            InputMode::Search | InputMode::GotoPage => self.handle_input_key(code),
        }
        self.sync_route();
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        if matches!(code, KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }
        if matches!(code, KeyCode::F(1) | KeyCode::Char('h')) {
            self.show_help = !self.show_help;
            return;
        }
        if code == KeyCode::Char('r') {
            if let Some(pending) = self.sprite_url().and_then(|u| self.sprites.retry(&u)) {
                spawn(pending);
            }
        }

        match &mut self.screen {
            Screen::List(page) => {
                let state = page.state();
                let pending = match code {
                    KeyCode::Down => {
                        if !state.items.is_empty() {
                            self.selected = (self.selected + 1) % state.items.len();
                        }
                        None
                    }
                    KeyCode::Up => {
                        if !state.items.is_empty() {
                            self.selected = if self.selected == 0 {
                                state.items.len() - 1
                            } else {
                                self.selected - 1
                            };
                        }
                        None
                    }
                    KeyCode::Enter => {
                        if let Some(item) = state.items.get(self.selected) {
                            page.select(&item.name, &mut self.history);
                        }
                        None
                    }
                    KeyCode::Right | KeyCode::Char('n') => page.next_page(&mut self.history),
                    KeyCode::Left | KeyCode::Char('p') => page.previous_page(&mut self.history),
                    KeyCode::Home => page.change_page(1, &mut self.history),
                    KeyCode::End if state.total_pages > 0 => {
                        page.change_page(state.total_pages, &mut self.history)
                    }
                    KeyCode::Char('/') => {
                        self.input_mode = InputMode::Search;
                        self.input = page.search_term.clone();
                        None
                    }
                    KeyCode::Char('g') if !state.is_searching() => {
                        self.input_mode = InputMode::GotoPage;
                        self.input.clear();
                        None
                    }
                    KeyCode::Char('c') | KeyCode::Esc
                        if state.is_searching() || !page.search_term.is_empty() =>
                    {
                        Some(page.clear_search())
                    }
                    KeyCode::Char('r') => {
                        if state.is_searching() {
                            let term = page.search_term.clone();
                            Some(page.search(&term))
                        } else {
                            page.change_page(state.current_page, &mut self.history)
                        }
                    }
                    _ => None,
                };
                if let Some(pending) = pending {
                    self.selected = 0;
                    spawn(pending);
                }
            }
            Screen::Detail(page) => match code {
                KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                    page.back(&mut self.history)
                }
                KeyCode::Char('r') if !page.state().loading() => spawn(page.refetch()),
                _ => {}
            },
            Screen::Missing(_) => {
                if matches!(code, KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace) {
                    self.history.replace(Location::list());
                }
            }
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.input.clear();
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                if self.input_mode == InputMode::Search || c.is_ascii_digit() {
                    self.input.push(c);
                }
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.input);
                let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);
                if let Screen::List(page) = &mut self.screen {
                    let pending = match mode {
                        InputMode::Search => Some(page.search(&input)),
                        InputMode::GotoPage => input
                            .parse::<u32>()
                            .ok()
                            .and_then(|n| page.change_page(n, &mut self.history)),
                        InputMode::Normal => None,
                    };
                    if let Some(pending) = pending {
                        self.selected = 0;
                        spawn(pending);
                    }
                }
            }
            _ => {}
        }
    }
}

pub fn draw_ui(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &App) -> io::Result<()> {
    terminal
        .draw(|f| {
            match &app.screen {
                Screen::List(page) => draw_list(f, app, page),
                Screen::Detail(page) => draw_detail(f, app, page),
                Screen::Missing(location) => {
                    let para = Paragraph::new(vec![
                        Spans::from(Span::styled(
                            "Page not found",
                            Style::default().add_modifier(Modifier::BOLD),
                        )),
                        Spans::from(Span::raw(format!("Nothing lives at {}", location))),
                        Spans::from(Span::raw("")),
                        Spans::from(Span::raw("Press b to go to the list.")),
                    ])
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL).title("Pokédex"));
                    f.render_widget(para, f.size());
                }
            }
            if app.show_help {
                draw_help(f);
            }
        })
        .map(|_| ())
}

fn draw_list<B: Backend>(f: &mut Frame<B>, app: &App, page: &ListPage) {
    let state = page.state();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(4)])
        .split(f.size());

    f.render_widget(search_box(app, page), chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    if state.loading {
        let para = Paragraph::new("Loading Pokémon list...")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Pokémon"));
        f.render_widget(para, chunks[1]);
    } else if let Some(error) = &state.error {
        let para = Paragraph::new(vec![
            Spans::from(Span::styled(
                "Error Loading Pokémon",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Spans::from(Span::raw(error.clone())),
            Spans::from(Span::raw("")),
            Spans::from(Span::raw("Press r to retry.")),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Pokémon"));
        f.render_widget(para, chunks[1]);
    } else if state.items.is_empty() {
        let (title, hint) = if state.is_searching() {
            ("No Pokémon Found", "Try adjusting your search criteria.")
        } else {
            ("No Pokémon Available", "Please try again later.")
        };
        let para = Paragraph::new(vec![
            Spans::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
            Spans::from(Span::raw(hint)),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Pokémon"));
        f.render_widget(para, chunks[1]);
    } else {
        let rows: Vec<ListEntry> = state
            .items
            .iter()
            .map(|item| {
                ListEntry::new(Spans::from(vec![Span::raw(format!(
                    "#{:<5} {}",
                    pokemon_id_from_url(&item.url),
                    format_name(&item.name)
                ))]))
            })
            .collect();
        let list = List::new(rows)
            .block(Block::default().borders(Borders::ALL).title("Pokémon"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        let mut selection = Selection::default();
        selection.select(Some(app.selected));
        f.render_stateful_widget(list, body[0], &mut selection);

        if let Some(item) = state.items.get(app.selected) {
            let url = app
                .api
                .config()
                .sprite_url(pokemon_id_from_url(&item.url));
            let title = format_name(&item.name);
            f.render_widget(sprite_widget(app.sprites.get(&url), body[1], &title), body[1]);
        }
    }

    f.render_widget(pagination_bar(&state, app.api.config().page_size), chunks[2]);
}

fn search_box<'a>(app: &App, page: &ListPage) -> Paragraph<'a> {
    let line = match app.input_mode {
        InputMode::Search => Spans::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(app.input.clone()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ]),
        InputMode::GotoPage => Spans::from(vec![
            Span::styled("Go to page: ", Style::default().fg(Color::Yellow)),
            Span::raw(app.input.clone()),
        ]),
        InputMode::Normal if !page.search_term.is_empty() => Spans::from(vec![
            Span::raw("Search: "),
            Span::styled(
                page.search_term.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  (c to clear)"),
        ]),
        InputMode::Normal => Spans::from(Span::raw(
            "Press '/' to search Pokémon by full name.",
        )),
    };
    Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Pokédex"))
}

fn pagination_bar<'a>(state: &ListState, page_size: u32) -> Paragraph<'a> {
    let block = Block::default().borders(Borders::ALL);
    if state.is_searching() {
        return Paragraph::new("Showing search result. Press c to return to the list.").block(block);
    }
    if state.loading || state.total_count == 0 {
        return Paragraph::new("").block(block);
    }

    let mut spans = Vec::new();
    if state.total_pages > 1 {
        let arrow = |enabled: bool, s: &'static str| {
            if enabled {
                Span::raw(s)
            } else {
                Span::styled(s, Style::default().fg(Color::DarkGray))
            }
        };
        spans.push(arrow(state.current_page > 1, "← "));
        for slot in visible_pages(state.current_page, state.total_pages) {
            match slot {
                PageSlot::Gap => spans.push(Span::raw("… ")),
                PageSlot::Page(n) if n == state.current_page => spans.push(Span::styled(
                    format!("[{}] ", n),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
                PageSlot::Page(n) => spans.push(Span::raw(format!("{} ", n))),
            }
        }
        spans.push(arrow(state.current_page < state.total_pages, "→"));
    }

    Paragraph::new(vec![
        Spans::from(Span::raw(range_label(
            state.current_page,
            page_size,
            state.total_count,
        ))),
        Spans::from(spans),
    ])
    .alignment(Alignment::Center)
    .block(block)
}

fn draw_detail<B: Backend>(f: &mut Frame<B>, app: &App, page: &DetailPage) {
    let area = f.size();
    let state = page.state();
    let pokemon = match &state {
        DetailState::Ready(p) => p,
        DetailState::Loading | DetailState::Idle => {
            let para = Paragraph::new("Loading Pokémon details...")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Pokémon"));
            f.render_widget(para, area);
            return;
        }
        DetailState::NotFound | DetailState::Failed(_) => {
            let para = Paragraph::new(vec![
                Spans::from(Span::styled(
                    "Error",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Spans::from(Span::raw(state.error().unwrap_or_default().to_string())),
                Spans::from(Span::raw("")),
                Spans::from(Span::raw("b  Back to List    r  Retry")),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Pokémon"));
            f.render_widget(para, area);
            return;
        }
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(16), Constraint::Min(8), Constraint::Length(1)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(20)])
        .split(rows[0]);

    let title = format!("{} (#{})", format_name(&pokemon.name), pokemon.id);
    let artwork = if pokemon.image_url.is_empty() {
        Some(SpriteEntry::Failed)
    } else {
        app.sprites.get(&pokemon.image_url)
    };
    f.render_widget(sprite_widget(artwork, top[0], &title), top[0]);
    f.render_widget(info_widget(pokemon), top[1]);
    f.render_widget(stats_widget(pokemon, rows[1]), rows[1]);
    f.render_widget(
        Paragraph::new("← b Back to List   r Refresh   h Help   q Quit")
            .style(Style::default().fg(Color::DarkGray)),
        rows[2],
    );
}

fn info_widget<'a>(p: &Pokemon) -> Paragraph<'a> {
    let mut lines: Vec<Spans> = Vec::new();
    lines.push(Spans::from(Span::styled(
        format!("{} (#{})", format_name(&p.name), p.id),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Spans::from(Span::raw("")));

    let mut type_spans: Vec<Span> = vec![Span::raw("Types: ")];
    for (i, t) in p.types.iter().enumerate() {
        let (r, g, b) = type_color(t);
        let lum = 0.2126 * (r as f32) + 0.7152 * (g as f32) + 0.0722 * (b as f32);
        let fg = if lum > 160.0 { Color::Black } else { Color::White };
        type_spans.push(Span::styled(
            format!(" {} ", format_name(t)),
            Style::default().fg(fg).bg(Color::Rgb(r, g, b)),
        ));
        if i + 1 < p.types.len() {
            type_spans.push(Span::raw(" "));
        }
    }
    lines.push(Spans::from(type_spans));
    lines.push(Spans::from(Span::raw(format!(
        "Height: {} m   Weight: {} kg",
        format_measure(p.height),
        format_measure(p.weight)
    ))));
    if !p.abilities.is_empty() {
        let abilities: Vec<String> = p.abilities.iter().map(|a| format_name(a)).collect();
        lines.push(Spans::from(Span::raw(format!(
            "Abilities: {}",
            abilities.join(", ")
        ))));
    }

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Basic Information"))
        .wrap(Wrap { trim: true })
}

fn stats_widget<'a>(p: &Pokemon, area: Rect) -> Paragraph<'a> {
    // NAME (12) VALUE (4) then the bar
    let inner_w = area.width.saturating_sub(2) as usize;
    let bar_max_w = inner_w.saturating_sub(12 + 4 + 2);

    let lines: Vec<Spans> = p
        .stats
        .entries()
        .iter()
        .map(|(label, value)| {
            let bar_len = stat_bar_len(*value, bar_max_w);
            Spans::from(vec![
                Span::raw(format!("{:<12} {:>4} ", label, value)),
                Span::styled("█".repeat(bar_len), Style::default().fg(Color::Blue)),
            ])
        })
        .collect();

    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Base Stats"))
}

fn stat_bar_len(value: u32, bar_max_w: usize) -> usize {
    (value.min(MAX_BASE_STAT) as usize * bar_max_w) / MAX_BASE_STAT as usize
}

/// Artwork drawn with half-block cells: each cell shows two stacked pixels.
fn sprite_widget<'a>(entry: Option<SpriteEntry>, area: Rect, title: &str) -> Paragraph<'a> {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string());
    let sprite = match entry {
        Some(SpriteEntry::Ready(sprite)) => sprite,
        Some(SpriteEntry::Failed) => return Paragraph::new("(no sprite)").block(block),
        _ => return Paragraph::new("(loading sprite)").block(block),
    };

    let inner_w = area.width.saturating_sub(2) as u32;
    let inner_h = area.height.saturating_sub(2) as u32;
    let side = inner_w.min(inner_h * 2).min(64);
    if side == 0 {
        return Paragraph::new("").block(block);
    }
    let pixels = sprite.pixel_rows(side, side);
    let mut lines: Vec<Spans> = Vec::new();
    for pair in pixels.chunks(2) {
        let upper = &pair[0];
        let lower = pair.get(1);
        let spans: Vec<Span> = upper
            .iter()
            .enumerate()
            .map(|(x, top)| {
                let bottom = lower.and_then(|row| row[x]);
                let mut style = Style::default();
                if let Some((r, g, b)) = top {
                    style = style.fg(Color::Rgb(*r, *g, *b));
                }
                if let Some((r, g, b)) = bottom {
                    style = style.bg(Color::Rgb(r, g, b));
                }
                if top.is_some() {
                    Span::styled("▀", style)
                } else if bottom.is_some() {
                    Span::styled(" ", style)
                } else {
                    Span::raw(" ")
                }
            })
            .collect();
        lines.push(Spans::from(spans));
    }
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block)
}

fn type_color(kind: &str) -> (u8, u8, u8) {
    match kind.to_lowercase().as_str() {
        "normal" => (168, 168, 120),
        "fire" => (240, 128, 48),
        "water" => (104, 144, 240),
        "grass" => (120, 200, 80),
        "electric" => (248, 208, 48),
        "ice" => (152, 216, 216),
        "fighting" => (192, 48, 40),
        "poison" => (160, 64, 160),
        "ground" => (224, 192, 104),
        "flying" => (168, 144, 240),
        "psychic" => (248, 88, 136),
        "bug" => (168, 184, 32),
        "rock" => (184, 160, 56),
        "ghost" => (112, 88, 152),
        "dragon" => (112, 56, 248),
        "dark" => (112, 88, 72),
        "steel" => (184, 184, 208),
        "fairy" => (238, 153, 172),
        _ => (200, 200, 200),
    }
}

fn draw_help<B: Backend>(f: &mut Frame<B>) {
    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_w = r.width.saturating_mul(percent_x) / 100;
        let popup_h = r.height.saturating_mul(percent_y) / 100;
        let popup_x = r.x + (r.width.saturating_sub(popup_w) / 2);
        let popup_y = r.y + (r.height.saturating_sub(popup_h) / 2);
        Rect::new(popup_x, popup_y, popup_w, popup_h)
    }

    let popup = centered_rect(60, 60, f.size());
    let help_lines = vec![
        Spans::from(Span::styled(
            "Keybindings",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::raw("")),
        Spans::from(Span::raw("Up/Down     Move selection")),
        Spans::from(Span::raw("Enter       Open details")),
        Spans::from(Span::raw("Left/Right  Previous / next page")),
        Spans::from(Span::raw("Home/End    First / last page")),
        Spans::from(Span::raw("g           Go to page number")),
        Spans::from(Span::raw("/           Search by full name")),
        Spans::from(Span::raw("c           Clear search")),
        Spans::from(Span::raw("r           Reload")),
        Spans::from(Span::raw("b/Esc       Back to list (details)")),
        Spans::from(Span::raw("h/F1        Toggle this help")),
        Spans::from(Span::raw("q           Quit")),
    ];
    let help_para = Paragraph::new(help_lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    f.render_widget(ratatui::widgets::Clear, popup);
    f.render_widget(help_para, popup);
}
