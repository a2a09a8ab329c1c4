use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Local;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, List, ListItem, Paragraph, Row, Table},
    Frame, Terminal,
};
use tracing::debug;

use crate::dashboard::{Dashboard, FetchRequest};
use crate::owm::{WeatherApi, WeatherError};
use crate::suggest;
use crate::theme::GradientId;
use crate::weather::{ForecastEntry, Report, WeatherSnapshot};

const MISSING: &str = "--";
const TICK: Duration = Duration::from_millis(100);
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

type Outcome = (u64, Result<Report, WeatherError>);

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Fetch(FetchRequest),
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub dashboard: Dashboard,
    input: String,
    /// Query the Tab completion cycles over, and the position reached.
    completion: Option<(String, usize)>,
    history_cursor: Option<usize>,
    ticks: usize,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            input: String::new(),
            completion: None,
            history_cursor: None,
            ticks: 0,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => Action::Quit,
            KeyCode::Char('c') if ctrl => Action::Quit,
            KeyCode::Char('r') if ctrl => self.fetch(|d| d.refresh()),
            KeyCode::Char('t') if ctrl => {
                let dark = self.dashboard.toggle_dark_mode();
                debug!(dark, "theme toggled");
                Action::None
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                self.reset_selection();
                Action::None
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.reset_selection();
                Action::None
            }
            KeyCode::Tab => {
                self.complete();
                Action::None
            }
            KeyCode::Up => {
                self.move_history_cursor(-1);
                Action::None
            }
            KeyCode::Down => {
                self.move_history_cursor(1);
                Action::None
            }
            KeyCode::Enter => self.submit(),
            _ => Action::None,
        }
    }

    fn fetch(&mut self, issue: impl FnOnce(&mut Dashboard) -> Option<FetchRequest>) -> Action {
        match issue(&mut self.dashboard) {
            Some(request) => Action::Fetch(request),
            None => Action::None,
        }
    }

    fn submit(&mut self) -> Action {
        let city = match self.history_cursor.take() {
            Some(i) => match self.dashboard.history().get(i) {
                Some(entry) => entry.city.clone(),
                None => return Action::None,
            },
            None => self.input.trim().to_string(),
        };
        if city.is_empty() {
            return Action::None;
        }
        self.input.clear();
        self.completion = None;
        self.fetch(|d| d.search(&city))
    }

    fn complete(&mut self) {
        let (base, next) = match self.completion.take() {
            Some((base, pos)) => (base, pos + 1),
            None => (self.input.clone(), 0),
        };
        let options = suggest::suggestions(&base);
        if options.is_empty() {
            return;
        }
        let pos = next % options.len();
        self.input = options[pos].to_string();
        self.completion = Some((base, pos));
        self.history_cursor = None;
    }

    fn move_history_cursor(&mut self, step: isize) {
        let len = self.dashboard.history().len();
        if len == 0 {
            self.history_cursor = None;
            return;
        }
        self.history_cursor = match (self.history_cursor, step) {
            (None, s) if s < 0 => Some(len - 1),
            (None, _) => Some(0),
            (Some(i), s) => Some((i as isize + s).rem_euclid(len as isize) as usize),
        };
    }

    fn reset_selection(&mut self) {
        self.completion = None;
        self.history_cursor = None;
    }
}

fn spawn_fetch(api: &Arc<dyn WeatherApi>, request: FetchRequest, tx: &Sender<Outcome>) {
    let api = Arc::clone(api);
    let tx = tx.clone();
    thread::spawn(move || {
        let result = api.fetch_weather(&request.city);
        // receiver is gone once the app has quit
        let _ = tx.send((request.id, result));
    });
}

fn drain(app: &mut App, rx: &Receiver<Outcome>) {
    while let Ok((id, result)) = rx.try_recv() {
        app.dashboard.resolve(id, result);
    }
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    api: Arc<dyn WeatherApi>,
    initial_city: Option<String>,
) -> io::Result<()> {
    let (tx, rx) = mpsc::channel();
    if let Some(request) = initial_city.and_then(|city| app.dashboard.search(&city)) {
        spawn_fetch(&api, request, &tx);
    }

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.on_key(key) {
                        Action::Quit => return Ok(()),
                        Action::Fetch(request) => spawn_fetch(&api, request, &tx),
                        Action::None => {}
                    }
                }
            }
        }

        drain(&mut app, &rx);
        app.ticks = app.ticks.wrapping_add(1);
    }
}

fn panel(title: &str, gradient: &GradientId) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(gradient.foreground())
                .add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(gradient.accent()))
        .border_type(BorderType::Rounded)
}

fn display_headline(gradient: &GradientId) -> Paragraph<'static> {
    let toggle = if gradient.dark { "☀ light" } else { "☾ dark" };
    Paragraph::new(vec![
        Line::from(Span::styled(
            "Weather",
            Style::default()
                .fg(gradient.foreground())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Check weather worldwide  ·  Ctrl-T {toggle}"),
            Style::default().fg(gradient.muted()),
        )),
    ])
    .alignment(Alignment::Center)
}

fn display_gradient(f: &mut Frame, area: Rect, gradient: &GradientId) {
    let bands = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);
    for (band, color) in bands.iter().zip(gradient.stops()) {
        f.render_widget(Block::default().style(Style::default().bg(color)), *band);
    }
}

fn display_search<'a>(app: &'a App, gradient: &GradientId) -> Paragraph<'a> {
    let text = if app.input.is_empty() {
        Span::styled("Search city...", Style::default().fg(gradient.muted()))
    } else {
        Span::styled(app.input.as_str(), Style::default().fg(gradient.foreground()))
    };
    Paragraph::new(Line::from(vec![Span::raw(" 🔍 "), text])).block(panel("Search", gradient))
}

fn display_suggestions(app: &App, gradient: &GradientId) -> Paragraph<'static> {
    let base = match &app.completion {
        Some((base, _)) => base.as_str(),
        None => app.input.as_str(),
    };
    let mut spans = vec![Span::styled(" Tab ", Style::default().fg(gradient.muted()))];
    for city in suggest::suggestions(base) {
        let style = if city == app.input {
            Style::default()
                .fg(gradient.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(gradient.foreground())
        };
        spans.push(Span::styled(format!(" {city} "), style));
    }
    Paragraph::new(Line::from(spans))
}

fn display_current_conditions<'a>(
    current: &'a WeatherSnapshot,
    gradient: &GradientId,
) -> Table<'a> {
    let value = Style::default().fg(gradient.foreground());
    let label = Style::default().fg(gradient.muted());

    let condition = current.condition();
    let mut rows = vec![
        Row::new(vec![Cell::from("")]),
        Row::new(vec![
            Cell::from(" Temperature").style(label),
            Cell::from(format!("{}° {}", current.rounded_temperature(), condition.glyph()))
                .style(value.add_modifier(Modifier::BOLD)),
        ]),
    ];

    let text = if current.description.is_empty() {
        MISSING.to_string()
    } else {
        current.description.clone()
    };
    rows.push(Row::new(vec![
        Cell::from(" Conditions").style(label),
        Cell::from(text).style(value),
    ]));
    rows.push(Row::new(vec![
        Cell::from(" Humidity").style(label),
        Cell::from(format!("{}%", current.humidity)).style(value),
    ]));
    rows.push(Row::new(vec![
        Cell::from(" Wind").style(label),
        Cell::from(format!("{} km/h", current.wind_kph())).style(value),
    ]));
    rows.push(Row::new(vec![
        Cell::from(" Updated").style(label),
        Cell::from(Local::now().format("%A, %B %-d · %H:%M").to_string()).style(value),
    ]));
    if let Some(overlay) = condition.overlay() {
        rows.push(Row::new(vec![
            Cell::from(""),
            Cell::from(format!("~ {overlay} ~")).style(label.add_modifier(Modifier::ITALIC)),
        ]));
    }

    Table::new(rows, [Constraint::Length(13), Constraint::Min(20)])
}

fn display_forecast_day(day: &ForecastEntry, gradient: &GradientId) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            day.weekday(),
            Style::default().fg(gradient.muted()),
        )),
        Line::from(day.condition().glyph()),
        Line::from(Span::styled(
            format!("{}°", day.rounded_temperature()),
            Style::default()
                .fg(gradient.foreground())
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(gradient.muted())),
    )
}

fn display_card(
    f: &mut Frame,
    area: Rect,
    app: &App,
    current: &WeatherSnapshot,
    gradient: &GradientId,
) {
    let refresh = if app.dashboard.is_loading() {
        SPINNER[app.ticks % SPINNER.len()]
    } else {
        "Ctrl-R ⟳"
    };
    let block = panel(&current.city, gradient).title(
        Line::from(Span::styled(
            format!(" {refresh} "),
            Style::default().fg(gradient.muted()),
        ))
        .alignment(Alignment::Right),
    );
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(6)])
        .split(inner);

    f.render_widget(display_current_conditions(current, gradient), chunks[0]);

    let forecast = app.dashboard.forecast();
    let forecast_block = panel("5-Day Forecast", gradient);
    let days_area = forecast_block.inner(chunks[1]);
    f.render_widget(forecast_block, chunks[1]);
    if forecast.is_empty() {
        f.render_widget(Paragraph::new(format!(" {MISSING}")), days_area);
        return;
    }
    let n = forecast.len() as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(forecast.iter().map(|_| Constraint::Ratio(1, n)))
        .split(days_area);
    for (day, column) in forecast.iter().zip(columns.iter()) {
        f.render_widget(display_forecast_day(day, gradient), *column);
    }
}

fn display_main(f: &mut Frame, area: Rect, app: &App, gradient: &GradientId) {
    if let Some(message) = app.dashboard.error() {
        let error = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::Red)),
        );
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        f.render_widget(error, rows[0]);
    } else if let Some(current) = app.dashboard.snapshot() {
        display_card(f, area, app, current, gradient);
    } else if app.dashboard.is_loading() {
        let loading = Paragraph::new(format!("{} Loading...", SPINNER[app.ticks % SPINNER.len()]))
            .style(Style::default().fg(gradient.muted()))
            .alignment(Alignment::Center);
        f.render_widget(loading, area);
    }
}

fn display_history<'a>(app: &'a App, gradient: &GradientId) -> List<'a> {
    let items: Vec<ListItem> = app
        .dashboard
        .history()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if app.history_cursor == Some(i) {
                Style::default()
                    .fg(gradient.background())
                    .bg(gradient.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(gradient.foreground())
            };
            ListItem::new(Line::from(vec![
                Span::raw(" "),
                Span::styled(format!("◷ {}", entry.city), style),
            ]))
        })
        .collect();
    List::new(items).block(panel("Recent Searches", gradient))
}

fn ui(f: &mut Frame, app: &App) {
    let gradient = app.dashboard.background();
    f.render_widget(
        Block::default().style(Style::default().bg(gradient.background())),
        f.area(),
    );

    let history_height = match app.dashboard.history().len() {
        0 => 0,
        n => n as u16 + 2,
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(history_height),
            Constraint::Length(1),
        ])
        .split(f.area());

    display_gradient(f, rows[0], &gradient);
    f.render_widget(display_headline(&gradient), rows[1]);
    f.render_widget(display_search(app, &gradient), rows[2]);
    place_cursor(f, app, rows[2]);
    f.render_widget(display_suggestions(app, &gradient), rows[3]);
    display_main(f, rows[4], app, &gradient);
    if history_height > 0 {
        f.render_widget(display_history(app, &gradient), rows[5]);
    }
    f.render_widget(
        Paragraph::new(" Enter search · Tab complete · ↑/↓ recent · Ctrl-R refresh · Esc quit")
            .style(Style::default().fg(gradient.muted())),
        rows[6],
    );
}

fn place_cursor(f: &mut Frame, app: &App, area: Rect) {
    if app.history_cursor.is_some() {
        return;
    }
    f.set_cursor_position((cursor_column(area, &app.input), area.y + 1));
}

/// Column just past the typed text, clamped inside the search box.
fn cursor_column(area: Rect, input: &str) -> u16 {
    // border + " 🔍 " prefix
    let prefix = 1 + Span::raw(" 🔍 ").width();
    let typed = u16::try_from(prefix + Span::raw(input).width()).unwrap_or(u16::MAX);
    area.x
        .saturating_add(typed)
        .min(area.right().saturating_sub(2))
}
