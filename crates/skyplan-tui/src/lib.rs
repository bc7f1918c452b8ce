// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use skyplan_app::{
    AppCommand, AppEvent, AppState, FilterField, GridRow, LoadStatus, PLAN_COLUMNS, PlanAction,
    PlanVisibility, WeatherRecord, grid_headers,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::error;

const PAGE_ROWS: isize = 10;

pub trait AppRuntime {
    fn load_records(&mut self) -> Result<Vec<WeatherRecord>>;
    /// Starts the startup load. The result arrives as an [`InternalEvent`];
    /// the default runs the load inline.
    fn spawn_load(&mut self, tx: Sender<InternalEvent>) -> Result<()> {
        let event = match self.load_records() {
            Ok(records) => InternalEvent::DataLoaded(records),
            Err(error) => InternalEvent::DataLoadFailed(format!("{error:#}")),
        };
        tx.send(event)
            .map_err(|_| anyhow::anyhow!("load event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    DataLoaded(Vec<WeatherRecord>),
    DataLoadFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    Table,
    Filters,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    focus: Focus,
    selected_row: usize,
    filter_field: usize,
    help_visible: bool,
    status_token: u64,
}

impl ViewData {
    fn active_filter_field(&self) -> FilterField {
        FilterField::ALL[self.filter_field % FilterField::ALL.len()]
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let result = match Terminal::new(backend).context("create terminal") {
        Ok(mut terminal) => event_loop(&mut terminal, state, runtime, next_terminal_event),
        Err(error) => Err(error),
    };

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn next_terminal_event() -> Result<Option<Event>> {
    if !event::poll(Duration::from_millis(120)).context("poll event")? {
        return Ok(None);
    }
    event::read().context("read event").map(Some)
}

/// Runs until quit or the first draw or input error. Terminal setup and
/// teardown belong to the caller, so every exit path restores the terminal.
fn event_loop<B, R, F>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    runtime: &mut R,
    mut next_event: F,
) -> Result<()>
where
    B: Backend,
    R: AppRuntime,
    F: FnMut() -> Result<Option<Event>>,
{
    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = runtime.spawn_load(internal_tx.clone()) {
        fail_load(state, &mut view_data, &internal_tx, format!("{error:#}"));
    }

    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        terminal
            .draw(|frame| render(frame, state, &view_data))
            .context("draw frame")?;

        if let Some(Event::Key(key)) = next_event()?
            && handle_key_event(state, &mut view_data, &internal_tx, key)
        {
            return Ok(());
        }
    }
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::DataLoaded(records) => {
                dispatch_and_sync(state, view_data, tx, AppCommand::RecordsLoaded(records));
            }
            InternalEvent::DataLoadFailed(message) => {
                fail_load(state, view_data, tx, message);
            }
        }
    }
}

fn fail_load(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    message: String,
) {
    error!(error = %message, "weather data load failed");
    dispatch_and_sync(state, view_data, tx, AppCommand::LoadFailed(message));
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    dispatch_and_sync(
        state,
        view_data,
        internal_tx,
        AppCommand::SetStatus(message.into()),
    );
}

/// Dispatches `command`, keeps the cursor inside the redrawn grid and arms
/// the status timer when the status line changed.
fn dispatch_and_sync(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::GridRendered { .. }))
    {
        clamp_cursor(state, view_data);
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn handle_key_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if state.notification.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            dispatch_and_sync(state, view_data, internal_tx, AppCommand::DismissNotification);
        }
        return false;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
        }
        return false;
    }

    match view_data.focus {
        Focus::Filters => {
            handle_filter_key(state, view_data, internal_tx, key);
            false
        }
        Focus::Table => handle_table_key(state, view_data, internal_tx, key),
    }
}

fn handle_table_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => move_row(state, view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_row(state, view_data, -1),
        KeyCode::PageDown => move_row(state, view_data, PAGE_ROWS),
        KeyCode::PageUp => move_row(state, view_data, -PAGE_ROWS),
        KeyCode::Char('g') | KeyCode::Home => view_data.selected_row = 0,
        KeyCode::Char('G') | KeyCode::End => {
            view_data.selected_row = state.grid().len().saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            if state.grid().is_empty() {
                emit_status(state, view_data, internal_tx, "no rows to plan");
            } else {
                dispatch_and_sync(
                    state,
                    view_data,
                    internal_tx,
                    AppCommand::TogglePlan(view_data.selected_row),
                );
            }
        }
        KeyCode::Char('/') | KeyCode::Char('f') => {
            view_data.focus = Focus::Filters;
        }
        KeyCode::Char('r') => {
            dispatch_and_sync(state, view_data, internal_tx, AppCommand::ResetFilters);
            emit_status(state, view_data, internal_tx, "filters reset");
        }
        KeyCode::Char('c') => {
            if state.plan_panel == PlanVisibility::Hidden {
                emit_status(state, view_data, internal_tx, "plan is empty");
            } else {
                dispatch_and_sync(state, view_data, internal_tx, AppCommand::ConfirmPlan);
            }
        }
        KeyCode::Char('?') => view_data.help_visible = true,
        _ => {}
    }
    false
}

fn handle_filter_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let field = view_data.active_filter_field();
    match key.code {
        KeyCode::Esc => view_data.focus = Focus::Table,
        KeyCode::Enter => {
            view_data.focus = Focus::Table;
            dispatch_and_sync(state, view_data, internal_tx, AppCommand::ApplyFilters);
        }
        KeyCode::Tab => move_filter_field(view_data, 1),
        KeyCode::BackTab => move_filter_field(view_data, -1),
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            dispatch_and_sync(state, view_data, internal_tx, AppCommand::ResetFilters);
            emit_status(state, view_data, internal_tx, "filters reset");
        }
        KeyCode::Right if field.is_choice() => {
            let options = state.filter_options().clone();
            state.filters.cycle_choice(field, &options, 1);
        }
        KeyCode::Left if field.is_choice() => {
            let options = state.filter_options().clone();
            state.filters.cycle_choice(field, &options, -1);
        }
        KeyCode::Backspace => {
            state.filters.pop_char(field);
        }
        KeyCode::Char(value) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.filters.push_char(field, value);
        }
        _ => {}
    }
}

fn move_filter_field(view_data: &mut ViewData, delta: isize) {
    let len = FilterField::ALL.len() as isize;
    view_data.filter_field = (view_data.filter_field as isize + delta).rem_euclid(len) as usize;
}

fn move_row(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let rows = state.grid().len();
    if rows == 0 {
        view_data.selected_row = 0;
        return;
    }
    let max = rows as isize - 1;
    view_data.selected_row = (view_data.selected_row as isize + delta).clamp(0, max) as usize;
}

fn clamp_cursor(state: &AppState, view_data: &mut ViewData) {
    let last = state.grid().len().saturating_sub(1);
    view_data.selected_row = view_data.selected_row.min(last);
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let filter_style = if view_data.focus == Focus::Filters {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    let filters = Paragraph::new(render_filter_text(state, view_data)).block(
        Block::default()
            .title("skyplan")
            .borders(Borders::ALL)
            .style(filter_style),
    );
    frame.render_widget(filters, layout[0]);

    if state.plan_panel == PlanVisibility::Visible {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(layout[1]);
        render_grid(frame, body[0], state, view_data);
        render_plan(frame, body[1], state);
    } else {
        render_grid(frame, layout[1], state, view_data);
    }

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[2]);

    if let Some(message) = &state.notification {
        let area = centered_rect(50, 20, frame.area());
        frame.render_widget(Clear, area);
        let notice = Paragraph::new(format!("{message}\n\n[enter] ok")).block(
            Block::default()
                .title("plan confirmed")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Green)),
        );
        frame.render_widget(notice, area);
    }

    if view_data.help_visible {
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_grid(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    let headers = grid_headers();
    let widths = vec![Constraint::Min(5); headers.len()];
    let header = Row::new(headers.into_iter().map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = state.grid().iter().enumerate().map(|(index, row)| {
        let selected = view_data.focus == Focus::Table && index == view_data.selected_row;
        grid_row_widget(row, selected)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(grid_title(state))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn grid_row_widget(row: &GridRow, selected: bool) -> Row<'static> {
    let cells = row.cells();
    let last = cells.len().saturating_sub(1);
    let cells = cells.into_iter().enumerate().map(|(index, text)| {
        let mut style = Style::default();
        if index == last {
            style = action_style(row.action);
        }
        if selected {
            style = style.bg(Color::DarkGray);
        }
        Cell::from(text).style(style)
    });
    Row::new(cells.collect::<Vec<_>>())
}

fn action_style(action: PlanAction) -> Style {
    match action {
        PlanAction::Add => Style::default().fg(Color::Green),
        PlanAction::Remove => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    }
}

fn render_plan(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState) {
    let header = Row::new(PLAN_COLUMNS.map(|label| {
        Cell::from(label).style(Style::default().add_modifier(Modifier::BOLD))
    }));
    let rows = state
        .plan()
        .rows()
        .iter()
        .map(|row| Row::new(row.cells().map(Cell::from)));

    let table = Table::new(rows, [Constraint::Min(4); PLAN_COLUMNS.len()])
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(format!("plan ({})", state.plan().len()))
                .title_bottom("[c] confirm plan")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(table, area);
}

fn grid_title(state: &AppState) -> String {
    match state.load_status {
        LoadStatus::Loading => "weather (loading)".to_owned(),
        LoadStatus::Failed => "weather (load failed)".to_owned(),
        LoadStatus::Loaded => {
            let shown = state.grid().len();
            if state.filters.criteria().is_unconstrained() {
                format!("weather ({shown} rows)")
            } else {
                format!("weather ({shown} rows, filtered)")
            }
        }
    }
}

fn render_filter_text(state: &AppState, view_data: &ViewData) -> String {
    let focused = (view_data.focus == Focus::Filters).then(|| view_data.active_filter_field());
    FilterField::ALL
        .into_iter()
        .map(|field| {
            let value = state.filters.display(field);
            if focused == Some(field) {
                format!("[{}: {value}_]", field.label())
            } else {
                format!("{}: {value}", field.label())
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(message) = &state.status_line {
        return message.clone();
    }
    match view_data.focus {
        Focus::Filters => {
            "tab next field  ←/→ choose  type to edit  enter apply  ctrl-r reset  esc back"
                .to_owned()
        }
        Focus::Table => {
            let planned = state.plan().len();
            let mut hint = String::from("space add/remove  / filters  r reset  ? help  q quit");
            if planned > 0 {
                hint.push_str(&format!("  c confirm {planned}"));
            }
            hint
        }
    }
}

fn help_overlay_text() -> &'static str {
    "j/k, ↑/↓     move between rows\n\
     PgUp/PgDn    move by page\n\
     g/G          first / last row\n\
     space/enter  add or remove the row from the plan\n\
     / or f       edit filters (enter applies, esc leaves)\n\
     r            reset filters\n\
     c            confirm the plan\n\
     ?            toggle this help\n\
     q, ctrl-q    quit"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
