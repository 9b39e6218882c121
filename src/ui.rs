use anyhow::Result;
use chrono::NaiveDateTime;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use rusqlite::Connection;
use salon_books::{
    format_currency, local_now, Appointment, AppointmentStatus, Dashboard, EntryKind, PeriodTotals,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Today,
    Upcoming,
    Finances,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Today => Page::Upcoming,
            Page::Upcoming => Page::Finances,
            Page::Finances => Page::Today,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Today => Page::Finances,
            Page::Upcoming => Page::Today,
            Page::Finances => Page::Upcoming,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Today => "Today's schedule",
            Page::Upcoming => "Upcoming",
            Page::Finances => "Finances",
        }
    }
}

pub struct App {
    conn: Connection,
    pub dashboard: Dashboard,
    pub current_page: Page,
    pub state: TableState,
}

impl App {
    pub fn load(conn: Connection, now: NaiveDateTime) -> Result<Self> {
        let dashboard = Dashboard::load(&conn, now)?;
        let mut app = Self {
            conn,
            dashboard,
            current_page: Page::Today,
            state: TableState::default(),
        };
        app.reset_selection();
        Ok(app)
    }

    /// Re-read everything from the database
    pub fn refresh(&mut self) -> Result<()> {
        self.dashboard = Dashboard::load(&self.conn, local_now())?;
        self.reset_selection();
        Ok(())
    }

    fn row_count(&self) -> usize {
        match self.current_page {
            Page::Today => self.dashboard.todays_appointments.len(),
            Page::Upcoming => self.dashboard.upcoming_appointments.len(),
            Page::Finances => self.dashboard.finance_entries.len(),
        }
    }

    fn reset_selection(&mut self) {
        let selected = if self.row_count() == 0 { None } else { Some(0) };
        self.state.select(selected);
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.reset_selection();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.reset_selection();
    }

    pub fn next(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.row_count();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('r') => app.refresh()?,
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Today => {
            let rows = app.dashboard.todays_appointments.clone();
            render_appointments(f, chunks[1], &rows, " Today's schedule ", "%H:%M", &mut app.state);
        }
        Page::Upcoming => {
            let rows = app.dashboard.upcoming_appointments.clone();
            render_appointments(f, chunks[1], &rows, " Upcoming ", "%b %d %H:%M", &mut app.state);
        }
        Page::Finances => render_finances(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2]);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Today, Page::Upcoming, Page::Finances];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    let today = app.dashboard.totals.daily;
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        app.dashboard.generated_at.format("%a %b %d, %H:%M").to_string(),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("↑ {}", format_currency(today.income)),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("↓ {}", format_currency(today.expense)),
        Style::default().fg(Color::Red),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn status_color(status: AppointmentStatus) -> Color {
    match status {
        AppointmentStatus::Scheduled => Color::Cyan,
        AppointmentStatus::Completed => Color::Green,
        AppointmentStatus::Cancelled => Color::DarkGray,
    }
}

fn render_appointments(
    f: &mut Frame,
    area: Rect,
    appointments: &[Appointment],
    title: &str,
    time_format: &str,
    state: &mut TableState,
) {
    let header_cells = ["When", "Client", "Service", "Price", "Status"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = appointments.iter().map(|appt| {
        let color = status_color(appt.status);
        let when = format!("{} - {}", appt.start.format(time_format), appt.end.format("%H:%M"));

        Row::new(vec![
            Cell::from(when),
            Cell::from(truncate(appt.customer_label(), 24)),
            Cell::from(truncate(&appt.service, 28)),
            Cell::from(format_currency(appt.price)).style(Style::default().fg(Color::Magenta)),
            Cell::from(appt.status.as_str()).style(Style::default().fg(color)),
        ])
        .height(1)
    });

    let empty_title = if appointments.is_empty() {
        format!("{title}(nothing booked) ")
    } else {
        title.to_string()
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(22),
            Constraint::Length(26),
            Constraint::Length(30),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(empty_title),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, state);
}

fn render_period(f: &mut Frame, area: Rect, label: &str, totals: PeriodTotals) {
    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Income    ", Style::default().fg(Color::Cyan)),
            Span::styled(
                format_currency(totals.income),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Expenses  ", Style::default().fg(Color::Cyan)),
            Span::styled(
                format_currency(totals.expense),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" {} ", label.to_uppercase())),
    );

    f.render_widget(panel, area);
}

fn render_finances(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let period_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(chunks[0]);

    for (i, (label, totals)) in app.dashboard.totals.periods().into_iter().enumerate() {
        render_period(f, period_chunks[i], label, totals);
    }

    let header_cells = ["Date", "Type", "Category", "Amount", "Notes"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.dashboard.finance_entries.iter().map(|entry| {
        let color = match entry.kind {
            EntryKind::Income => Color::Green,
            EntryKind::Expense => Color::Red,
        };

        Row::new(vec![
            Cell::from(entry.occurred_on.format("%Y-%m-%d").to_string()),
            Cell::from(entry.kind.as_str()).style(Style::default().fg(color)),
            Cell::from(truncate(&entry.category, 22)),
            Cell::from(format_currency(entry.amount)).style(Style::default().fg(color)),
            Cell::from(truncate(entry.notes.as_deref().unwrap_or(""), 40)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(24),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Entries this week & month "),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[1], &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let status_spans = vec![
        Span::styled(" Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Nav | "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
