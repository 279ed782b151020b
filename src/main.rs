use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use puppy_bowl_terminal::config::Config;
use puppy_bowl_terminal::controller::{details_destination, spawn_controller};
use puppy_bowl_terminal::logs::setup_logging;
use puppy_bowl_terminal::player_api::RemotePlayers;
use puppy_bowl_terminal::render::{CardAction, FormField};
use puppy_bowl_terminal::state::{AppState, Delta, ProviderCommand, Screen, apply_delta};

struct App {
    state: AppState,
    config: Config,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(config: Config, cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            config,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.state.help_overlay = false;
            }
            return;
        }
        match self.state.screen {
            Screen::Roster => self.on_roster_key(key),
            Screen::AddPlayer => self.on_form_key(key),
            Screen::Details { id } => self.on_details_key(key, id),
        }
    }

    fn on_roster_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('a') => self.state.open_form(),
            KeyCode::Char('r') => self.send(ProviderCommand::Refresh),
            KeyCode::Enter | KeyCode::Char('v') => self.trigger_selected(0),
            KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => {
                self.trigger_selected(1)
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.screen = Screen::Roster,
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = self.state.form.form_mut() {
                    form.focus = form.focus.next();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = self.state.form.form_mut() {
                    form.focus = form.focus.prev();
                }
            }
            KeyCode::Backspace => {
                if let Some(form) = self.state.form.form_mut() {
                    let focus = form.focus;
                    form.value_mut(focus).pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(form) = self.state.form.form_mut() {
                    let focus = form.focus;
                    form.value_mut(focus).push(c);
                }
            }
            _ => {}
        }
    }

    fn on_details_key(&mut self, key: KeyEvent, id: u64) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Roster,
            KeyCode::Char('x') | KeyCode::Delete => {
                self.on_card_action(CardAction::Remove(id));
                self.state.screen = Screen::Roster;
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn trigger_selected(&mut self, slot: usize) {
        let Some(card) = self.state.list.cards().get(self.state.selected) else {
            self.state.push_log("[INFO] No player selected");
            return;
        };
        let action = card.actions[slot];
        self.on_card_action(action);
    }

    fn on_card_action(&mut self, action: CardAction) {
        match action {
            CardAction::ViewDetails(id) => {
                let destination = details_destination(&self.config.details_path, id);
                self.state.push_log(format!("[INFO] Navigating to {destination}"));
                self.state.screen = Screen::Details { id };
                self.state.details = None;
                self.state.details_loading = true;
                self.send(ProviderCommand::FetchDetails(id));
            }
            CardAction::Remove(id) => self.send(ProviderCommand::Remove(id)),
        }
    }

    fn submit_form(&mut self) {
        if let Some(form) = self.state.form.form()
            && form.is_pending()
        {
            self.state.push_log("[INFO] Still adding the previous player");
            return;
        }
        match self.state.form.submit() {
            Some(player) => self.send(ProviderCommand::Create(player)),
            None => {
                let missing = self
                    .state
                    .form
                    .form()
                    .map(|form| form.missing_fields())
                    .unwrap_or_default();
                let names = missing
                    .iter()
                    .map(|field| field.placeholder())
                    .collect::<Vec<_>>()
                    .join(", ");
                self.state.push_log(format!("[INFO] Please fill in: {names}"));
            }
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Request failed: provider stopped");
        }
    }
}

fn main() -> io::Result<()> {
    let config = Config::load();
    if let Err(err) = setup_logging(&config) {
        eprintln!("warning: {err:#}");
    }
    tracing::info!(endpoint = %config.endpoint, "starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_controller(RemotePlayers::new(&config), tx, cmd_rx);

    let mut app = App::new(config, cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Roster | Screen::AddPlayer => render_roster(frame, chunks[1], &app.state),
        Screen::Details { id } => render_details(frame, chunks[1], &app.state, id),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state.screen));
    frame.render_widget(footer, chunks[3]);

    if app.state.screen == Screen::AddPlayer {
        render_form_overlay(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let refreshed = app
        .state
        .last_refresh
        .as_deref()
        .map(|t| format!("Refreshed {t}"))
        .unwrap_or_else(|| "Loading...".to_string());
    format!(
        "PUPPY BOWL | {} players | {refreshed}\n{}",
        app.state.list.len(),
        app.config.endpoint
    )
}

fn footer_text(screen: &Screen) -> &'static str {
    match screen {
        Screen::Roster => {
            "j/k/↑/↓ Move | Enter/v Details | d/x Remove | a Add | r Refresh | ? Help | q Quit"
        }
        Screen::AddPlayer => "Tab/↑/↓ Field | Enter Add Player | Esc Cancel",
        Screen::Details { .. } => "b/Esc Back | x Remove | ? Help | q Quit",
    }
}

fn render_roster(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Players").borders(Borders::ALL);
    let list_area = block.inner(area);
    frame.render_widget(block, area);

    if state.list.is_empty() {
        let text = if state.last_refresh.is_some() {
            "No players on the roster"
        } else {
            "No players yet"
        };
        let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    const CARD_HEIGHT: u16 = 3;
    if list_area.height < CARD_HEIGHT {
        let empty = Paragraph::new("Player list needs more height")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let cards = state.list.cards();
    let visible = (list_area.height / CARD_HEIGHT) as usize;
    let (start, end) = visible_range(state.selected, cards.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let card_area = Rect {
            x: list_area.x,
            y: list_area.y + (i as u16) * CARD_HEIGHT,
            width: list_area.width,
            height: CARD_HEIGHT,
        };
        let selected = idx == state.selected;
        let style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };

        let card = &cards[idx];
        let lines = vec![
            Line::from(Span::styled(
                format!("#{} {}", card.id, card.name),
                style.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(card.breed_line.clone(), style)),
            Line::from(Span::styled(
                card.image_url.clone(),
                style.fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(lines).style(style);
        frame.render_widget(paragraph, card_area);
    }
}

fn render_details(frame: &mut Frame, area: Rect, state: &AppState, id: u64) {
    let block = Block::default()
        .title(format!("Player #{id}"))
        .borders(Borders::ALL);
    let text = match &state.details {
        Some(player) if player.id == id => {
            let mut lines = vec![
                format!("Name: {}", player.name),
                format!("Breed: {}", player.breed),
                format!("Image: {}", player.image_url),
            ];
            if let Some(status) = &player.status {
                lines.push(format!("Status: {status}"));
            }
            if let Some(team_id) = player.team_id {
                lines.push(format!("Team: #{team_id}"));
            }
            if let Some(created_at) = &player.created_at {
                lines.push(format!("Created: {created_at}"));
            }
            lines.join("\n")
        }
        _ if state.details_loading => "Loading...".to_string(),
        _ => "No details available".to_string(),
    };
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_form_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(60, 50, area);
    frame.render_widget(Clear, popup_area);

    let Some(form) = state.form.form() else {
        return;
    };
    let mut lines = Vec::new();
    for field in FormField::ALL {
        let focused = field == form.focus;
        let marker = if focused { "> " } else { "  " };
        let value = form.value(field);
        let shown = if value.is_empty() {
            Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(value.to_string())
        };
        let label_style = if focused {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<11}", field.placeholder()), label_style),
            shown,
        ]));
    }
    lines.push(Line::from(""));
    let submit = if form.is_pending() {
        "Adding..."
    } else {
        "[Enter] Add Player"
    };
    lines.push(Line::from(submit));

    let popup = Paragraph::new(lines)
        .block(Block::default().title("Add a New Player").borders(Borders::ALL));
    frame.render_widget(popup, popup_area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Puppy Bowl - Help",
        "",
        "Roster:",
        "  j/k or ↑/↓   Move",
        "  Enter / v    See details",
        "  d / x        Remove player",
        "  a            Add a new player",
        "  r            Refresh",
        "",
        "Details:",
        "  b / Esc      Back",
        "  x            Remove player",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
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

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
