//! Terminal now-playing dashboard and remote for a CXN player.
//!
//! ```text
//! cargo run --example now_playing -- 192.168.1.50
//! ```

use cambridge_cxn::{CxnDevice, DeviceConfig, MediaState, RepeatMode};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_secs(2);

struct App {
    device: CxnDevice,
    status_message: String,
    last_poll: Option<Instant>,
}

impl App {
    fn new(device: CxnDevice) -> Self {
        Self {
            device,
            status_message: "Connecting...".to_string(),
            last_poll: None,
        }
    }

    fn poll_due(&self) -> bool {
        self.last_poll.map_or(true, |t| t.elapsed() >= POLL_INTERVAL)
    }

    async fn poll(&mut self) {
        self.last_poll = Some(Instant::now());
        match self.device.refresh().await {
            Ok(()) => {
                if self.status_message.starts_with("Unavailable") || self.status_message == "Connecting..." {
                    self.status_message = "Connected".to_string();
                }
            }
            Err(e) => self.status_message = format!("Unavailable: {}", e),
        }
    }

    /// Report a command result and poll on the next loop so the screen catches up
    fn after_command(&mut self, label: &str, result: cambridge_cxn::Result<()>) {
        self.status_message = match result {
            Ok(()) => label.to_string(),
            Err(e) => format!("{} failed: {}", label, e),
        };
        self.last_poll = None;
    }

    async fn toggle_power(&mut self) {
        let result = if self.device.state() == Some(MediaState::Off) {
            self.device.turn_on().await
        } else {
            self.device.turn_off().await
        };
        self.after_command("Power", result);
    }

    async fn cycle_repeat(&mut self) {
        let next = match self.device.repeat() {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        };
        let result = self.device.set_repeat(next).await;
        self.after_command(&format!("Repeat {}", next.as_str()), result);
    }

    async fn cycle_source(&mut self) {
        let sources = self.device.source_list();
        if sources.is_empty() {
            self.status_message = "No sources known yet".to_string();
            return;
        }

        let next = match self.device.source() {
            Some(current) => sources
                .iter()
                .position(|s| s == current)
                .map_or(0, |i| (i + 1) % sources.len()),
            None => 0,
        };
        let result = self.device.select_source(&sources[next]).await;
        self.after_command(&format!("Source {}", sources[next]), result);
    }
}

fn ui(f: &mut Frame, app: &App) {
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.size());

    let inner_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(outer_chunks[0]);

    render_now_playing(f, app, inner_chunks[0]);
    render_sources(f, app, inner_chunks[1]);
    render_status(f, app, outer_chunks[1]);
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Yellow)),
        Span::raw(value),
    ])
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn render_now_playing(f: &mut Frame, app: &App, area: Rect) {
    let device = &app.device;
    let block = Block::default()
        .title(format!(" {} ({}) ", device.name(), device.host()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let state = match device.state() {
        Some(state) => format!("{:?}", state),
        None => "Unknown".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            state,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Title:  ", device.media_title().unwrap_or("-").to_string()),
        field("Artist: ", device.media_artist().unwrap_or("-").to_string()),
        field("Album:  ", device.media_album_name().unwrap_or("-").to_string()),
    ];

    if let (Some(position), Some(duration)) = (device.media_position(), device.media_duration()) {
        lines.push(field(
            "Time:   ",
            format!("{} / {}", format_duration(position), format_duration(duration)),
        ));
    }

    lines.push(Line::from(""));
    lines.push(field("Source: ", device.source().unwrap_or("-").to_string()));
    lines.push(field(
        "Volume: ",
        match device.volume_level() {
            Some(v) if device.is_volume_muted() => format!("{:.0}% (muted)", v * 100.0),
            Some(v) => format!("{:.0}%", v * 100.0),
            None => "fixed output".to_string(),
        },
    ));
    lines.push(field(
        "Modes:  ",
        format!(
            "shuffle {}, repeat {}",
            if device.shuffle() { "on" } else { "off" },
            device.repeat().as_str()
        ),
    ));
    if let Some(art) = device.media_image_url() {
        lines.push(field("Art:    ", art.to_string()));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "space play/pause  n/p next/prev  +/- volume  m mute  s shuffle  r repeat  i source  o power  q quit",
        Style::default().fg(Color::DarkGray),
    )));

    let text = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(text, area);
}

fn render_sources(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Sources ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let current = app.device.source();
    let items: Vec<ListItem> = app
        .device
        .source_list()
        .into_iter()
        .map(|name| {
            let style = if Some(name.as_str()) == current {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(name, style)))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Status ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let text = Paragraph::new(app.status_message.clone())
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(text, area);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let host = match std::env::args().nth(1) {
        Some(host) => host,
        None => {
            eprintln!("usage: now_playing <host>");
            std::process::exit(2);
        }
    };
    let device = CxnDevice::new(DeviceConfig::new(host))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(device);
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if app.poll_due() {
            app.poll().await;
        }

        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Char(' ') => {
                        let result = app.device.play_pause().await;
                        app.after_command("Play/pause", result);
                    }
                    KeyCode::Char('n') => {
                        let result = app.device.next_track().await;
                        app.after_command("Next track", result);
                    }
                    KeyCode::Char('p') => {
                        let result = app.device.previous_track().await;
                        app.after_command("Previous track", result);
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        let result = app.device.volume_up().await;
                        app.after_command("Volume up", result);
                    }
                    KeyCode::Char('-') | KeyCode::Char('_') => {
                        let result = app.device.volume_down().await;
                        app.after_command("Volume down", result);
                    }
                    KeyCode::Char('m') => {
                        let mute = !app.device.is_volume_muted();
                        let result = app.device.mute_volume(mute).await;
                        app.after_command(if mute { "Mute" } else { "Unmute" }, result);
                    }
                    KeyCode::Char('s') => {
                        let shuffle = !app.device.shuffle();
                        let result = app.device.set_shuffle(shuffle).await;
                        app.after_command("Shuffle", result);
                    }
                    KeyCode::Char('r') => app.cycle_repeat().await,
                    KeyCode::Char('i') => app.cycle_source().await,
                    KeyCode::Char('o') => app.toggle_power().await,
                    _ => {}
                }
            }
        }
    }
}
