//! popkit demo host: a scrollable fake page with a subscribe button,
//! wired to show each popup variant behind each trigger kind.
//!
//! ```text
//! popkit --scenario coupon --trigger scroll
//! popkit --scenario lead-capture --position bottom-right
//! popkit --scenario feedback --trigger time --memory
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use color_eyre::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing_subscriber::EnvFilter;

use popkit::{
    DeviceClass, FeedbackData, FeedbackKind, LeadFields, Manager, ManagerSettings, MemoryStore,
    PopupConfig, PopupKind, Position, ScrollMetrics, TriggerSpec, tui,
};

/// Lines of filler content on the demo page.
const PAGE_LINES: usize = 120;

/// Idle sleep between loop iterations.
const IDLE_SLEEP: Duration = Duration::from_millis(25);

// ============================================================================
// CLI
// ============================================================================

/// popkit demo host
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Popup variant to demonstrate
    #[arg(long, value_enum, default_value = "coupon")]
    scenario: Scenario,

    /// Trigger deferring the popup
    #[arg(long, value_enum, default_value = "none")]
    trigger: TriggerArg,

    /// Popup position (defaults to the manager's default position)
    #[arg(long, value_enum)]
    position: Option<PositionArg>,

    /// Force the compact device class
    #[arg(long)]
    compact: bool,

    /// Keep the frequency cap in memory instead of on disk
    #[arg(long)]
    memory: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    Coupon,
    CallToAction,
    LeadCapture,
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TriggerArg {
    None,
    Time,
    Scroll,
    ExitIntent,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PositionArg {
    Center,
    BottomRight,
    BottomLeft,
    TopBanner,
    BottomBanner,
}

impl From<PositionArg> for Position {
    fn from(arg: PositionArg) -> Self {
        match arg {
            PositionArg::Center => Self::Center,
            PositionArg::BottomRight => Self::BottomRight,
            PositionArg::BottomLeft => Self::BottomLeft,
            PositionArg::TopBanner => Self::TopBanner,
            PositionArg::BottomBanner => Self::BottomBanner,
        }
    }
}

// ============================================================================
// Page Layout
// ============================================================================

struct PageLayout {
    header: Rect,
    content: Rect,
    subscribe: Rect,
    status: Rect,
}

fn page_layout(area: Rect) -> PageLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let footer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(18), Constraint::Min(0)])
        .split(chunks[2]);

    PageLayout {
        header: chunks[0],
        content: chunks[1],
        subscribe: footer[0],
        status: footer[1],
    }
}

// ============================================================================
// Demo App
// ============================================================================

struct App {
    manager: Manager,
    scenario: Scenario,
    trigger: TriggerArg,
    position: Option<Position>,
    content: Vec<String>,
    scroll: u16,
    viewport_height: u16,
    last_area: Rect,
    status: Rc<RefCell<String>>,
    exit: bool,
}

impl App {
    fn new(cli: &Cli) -> Self {
        let settings = ManagerSettings {
            device_class: cli.compact.then_some(DeviceClass::Compact),
            ..ManagerSettings::default()
        };
        let manager = if cli.memory {
            Manager::with_store(settings, MemoryStore::new())
        } else {
            Manager::new(settings)
        };

        Self {
            manager,
            scenario: cli.scenario,
            trigger: cli.trigger,
            position: cli.position.map(Position::from),
            content: page_content(),
            scroll: 0,
            viewport_height: 0,
            last_area: Rect::default(),
            status: Rc::new(RefCell::new(String::from("ready"))),
            exit: false,
        }
    }

    fn build_config(&self) -> PopupConfig {
        let status = Rc::clone(&self.status);
        let kind = match self.scenario {
            Scenario::Coupon => PopupKind::Coupon {
                code: "SAVE20".to_string(),
            },
            Scenario::CallToAction => PopupKind::CallToAction {
                button_label: "Open the Docs".to_string(),
                target_url: "https://ratatui.rs".to_string(),
            },
            Scenario::LeadCapture => PopupKind::LeadCapture {
                fields: LeadFields {
                    name: true,
                    email: true,
                    phone: false,
                },
                button_label: None,
                on_submit: Some(Box::new(move |data| {
                    *status.borrow_mut() = format!(
                        "lead captured: name={} email={}",
                        data.name.as_deref().unwrap_or("-"),
                        data.email.as_deref().unwrap_or("-"),
                    );
                })),
            },
            Scenario::Feedback => PopupKind::Feedback {
                kind: FeedbackKind::Stars,
                on_submit: Some(Box::new(move |data| {
                    *status.borrow_mut() = match data {
                        FeedbackData::Stars { value } => format!("feedback: {value} star(s)"),
                        FeedbackData::Emoji { value } | FeedbackData::Thumbs { value } => {
                            format!("feedback: {value}")
                        }
                    };
                })),
            },
        };

        let title = match self.scenario {
            Scenario::Coupon => "Summer Sale",
            Scenario::CallToAction => "Liking popkit?",
            Scenario::LeadCapture => "Join the Newsletter",
            Scenario::Feedback => "Rate this Demo",
        };

        let close_status = Rc::clone(&self.status);
        let mut config = PopupConfig::new(title, kind)
            .with_text("Everything here is rendered by the popup engine.")
            .with_image("demo-art")
            .with_on_close(Box::new(move || {
                *close_status.borrow_mut() = String::from("popup closed");
            }));

        if let Some(position) = self.position {
            config = config.with_position(position);
        }
        config = match self.trigger {
            TriggerArg::None => config,
            TriggerArg::Time => config.with_trigger(TriggerSpec::time(Duration::from_secs(3))),
            TriggerArg::Scroll => config.with_trigger(TriggerSpec::scroll(50.0)),
            TriggerArg::ExitIntent => config.with_trigger(TriggerSpec::ExitIntent),
            TriggerArg::Click => config.with_trigger(TriggerSpec::click("subscribe")),
        };
        config
    }

    fn show_popup(&mut self) {
        let config = self.build_config();
        let outcome = self.manager.show(config);
        *self.status.borrow_mut() = format!("show requested: {outcome:?}");
    }

    // --------------------------------------------------------------------
    // Events
    // --------------------------------------------------------------------

    fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if self.manager.handle_key(key, now) {
            return;
        }
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.exit = true,
            KeyCode::Char('s') | KeyCode::Char('S') => self.show_popup(),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_by(-1, now),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_by(1, now),
            KeyCode::PageUp => self.scroll_by(-10, now),
            KeyCode::PageDown => self.scroll_by(10, now),
            _ => {}
        }
    }

    fn on_mouse(&mut self, event: &MouseEvent, now: Instant) {
        match event.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-1, now),
            MouseEventKind::ScrollDown => self.scroll_by(1, now),
            _ => {}
        }
        self.manager.handle_mouse(event, self.last_area, now);
    }

    fn scroll_by(&mut self, delta: i32, now: Instant) {
        let max = u16::try_from(self.content.len())
            .unwrap_or(u16::MAX)
            .saturating_sub(self.viewport_height);
        let next = i32::from(self.scroll).saturating_add(delta).clamp(0, i32::from(max));
        self.scroll = u16::try_from(next).unwrap_or(0);
        self.manager.update_scroll(self.page_metrics(), now);
    }

    fn page_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset: self.scroll,
            content_height: u16::try_from(self.content.len()).unwrap_or(u16::MAX),
            viewport_height: self.viewport_height,
        }
    }

    // --------------------------------------------------------------------
    // Rendering
    // --------------------------------------------------------------------

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.last_area = area;
        let layout = page_layout(area);
        self.viewport_height = layout.content.height;
        self.manager.register_click_target("subscribe", layout.subscribe);

        let header = Paragraph::new(Line::from(vec![
            Span::styled("popkit demo", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                "q: Quit | s: Show popup | ↑↓: Scroll",
                Style::default().fg(Color::Gray),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
        frame.render_widget(header, layout.header);

        let first = usize::from(self.scroll).min(self.content.len());
        let visible = self.content[first..]
            .iter()
            .take(usize::from(layout.content.height))
            .map(|line| Line::from(line.as_str()))
            .collect::<Vec<_>>();
        frame.render_widget(Paragraph::new(visible), layout.content);

        let subscribe = Paragraph::new(" Subscribe ")
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        frame.render_widget(subscribe, layout.subscribe);

        let status_text = self.status.borrow();
        let status = Paragraph::new(status_text.as_str())
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, layout.status);

        self.manager.render(frame, area);
    }
}

fn page_content() -> Vec<String> {
    let filler = [
        "The quick brown fox jumps over the lazy dog.",
        "Scroll down to exercise the scroll trigger.",
        "Move the pointer to the top row for exit intent.",
        "Press the Subscribe button for the click trigger.",
    ];
    (1..=PAGE_LINES)
        .map(|i| format!("{i:>3} │ {}", filler[(i - 1) % filler.len()]))
        .collect()
}

// ============================================================================
// Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    color_eyre::install()?;

    let cli = Cli::parse();
    let mut terminal = tui::init()?;
    let mut app = App::new(&cli);

    // Draw once so click targets exist before the popup registers triggers.
    terminal.draw(|frame| app.render(frame))?;
    app.show_popup();

    let result = run(&mut terminal, &mut app).await;

    tui::restore()?;
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    loop {
        if app.exit {
            break;
        }

        terminal.draw(|frame| app.render(frame))?;

        let now = Instant::now();
        let mut saw_event = false;
        if crossterm::event::poll(Duration::from_millis(1))? {
            saw_event = true;
            match crossterm::event::read()? {
                Event::Key(key) => app.on_key(key, now),
                Event::Mouse(mouse) => app.on_mouse(&mouse, now),
                Event::Resize(..) => {}
                _ => {}
            }
        }

        app.manager.tick(Instant::now());

        if !saw_event {
            tokio::time::sleep(IDLE_SLEEP).await;
        }
    }
    Ok(())
}
