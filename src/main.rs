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
use ratatui::prelude::*;

use agent_overlay::config::{OverlayConfig, SourceKind};
use agent_overlay::demo_feed::DemoSource;
use agent_overlay::feed::{self, FeedEvent, HttpSource, SnapshotSource};
use agent_overlay::state::{AppState, apply_event};
use agent_overlay::ui::ui;
use agent_overlay::view::Renderer;

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.renderer.scroll_log(1),
            KeyCode::Char('k') | KeyCode::Up => self.state.renderer.scroll_log(-1),
            KeyCode::Char('G') | KeyCode::End => self.state.renderer.scroll_log_to_end(),
            KeyCode::Char('c') => self.state.show_console = !self.state.show_console,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = OverlayConfig::from_env();
    let source: Box<dyn SnapshotSource + Send> = match config.source {
        SourceKind::Http => Box::new(HttpSource::new(
            config.state_url.clone(),
            config.http_timeout,
        )),
        SourceKind::Demo => Box::new(DemoSource::new()),
    };
    let source_label = source.describe();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let _poller = feed::spawn_poller(source, config.poll_interval, tx);

    let state = AppState::new(Renderer::new(config.asset_root.clone()), source_label);
    let mut app = App::new(state);
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
    rx: mpsc::Receiver<FeedEvent>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        // Snapshots are applied right before the next paint.
        while let Ok(event) = rx.try_recv() {
            apply_event(&mut app.state, event);
        }

        terminal.draw(|f| ui(f, &app.state))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
