use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lecture_study::config::{Cli, Config};
use lecture_study::gateway::HttpGateway;
use lecture_study::gateway_worker::GatewayHandle;
use lecture_study::logger;
use lecture_study::session::{App, Waiter};
use lecture_study::ui;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

const TICK_RATE: Duration = Duration::from_secs(1);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let config = Config::resolve(&cli);

    let log_file = logger::log_path(Config::data_dir().as_deref());
    logger::init(&log_file, config.level_filter())
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;
    log::info!("starting against {}", config.api_base_url);

    let gateway = HttpGateway::new(&config.api_base_url, config.request_timeout())?;
    let mut worker =
        GatewayHandle::spawn(Arc::new(gateway)).context("failed to start gateway worker")?;

    let mut app = App::new(config.export_dir.clone(), config.list_limit);
    if let Some(id) = &cli.lecture {
        app.open_lecture(id, id);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &mut worker);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("exiting with error: {:#}", e);
    }
    log::info!("bye");
    result
}

/// Hand queued calls to the worker and note which view waits on each ticket.
fn dispatch(app: &mut App, worker: &mut GatewayHandle) {
    for call in app.take_outbox() {
        let waiter = Waiter::for_call(&call);
        match worker.submit(call) {
            Some(ticket) => app.track(waiter, ticket),
            None => app.dispatch_failed(waiter),
        }
    }
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    worker: &mut GatewayHandle,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        dispatch(app, worker);
        while let Some(response) = worker.try_recv() {
            app.handle_response(response);
        }
        dispatch(app, worker);

        terminal.draw(|f| ui::draw(f, app))?;
        if app.should_quit {
            return Ok(());
        }

        let timeout = TICK_RATE
            .saturating_sub(last_tick.elapsed())
            .min(POLL_INTERVAL);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.tick();
            last_tick = Instant::now();
        }
    }
}
