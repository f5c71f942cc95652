//! Intake TUI - terminal questionnaire for project intake
//!
//! Walks a customer through the website or system questionnaire of one
//! draft project, saves answers as drafts and submits the project for
//! approval when done.

mod api;
mod app;
mod config;
mod i18n;
mod platform;
mod schema;
mod state;
mod ui;

use anyhow::{bail, Context, Result};
use api::{ApiClient, ProjectFormStore};
use app::App;
use config::TuiConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use i18n::Catalog;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// How long a quitting session waits for saves still in flight
const PENDING_WRITES_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake_tui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let project_id = parse_project_id(std::env::args().nth(1))?;
    let config = TuiConfig::load_or_init().context("Failed to load configuration")?;

    let mut catalog = Catalog::embedded();
    if let Some(path) = &config.locale_file {
        match Catalog::load_with_overrides(path) {
            Ok(overrides) => catalog = overrides,
            Err(e) => warn!("Ignoring locale file {}: {:#}", path.display(), e),
        }
    }

    let client = ApiClient::from_config(&config)?;
    info!("Opening project {} via {}", project_id, client.base_url());
    let store = ProjectFormStore::new(Arc::new(client), project_id);
    let mut app = App::new(Arc::new(store), catalog, config.completion_delay());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start_loading();
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.finish_pending(PENDING_WRITES_GRACE).await;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }

    Ok(())
}

fn parse_project_id(arg: Option<String>) -> Result<Uuid> {
    let Some(arg) = arg else {
        bail!("Usage: intake-tui <project-id>");
    };
    Uuid::parse_str(arg.trim()).with_context(|| format!("Invalid project id: {arg}"))
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Apply finished background work before drawing
        app.drain_events();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Windows reports releases too
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Global quit: Ctrl+C
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                app.handle_key(key);
            }
        }

        // Check if app wants to quit
        if app.should_quit() {
            return Ok(());
        }
    }
}
