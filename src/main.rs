use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use taskboard::api::HttpTaskApi;
use taskboard::config::{Cli, Commands};
use taskboard::filter::Filter;
use taskboard::store::{Intent, TaskStore};
use taskboard::ui::{self, App};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let api = HttpTaskApi::new(&cli.base_url)?;
    info!(base_url = %api.base_url(), "Using task API");
    let mut store = TaskStore::new(Arc::new(api));

    match cli.command {
        Some(Commands::List { filter }) => {
            store.load().await.context("Failed to load tasks")?;
            print_tasks(&store, filter);
            Ok(())
        }
        None => run_tui(store).await,
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to open log file {}", cli.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn print_tasks(store: &TaskStore, filter: Filter) {
    for task in store.visible(filter) {
        let mark = if task.completed { "x" } else { " " };
        println!(
            "[{}] {} ({}) {}",
            mark,
            task.display_title(),
            task.difficulty,
            task.display_description()
        );
    }
}

async fn run_tui(store: TaskStore) -> anyhow::Result<()> {
    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store);
    app.apply(Intent::Load).await;

    let result = ui::run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.context("Terminal UI failed")
}
