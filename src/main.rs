mod animation;
mod app;
mod display_sync;
mod domain;
mod engine;
mod error;
mod input;
mod persistence;
mod ticker;
mod ui;

use anyhow::{Context, Result};
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{format_clock, status_badge};
use engine::TimerEngine;
use log::{error, info};
use persistence::{
    ensure_mindful_dir, get_mindful_dir, init_local_mindful, load_settings, save_settings,
    JsonFileStore, Settings, TaskStore, CONFIG_FILE, LOG_FILE,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::time::Instant;

/// Log filter variable (defaults to "info")
const LOG_ENV: &str = "MINDFUL_LOG";

#[derive(Parser)]
#[command(name = "mindful")]
#[command(about = "A mindful productivity timer: one task at a time, gentle reminders, no guilt", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .mindful directory in the current directory
    Init,
    /// Print the task list
    List,
    /// Print the deleted-tasks bin
    Trash,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let dir = init_local_mindful()?;
            save_settings(dir.join(CONFIG_FILE), &Settings::default())?;
            println!("Initialized mindful directory: {}", dir.display());
            println!();
            println!("Edit {} to change the tick, extension or display endpoint.", CONFIG_FILE);
            println!("Run 'mindful' to start.");
            Ok(())
        }
        Some(Commands::List) => print_tasks(),
        Some(Commands::Trash) => print_trash(),
        None => run_tui(),
    }
}

/// Send log output to the data directory; the terminal belongs to the UI
fn init_logging(dir: &Path) -> Result<()> {
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().filter_or(LOG_ENV, "info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .init();
    Ok(())
}

fn load_config(dir: &Path) -> Result<Settings> {
    Ok(load_settings(dir.join(CONFIG_FILE))?.with_env_overrides())
}

fn print_tasks() -> Result<()> {
    let dir = get_mindful_dir()?;
    let store = JsonFileStore::new(&dir);
    let tasks = store.load_tasks()?;

    if tasks.is_empty() {
        println!("No tasks in {}", dir.display());
        return Ok(());
    }
    for task in &tasks {
        println!(
            "{:<8} {:<32} {:>8} / {:<8} {}",
            task.status.to_tag(),
            task.name,
            format_clock(task.remaining_time),
            format_clock(task.total_duration),
            status_badge(task, false)
        );
    }
    Ok(())
}

fn print_trash() -> Result<()> {
    let dir = get_mindful_dir()?;
    let store = JsonFileStore::new(&dir);
    let deleted = store.load_deleted()?;

    if deleted.is_empty() {
        println!("The bin is empty");
        return Ok(());
    }
    for record in &deleted {
        println!(
            "{}  {:<32} {}",
            record.deleted_at.format("%Y-%m-%d %H:%M"),
            record.task.name,
            format_clock(record.task.total_duration)
        );
    }
    Ok(())
}

fn run_tui() -> Result<()> {
    let dir = ensure_mindful_dir()?;
    init_logging(&dir)?;
    info!("using mindful directory {}", dir.display());

    let settings = load_config(&dir)?;
    let display = display_sync::display_for_endpoint(
        settings.display_endpoint.as_deref(),
        settings.display_timeout(),
    );
    let store = JsonFileStore::new(&dir);
    let engine = TimerEngine::load(Box::new(store), display, settings.tick_period())?;

    let mut app = AppState::new(engine, settings);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Nothing keeps running once the window is gone
    app.shutdown();

    if let Err(err) = result {
        error!("terminal loop failed: {:#}", err);
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let frame_rate = ticker::frame_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout so the frame keeps moving
        if event::poll(frame_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        app.on_frame(Instant::now());
    }
}
