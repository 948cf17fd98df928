mod app;
mod config;
mod editor;
mod entry;
mod error;
mod export;
mod importer;
mod selector;
mod session;
mod spin;
mod store;
mod ui;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::Config;
use editor::Editor;
use entry::Entry;
use selector::WeightedSelector;
use session::DrawSession;
use store::SessionStore;
use ui::Theme;

/// Frame interval while waiting for input
const TICK: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "spinwheel")]
#[command(about = "Weighted random draw without replacement, with a spinning wheel")]
#[command(version)]
struct Cli {
    /// Participant file: rows of name and occurrence (CSV, TSV, ;-separated, xlsx, xls or ods)
    file: Option<PathBuf>,

    /// Add a participant as NAME or NAME=WEIGHT (repeatable)
    #[arg(long = "entry", short = 'e', value_name = "NAME[=WEIGHT]")]
    entries: Vec<String>,

    /// Config file path
    #[arg(long, default_value = "~/.config/spinwheel/config.toml")]
    config: String,

    /// Seed the draw for reproducible results
    #[arg(long)]
    seed: Option<u64>,

    /// Draw N winners without the TUI and print them
    #[arg(long, value_name = "N")]
    draw: Option<usize>,

    /// Export winners to this CSV file
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Theme preset (overrides the config file)
    #[arg(long)]
    theme: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let headless = cli.draw.is_some();

    init_logging(headless)?;

    // Load config
    let mut config = Config::load(&cli.config)?;
    if let Some(theme) = &cli.theme {
        config.appearance.theme = theme.clone();
    }

    let entries = collect_entries(&cli, &config)?;

    if let Some(count) = cli.draw {
        return run_headless(entries, count, cli.seed, cli.export.as_deref());
    }

    let theme = config.resolve_theme();
    let mut app = App::new(config, cli.seed);
    if !entries.is_empty() {
        app.load_pool(entries)?;
    } else {
        app.start_edit();
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run main loop
    let result = run_app(&mut terminal, &mut app, &theme, cli.export.as_deref()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

/// Log to stderr in headless mode, to a file under the data dir otherwise
fn init_logging(headless: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "spinwheel=info".into());

    if headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
        return Ok(());
    }

    let dir = dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("spinwheel");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let path = dir.join("spinwheel.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file)),
        )
        .init();
    Ok(())
}

/// Participants from the file argument followed by `--entry` values
fn collect_entries(cli: &Cli, config: &Config) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();

    if let Some(path) = &cli.file {
        let import = importer::load_file(path, &config.import)
            .with_context(|| format!("Failed to import {}", path.display()))?;
        entries.extend(import.entries);
    }

    entries.extend(importer::parse_manual_all(&cli.entries)?);
    Ok(entries)
}

/// Draw `count` winners (or until the pool runs out) and print them
fn run_headless(
    entries: Vec<Entry>,
    count: usize,
    seed: Option<u64>,
    export_path: Option<&std::path::Path>,
) -> Result<()> {
    if entries.is_empty() {
        bail!("No participants: pass a file or --entry NAME[=WEIGHT]");
    }

    let store = SessionStore::new();
    let id = match seed {
        Some(seed) => DrawSession::with_selector(entries, WeightedSelector::seeded(seed))
            .map(|session| store.insert(session)),
        None => store.create(entries),
    }
    .context("Failed to create draw session")?;

    for n in 1..=count {
        match store.draw(id) {
            Ok(record) => println!("{}. {} ({}×)", n, record.name, record.weight),
            Err(e) if e.is_exhausted() => {
                tracing::info!("Pool exhausted after {} draws", n - 1);
                break;
            }
            Err(e) => return Err(e).context("Draw failed"),
        }
    }

    let left = store.with_session(id, |s| s.current_pool().len())?;
    tracing::info!("{} participants left in the pool", left);

    if let Some(path) = export_path {
        let history = store.export_history(id)?;
        export::write_csv(path, &history)?;
    }

    store.delete(id);
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    theme: &Theme,
    export_path: Option<&std::path::Path>,
) -> Result<()> {
    loop {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|f| ui::draw(f, app, theme, now))?;

        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            let ctrl = key.modifiers.contains(event::KeyModifiers::CONTROL);
            if ctrl && key.code == KeyCode::Char('c') {
                return Ok(());
            }

            if app.is_editing() {
                handle_edit_key(app, key.code, ctrl);
                continue;
            }

            match key.code {
                KeyCode::Esc => {
                    if app.is_filtering() {
                        app.clear_filter();
                    } else if app.is_spinning() {
                        app.finish_spin();
                    } else {
                        return Ok(());
                    }
                }
                KeyCode::Enter => {
                    if let Err(e) = app.draw() {
                        app.report_error(e);
                    }
                }
                KeyCode::Up => app.previous(),
                KeyCode::Down => app.next(),
                KeyCode::Backspace if app.is_filtering() => {
                    app.pop_filter_char();
                }
                KeyCode::Char(c) if app.is_filtering() => {
                    app.push_filter_char(c);
                }
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char(' ') => {
                    if let Err(e) = app.draw() {
                        app.report_error(e);
                    }
                }
                KeyCode::Char('r') => {
                    if let Err(e) = app.reset() {
                        app.report_error(e);
                    }
                }
                KeyCode::Char('e') => {
                    if let Err(e) = app.export(export_path) {
                        app.report_error(format!("{:#}", e));
                    }
                }
                KeyCode::Char('m') => app.start_edit(),
                KeyCode::Char('k') => app.previous(),
                KeyCode::Char('j') => app.next(),
                KeyCode::Char('/') => app.start_filter(),
                _ => {}
            }
        }
    }
}

/// Keys while the participant editor is open
fn handle_edit_key(app: &mut App, code: KeyCode, ctrl: bool) {
    match code {
        KeyCode::Esc => app.cancel_edit(),
        KeyCode::Enter => {
            let input_empty = app.editor().is_some_and(|e| e.input().trim().is_empty());
            if input_empty {
                if let Err(e) = app.apply_edit() {
                    app.report_error(e);
                }
            } else {
                app.edit(Editor::submit_input);
            }
        }
        KeyCode::Char('u') if ctrl => app.edit(|e| {
            e.clear();
            Ok(())
        }),
        KeyCode::Up => app.edit(|e| {
            e.previous();
            Ok(())
        }),
        KeyCode::Down => app.edit(|e| {
            e.next();
            Ok(())
        }),
        KeyCode::Left => app.edit(|e| e.adjust_weight(-1)),
        KeyCode::Right => app.edit(|e| e.adjust_weight(1)),
        KeyCode::Delete => app.edit(|e| {
            e.remove_selected();
            Ok(())
        }),
        KeyCode::Backspace => app.edit(|e| {
            e.pop_char();
            Ok(())
        }),
        KeyCode::Char(c) => app.edit(|e| {
            e.push_char(c);
            Ok(())
        }),
        _ => {}
    }
}
