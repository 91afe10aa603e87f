use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio::sync::mpsc;

use runlog_logs::{
    Diagnostic, HighlightExpired, PayloadFormat, ViewerConfig, ViewerSession, Viewport,
};
use runlog_tui::{
    Action, AppState, Event, EventHandler, KeyBindings, KeyContext, LogViewerScreen, Tui,
    TuiViewport,
};

/// runlog - A terminal viewer for code-execution logs
#[derive(Parser, Debug)]
#[command(name = "runlog")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Execution response or log file (reads stdin when omitted or "-")
    #[arg(value_name = "PAYLOAD")]
    payload: Option<PathBuf>,

    /// Treat the input as a bare log instead of a sentinel-separated response
    #[arg(long)]
    raw: bool,

    /// Config file (defaults to <config dir>/runlog/config.toml when present)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Lines per chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Maximum number of expanded chunks
    #[arg(long)]
    max_open: Option<usize>,

    /// Print diagnostics and chunk summary as JSON instead of starting the UI
    #[arg(long)]
    dump: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for debugging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Run the application
    let result = run(args).await;

    // Handle any errors
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let (source_name, payload) = read_payload(args.payload.as_deref())?;

    if args.dump {
        return dump(&config, &payload, args.raw);
    }

    run_app(config, source_name, payload, args.raw).await
}

fn load_config(args: &Args) -> Result<ViewerConfig> {
    resolve_config(
        args.config.as_deref(),
        default_config_path(),
        args.chunk_size,
        args.max_open,
    )
}

/// Resolve configuration: explicit file, then the fallback path when it
/// exists, then defaults. CLI flags win over all of them.
fn resolve_config(
    explicit: Option<&Path>,
    fallback: Option<PathBuf>,
    chunk_size: Option<usize>,
    max_open: Option<usize>,
) -> Result<ViewerConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => fallback.filter(|p| p.exists()),
    };

    let mut config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            ViewerConfig::load(&path)?
        }
        None => ViewerConfig::default(),
    };

    if let Some(chunk_size) = chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(max_open) = max_open {
        config.max_open = max_open;
    }
    config.validate().context("invalid configuration")?;

    Ok(config)
}

fn default_config_path() -> Option<PathBuf> {
    let dir = dirs::config_dir()?;
    Some(dir.join("runlog").join("config.toml"))
}

fn read_payload(path: Option<&Path>) -> Result<(String, String)> {
    match path {
        Some(path) if path != Path::new("-") => {
            let payload = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok((name, payload))
        }
        _ => {
            let mut payload = String::new();
            std::io::stdin()
                .read_to_string(&mut payload)
                .context("failed to read stdin")?;
            Ok(("stdin".to_string(), payload))
        }
    }
}

/// Viewport for the headless dump: nothing to scroll or highlight
struct Headless;

impl Viewport for Headless {
    fn reveal_line(&mut self, _line: usize) {}
    fn apply_temporary_highlight(&mut self, _line: usize, _duration: Duration) {}
    fn clear_highlight(&mut self) {}
}

#[derive(Serialize)]
struct Dump<'a> {
    format: PayloadFormat,
    line_count: usize,
    errors: &'a [Diagnostic],
    warnings: &'a [Diagnostic],
    chunks: Vec<ChunkSummary>,
}

#[derive(Serialize)]
struct ChunkSummary {
    index: usize,
    start_line: usize,
    end_line: usize,
    errors: usize,
    warnings: usize,
    expanded: bool,
}

fn dump(config: &ViewerConfig, payload: &str, raw: bool) -> Result<()> {
    let mut session = ViewerSession::new(config)?;
    if raw {
        session.install_log(payload, &mut Headless);
    } else {
        session.install_payload(payload, &mut Headless);
    }

    let loaded = session.loaded().context("no log was installed")?;
    let model = session.render_model();

    let report = Dump {
        format: loaded.response.format,
        line_count: loaded.record.line_count,
        errors: &loaded.record.errors,
        warnings: &loaded.record.warnings,
        chunks: model
            .chunks
            .iter()
            .map(|view| ChunkSummary {
                index: view.chunk.index,
                start_line: view.chunk.start_line,
                end_line: view.chunk.end_line,
                errors: view.error_count,
                warnings: view.warning_count,
                expanded: view.expanded,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_app(
    config: ViewerConfig,
    source_name: String,
    payload: String,
    raw: bool,
) -> Result<()> {
    // Create channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (expired_tx, mut expired_rx) = mpsc::unbounded_channel::<HighlightExpired>();

    // Initialize state
    let session = ViewerSession::new(&config)?;
    let mut state = AppState::new(session, TuiViewport::new(expired_tx), source_name);
    if raw {
        state.install_log(&payload);
    } else {
        state.install_payload(&payload);
    }

    // Initialize TUI
    let mut tui = Tui::new()?;

    // Initialize event handler
    let mut events = EventHandler::new();

    // Initialize keybindings
    let keybindings = KeyBindings::new();

    // Initial render
    render(&mut tui, &mut state)?;

    // Main event loop
    loop {
        tokio::select! {
            // Handle terminal events
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        let context = if state.ui_state.help_visible {
                            KeyContext::Help
                        } else {
                            KeyContext::for_focus(state.ui_state.focus)
                        };

                        if let Some(action) = keybindings.get_action(context, &key) {
                            let _ = action_tx.send(action);
                        }
                    }
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => {
                        state.show_error(e);
                    }
                }
            }

            // Handle user actions
            Some(action) = action_rx.recv() => {
                handle_action(&mut state, &mut tui, action);
            }

            // Highlight timer fired
            Some(expired) = expired_rx.recv() => {
                state.on_highlight_expired(expired);
            }
        }

        if state.should_quit {
            break;
        }

        render(&mut tui, &mut state)?;
    }

    // Cleanup
    events.shutdown();
    tui.restore()?;

    Ok(())
}

fn handle_action(state: &mut AppState, tui: &mut Tui, action: Action) {
    // Any key clears the last status message
    if action != Action::Render {
        state.ui_state.status_message = None;
    }

    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::ToggleHelp => {
            state.toggle_help();
        }
        Action::DismissError => {
            state.dismiss_error();
        }
        Action::FocusNext => {
            state.focus_next();
        }
        Action::CursorUp(n) => {
            state.cursor_up(n);
        }
        Action::CursorDown(n) => {
            state.cursor_down(n);
        }
        Action::PageUp => {
            state.page_up();
        }
        Action::PageDown => {
            state.page_down();
        }
        Action::CursorTop => {
            state.cursor_top();
        }
        Action::CursorBottom => {
            state.cursor_bottom();
        }
        Action::Activate => {
            state.activate();
        }
        Action::ToggleChunk => {
            state.toggle_chunk_at_cursor();
        }
        Action::NextDiagnostic => {
            state.next_diagnostic();
        }
        Action::PrevDiagnostic => {
            state.prev_diagnostic();
        }
        Action::CopyChunk => {
            if let Err(e) = state.copy_chunk(tui.writer()) {
                state.show_error(format!("Copy failed: {}", e));
            }
        }
        Action::Render => {}
    }

    state.render_dirty = true;
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    if !state.render_dirty {
        return Ok(());
    }

    tui.terminal().draw(|frame| {
        LogViewerScreen::render(frame, state);
    })?;
    state.render_dirty = false;

    Ok(())
}
