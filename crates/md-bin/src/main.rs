//! mdedit entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_actions::EditorSession;
use core_config::Config;
use core_events::{EVENT_CHANNEL_CAP, Event, EventSourceRegistry, InputEvent, RepeatConfig};
use core_input::{AsyncInputShutdown, RepeatMode, TerminalInputSource};
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalCapabilities, TerminalGuard};
use std::fmt;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod frame;

use frame::Frame;

const LOG_FILE_NAME: &str = "mdedit.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "mdedit", version, about = "Modal markdown editor")]
struct Args {
    /// File to open (UTF-8). Without it an empty, unnamed buffer is used.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `mdedit.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    session: EditorSession,
    config: Config,
    repeat: RepeatMode,
    terminal_guard: TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::default(),
            log_guard: None,
        }
    }

    fn run<'a>(&'a mut self, args: &Args) -> Result<RuntimeContext<'a>> {
        self.configure_logging()?;
        Self::install_panic_hook();
        info!(target: "runtime", "startup");

        let mut config = core_config::load_from(args.config.clone())?;
        // Load before touching the terminal so a failure prints normally.
        let session = match &args.path {
            Some(path) => EditorSession::open(path.clone(), config.chunk_size(), 1)
                .with_context(|| format!("failed to open {}", path.display()))?,
            None => EditorSession::empty(config.chunk_size(), 1),
        };

        let capabilities = TerminalCapabilities::detect();
        self.backend = CrosstermBackend::new(capabilities);
        let title = args
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("[No Name]");
        self.backend.set_title(&format!("mdedit - {title}"))?;
        let terminal_guard = self.backend.enter_guard()?;

        let mut session = session;
        let (_, rows) = crossterm::terminal::size()?;
        session.resize(config.apply_context(rows));

        let repeat = if capabilities.keyboard_enhancement {
            RepeatMode::Synthesized(RepeatConfig {
                delay: config.repeat_delay(),
                interval: config.repeat_interval(),
            })
        } else {
            RepeatMode::Terminal
        };

        info!(
            target: "runtime.startup",
            path = args.path.as_ref().map(|p| p.display().to_string()).as_deref(),
            config_override = args.config.is_some(),
            chunk_size = config.chunk_size(),
            visible_height = config.effective_height,
            repeat = ?repeat,
            "bootstrap_complete"
        );

        Ok(RuntimeContext {
            session,
            config,
            repeat,
            terminal_guard,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // A global subscriber is already installed; dropping the guard stops the writer.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ShutdownReason {
    Quit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum LoopControl {
    Continue { redraw: bool },
    Break { reason: ShutdownReason },
}

struct EditorRuntime<'a> {
    session: EditorSession,
    config: Config,
    width: u16,
    height: u16,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<AsyncInputShutdown>,
    _terminal_guard: TerminalGuard<'a>,
}

impl<'a> EditorRuntime<'a> {
    fn new(
        context: RuntimeContext<'a>,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        input_shutdown: AsyncInputShutdown,
        source_handles: Vec<tokio::task::JoinHandle<()>>,
    ) -> Result<Self> {
        let RuntimeContext {
            session,
            config,
            terminal_guard,
            ..
        } = context;
        let (width, height) = crossterm::terminal::size()?;
        Ok(Self {
            session,
            config,
            width,
            height,
            rx,
            tx: Some(tx),
            source_handles,
            input_shutdown: Some(input_shutdown),
            _terminal_guard: terminal_guard,
        })
    }

    async fn run(&mut self) -> Result<()> {
        self.render()?;

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = match &event {
                Event::Input(input) => self.handle_input_event(input),
                Event::Resize(w, h) => self.handle_resize(*w, *h),
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };
            match control {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue { redraw: true } => self.render()?,
                LoopControl::Continue { redraw: false } => {}
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    fn handle_input_event(&mut self, input: &InputEvent) -> LoopControl {
        trace!(target: "runtime", ?input, "input_event");
        match self.session.handle_input(input) {
            Ok(result) if result.quit => LoopControl::Break {
                reason: ShutdownReason::Quit,
            },
            Ok(result) => LoopControl::Continue { redraw: result.dirty },
            // Already reported in the status line; keep editing.
            Err(_) => LoopControl::Continue { redraw: true },
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) -> LoopControl {
        self.width = width;
        self.height = height;
        if let Some(visible) = self.config.recompute_after_resize(height) {
            info!(target: "runtime", width, height, visible, "resize");
            self.session.resize(visible);
        }
        LoopControl::Continue { redraw: true }
    }

    fn render(&mut self) -> Result<()> {
        let snapshot = self.session.snapshot();
        Frame::build(&snapshot, self.width, self.height).flush(&mut stdout())
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        info!(target: "runtime.shutdown", %reason, "shutdown_begin");
        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        drop(self.tx.take());

        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(())) => {
                    trace!(target: "runtime.shutdown", %reason, "event_source_task_stopped")
                }
                Ok(Err(err)) if err.is_cancelled() => {
                    trace!(target: "runtime.shutdown", %reason, "event_source_task_cancelled")
                }
                Ok(Err(err)) => {
                    error!(target: "runtime.shutdown", %reason, ?err, "event_source_task_error")
                }
                Err(_) => warn!(target: "runtime.shutdown", %reason, "event_source_task_timeout"),
            }
        }
        if self.session.is_dirty() {
            warn!(target: "runtime.shutdown", "quit_with_unsaved_changes");
        }
        info!(target: "runtime.shutdown", %reason, "shutdown_complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let context = startup.run(&args)?;

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let input = TerminalInputSource::new(context.repeat);
    let input_shutdown = input.shutdown_handle();
    let mut registry = EventSourceRegistry::new();
    registry.register(input);
    let source_handles = registry.spawn_all(&tx);

    let mut runtime = EditorRuntime::new(context, tx, rx, input_shutdown, source_handles)?;
    runtime.run().await
}
