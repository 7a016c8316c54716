//! ted entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::{InputState, KeyboardMode, handle_key};
use core_config::{Config, ConfigContext, EffectiveMargins, load_from};
use core_events::{
    CHANNEL_SEND_FAILURES, EVENT_CHANNEL_CAP, Event, InputEvent, KEYPRESS_TOTAL, KEYRELEASE_TOTAL,
};
use core_model::TextEditorModel;
use core_render::{
    Decision, Margins, RenderDelta, RenderEngine, RenderObservers, SharedScheduler,
    attach_render_observers,
};
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalCapabilities, TerminalGuard};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

const WINDOW_TITLE: &str = "ted";
const LOG_FILE_NAME: &str = "ted.log";
const INPUT_JOIN_TIMEOUT: Duration = Duration::from_millis(200);

/// Buffer content when neither `--text` nor `[editor] initial_text` is given.
const DEFAULT_TEXT: &str = "Gle malu vocku poslije kise,\n\
                            puna je kapi pa ih njise.\n\
                            I blijesti suncem obasjana,\n\
                            Cudesna raskos njenih grana.";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ted", version, about = "Minimal terminal text editor")]
struct Args {
    /// Optional configuration file path (overrides discovery of `ted.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Initial buffer content (overrides `[editor] initial_text`).
    #[arg(long = "text")]
    pub text: Option<String>,
}

/// Where the startup text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextSource {
    Cli,
    Config,
    Builtin,
}

impl TextSource {
    fn as_str(&self) -> &'static str {
        match self {
            TextSource::Cli => "cli",
            TextSource::Config => "config",
            TextSource::Builtin => "builtin",
        }
    }
}

fn resolve_initial_text<'a>(cli: Option<&'a str>, config: &'a Config) -> (&'a str, TextSource) {
    if let Some(text) = cli {
        return (text, TextSource::Cli);
    }
    if let Some(text) = config.initial_text() {
        return (text, TextSource::Config);
    }
    (DEFAULT_TEXT, TextSource::Builtin)
}

fn to_margins(m: EffectiveMargins) -> Margins {
    Margins {
        left: m.left,
        top: m.top,
    }
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    model: TextEditorModel,
    config: Config,
    size: (u16, u16),
    terminal_guard: TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::default(),
            log_guard: None,
        }
    }

    fn run(&mut self) -> Result<RuntimeContext<'_>> {
        self.configure_logging()?;
        Self::install_panic_hook();

        info!(target: "runtime", "startup");
        let args = Args::parse();
        let mut config = load_from(args.config.clone())?;
        let (text, source) = resolve_initial_text(args.text.as_deref(), &config);
        let model = TextEditorModel::new(text);

        self.backend = CrosstermBackend::new(TerminalCapabilities::detect());
        self.backend.set_title(WINDOW_TITLE)?;
        let size = self.backend.size()?;
        config.apply_context(ConfigContext::new(size.0, size.1));
        let guard = self.backend.enter_guard()?;

        info!(
            target: "runtime.startup",
            text_source = source.as_str(),
            line_count = model.line_count(),
            config_override = args.config.is_some(),
            width = size.0,
            height = size.1,
            margin_left = config.effective_margins.left,
            margin_top = config.effective_margins.top,
            "bootstrap_complete"
        );

        Ok(RuntimeContext {
            model,
            config,
            size,
            terminal_guard: guard,
        })
    }

    fn configure_logging(&mut self) -> Result<()> {
        self.log_guard = init_file_logging(Path::new("."))?;
        Ok(())
    }

    /// Log the panic, put the terminal back, then let the default hook print.
    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", %info, "panic");
                core_terminal::restore_after_panic();
                default_panic(info);
            }));
        });
    }
}

/// Route `tracing` output to `<dir>/ted.log` (truncated per session). The
/// terminal belongs to the editor, so nothing is logged to stdout. Returns
/// `None` when a global subscriber already exists.
fn init_file_logging(dir: &Path) -> Result<Option<WorkerGuard>> {
    let log_path = dir.join(LOG_FILE_NAME);
    if log_path.exists() {
        std::fs::remove_file(&log_path)?;
    }
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE_NAME));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .is_ok();
    Ok(installed.then_some(guard))
}

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    CtrlC,
    ActionQuit,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::CtrlC => "ctrl_c",
            ShutdownReason::ActionQuit => "action_quit",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

struct EditorRuntime<'a> {
    model: TextEditorModel,
    input: InputState,
    config: Config,
    scheduler: SharedScheduler,
    render_observers: RenderObservers,
    render_engine: RenderEngine,
    size: (u16, u16),
    rx: mpsc::Receiver<Event>,
    input_task: Option<tokio::task::JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
    _terminal_guard: TerminalGuard<'a>,
}

impl<'a> EditorRuntime<'a> {
    fn new(
        context: RuntimeContext<'a>,
        rx: mpsc::Receiver<Event>,
        input_task: tokio::task::JoinHandle<()>,
        input_shutdown: core_input::AsyncInputShutdown,
    ) -> Self {
        let RuntimeContext {
            mut model,
            config,
            size,
            terminal_guard,
        } = context;
        let scheduler = SharedScheduler::default();
        let render_observers = attach_render_observers(&mut model, &scheduler);
        let render_engine = RenderEngine::new(to_margins(config.effective_margins));
        Self {
            model,
            input: InputState::new(),
            config,
            scheduler,
            render_observers,
            render_engine,
            size,
            rx,
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            _terminal_guard: terminal_guard,
        }
    }

    async fn run(&mut self) -> Result<()> {
        self.render(Decision::full());

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = match &event {
                Event::Input(input) => self.handle_input_event(input),
            };

            match control {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue => self.finish_cycle(),
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    fn handle_input_event(&mut self, input: &InputEvent) -> LoopControl {
        match input {
            InputEvent::CtrlC => LoopControl::Break {
                reason: ShutdownReason::CtrlC,
            },
            InputEvent::Key(key) => {
                let before = self.input.mode;
                let result = handle_key(key, &mut self.model, &mut self.input);
                if result.quit {
                    return LoopControl::Break {
                        reason: ShutdownReason::ActionQuit,
                    };
                }
                if result.mode_changed {
                    debug!(
                        target: "runtime",
                        from = ?before,
                        to = ?self.input.mode,
                        selecting = self.input.mode == KeyboardMode::Selecting,
                        "keyboard_mode_changed"
                    );
                }
                if result.selection_changed {
                    self.scheduler.borrow_mut().mark(RenderDelta::Selection);
                }
                LoopControl::Continue
            }
            InputEvent::Resize(w, h) => {
                self.size = (*w, *h);
                if let Some(margins) = self
                    .config
                    .recompute_with_context(ConfigContext::new(*w, *h))
                {
                    self.render_engine.set_margins(to_margins(margins));
                }
                self.scheduler.borrow_mut().mark(RenderDelta::Full);
                LoopControl::Continue
            }
        }
    }

    /// Render whatever the model observers and the key handling marked.
    fn finish_cycle(&mut self) {
        let decision = self.scheduler.borrow_mut().consume();
        if let Some(decision) = decision {
            self.render(decision);
        }
    }

    fn render(&mut self, decision: Decision) {
        let (w, h) = self.size;
        let span = tracing::debug_span!(
            target: "render",
            "render_cycle",
            semantic = ?decision.semantic,
            effective = ?decision.effective,
            width = w,
            height = h
        );
        let _e = span.enter();
        if let Err(e) = self.render_engine.render(&self.model, decision, w, h) {
            error!(target: "render", ?e, "render_error");
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        self.render_observers.detach(&mut self.model);

        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        if let Some(handle) = self.input_task.take() {
            match tokio::time::timeout(INPUT_JOIN_TIMEOUT, handle).await {
                Ok(Ok(())) => trace!(target: "runtime.shutdown", "input_task_joined"),
                Ok(Err(err)) => error!(target: "runtime.shutdown", ?err, "input_task_join_failed"),
                Err(_) => warn!(target: "runtime.shutdown", "input_task_join_timeout"),
            }
        }

        self.log_session_metrics();
        log_shutdown_stage(reason, "complete");
    }

    fn log_session_metrics(&self) {
        let semantic = self.scheduler.borrow().metrics_snapshot();
        let paths = self.render_engine.metrics_snapshot();
        info!(
            target: "runtime.shutdown",
            key_presses = KEYPRESS_TOTAL.load(Ordering::Relaxed),
            key_releases = KEYRELEASE_TOTAL.load(Ordering::Relaxed),
            send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
            semantic_frames = semantic.semantic_frames,
            coalesced_marks = semantic.coalesced,
            selection_frames = semantic.selection,
            full_frames = paths.full_frames,
            cursor_only_frames = paths.cursor_only_frames,
            last_full_render_ns = paths.last_full_render_ns,
            "session_metrics"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    let context = startup.run()?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx);

    let mut runtime = EditorRuntime::new(context, rx, input_task, input_shutdown);
    runtime.run().await
}
