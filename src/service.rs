use crate::capture::{PointerCapture, Stroke, Termination};
use crate::config::{CaptureConfig, ParserConfig};
use crate::direction::Direction8;
use crate::library::{ActionId, GestureLibrarySnapshot, SharedLibrary};
use crate::parser;
use anyhow::anyhow;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Events the platform input hook feeds into the service. Producing
/// these is the platform layer's business; the service only consumes.
#[derive(Debug, Clone, Copy)]
pub enum HookEvent {
    TriggerDown { x: f64, y: f64, t_ms: u64 },
    Sample { x: f64, y: f64, t_ms: u64 },
    TriggerUp { t_ms: u64 },
}

/// Seam to the platform input layer. Installing hands the backend a
/// sender for its events; the real implementation lives outside this
/// crate.
pub trait HookBackend: Send {
    fn install(&mut self, sender: Sender<HookEvent>) -> anyhow::Result<()>;
    fn uninstall(&mut self) -> anyhow::Result<()>;
    fn is_installed(&self) -> bool;
}

/// Outcome of one finished stroke. `skipped` marks force-finished
/// strokes whose parse was intentionally not attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureOutcome {
    pub stroke_id: u64,
    pub directions: Vec<Direction8>,
    pub action: Option<ActionId>,
    pub skipped: bool,
}

/// Receives outcomes; the action executor collaborator implements this.
pub trait ActionSink: Send + Sync {
    fn dispatch(&self, outcome: GestureOutcome);
}

/// Sink that only logs, for standalone use.
#[derive(Debug, Default)]
pub struct LogActionSink;

impl ActionSink for LogActionSink {
    fn dispatch(&self, outcome: GestureOutcome) {
        match &outcome.action {
            Some(action) => tracing::info!(stroke = outcome.stroke_id, %action, "gesture matched"),
            None => tracing::info!(
                stroke = outcome.stroke_id,
                skipped = outcome.skipped,
                "no gesture matched"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GestureServiceConfig {
    pub enabled: bool,
    pub poll_interval_ms: u64,
    pub parser: ParserConfig,
    pub capture: CaptureConfig,
}

impl Default for GestureServiceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            poll_interval_ms: 5,
            parser: ParserConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: Sender<()>,
    join: JoinHandle<()>,
}

/// Owns the capture worker and the shared library snapshot. The worker
/// thread runs the capture state machine on a short poll interval and
/// never blocks on parsing: finished strokes move into a detached parse
/// task that reports through the [`ActionSink`].
pub struct GestureService {
    config: GestureServiceConfig,
    library: SharedLibrary,
    backend: Box<dyn HookBackend>,
    sink: Arc<dyn ActionSink>,
    worker: Option<WorkerHandle>,
}

impl Default for GestureService {
    fn default() -> Self {
        Self::new_with_backend_and_sink(
            Box::new(NullHookBackend),
            Arc::new(LogActionSink),
        )
    }
}

impl GestureService {
    pub fn new_with_backend_and_sink(
        backend: Box<dyn HookBackend>,
        sink: Arc<dyn ActionSink>,
    ) -> Self {
        Self {
            config: GestureServiceConfig::default(),
            library: Arc::new(Mutex::new(Arc::new(GestureLibrarySnapshot::default()))),
            backend,
            sink,
            worker: None,
        }
    }

    pub fn start(&mut self) {
        self.config.enabled = true;
        self.start_running();
    }

    pub fn stop(&mut self) {
        self.config.enabled = false;
        self.stop_running();
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn update_config(&mut self, config: GestureServiceConfig) {
        if self.config == config {
            return;
        }
        let enabled = config.enabled;
        let should_restart = self.worker.is_some();
        self.config = config;

        if enabled {
            if should_restart {
                self.stop_running();
            }
            self.start_running();
        } else {
            self.stop_running();
        }
    }

    /// Swap in a new library snapshot. The swap is atomic from the
    /// parse tasks' perspective: they clone the current `Arc` once at
    /// start and never observe a half-updated library. No restart
    /// needed.
    pub fn update_library(&mut self, snapshot: GestureLibrarySnapshot) {
        let snapshot = Arc::new(snapshot);
        match self.library.lock() {
            Ok(mut guard) => {
                tracing::info!(entries = snapshot.len(), "gesture library updated");
                *guard = snapshot;
            }
            Err(err) => tracing::error!(?err, "failed to lock gesture library for update"),
        }
    }

    /// The current library snapshot.
    pub fn library(&self) -> Arc<GestureLibrarySnapshot> {
        match self.library.lock() {
            Ok(guard) => Arc::clone(&guard),
            Err(err) => {
                tracing::error!(?err, "failed to lock gesture library");
                Arc::new(GestureLibrarySnapshot::default())
            }
        }
    }

    fn start_running(&mut self) {
        if self.worker.is_some() || !self.config.enabled {
            return;
        }

        let (event_tx, event_rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel();

        if let Err(err) = self.backend.install(event_tx) {
            tracing::error!(?err, "failed to install pointer hook");
            return;
        }

        let config = self.config.clone();
        let library = Arc::clone(&self.library);
        let sink = Arc::clone(&self.sink);
        let join = thread::spawn(move || worker_loop(config, library, event_rx, stop_rx, sink));
        self.worker = Some(WorkerHandle { stop_tx, join });
    }

    fn stop_running(&mut self) {
        if self.worker.is_none() && !self.backend.is_installed() {
            return;
        }

        if let Err(err) = self.backend.uninstall() {
            tracing::error!(?err, "failed to uninstall pointer hook");
        }

        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            let _ = worker.join.join();
        }
    }
}

static SERVICE: OnceCell<Mutex<GestureService>> = OnceCell::new();

/// Run a closure against the process-wide service instance.
pub fn with_service<F>(f: F)
where
    F: FnOnce(&mut GestureService),
{
    let service = SERVICE.get_or_init(|| Mutex::new(GestureService::default()));
    match service.lock() {
        Ok(mut guard) => f(&mut guard),
        Err(err) => tracing::error!(?err, "failed to lock gesture service"),
    }
}

fn worker_loop(
    config: GestureServiceConfig,
    library: SharedLibrary,
    event_rx: Receiver<HookEvent>,
    stop_rx: Receiver<()>,
    sink: Arc<dyn ActionSink>,
) {
    let mut capture = PointerCapture::new(config.capture.clone());
    let poll_interval = Duration::from_millis(config.poll_interval_ms.max(1));

    loop {
        if stop_rx.try_recv().is_ok() {
            break;
        }
        match event_rx.recv_timeout(poll_interval) {
            Ok(event) => match event {
                HookEvent::TriggerDown { x, y, t_ms } => capture.trigger_down(x, y, t_ms),
                HookEvent::Sample { x, y, t_ms } => {
                    if let Some(stroke) = capture.sample(x, y, t_ms) {
                        // Safety limit tripped mid-stroke.
                        spawn_parse(stroke, &config.parser, &library, &sink);
                    }
                }
                HookEvent::TriggerUp { t_ms } => {
                    if let Some(stroke) = capture.trigger_up(t_ms) {
                        spawn_parse(stroke, &config.parser, &library, &sink);
                    }
                }
            },
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Hand a finished stroke to a detached parse task. Force-finished
/// strokes are reported immediately without a parse attempt; the capture
/// loop itself never waits on the pipeline either way.
fn spawn_parse(
    stroke: Stroke,
    parser_config: &ParserConfig,
    library: &SharedLibrary,
    sink: &Arc<dyn ActionSink>,
) {
    if stroke.termination == Termination::Forced {
        tracing::debug!(id = stroke.id, "skipping parse for force-finished stroke");
        sink.dispatch(GestureOutcome {
            stroke_id: stroke.id,
            directions: Vec::new(),
            action: None,
            skipped: true,
        });
        return;
    }

    let snapshot = match library.lock() {
        Ok(guard) => Arc::clone(&guard),
        Err(err) => {
            tracing::error!(?err, "failed to lock gesture library for parse");
            return;
        }
    };
    let parser_config = parser_config.clone();
    let sink = Arc::clone(sink);
    thread::spawn(move || {
        let trail = stroke.trail();
        let parsed = parser::parse_trail(&trail, &parser_config, &snapshot);
        sink.dispatch(GestureOutcome {
            stroke_id: stroke.id,
            directions: parsed.directions,
            action: parsed.action,
            skipped: false,
        });
    });
}

/// Backend for platforms without an input hook; installing fails and the
/// service simply stays stopped.
#[derive(Debug, Default)]
pub struct NullHookBackend;

impl HookBackend for NullHookBackend {
    fn install(&mut self, _sender: Sender<HookEvent>) -> anyhow::Result<()> {
        Err(anyhow!("no pointer hook available on this platform"))
    }

    fn uninstall(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn is_installed(&self) -> bool {
        false
    }
}

/// Test backend: counts installs and lets tests feed events through the
/// captured sender.
#[derive(Clone)]
pub struct MockHookBackend {
    state: Arc<MockHookState>,
}

#[derive(Default)]
struct MockHookState {
    install_count: AtomicUsize,
    uninstall_count: AtomicUsize,
    sender: Mutex<Option<Sender<HookEvent>>>,
}

impl MockHookBackend {
    pub fn new() -> (Self, MockHookHandle) {
        let state = Arc::new(MockHookState::default());
        (
            Self {
                state: Arc::clone(&state),
            },
            MockHookHandle { state },
        )
    }
}

impl HookBackend for MockHookBackend {
    fn install(&mut self, sender: Sender<HookEvent>) -> anyhow::Result<()> {
        let mut guard = self.state.sender.lock().map_err(|_| anyhow!("lock"))?;
        if guard.is_none() {
            self.state.install_count.fetch_add(1, Ordering::SeqCst);
            *guard = Some(sender);
        }
        Ok(())
    }

    fn uninstall(&mut self) -> anyhow::Result<()> {
        let mut guard = self.state.sender.lock().map_err(|_| anyhow!("lock"))?;
        if guard.is_some() {
            self.state.uninstall_count.fetch_add(1, Ordering::SeqCst);
        }
        *guard = None;
        Ok(())
    }

    fn is_installed(&self) -> bool {
        match self.state.sender.lock() {
            Ok(guard) => guard.is_some(),
            Err(_) => false,
        }
    }
}

pub struct MockHookHandle {
    state: Arc<MockHookState>,
}

impl MockHookHandle {
    pub fn install_count(&self) -> usize {
        self.state.install_count.load(Ordering::SeqCst)
    }

    pub fn uninstall_count(&self) -> usize {
        self.state.uninstall_count.load(Ordering::SeqCst)
    }

    pub fn emit(&self, event: HookEvent) -> bool {
        match self.state.sender.lock() {
            Ok(guard) => guard
                .as_ref()
                .map(|sender| sender.send(event).is_ok())
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}
