//! The engine façade.
//!
//! [`Engine`] accepts requests from any thread and hands them to a single
//! worker thread, which is the only code that ever touches the backend.
//! Enqueueing takes a short lock and never waits on the backend.
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use smol_str::SmolStr;

use self::worker::SpellerWorker;
use crate::backend::{Backend, BackendRegistry};
use crate::config::EngineConfig;
use crate::consumer::{ConsumerId, ConsumerRegistry};
use crate::error::EngineError;
use crate::request::{NotificationSink, Request, BATCH_TERMINATOR_OFFSET};
use crate::scheduler::RequestScheduler;

mod worker;

const WORKER_THREAD_NAME: &str = "spelldispatch-worker";
const DEFAULT_BACKEND: &str = "permissive";

/// Lifecycle of the worker thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    /// Waiting for requests.
    Idle,
    /// Handling exactly one request.
    Processing,
    /// Interrupted; discarding whatever is still queued.
    Draining,
    /// The loop has exited and the backend is unloaded.
    Stopped,
}

pub(crate) struct Inner {
    pub(crate) scheduler: RequestScheduler,
    pub(crate) interrupted: bool,
    pub(crate) worker: WorkerState,
}

pub(crate) struct Shared {
    pub(crate) inner: Mutex<Inner>,
    pub(crate) wake: Condvar,
    pub(crate) consumers: Mutex<ConsumerRegistry>,
}

pub struct Engine {
    shared: Arc<Shared>,
    config: EngineConfig,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Engine {
    /// Starts the worker thread. The backend is loaded on the worker; if it
    /// fails to load, every word is accepted.
    pub fn new<S: NotificationSink>(
        config: EngineConfig,
        backend: Box<dyn Backend>,
        sink: S,
    ) -> Result<Engine, EngineError> {
        config.validate()?;

        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                scheduler: RequestScheduler::new(),
                interrupted: false,
                worker: WorkerState::Idle,
            }),
            wake: Condvar::new(),
            consumers: Mutex::new(ConsumerRegistry::new()),
        });

        let worker = SpellerWorker::new(shared.clone(), backend, config.cache_capacity, sink);
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || worker.run())
            .map_err(EngineError::Spawn)?;

        log::debug!("engine started");

        Ok(Engine {
            shared,
            config,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Builds the backend named by `config.backend` from `registry`.
    pub fn with_registry<S: NotificationSink>(
        config: EngineConfig,
        registry: &BackendRegistry,
        sink: S,
    ) -> Result<Engine, EngineError> {
        let name = config.backend.as_deref().unwrap_or(DEFAULT_BACKEND);
        let backend = registry.create(name, &config)?;
        Engine::new(config, backend, sink)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn register_consumer(&self) -> ConsumerId {
        self.shared.consumers.lock().register()
    }

    /// Retires `consumer`: its backlog is dropped and any result still in
    /// flight for it is discarded instead of delivered.
    pub fn release_consumer(&self, consumer: ConsumerId) {
        if consumer.is_broadcast() {
            return;
        }

        // Lock order: consumers, then inner.
        let mut consumers = self.shared.consumers.lock();
        if !consumers.release(consumer) {
            return;
        }

        let discarded = self.shared.inner.lock().scheduler.cancel(consumer);
        log::trace!("{}: released, dropped {} requests", consumer, discarded);
    }

    /// Queues a spell check of `word` at `offset`. An empty word with
    /// offset `-1` marks the end of a batch; see [`Engine::complete`].
    pub fn spell(&self, consumer: ConsumerId, word: &str, offset: i64) {
        self.enqueue(
            consumer,
            Request::Spell {
                word: SmolStr::from(word),
                offset,
            },
        );
    }

    /// Queues a batch terminator. `Completed` is sent once everything
    /// queued before it for `consumer` has been handled.
    pub fn complete(&self, consumer: ConsumerId) {
        self.spell(consumer, "", BATCH_TERMINATOR_OFFSET);
    }

    pub fn request_suggestions(&self, consumer: ConsumerId, word: &str, count: usize) {
        self.enqueue(
            consumer,
            Request::Suggest {
                word: SmolStr::from(word),
                count: self.config.clamp_suggestions(count),
            },
        );
    }

    pub fn append(&self, word: &str) {
        self.enqueue(
            ConsumerId::BROADCAST,
            Request::Append {
                word: SmolStr::from(word),
            },
        );
    }

    pub fn remove(&self, word: &str) {
        self.enqueue(
            ConsumerId::BROADCAST,
            Request::Remove {
                word: SmolStr::from(word),
            },
        );
    }

    pub fn ignore(&self, word: &str) {
        self.enqueue(
            ConsumerId::BROADCAST,
            Request::Ignore {
                word: SmolStr::from(word),
            },
        );
    }

    /// Drops every request `consumer` has queued that the worker has not
    /// started on yet. A request already being handled still reports.
    pub fn cancel(&self, consumer: ConsumerId) {
        let discarded = self.shared.inner.lock().scheduler.cancel(consumer);
        log::trace!("{}: cancelled {} requests", consumer, discarded);
    }

    /// Number of requests waiting for the worker.
    pub fn pending(&self) -> usize {
        self.shared.inner.lock().scheduler.len()
    }

    pub fn state(&self) -> WorkerState {
        self.shared.inner.lock().worker
    }

    /// Asks the worker to stop without waiting for it. Queued requests are
    /// discarded, not processed.
    pub fn interrupt(&self) {
        let mut inner = self.shared.inner.lock();
        inner.interrupted = true;
        self.shared.wake.notify_one();
    }

    /// Interrupts the worker and waits for it to unload the backend.
    pub fn shutdown(&self) {
        self.interrupt();

        if let Some(handle) = self.handle.lock().take() {
            // Dropped from inside a notification callback; the loop exits on its own.
            if handle.thread().id() == thread::current().id() {
                return;
            }

            if handle.join().is_err() {
                log::warn!("worker thread panicked");
                self.shared.inner.lock().worker = WorkerState::Stopped;
            }
        }
    }

    fn enqueue(&self, consumer: ConsumerId, request: Request) {
        // Held until the request is queued so a concurrent release either
        // sees it and cancels it, or happens first and rejects it here.
        let consumers = self.shared.consumers.lock();
        if !consumers.is_live(consumer) {
            log::debug!("{} is not registered, dropping {:?}", consumer, request);
            return;
        }

        let mut inner = self.shared.inner.lock();
        if inner.interrupted {
            log::trace!("engine shutting down, dropping {:?}", request);
            return;
        }

        inner.scheduler.enqueue(consumer, request);
        self.shared.wake.notify_one();
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
