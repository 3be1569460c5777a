use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use smol_str::SmolStr;

use super::{Shared, WorkerState};
use crate::backend::{Backend, BackendError, PermissiveBackend};
use crate::cache::MisspellingCache;
use crate::consumer::ConsumerId;
use crate::request::{Actions, Notification, NotificationSink, Request};

/// Runs one backend call, turning errors and panics into `fallback`.
#[inline(always)]
fn guarded<T>(
    op: &'static str,
    word: &str,
    fallback: T,
    f: impl FnOnce() -> Result<T, BackendError>,
) -> T {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(v)) => v,
        Ok(Err(e)) => {
            log::warn!("backend {} failed for {:?}: {}", op, word, e);
            fallback
        }
        Err(_) => {
            log::warn!("backend {} panicked for {:?}", op, word);
            fallback
        }
    }
}

/// The only owner of the backend and the misspelling cache.
pub(crate) struct SpellerWorker<S: NotificationSink> {
    shared: Arc<Shared>,
    backend: Box<dyn Backend>,
    cache: MisspellingCache,
    sink: S,
}

impl<S: NotificationSink> SpellerWorker<S> {
    pub(crate) fn new(
        shared: Arc<Shared>,
        backend: Box<dyn Backend>,
        cache_capacity: usize,
        sink: S,
    ) -> SpellerWorker<S> {
        SpellerWorker {
            shared,
            backend,
            cache: MisspellingCache::new(cache_capacity),
            sink,
        }
    }

    pub(crate) fn run(mut self) {
        self.load();

        while let Some((consumer, request)) = self.next() {
            if !self.is_live(consumer) {
                log::trace!("{} is gone, skipping {:?}", consumer, request);
                continue;
            }

            log::trace!("{}: {:?}", consumer, request);
            self.dispatch(consumer, request);
        }

        let name = self.backend.name().to_string();
        let backend = &mut self.backend;
        guarded("unload", &name, false, || backend.unload());
        self.cache.clear();
        self.shared.inner.lock().worker = WorkerState::Stopped;
        log::debug!("worker stopped, backend `{}` unloaded", name);
    }

    fn load(&mut self) {
        let name = self.backend.name().to_string();
        let backend = &mut self.backend;

        if guarded("load", &name, false, || backend.load()) {
            log::debug!("backend `{}` loaded", name);
        } else {
            log::warn!("backend `{}` unavailable, accepting all words", name);
            self.backend = Box::new(PermissiveBackend);
        }
    }

    /// Blocks until there is work or an interrupt. `None` means stop.
    fn next(&self) -> Option<(ConsumerId, Request)> {
        let mut inner = self.shared.inner.lock();

        loop {
            if inner.interrupted {
                inner.worker = WorkerState::Draining;
                let discarded = inner.scheduler.clear();
                if discarded > 0 {
                    log::debug!("discarded {} pending requests on shutdown", discarded);
                }
                return None;
            }

            if let Some(next) = inner.scheduler.try_dequeue() {
                inner.worker = WorkerState::Processing;
                return Some(next);
            }

            inner.worker = WorkerState::Idle;
            self.shared.wake.wait(&mut inner);
        }
    }

    fn dispatch(&mut self, consumer: ConsumerId, request: Request) {
        if request.is_batch_terminator() {
            self.notify(Notification::Completed { consumer });
            return;
        }

        if request.word().is_empty() {
            log::debug!("{}: dropping request with empty word", consumer);
            return;
        }

        match request {
            Request::Spell { word, offset } => self.spell(consumer, word, offset),
            Request::Suggest { word, count } => self.suggest(consumer, word, count),
            Request::Append { word } => {
                self.cache.remove(&word);
                let backend = &mut self.backend;
                guarded("append", &word, (), || backend.append(&word));
                self.notify(Notification::Appended { word });
            }
            Request::Remove { word } => {
                self.cache.insert(&word);
                let backend = &mut self.backend;
                guarded("remove", &word, (), || backend.remove(&word));
                self.notify(Notification::Removed { word });
            }
            Request::Ignore { word } => {
                self.cache.remove(&word);
                let backend = &mut self.backend;
                guarded("ignore", &word, (), || backend.ignore(&word));
                self.notify(Notification::Ignored { word });
            }
        }
    }

    fn spell(&mut self, consumer: ConsumerId, word: SmolStr, offset: i64) {
        let is_misspelled = if self.cache.contains(&word) {
            true
        } else {
            let backend = &self.backend;
            let is_valid = guarded("validate", &word, true, || backend.validate(&word));
            if !is_valid {
                self.cache.insert(&word);
            }
            !is_valid
        };

        self.notify(Notification::Misspelled {
            consumer,
            word,
            offset,
            is_misspelled,
        });
    }

    fn suggest(&mut self, consumer: ConsumerId, word: SmolStr, count: usize) {
        let backend = &self.backend;
        let is_valid = guarded("validate", &word, true, || backend.validate(&word));

        let (suggestions, actions) = if is_valid {
            let is_user_word = guarded("contains", &word, false, || backend.contains(&word));
            let actions = if is_user_word {
                Actions::REMOVE_WORD
            } else {
                Actions::empty()
            };
            (vec![], actions)
        } else {
            let suggestions =
                guarded("suggestions", &word, vec![], || backend.suggestions(&word, count));
            (suggestions, Actions::APPEND_WORD | Actions::IGNORE_WORD)
        };

        self.notify(Notification::SuggestionsFound {
            consumer,
            word,
            suggestions,
            actions,
        });
    }

    fn is_live(&self, consumer: ConsumerId) -> bool {
        self.shared.consumers.lock().is_live(consumer)
    }

    /// Hands `notification` to the sink. A panicking sink loses that one
    /// notification; the worker keeps going.
    fn notify(&self, notification: Notification) {
        if let Some(consumer) = notification.consumer() {
            if !self.is_live(consumer) {
                log::trace!("{} is gone, dropping {:?}", consumer, notification);
                return;
            }
        }

        let sink = &self.sink;
        if panic::catch_unwind(AssertUnwindSafe(|| sink.deliver(notification))).is_err() {
            log::warn!("notification sink panicked");
        }
    }
}
