/*! Asynchronous spell-checking dispatch.

A single background worker owns the dictionary backend and serves any
number of consumers (open documents, editors, text fields) without ever
blocking their threads. Requests are queued per consumer and taken in
round-robin order, so one consumer rescanning a large document cannot
starve another. Words the backend has rejected are remembered in a
bounded cache to avoid asking again.

# Usage examples

```no_run
use std::sync::mpsc;

use spelldispatch::backend::WordListBackend;
use spelldispatch::{Engine, EngineConfig, Notification};

let (tx, rx) = mpsc::channel::<Notification>();
let backend = WordListBackend::from_words(vec!["hello", "world"]);
let engine = Engine::new(EngineConfig::default(), Box::new(backend), tx).unwrap();

let editor = engine.register_consumer();
engine.spell(editor, "helo", 0);
engine.spell(editor, "world", 5);
engine.complete(editor);

for notification in rx.iter() {
    if let Notification::Completed { .. } = notification {
        break;
    }
    println!("{:?}", notification);
}
```

A command-line frontend lives in the `spelldispatch-bin` crate in the
same workspace.

*/

pub mod backend;
pub mod cache;
pub mod config;
pub mod consumer;
pub mod context;
pub mod engine;
pub mod error;
pub mod request;
pub mod scheduler;

pub use crate::config::EngineConfig;
pub use crate::consumer::ConsumerId;
pub use crate::engine::{Engine, WorkerState};
pub use crate::error::EngineError;
pub use crate::request::{Actions, Callback, Notification, NotificationSink, Request};
