//! Process-wide engine.
//!
//! Applications that want one engine for everything install it here at
//! startup and call [`shutdown`] before exiting. The engine is never torn
//! down implicitly at process exit.
use std::sync::Arc;

use parking_lot::{const_mutex, Mutex};

use crate::engine::Engine;
use crate::error::EngineError;

static ENGINE: Mutex<Option<Arc<Engine>>> = const_mutex(None);

/// Installs `engine` as the process-wide engine.
pub fn init(engine: Engine) -> Result<Arc<Engine>, EngineError> {
    let mut slot = ENGINE.lock();
    if slot.is_some() {
        return Err(EngineError::AlreadyInitialized);
    }

    let engine = Arc::new(engine);
    *slot = Some(engine.clone());
    Ok(engine)
}

/// Returns the installed engine, creating it with `f` on first use.
pub fn get_or_init<F>(f: F) -> Result<Arc<Engine>, EngineError>
where
    F: FnOnce() -> Result<Engine, EngineError>,
{
    let mut slot = ENGINE.lock();
    if let Some(engine) = slot.as_ref() {
        return Ok(engine.clone());
    }

    let engine = Arc::new(f()?);
    *slot = Some(engine.clone());
    Ok(engine)
}

pub fn get() -> Option<Arc<Engine>> {
    ENGINE.lock().clone()
}

/// Removes the process-wide engine and stops its worker. Returns false if
/// none was installed.
///
/// Handles obtained from [`get`] keep working as enqueue targets, but
/// nothing sent to them is processed anymore.
pub fn shutdown() -> bool {
    let engine = ENGINE.lock().take();

    match engine {
        Some(engine) => {
            engine.shutdown();
            log::debug!("process-wide engine shut down");
            true
        }
        None => false,
    }
}
