//! Dictionary backends.
//!
//! The engine only talks to a dictionary through [`Backend`]. A backend is
//! owned by the worker thread for its whole life, so implementations need
//! to be `Send` but never have to be thread-safe.
use hashbrown::HashMap;
use smol_str::SmolStr;

use crate::config::EngineConfig;
use crate::error::EngineError;

pub mod wordlist;

pub use self::wordlist::WordListBackend;

/// Errors a backend may report. The engine never propagates these; a
/// failed call is answered as permissively as possible.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BackendError {
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// The backend has nothing to serve from
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Provider-internal failure
    #[error("Backend call failed: {0}")]
    Failed(String),
}

pub trait Backend: Send {
    fn name(&self) -> &str;

    /// Prepares the dictionary. `Ok(false)` means there is nothing usable
    /// and the engine should fall back to [`PermissiveBackend`].
    fn load(&mut self) -> Result<bool, BackendError>;
    fn unload(&mut self) -> Result<bool, BackendError>;

    /// Returns true if `word` is correctly spelled.
    fn validate(&self, word: &str) -> Result<bool, BackendError>;
    fn suggestions(&self, word: &str, count: usize) -> Result<Vec<SmolStr>, BackendError>;

    /// Adds `word` to the user dictionary.
    fn append(&mut self, word: &str) -> Result<(), BackendError>;
    /// Removes `word` from the user dictionary.
    fn remove(&mut self, word: &str) -> Result<(), BackendError>;
    /// Accepts `word` for the rest of the session.
    fn ignore(&mut self, word: &str) -> Result<(), BackendError>;

    /// Returns true if `word` is in the user dictionary.
    fn contains(&self, word: &str) -> Result<bool, BackendError>;
}

/// Accepts every word and remembers nothing. Used when no backend is
/// configured or the configured one cannot load.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissiveBackend;

impl Backend for PermissiveBackend {
    fn name(&self) -> &str {
        "permissive"
    }

    fn load(&mut self) -> Result<bool, BackendError> {
        Ok(true)
    }

    fn unload(&mut self) -> Result<bool, BackendError> {
        Ok(true)
    }

    fn validate(&self, _word: &str) -> Result<bool, BackendError> {
        Ok(true)
    }

    fn suggestions(&self, _word: &str, _count: usize) -> Result<Vec<SmolStr>, BackendError> {
        Ok(vec![])
    }

    fn append(&mut self, _word: &str) -> Result<(), BackendError> {
        Ok(())
    }

    fn remove(&mut self, _word: &str) -> Result<(), BackendError> {
        Ok(())
    }

    fn ignore(&mut self, _word: &str) -> Result<(), BackendError> {
        Ok(())
    }

    fn contains(&self, _word: &str) -> Result<bool, BackendError> {
        Ok(false)
    }
}

pub type BackendFactory = fn(&EngineConfig) -> Result<Box<dyn Backend>, BackendError>;

fn permissive_backend(_config: &EngineConfig) -> Result<Box<dyn Backend>, BackendError> {
    Ok(Box::new(PermissiveBackend))
}

fn wordlist_backend(config: &EngineConfig) -> Result<Box<dyn Backend>, BackendError> {
    Ok(Box::new(WordListBackend::from_config(config)))
}

/// Backend constructors by name.
pub struct BackendRegistry {
    factories: HashMap<SmolStr, BackendFactory>,
}

impl BackendRegistry {
    pub fn new() -> BackendRegistry {
        BackendRegistry {
            factories: HashMap::new(),
        }
    }

    /// A registry holding the backends shipped with this crate.
    pub fn with_defaults() -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        registry.register("permissive", permissive_backend);
        registry.register("wordlist", wordlist_backend);
        registry
    }

    pub fn register(&mut self, name: &str, factory: BackendFactory) {
        self.factories.insert(SmolStr::from(name), factory);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|x| x.as_str())
    }

    pub fn create(&self, name: &str, config: &EngineConfig) -> Result<Box<dyn Backend>, EngineError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| EngineError::UnknownBackend(name.to_string()))?;

        Ok(factory(config)?)
    }
}

impl Default for BackendRegistry {
    fn default() -> BackendRegistry {
        BackendRegistry::with_defaults()
    }
}
