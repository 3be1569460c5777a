//! In-process dictionary backed by a plain word list.
//!
//! The list is read at [`Backend::load`], one word per line, `#` starting a
//! comment line. User additions and ignores live only as long as the
//! backend does.
use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use smol_str::SmolStr;

use super::{Backend, BackendError};
use crate::config::EngineConfig;

/// Suggestions further than this from the input are not offered.
const MAX_SUGGESTION_DISTANCE: usize = 2;

#[derive(Debug, Default)]
pub struct WordListBackend {
    path: Option<PathBuf>,
    words: HashSet<SmolStr>,
    user: HashSet<SmolStr>,
    ignored: HashSet<SmolStr>,
}

impl WordListBackend {
    pub fn from_config(config: &EngineConfig) -> WordListBackend {
        WordListBackend {
            path: config.dictionary.clone(),
            ..Default::default()
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> WordListBackend {
        WordListBackend {
            path: Some(path.as_ref().to_path_buf()),
            ..Default::default()
        }
    }

    pub fn from_words<I, S>(words: I) -> WordListBackend
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        WordListBackend {
            words: words.into_iter().map(|x| SmolStr::from(x.as_ref())).collect(),
            ..Default::default()
        }
    }

    fn parse(input: &str) -> impl Iterator<Item = SmolStr> + '_ {
        input
            .lines()
            .map(str::trim)
            .filter(|x| !x.is_empty() && !x.starts_with('#'))
            .map(SmolStr::from)
    }

    fn is_known(&self, word: &str) -> bool {
        self.words.contains(word) || self.user.contains(word) || self.ignored.contains(word)
    }
}

impl Backend for WordListBackend {
    fn name(&self) -> &str {
        "wordlist"
    }

    fn load(&mut self) -> Result<bool, BackendError> {
        if let Some(path) = self.path.as_ref() {
            let input = std::fs::read_to_string(path)?;
            self.words.extend(WordListBackend::parse(&input));
            log::debug!("loaded {} words from {}", self.words.len(), path.display());
        }

        Ok(!self.words.is_empty())
    }

    fn unload(&mut self) -> Result<bool, BackendError> {
        self.words.clear();
        self.user.clear();
        self.ignored.clear();
        Ok(true)
    }

    fn validate(&self, word: &str) -> Result<bool, BackendError> {
        // Nothing to spell in numbers and punctuation
        if !word.chars().any(char::is_alphabetic) {
            return Ok(true);
        }

        if self.is_known(word) {
            return Ok(true);
        }

        let lower = word.to_lowercase();
        Ok(lower != word && self.is_known(&lower))
    }

    fn suggestions(&self, word: &str, count: usize) -> Result<Vec<SmolStr>, BackendError> {
        let mut ranked = self
            .words
            .iter()
            .chain(self.user.iter())
            .filter_map(|candidate| {
                let distance = strsim::damerau_levenshtein(word, candidate);
                if distance <= MAX_SUGGESTION_DISTANCE && candidate != word {
                    Some((distance, candidate.clone()))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        ranked.sort();
        ranked.dedup();
        ranked.truncate(count);
        Ok(ranked.into_iter().map(|(_, x)| x).collect())
    }

    fn append(&mut self, word: &str) -> Result<(), BackendError> {
        self.user.insert(SmolStr::from(word));
        Ok(())
    }

    fn remove(&mut self, word: &str) -> Result<(), BackendError> {
        self.user.remove(word);
        self.ignored.remove(word);
        self.words.remove(word);
        Ok(())
    }

    fn ignore(&mut self, word: &str) -> Result<(), BackendError> {
        self.ignored.insert(SmolStr::from(word));
        Ok(())
    }

    fn contains(&self, word: &str) -> Result<bool, BackendError> {
        Ok(self.user.contains(word))
    }
}
