//! Requests accepted by the engine and the notifications it sends back.
use std::fmt;
use std::ops::BitOr;
use std::sync::mpsc;

use serde::{Serialize, Serializer};
use smol_str::SmolStr;

use crate::consumer::ConsumerId;

/// Offset paired with an empty word to mark the end of a scan batch.
pub const BATCH_TERMINATOR_OFFSET: i64 = -1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    Spell { word: SmolStr, offset: i64 },
    Suggest { word: SmolStr, count: usize },
    Append { word: SmolStr },
    Remove { word: SmolStr },
    Ignore { word: SmolStr },
}

impl Request {
    pub fn word(&self) -> &str {
        match self {
            Request::Spell { word, .. }
            | Request::Suggest { word, .. }
            | Request::Append { word }
            | Request::Remove { word }
            | Request::Ignore { word } => word,
        }
    }

    /// True for the `("", -1)` spell request that closes a rescan batch.
    pub fn is_batch_terminator(&self) -> bool {
        match self {
            Request::Spell { word, offset } => {
                word.is_empty() && *offset == BATCH_TERMINATOR_OFFSET
            }
            _ => false,
        }
    }
}

/// What the user may do with a word shown in a suggestion menu.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Actions(u8);

impl Actions {
    pub const APPEND_WORD: Actions = Actions(1);
    pub const REMOVE_WORD: Actions = Actions(1 << 1);
    pub const IGNORE_WORD: Actions = Actions(1 << 2);

    pub const fn empty() -> Actions {
        Actions(0)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, other: Actions) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Actions) {
        self.0 |= other.0;
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        ACTION_NAMES
            .iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }
}

static ACTION_NAMES: [(Actions, &str); 3] = [
    (Actions::APPEND_WORD, "append_word"),
    (Actions::REMOVE_WORD, "remove_word"),
    (Actions::IGNORE_WORD, "ignore_word"),
];

impl BitOr for Actions {
    type Output = Actions;

    fn bitor(self, rhs: Actions) -> Actions {
        Actions(self.0 | rhs.0)
    }
}

impl fmt::Debug for Actions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl Serialize for Actions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Result of a processed request.
///
/// Everything except the dictionary mutations is addressed to the
/// consumer that made the request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    Misspelled {
        consumer: ConsumerId,
        word: SmolStr,
        offset: i64,
        is_misspelled: bool,
    },
    Completed {
        consumer: ConsumerId,
    },
    SuggestionsFound {
        consumer: ConsumerId,
        word: SmolStr,
        suggestions: Vec<SmolStr>,
        actions: Actions,
    },
    Appended {
        word: SmolStr,
    },
    Removed {
        word: SmolStr,
    },
    Ignored {
        word: SmolStr,
    },
}

impl Notification {
    /// The addressee, or `None` for broadcasts.
    pub fn consumer(&self) -> Option<ConsumerId> {
        match self {
            Notification::Misspelled { consumer, .. }
            | Notification::Completed { consumer }
            | Notification::SuggestionsFound { consumer, .. } => Some(*consumer),
            Notification::Appended { .. }
            | Notification::Removed { .. }
            | Notification::Ignored { .. } => None,
        }
    }
}

/// Receives notifications on the worker thread.
///
/// Implementations must not block for long: the worker does nothing else
/// while a notification is being delivered.
pub trait NotificationSink: Send + 'static {
    fn deliver(&self, notification: Notification);
}

impl NotificationSink for mpsc::Sender<Notification> {
    fn deliver(&self, notification: Notification) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.send(notification);
    }
}

/// Adapts a closure into a [`NotificationSink`].
pub struct Callback<F>(pub F);

impl<F> NotificationSink for Callback<F>
where
    F: Fn(Notification) + Send + 'static,
{
    fn deliver(&self, notification: Notification) {
        (self.0)(notification)
    }
}
