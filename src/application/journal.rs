//! Session journal: the append-only, process-wide history of turns

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use crate::domain::journal::{Turn, TurnId};
use crate::domain::mood::{Classification, MoodLabel};

use super::ports::{JournalError, JournalStore};

/// Append-only journal of turns.
///
/// Holds every turn of the process lifetime in insertion order and, when a
/// store is attached, mirrors each append to it. Appends are serialized by
/// an internal mutex; readers get a cloned snapshot.
pub struct SessionJournal {
    state: Mutex<JournalState>,
    store: Option<Box<dyn JournalStore>>,
}

struct JournalState {
    turns: Vec<Turn>,
    next_id: TurnId,
}

impl SessionJournal {
    /// Journal kept in memory only
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(JournalState {
                turns: Vec::new(),
                next_id: TurnId::new(1),
            }),
            store: None,
        }
    }

    /// Open a journal backed by `store`, seeded with its existing turns
    pub fn open(store: Box<dyn JournalStore>) -> Result<Self, JournalError> {
        let turns = store.load()?;
        let next_id = turns
            .iter()
            .map(|t| t.id().next())
            .max()
            .unwrap_or(TurnId::new(1));

        tracing::debug!(
            path = %store.location().display(),
            turns = turns.len(),
            "opened journal"
        );

        Ok(Self {
            state: Mutex::new(JournalState { turns, next_id }),
            store: Some(store),
        })
    }

    /// Id the next appended turn will receive
    pub fn next_id(&self) -> TurnId {
        self.lock().next_id
    }

    /// Record a classified check-in and return the stored turn.
    ///
    /// The id is allocated under the journal lock, so ids always follow
    /// insertion order. Persistence is best effort: a store failure is
    /// logged and the turn is still kept in memory.
    pub fn append(
        &self,
        timestamp: DateTime<Utc>,
        input_text: &str,
        classification: Classification,
    ) -> Turn {
        let mut state = self.lock();
        let turn = Turn::new(state.next_id, timestamp, input_text, classification);
        state.next_id = turn.id().next();

        // One short blocking write; holding the lock keeps file order equal to id order
        if let Some(store) = &self.store {
            if let Err(e) = store.append(&turn) {
                tracing::warn!(
                    turn = %turn.id(),
                    path = %store.location().display(),
                    error = %e,
                    "journal persistence failed; keeping turn in memory only"
                );
            }
        }

        state.turns.push(turn.clone());
        turn
    }

    /// The last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> Vec<Turn> {
        let state = self.lock();
        let skip = state.turns.len().saturating_sub(n);
        state.turns[skip..].to_vec()
    }

    /// Every turn, oldest first
    pub fn all(&self) -> Vec<Turn> {
        self.lock().turns.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().turns.is_empty()
    }

    /// Number of turns per mood
    pub fn mood_counts(&self) -> BTreeMap<MoodLabel, usize> {
        count_moods(&self.lock().turns)
    }

    /// Backing file, if persisted
    pub fn location(&self) -> Option<&Path> {
        self.store.as_ref().map(|s| s.location())
    }

    fn lock(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SessionJournal {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Count turns per mood
pub fn count_moods(turns: &[Turn]) -> BTreeMap<MoodLabel, usize> {
    let mut counts = BTreeMap::new();
    for turn in turns {
        *counts.entry(turn.mood_label()).or_insert(0) += 1;
    }
    counts
}
