#![deny(warnings)]

//! Persistence layer: the saved-idea list and its JSON snapshot.
//!
//! The store is an in-memory list, newest first. Snapshots let the CLI carry
//! it between runs; writes are plain file replacements with no durability
//! guarantees.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Title given to ideas saved without one.
pub const UNTITLED: &str = "Untitled Strategy";

const PREVIEW_CHARS: usize = 160;

/// Returns the default snapshot path used for local saves.
pub fn default_store_path() -> &'static str {
    "./saves/ideas.json"
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("idea content must not be empty")]
    EmptyContent,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// A generated analysis the user chose to keep.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedIdea {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IdeaStore {
    ideas: Vec<SavedIdea>,
    next_id: u64,
}

impl IdeaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save an idea stamped with today's local date.
    pub fn create(&mut self, title: &str, content: &str) -> Result<&SavedIdea, StoreError> {
        self.create_on(title, content, Local::now().date_naive())
    }

    /// Save an idea with an explicit date. Blank titles become [`UNTITLED`].
    pub fn create_on(
        &mut self,
        title: &str,
        content: &str,
        date: NaiveDate,
    ) -> Result<&SavedIdea, StoreError> {
        if content.trim().is_empty() {
            return Err(StoreError::EmptyContent);
        }
        let title = match title.trim() {
            "" => UNTITLED.to_string(),
            t => t.to_string(),
        };
        self.next_id += 1;
        let idea = SavedIdea {
            id: self.next_id,
            title,
            content: content.to_string(),
            date,
        };
        info!(id = idea.id, title = %idea.title, "idea saved");
        self.ideas.insert(0, idea);
        Ok(&self.ideas[0])
    }

    /// Remove an idea. Returns false when no idea had that id.
    pub fn delete(&mut self, id: u64) -> bool {
        let before = self.ideas.len();
        self.ideas.retain(|i| i.id != id);
        let removed = self.ideas.len() != before;
        if removed {
            info!(id, "idea deleted");
        }
        removed
    }

    pub fn get(&self, id: u64) -> Option<&SavedIdea> {
        self.ideas.iter().find(|i| i.id == id)
    }

    /// Newest first.
    pub fn list(&self) -> &[SavedIdea] {
        &self.ideas
    }

    pub fn len(&self) -> usize {
        self.ideas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ideas.is_empty()
    }

    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        let mut store: Self = serde_json::from_str(text)?;
        // a hand-edited snapshot may carry ids above the counter
        let max_id = store.ideas.iter().map(|i| i.id).max().unwrap_or(0);
        store.next_id = store.next_id.max(max_id);
        Ok(store)
    }

    /// Load a snapshot; a missing file is an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Plain-text teaser for a Markdown analysis.
///
/// Drops Markdown punctuation, folds paragraph breaks into spaces and cuts
/// to 160 characters. The ellipsis is decided on the original length.
pub fn preview(content: &str) -> String {
    let stripped: String = content
        .chars()
        .filter(|c| !matches!(c, '#' | '*' | '`' | '_' | '[' | ']'))
        .collect();
    let folded = stripped.replace("\n\n", " ");
    let mut out: String = folded.trim().chars().take(PREVIEW_CHARS).collect();
    if content.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}
