#![forbid(unsafe_code)]

//! Puzzle providers.
//!
//! A [`PuzzleProvider`] maps a [`DateKey`] to a [`PuzzleDocument`]. The
//! engine never loads content itself; hosts fetch (possibly asynchronously,
//! on their own executor) and hand the document to the game.
//!
//! [`StaticCatalog`] is an in-memory provider keyed by date. Lookup for a
//! date without its own puzzle falls back to the latest earlier puzzle, and
//! to the earliest puzzle when the date precedes the whole catalog.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, PuzzleError};
use crate::puzzle::PuzzleDocument;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
const BUILTIN_PUZZLES: &str = include_str!("../data/builtin_puzzles.json");

/// A calendar day identifying one puzzle, formatted `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(NaiveDate);

impl DateKey {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Key for a calendar date, `None` when the date does not exist.
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }

    /// Long display form, e.g. `October 7, 2024`.
    #[must_use]
    pub fn label(self) -> String {
        self.0.format("%B %-d, %Y").to_string()
    }
}

impl FromStr for DateKey {
    type Err = ProviderError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT)
            .map(Self)
            .map_err(|_| ProviderError::InvalidDateKey {
                key: key.to_owned(),
            })
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Source of puzzle documents.
pub trait PuzzleProvider {
    /// Fetch the document to play on `key`.
    fn fetch(&self, key: &DateKey) -> Result<PuzzleDocument, ProviderError>;
}

impl<P: PuzzleProvider + ?Sized> PuzzleProvider for &P {
    fn fetch(&self, key: &DateKey) -> Result<PuzzleDocument, ProviderError> {
        (**self).fetch(key)
    }
}

/// In-memory catalog of validated documents keyed by date.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    puzzles: BTreeMap<DateKey, PuzzleDocument>,
}

impl StaticCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The two sample puzzles bundled with the crate.
    pub fn builtin() -> Result<Self, ProviderError> {
        Self::from_json_str(BUILTIN_PUZZLES)
    }

    /// Load a JSON array of documents. Each document is keyed by its `date`.
    pub fn from_json_str(json: &str) -> Result<Self, ProviderError> {
        let documents: Vec<PuzzleDocument> =
            serde_json::from_str(json).map_err(PuzzleError::from)?;
        let mut catalog = Self::new();
        for document in documents {
            catalog.insert(document)?;
        }
        Ok(catalog)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Validate and add a document, replacing any document for the same day.
    pub fn insert(&mut self, document: PuzzleDocument) -> Result<DateKey, ProviderError> {
        let key: DateKey = document.date.parse()?;
        document.clone().validate()?;
        tracing::debug!(target: "quartet.provider", key = %key, "catalog puzzle added");
        self.puzzles.insert(key, document);
        Ok(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// All keys in ascending date order.
    pub fn keys(&self) -> impl Iterator<Item = DateKey> + '_ {
        self.puzzles.keys().copied()
    }

    /// The key whose puzzle would be served for `target`.
    #[must_use]
    pub fn resolve(&self, target: &DateKey) -> Option<DateKey> {
        self.puzzles
            .range(..=*target)
            .next_back()
            .or_else(|| self.puzzles.iter().next())
            .map(|(key, _)| *key)
    }
}

impl PuzzleProvider for StaticCatalog {
    fn fetch(&self, key: &DateKey) -> Result<PuzzleDocument, ProviderError> {
        if self.puzzles.is_empty() {
            return Err(ProviderError::EmptyCatalog);
        }
        let resolved = self
            .resolve(key)
            .ok_or_else(|| ProviderError::not_found(key.to_string()))?;
        if resolved != *key {
            tracing::debug!(
                target: "quartet.provider",
                requested = %key,
                served = %resolved,
                "no puzzle for requested day, serving fallback"
            );
        }
        self.puzzles
            .get(&resolved)
            .cloned()
            .ok_or_else(|| ProviderError::not_found(resolved.to_string()))
    }
}
