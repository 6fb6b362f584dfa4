#![forbid(unsafe_code)]

//! Puzzle documents, validation, and word cards.
//!
//! A [`PuzzleDocument`] is the raw, deserializable shape a provider hands
//! over. [`Puzzle`] is the validated form: exactly [`CATEGORY_COUNT`]
//! categories of exactly [`WORDS_PER_CATEGORY`] words, every label unique, so
//! the generated [`WordCard`]s cover each grid cell exactly once.
//!
//! # Invariants
//!
//! 1. A `Puzzle` always yields `CATEGORY_COUNT * WORDS_PER_CATEGORY` cards.
//! 2. Card ids are `"{category_id}-{index}"` and never depend on grid order.
//! 3. The starting order lists explicitly named labels first, then the rest
//!    in category-declaration order.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

/// Number of categories in every puzzle.
pub const CATEGORY_COUNT: usize = 4;
/// Number of words in every category.
pub const WORDS_PER_CATEGORY: usize = 4;
/// Mistakes a player may make before the game is lost, unless overridden.
pub const DEFAULT_MISTAKES_ALLOWED: u8 = 4;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Identifier of a category, unique within a puzzle.
    CategoryId
);

string_id!(
    /// Stable identifier of a word card (`"{category_id}-{index}"`).
    WordId
);

impl WordId {
    /// Derive the card id for the `index`-th word of `category`.
    #[must_use]
    pub fn for_word(category: &CategoryId, index: usize) -> Self {
        Self(format!("{category}-{index}"))
    }
}

// ---------------------------------------------------------------------------
// Categories and cards
// ---------------------------------------------------------------------------

/// Difficulty color of a category, from easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor {
    Yellow,
    Green,
    Blue,
    Purple,
}

impl CategoryColor {
    /// All colors in difficulty order.
    pub const ALL: [CategoryColor; 4] = [Self::Yellow, Self::Green, Self::Blue, Self::Purple];

    /// Position in difficulty order (yellow = 0).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Yellow => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Purple => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Purple => "purple",
        }
    }
}

impl fmt::Display for CategoryColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hidden category and its member words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: CategoryId,
    pub title: String,
    pub color: CategoryColor,
    pub words: Vec<String>,
}

/// A word tile on the grid. Cards are immutable; only their order changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WordCard {
    pub id: WordId,
    pub label: String,
    pub category_id: CategoryId,
    pub color: CategoryColor,
}

/// Sort categories by color difficulty, then alphabetically by title.
#[must_use]
pub fn ordered_categories<'a, I>(categories: I) -> Vec<&'a CategoryDefinition>
where
    I: IntoIterator<Item = &'a CategoryDefinition>,
{
    let mut ordered: Vec<&CategoryDefinition> = categories.into_iter().collect();
    ordered.sort_by(|a, b| {
        a.color
            .rank()
            .cmp(&b.color.rank())
            .then_with(|| a.title.cmp(&b.title))
    });
    ordered
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Raw puzzle document as served by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleDocument {
    pub date: String,
    pub categories: Vec<CategoryDefinition>,
    /// Explicit starting order, by word label.
    #[serde(
        default,
        alias = "starting order",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_grid: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mistakes_allowed: Option<u8>,
}

impl PuzzleDocument {
    /// Parse a document from JSON without validating it.
    pub fn from_json_str(json: &str) -> Result<Self, PuzzleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the document into a playable [`Puzzle`].
    pub fn validate(self) -> Result<Puzzle, PuzzleError> {
        Puzzle::try_from(self)
    }
}

/// A validated puzzle with its cards in starting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    date: String,
    categories: Vec<CategoryDefinition>,
    mistakes_allowed: Option<u8>,
    starting_cards: Vec<WordCard>,
}

impl Puzzle {
    /// Parse and validate a JSON document in one step.
    pub fn from_json_str(json: &str) -> Result<Self, PuzzleError> {
        PuzzleDocument::from_json_str(json)?.validate()
    }

    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Categories in declaration order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|category| &category.id == id)
    }

    /// Mistake allowance carried by the document, if any.
    #[must_use]
    pub fn mistakes_allowed(&self) -> Option<u8> {
        self.mistakes_allowed
    }

    /// All cards in the grid's starting order.
    #[must_use]
    pub fn starting_cards(&self) -> &[WordCard] {
        &self.starting_cards
    }
}

impl TryFrom<PuzzleDocument> for Puzzle {
    type Error = PuzzleError;

    fn try_from(document: PuzzleDocument) -> Result<Self, Self::Error> {
        if document.categories.len() != CATEGORY_COUNT {
            return Err(PuzzleError::CategoryCount {
                found: document.categories.len(),
            });
        }
        if document.mistakes_allowed == Some(0) {
            return Err(PuzzleError::ZeroMistakeAllowance);
        }

        let mut category_ids = HashSet::with_capacity(CATEGORY_COUNT);
        let mut labels = HashSet::with_capacity(CATEGORY_COUNT * WORDS_PER_CATEGORY);
        for category in &document.categories {
            if category.id.as_str().is_empty() {
                return Err(PuzzleError::EmptyCategoryId);
            }
            if !category_ids.insert(category.id.as_str()) {
                return Err(PuzzleError::DuplicateCategory {
                    category: category.id.to_string(),
                });
            }
            if category.words.len() != WORDS_PER_CATEGORY {
                return Err(PuzzleError::WordCount {
                    category: category.id.to_string(),
                    found: category.words.len(),
                });
            }
            for word in &category.words {
                if word.trim().is_empty() {
                    return Err(PuzzleError::EmptyWord {
                        category: category.id.to_string(),
                    });
                }
                if !labels.insert(word.as_str()) {
                    return Err(PuzzleError::DuplicateWord { word: word.clone() });
                }
            }
        }

        let starting_cards = prepare_word_cards(&document)?;
        Ok(Self {
            date: document.date,
            categories: document.categories,
            mistakes_allowed: document.mistakes_allowed,
            starting_cards,
        })
    }
}

/// Build the document's cards, honoring its starting grid when present.
fn prepare_word_cards(document: &PuzzleDocument) -> Result<Vec<WordCard>, PuzzleError> {
    let cards: Vec<WordCard> = document
        .categories
        .iter()
        .flat_map(|category| {
            category
                .words
                .iter()
                .enumerate()
                .map(move |(index, word)| WordCard {
                    id: WordId::for_word(&category.id, index),
                    label: word.clone(),
                    category_id: category.id.clone(),
                    color: category.color,
                })
        })
        .collect();

    let Some(start_grid) = document.start_grid.as_deref().filter(|grid| !grid.is_empty())
    else {
        return Ok(cards);
    };

    let mut remaining: Vec<Option<WordCard>> = cards.into_iter().map(Some).collect();
    let mut seen = HashSet::with_capacity(start_grid.len());
    let mut ordered = Vec::with_capacity(remaining.len());

    for label in start_grid {
        if !seen.insert(label.as_str()) {
            return Err(PuzzleError::DuplicateStartWord {
                word: label.clone(),
            });
        }
        let slot = remaining
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|card| &card.label == label))
            .ok_or_else(|| PuzzleError::UnknownStartWord {
                word: label.clone(),
            })?;
        if let Some(card) = slot.take() {
            ordered.push(card);
        }
    }
    ordered.extend(remaining.into_iter().flatten());
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, title: &str, color: CategoryColor, words: [&str; 4]) -> CategoryDefinition {
        CategoryDefinition {
            id: CategoryId::from(id),
            title: title.to_owned(),
            color,
            words: words.iter().map(|w| (*w).to_owned()).collect(),
        }
    }

    fn document() -> PuzzleDocument {
        PuzzleDocument {
            date: "2024-01-01".into(),
            categories: vec![
                category("alpha", "Alpha", CategoryColor::Yellow, ["A1", "A2", "A3", "A4"]),
                category("beta", "Beta", CategoryColor::Green, ["B1", "B2", "B3", "B4"]),
                category("gamma", "Gamma", CategoryColor::Blue, ["C1", "C2", "C3", "C4"]),
                category("delta", "Delta", CategoryColor::Purple, ["D1", "D2", "D3", "D4"]),
            ],
            start_grid: None,
            mistakes_allowed: None,
        }
    }

    #[test]
    fn sequential_cards_without_starting_order() {
        let puzzle = document().validate().unwrap();
        let cards = puzzle.starting_cards();
        assert_eq!(cards.len(), 16);
        assert_eq!(cards[0].id, "alpha-0");
        assert_eq!(cards[0].label, "A1");
        assert_eq!(cards[0].category_id, "alpha");
        assert_eq!(cards[15].id, "delta-3");
    }

    #[test]
    fn starting_order_places_named_words_first() {
        let mut doc = document();
        doc.start_grid = Some(vec!["B3".into(), "A1".into(), "A4".into()]);
        let puzzle = doc.validate().unwrap();
        let labels: Vec<&str> = puzzle
            .starting_cards()
            .iter()
            .take(4)
            .map(|card| card.label.as_str())
            .collect();
        assert_eq!(labels, ["B3", "A1", "A4", "A2"]);
        assert_eq!(puzzle.starting_cards().len(), 16);
    }

    #[test]
    fn card_ids_do_not_depend_on_starting_order() {
        let mut doc = document();
        doc.start_grid = Some(vec!["D4".into()]);
        let puzzle = doc.validate().unwrap();
        assert_eq!(puzzle.starting_cards()[0].id, "delta-3");
    }

    #[test]
    fn empty_starting_order_is_ignored() {
        let mut doc = document();
        doc.start_grid = Some(Vec::new());
        let puzzle = doc.validate().unwrap();
        assert_eq!(puzzle.starting_cards()[0].id, "alpha-0");
    }

    #[test]
    fn rejects_wrong_category_count() {
        let mut doc = document();
        doc.categories.pop();
        assert!(matches!(
            doc.validate(),
            Err(PuzzleError::CategoryCount { found: 3 })
        ));
    }

    #[test]
    fn rejects_wrong_word_count() {
        let mut doc = document();
        doc.categories[2].words.push("C5".into());
        let err = doc.validate().unwrap_err();
        assert!(matches!(err, PuzzleError::WordCount { found: 5, .. }));
        assert!(err.to_string().contains("gamma"));
    }

    #[test]
    fn rejects_duplicate_labels_and_ids() {
        let mut doc = document();
        doc.categories[1].words[0] = "A1".into();
        assert!(matches!(doc.validate(), Err(PuzzleError::DuplicateWord { .. })));

        let mut doc = document();
        doc.categories[3].id = CategoryId::from("alpha");
        assert!(matches!(
            doc.validate(),
            Err(PuzzleError::DuplicateCategory { .. })
        ));
    }

    #[test]
    fn rejects_unknown_or_repeated_start_words() {
        let mut doc = document();
        doc.start_grid = Some(vec!["ZZ".into()]);
        assert!(matches!(
            doc.validate(),
            Err(PuzzleError::UnknownStartWord { .. })
        ));

        let mut doc = document();
        doc.start_grid = Some(vec!["A1".into(), "A1".into()]);
        assert!(matches!(
            doc.validate(),
            Err(PuzzleError::DuplicateStartWord { .. })
        ));
    }

    #[test]
    fn rejects_zero_mistake_allowance() {
        let mut doc = document();
        doc.mistakes_allowed = Some(0);
        assert!(matches!(
            doc.validate(),
            Err(PuzzleError::ZeroMistakeAllowance)
        ));
    }

    #[test]
    fn ordered_categories_by_color_then_title() {
        let categories = [
            category("purple-1", "Zoography", CategoryColor::Purple, ["1", "2", "3", "4"]),
            category("yellow-1", "Alpha", CategoryColor::Yellow, ["1", "2", "3", "4"]),
            category("green-1", "Botany", CategoryColor::Green, ["1", "2", "3", "4"]),
            category("green-2", "Astronomy", CategoryColor::Green, ["1", "2", "3", "4"]),
        ];
        let ids: Vec<&str> = ordered_categories(&categories)
            .into_iter()
            .map(|category| category.id.as_str())
            .collect();
        assert_eq!(ids, ["yellow-1", "green-2", "green-1", "purple-1"]);
    }

    #[test]
    fn document_parses_camel_case_and_legacy_start_key() {
        let json = r#"{
            "date": "2024-10-07",
            "mistakesAllowed": 3,
            "starting order": ["B2"],
            "categories": [
                {"id": "a", "title": "A", "color": "yellow", "words": ["A1","A2","A3","A4"]},
                {"id": "b", "title": "B", "color": "green", "words": ["B1","B2","B3","B4"]},
                {"id": "c", "title": "C", "color": "blue", "words": ["C1","C2","C3","C4"]},
                {"id": "d", "title": "D", "color": "purple", "words": ["D1","D2","D3","D4"]}
            ]
        }"#;
        let puzzle = Puzzle::from_json_str(json).unwrap();
        assert_eq!(puzzle.mistakes_allowed(), Some(3));
        assert_eq!(puzzle.starting_cards()[0].label, "B2");
        assert_eq!(puzzle.date(), "2024-10-07");
    }
}
