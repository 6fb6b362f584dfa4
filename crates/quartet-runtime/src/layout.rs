#![forbid(unsafe_code)]

//! Fixed-column grid layout.
//!
//! Hosts without a layout engine (and tests) use [`GridLayout`] to place the
//! word tiles. [`GridLayout::arrange`] snapshots a grid order into a
//! [`GridArrangement`], which answers hit-tests and rect queries for that
//! order.

use quartet_core::{Point, Rect, WordCard, WordId};
use serde::{Deserialize, Serialize};

use crate::drag::{DropLocator, LayoutProbe};

/// Tile geometry for a fixed number of columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub columns: usize,
    pub cell_width: f32,
    pub cell_height: f32,
    pub gap: f32,
    pub origin: Point,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 4,
            cell_width: 150.0,
            cell_height: 80.0,
            gap: 8.0,
            origin: Point::new(0.0, 0.0),
        }
    }
}

impl GridLayout {
    /// Rect of the tile at grid `index`.
    #[must_use]
    pub fn rect_at(&self, index: usize) -> Rect {
        let columns = self.columns.max(1);
        let column = (index % columns) as f32;
        let row = (index / columns) as f32;
        Rect::new(
            self.origin.x + column * (self.cell_width + self.gap),
            self.origin.y + row * (self.cell_height + self.gap),
            self.cell_width,
            self.cell_height,
        )
    }

    /// Grid index under `point`, ignoring gaps and the area past `count` tiles.
    #[must_use]
    pub fn index_at(&self, point: Point, count: usize) -> Option<usize> {
        (0..count).find(|index| self.rect_at(*index).contains(point))
    }

    /// Snapshot `words` in their current order.
    #[must_use]
    pub fn arrange(&self, words: &[WordCard]) -> GridArrangement {
        GridArrangement {
            layout: *self,
            order: words.iter().map(|card| card.id.clone()).collect(),
        }
    }
}

/// A [`GridLayout`] bound to one grid order.
#[derive(Debug, Clone, PartialEq)]
pub struct GridArrangement {
    layout: GridLayout,
    order: Vec<WordId>,
}

impl GridArrangement {
    /// Center of a word's tile, handy for synthesizing pointer input.
    #[must_use]
    pub fn center_of(&self, id: &WordId) -> Option<Point> {
        self.rect_of(id).map(|rect| {
            Point::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
        })
    }
}

impl LayoutProbe for GridArrangement {
    fn rect_of(&self, id: &WordId) -> Option<Rect> {
        let index = self.order.iter().position(|word| word == id)?;
        Some(self.layout.rect_at(index))
    }
}

impl DropLocator for GridArrangement {
    fn locate_droppable_at(&self, point: Point, exclude: &WordId) -> Option<WordId> {
        let index = self.layout.index_at(point, self.order.len())?;
        self.order.get(index).filter(|id| *id != exclude).cloned()
    }
}
