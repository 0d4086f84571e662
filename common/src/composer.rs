//! Grid pagination
//!
//! Single pass over matched items: cells fill rows of `columns`, rows fill
//! pages until the forced row cap, and the last row is padded with
//! placeholders. Items whose cell cannot be built are skipped without leaving
//! a hole.

use crate::layout::LayoutGeometry;
use std::fmt;

/// One grid position
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<C> {
    Filled(C),
    Placeholder,
}

impl<C> Slot<C> {
    pub fn cell(&self) -> Option<&C> {
        match self {
            Slot::Filled(cell) => Some(cell),
            Slot::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Placeholder)
    }
}

/// Row-major grid; every row holds exactly `columns` slots
#[derive(Debug, Clone, PartialEq)]
pub struct Page<C> {
    pub rows: Vec<Vec<Slot<C>>>,
}

impl<C> Page<C> {
    pub fn cells(&self) -> impl Iterator<Item = &C> {
        self.rows.iter().flatten().filter_map(Slot::cell)
    }

    pub fn real_cell_count(&self) -> usize {
        self.cells().count()
    }
}

/// Why an item did not make it into the grid
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Image could not be opened or decoded
    Unreadable(String),
    /// Image decoded but has nothing to place
    Invalid(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(msg) => write!(f, "unreadable image: {}", msg),
            SkipReason::Invalid(msg) => write!(f, "invalid image: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedItem {
    pub key: String,
    pub reason: SkipReason,
}

/// Composer output
#[derive(Debug, Clone)]
pub struct Composition<C> {
    pub pages: Vec<Page<C>>,
    pub skipped: Vec<SkippedItem>,
}

impl<C> Composition<C> {
    pub fn real_cell_count(&self) -> usize {
        self.pages.iter().map(Page::real_cell_count).sum()
    }
}

pub struct PageComposer {
    geometry: LayoutGeometry,
}

impl PageComposer {
    pub fn new(geometry: LayoutGeometry) -> Self {
        Self { geometry }
    }

    /// Lay `items` out in order.
    ///
    /// `build_cell` turns an item into a cell or reports why it was skipped.
    /// `progress` receives the completed fraction after every item.
    pub fn compose<T, C, B, P>(&self, items: &[T], mut build_cell: B, mut progress: P) -> Composition<C>
    where
        B: FnMut(&T) -> Result<C, SkippedItem>,
        P: FnMut(f32),
    {
        let columns = self.geometry.columns.max(1);
        let max_rows = self.geometry.max_rows_per_page.map(|cap| cap.max(1));
        let total = items.len();

        let mut pages = Vec::new();
        let mut skipped = Vec::new();
        let mut page: Vec<Vec<Slot<C>>> = Vec::new();
        let mut row: Vec<Slot<C>> = Vec::with_capacity(columns);

        for (i, item) in items.iter().enumerate() {
            match build_cell(item) {
                Ok(cell) => {
                    row.push(Slot::Filled(cell));

                    if row.len() == columns {
                        page.push(std::mem::replace(&mut row, Vec::with_capacity(columns)));
                    }

                    if max_rows.is_some_and(|cap| page.len() >= cap) {
                        pages.push(Page { rows: std::mem::take(&mut page) });
                    }
                }
                Err(skip) => skipped.push(skip),
            }

            progress((i + 1) as f32 / total as f32);
        }

        if !row.is_empty() {
            row.resize_with(columns, || Slot::Placeholder);
            page.push(row);
        }
        if !page.is_empty() {
            pages.push(Page { rows: page });
        }

        Composition { pages, skipped }
    }
}
