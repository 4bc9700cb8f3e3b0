//! Row model behind the content table.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use super::enumerator::platform_order;
use super::DirectoryEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Name,
    Size,
    Modified,
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: SortColumn::Name,
            order: SortOrder::Ascending,
        }
    }
}

/// The rows of the directory currently shown in the table.
///
/// The row set is only ever replaced as a whole, by the result of a scan.
#[derive(Debug, Clone, Default)]
pub struct ContentTable {
    directory: Option<PathBuf>,
    rows: Vec<DirectoryEntry>,
    sort: SortSpec,
}

impl ContentTable {
    pub fn new(sort: SortSpec) -> Self {
        Self {
            directory: None,
            rows: Vec::new(),
            sort,
        }
    }

    /// Replaces all rows with `entries` and re-applies the current sort.
    pub fn replace(&mut self, directory: PathBuf, entries: Vec<DirectoryEntry>) {
        self.directory = Some(directory);
        self.rows = entries;
        self.apply_sort();
    }

    pub fn sort_by(&mut self, column: SortColumn, order: SortOrder) {
        self.sort = SortSpec { column, order };
        self.apply_sort();
    }

    /// Clicking the active column flips its order; any other column starts
    /// ascending.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        let order = if self.sort.column == column {
            self.sort.order.flipped()
        } else {
            SortOrder::Ascending
        };
        self.sort_by(column, order);
    }

    /// Sorts by the active column; ties always fall back to the name in
    /// ascending order, whatever the direction.
    fn apply_sort(&mut self) {
        let SortSpec { column, order } = self.sort;
        self.rows.sort_by(|a, b| {
            let ordering = compare(a, b, column);
            let ordering = match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            ordering.then_with(|| platform_order(&a.name, &b.name))
        });
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn rows(&self) -> &[DirectoryEntry] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }
}

fn compare(a: &DirectoryEntry, b: &DirectoryEntry, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => platform_order(&a.name, &b.name),
        SortColumn::Size => a.size.cmp(&b.size),
        SortColumn::Modified => a.modified.cmp(&b.modified),
        SortColumn::Type => a.type_label.cmp(&b.type_label),
    }
}
