//! Table descriptors and the generic dedup/sort pass

use crate::error::Result;
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// Declarative description of one output table.
///
/// Each row type names its table, its column headers (which must match the
/// serialized field order), the key it is deduplicated by and the key it is
/// sorted by. [`build_table`] applies the same dedup-then-sort pass to every
/// implementor, so adding a table is a matter of adding a row type.
pub trait TableRow: Serialize + Sized {
    /// File stem of the table (e.g. `works` -> `works.csv`)
    const NAME: &'static str;

    /// Header row, in serialization order
    const HEADERS: &'static [&'static str];

    /// Identity of a row for deduplication
    type DedupKey: Eq + Hash;

    /// Total ordering key; absent values sort first
    type SortKey: Ord;

    fn dedup_key(&self) -> Self::DedupKey;

    fn sort_key(&self) -> Self::SortKey;

    /// Fold a later duplicate into the row that was kept.
    ///
    /// The default keeps the first occurrence untouched.
    fn merge(&mut self, _duplicate: Self) {}
}

/// A deduplicated, sorted table ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    rows: Vec<R>,
}

impl<R: TableRow> Table<R> {
    pub fn name(&self) -> &'static str {
        R::NAME
    }

    pub fn headers(&self) -> &'static [&'static str] {
        R::HEADERS
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table as comma-delimited UTF-8 with a header row.
    ///
    /// The header is written even when the table has no rows.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(R::HEADERS)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }

        Ok(writer.into_inner()?)
    }
}

/// Deduplicate rows by [`TableRow::dedup_key`] and sort by [`TableRow::sort_key`].
///
/// The first occurrence of a key wins; later duplicates are passed to
/// [`TableRow::merge`]. Sorting is stable.
pub fn build_table<R: TableRow>(rows: impl IntoIterator<Item = R>) -> Table<R> {
    let mut index: HashMap<R::DedupKey, usize> = HashMap::new();
    let mut unique: Vec<R> = Vec::new();

    for row in rows {
        match index.entry(row.dedup_key()) {
            Entry::Occupied(slot) => unique[*slot.get()].merge(row),
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(row);
            },
        }
    }

    unique.sort_by_cached_key(R::sort_key);

    Table { rows: unique }
}
