//! In-memory indexes
//!
//! Primary id index plus title/author/year secondary indexes, all mapping to
//! slot offsets. Nothing here is persisted; the set is rebuilt on open.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use crate::record::BookRecord;

/// All indexes over live slots
///
/// A secondary bucket holds an offset if and only if the record at that
/// offset is live and carries the bucket's key. Empty buckets are removed.
#[derive(Debug, Default)]
pub struct IndexSet {
    /// id → offset
    by_id: HashMap<i32, u64>,
    /// title → offsets
    by_title: HashMap<String, Vec<u64>>,
    /// author → offsets
    by_author: HashMap<String, Vec<u64>>,
    /// year → offsets
    by_year: HashMap<i32, Vec<u64>>,
}

impl IndexSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a record stored at `offset`
    pub fn insert(&mut self, record: &BookRecord, offset: u64) {
        self.by_id.insert(record.id, offset);
        self.by_title
            .entry(record.title_text())
            .or_default()
            .push(offset);
        self.by_author
            .entry(record.author_text())
            .or_default()
            .push(offset);
        self.by_year.entry(record.year).or_default().push(offset);
    }

    /// Remove every index entry of a record stored at `offset`
    pub fn remove(&mut self, record: &BookRecord, offset: u64) {
        self.by_id.remove(&record.id);
        self.remove_secondary(record, offset);
    }

    /// Remove only the title/author/year entries, keeping the id mapping
    pub fn remove_secondary(&mut self, record: &BookRecord, offset: u64) {
        remove_from_bucket(&mut self.by_title, record.title_text().as_str(), offset);
        remove_from_bucket(&mut self.by_author, record.author_text().as_str(), offset);
        remove_from_bucket(&mut self.by_year, &record.year, offset);
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.by_id.clear();
        self.by_title.clear();
        self.by_author.clear();
        self.by_year.clear();
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn offset_of(&self, id: i32) -> Option<u64> {
        self.by_id.get(&id).copied()
    }

    pub fn contains(&self, id: i32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Offsets of every live record, in no particular order
    pub fn offsets(&self) -> impl Iterator<Item = u64> + '_ {
        self.by_id.values().copied()
    }

    pub fn by_title(&self, title: &str) -> &[u64] {
        self.by_title.get(title).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_author(&self, author: &str) -> &[u64] {
        self.by_author.get(author).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn by_year(&self, year: i32) -> &[u64] {
        self.by_year.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Remove one offset from a bucket, dropping the bucket once it is empty
fn remove_from_bucket<K, Q>(index: &mut HashMap<K, Vec<u64>>, key: &Q, offset: u64)
where
    K: Borrow<Q> + Hash + Eq,
    Q: Hash + Eq + ?Sized,
{
    if let Some(bucket) = index.get_mut(key) {
        if let Some(pos) = bucket.iter().position(|&o| o == offset) {
            bucket.swap_remove(pos);
        }
        if bucket.is_empty() {
            index.remove(key);
        }
    }
}
