//! Engine Module
//!
//! The catalog engine that coordinates the slot file, indexes and free list.
//!
//! ## Responsibilities
//! - Rebuild every index with one linear scan on open
//! - Allocate slots (free-list reuse first, then append)
//! - Keep indexes consistent across add/update/delete
//! - Serve id, key-exact and substring lookups
//! - Bulk import with add-or-update semantics

use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::{Result, ShelfError};
use crate::record::{
    self, BookRecord, BookView, AUTHOR_WIDTH, RECORD_SIZE, TITLE_WIDTH, VACANT_SLOT,
};
use crate::search::{Matcher, SearchField};
use crate::storage::{FreeList, IndexSet, SlotFile};

const SLOT: u64 = RECORD_SIZE as u64;

/// Record count and backing file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    /// Number of live records
    pub records: usize,
    /// Size of the backing file in bytes (live, vacant and stale slots)
    pub file_size: u64,
}

/// Outcome of the open-time scan
#[derive(Debug, Default, Clone, Copy)]
struct RebuildSummary {
    live: usize,
    vacant: usize,
    truncated: usize,
    duplicates: usize,
}

/// The book catalog storage engine
///
/// ## Concurrency Model: Single Owner
///
/// - Every operation that touches the file takes `&mut self`, because each
///   slot transfer moves the shared file cursor
/// - The catalog exclusively owns its file handle and all indexes
/// - Use `SharedCatalog` when several threads must reach one instance
///
/// File writes and index updates are not atomic together; a crash between
/// them is repaired by the rescan on the next open.
#[derive(Debug)]
pub struct Catalog {
    /// Catalog configuration
    config: Config,

    /// Backing slot file
    file: SlotFile,

    /// id/title/author/year → offsets
    index: IndexSet,

    /// Vacated slots awaiting reuse
    free: FreeList,
}

impl Catalog {
    /// Open or create a catalog with the given config
    ///
    /// On startup:
    /// 1. Create parent directories if configured
    /// 2. Open/create the slot file
    /// 3. Scan every slot and rebuild the indexes and free list
    pub fn open(config: Config) -> Result<Self> {
        if config.db_path.as_os_str().is_empty() {
            return Err(ShelfError::Config("database path is empty".to_string()));
        }
        if config.db_path.is_dir() {
            return Err(ShelfError::Config(format!(
                "database path {} is a directory",
                config.db_path.display()
            )));
        }

        if config.create_parent_dirs {
            if let Some(parent) = config.db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let file = SlotFile::open(&config.db_path, config.sync_strategy)?;

        let mut catalog = Self {
            config,
            file,
            index: IndexSet::new(),
            free: FreeList::new(),
        };

        let summary = catalog.rebuild_indexes()?;
        tracing::debug!(
            "Opened {}: {} live, {} vacant, {} truncated, {} duplicate slots",
            catalog.config.db_path.display(),
            summary.live,
            summary.vacant,
            summary.truncated,
            summary.duplicates
        );

        Ok(catalog)
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified database file
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().db_path(path).build();
        Self::open(config)
    }

    /// Close the catalog, syncing the file to disk
    pub fn close(mut self) -> Result<()> {
        self.file.sync()
    }

    /// Truncate the file and forget every record and free slot
    pub fn clear(&mut self) -> Result<()> {
        self.file.truncate()?;
        self.index.clear();
        self.free.clear();

        tracing::debug!("Cleared {}", self.config.db_path.display());
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// All live records as views, ordered by ascending id
    pub fn get_all(&mut self) -> Result<Vec<BookView>> {
        let offsets: Vec<u64> = self.index.offsets().collect();
        let mut views = self.read_views(&offsets);
        views.sort_by_key(|view| view.id);
        Ok(views)
    }

    /// Direct id lookup
    pub fn find_by_id(&mut self, id: i32) -> Result<BookRecord> {
        let offset = self.index.offset_of(id).ok_or(ShelfError::NotFound { id })?;
        self.read_record(offset)
    }

    /// Scan every record for matches on `field`
    ///
    /// Text fields match on a case-insensitive substring of the trimmed
    /// value; numeric fields need the value to parse and be equal.
    /// Fails with `NoMatches` when nothing matches.
    pub fn find(&mut self, field: SearchField, value: &str) -> Result<Vec<BookView>> {
        let matcher = Matcher::new(field, value);

        let found: Vec<BookView> = self
            .get_all()?
            .into_iter()
            .filter(|view| matcher.matches(view))
            .collect();

        if found.is_empty() {
            return Err(ShelfError::NoMatches {
                field: field.label().to_string(),
                value: value.to_string(),
            });
        }

        Ok(found)
    }

    /// Records whose stored title equals `title` exactly (index lookup)
    pub fn find_by_title(&mut self, title: &str) -> Result<Vec<BookView>> {
        let key = stored_text::<TITLE_WIDTH>(title);
        let offsets = self.index.by_title(&key).to_vec();
        Ok(self.sorted_views(&offsets))
    }

    /// Records whose stored author equals `author` exactly (index lookup)
    pub fn find_by_author(&mut self, author: &str) -> Result<Vec<BookView>> {
        let key = stored_text::<AUTHOR_WIDTH>(author);
        let offsets = self.index.by_author(&key).to_vec();
        Ok(self.sorted_views(&offsets))
    }

    /// Records published in `year` (index lookup)
    pub fn find_by_year(&mut self, year: i32) -> Result<Vec<BookView>> {
        let offsets = self.index.by_year(year).to_vec();
        Ok(self.sorted_views(&offsets))
    }

    /// Record count and file size
    pub fn stats(&self) -> Result<CatalogStats> {
        Ok(CatalogStats {
            records: self.index.len(),
            file_size: self.file.len()?,
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert a new record
    ///
    /// Reuses the most recently freed slot if there is one, otherwise
    /// appends at the end of the file.
    pub fn add(&mut self, view: &BookView) -> Result<()> {
        if self.index.contains(view.id) {
            return Err(ShelfError::DuplicateKey { id: view.id });
        }

        let offset = self.allocate_slot()?;
        let record = BookRecord::from_view(view);

        if let Err(e) = self.file.write_slot(offset, &record::encode(&record)) {
            self.free.push(offset);
            return Err(e);
        }

        self.index.insert(&record, offset);
        tracing::debug!("Added book {} at offset {}", record.id, offset);
        Ok(())
    }

    /// Rewrite an existing record in place
    ///
    /// The slot is located by `view.id`; every other field may change.
    pub fn update(&mut self, view: &BookView) -> Result<()> {
        let offset = self
            .index
            .offset_of(view.id)
            .ok_or(ShelfError::NotFound { id: view.id })?;

        let old = self.read_record(offset)?;
        let new = BookRecord::from_view(view);

        self.file.write_slot(offset, &record::encode(&new))?;

        self.index.remove_secondary(&old, offset);
        self.index.insert(&new, offset);
        tracing::debug!("Updated book {} at offset {}", new.id, offset);
        Ok(())
    }

    /// Remove a record and queue its slot for reuse
    pub fn delete(&mut self, id: i32) -> Result<()> {
        let offset = self.index.offset_of(id).ok_or(ShelfError::NotFound { id })?;

        let old = self.read_record(offset)?;
        self.file.write_slot(offset, &VACANT_SLOT)?;

        self.index.remove(&old, offset);
        self.free.push(offset);
        tracing::debug!("Deleted book {} from offset {}", id, offset);
        Ok(())
    }

    // =========================================================================
    // Bulk Operations
    // =========================================================================

    /// Apply a batch of views in ascending id order
    ///
    /// Each view is added, or updated if its id already exists. The first
    /// other failure stops the batch with `ShelfError::Import`, whose `line`
    /// is the 1-based position of the failing view in `views` and whose
    /// `imported` counts the views already applied.
    pub fn import<I>(&mut self, views: I) -> Result<usize>
    where
        I: IntoIterator<Item = BookView>,
    {
        let numbered = views
            .into_iter()
            .enumerate()
            .map(|(i, view)| (i + 1, view))
            .collect();
        self.import_numbered(numbered)
    }

    /// Import where each view carries its own source line number
    pub(crate) fn import_numbered(&mut self, mut entries: Vec<(usize, BookView)>) -> Result<usize> {
        entries.sort_by_key(|(_, view)| view.id);

        let mut imported = 0;
        for (line, view) in &entries {
            let applied = match self.add(view) {
                Err(ShelfError::DuplicateKey { .. }) => self.update(view),
                other => other,
            };

            if let Err(source) = applied {
                tracing::warn!("Import stopped at line {}: {}", line, source);
                return Err(ShelfError::Import {
                    line: *line,
                    imported,
                    source: Box::new(source),
                });
            }
            imported += 1;
        }

        tracing::debug!("Imported {} books", imported);
        Ok(imported)
    }

    /// Every live record for an exchange adapter (same as `get_all`)
    pub fn export(&mut self) -> Result<Vec<BookView>> {
        self.get_all()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Slot offset of a live record
    pub fn offset_of(&self, id: i32) -> Option<u64> {
        self.index.offset_of(id)
    }

    /// Number of slots queued for reuse
    pub fn free_slots(&self) -> usize {
        self.free.len()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Scan the file from offset 0 in slot strides
    ///
    /// Vacant, truncated and duplicate-id slots go to the free list in scan
    /// order; everything else is indexed. Duplicate-id slots are overwritten
    /// with the vacancy marker so they stay free on later opens.
    fn rebuild_indexes(&mut self) -> Result<RebuildSummary> {
        let file_size = self.file.len()?;
        let mut summary = RebuildSummary::default();
        let mut offset = 0;

        while offset < file_size {
            match self.file.read_slot(offset) {
                Ok(block) if record::is_vacant(&block) => {
                    summary.vacant += 1;
                    self.free.push(offset);
                }
                Ok(block) => {
                    let rec = record::decode(&block);
                    if self.index.contains(rec.id) {
                        tracing::warn!(
                            "Slot at offset {} repeats id {}; reclaiming it",
                            offset,
                            rec.id
                        );
                        // Mark vacant on disk so later opens skip it as well
                        self.file.write_slot(offset, &VACANT_SLOT)?;
                        summary.duplicates += 1;
                        self.free.push(offset);
                    } else {
                        summary.live += 1;
                        self.index.insert(&rec, offset);
                    }
                }
                Err(ShelfError::IncompleteRead { got, .. }) => {
                    tracing::warn!(
                        "Truncated slot at offset {} ({} bytes); reclaiming it",
                        offset,
                        got
                    );
                    summary.truncated += 1;
                    self.free.push(offset);
                }
                Err(e) => return Err(e),
            }
            offset += SLOT;
        }

        Ok(summary)
    }

    /// Pop a free slot or compute the next slot past the end of the file
    fn allocate_slot(&mut self) -> Result<u64> {
        if let Some(offset) = self.free.pop() {
            return Ok(offset);
        }
        Ok(self.file.len()?.div_ceil(SLOT) * SLOT)
    }

    fn read_record(&mut self, offset: u64) -> Result<BookRecord> {
        let block = self.file.read_slot(offset)?;
        Ok(record::decode(&block))
    }

    /// Read views at `offsets`, skipping slots that fail to read
    fn read_views(&mut self, offsets: &[u64]) -> Vec<BookView> {
        let mut views = Vec::with_capacity(offsets.len());
        for &offset in offsets {
            match self.read_record(offset) {
                Ok(rec) => views.push(rec.to_view()),
                Err(e) => tracing::warn!("Skipping indexed slot at {}: {}", offset, e),
            }
        }
        views
    }

    fn sorted_views(&mut self, offsets: &[u64]) -> Vec<BookView> {
        let mut views = self.read_views(offsets);
        views.sort_by_key(|view| view.id);
        views
    }
}

/// The text a field of width `N` would hold after storing `text`
fn stored_text<const N: usize>(text: &str) -> String {
    let mut field = [0u8; N];
    record::encode_text(text, &mut field);
    record::decode_text(&field)
}

// =============================================================================
// Shared Access
// =============================================================================

/// A catalog shared across threads behind a mutex
///
/// Cloning shares the same catalog. Every call holds the lock for the
/// whole operation, preserving single-writer access to the file.
#[derive(Debug, Clone)]
pub struct SharedCatalog {
    inner: Arc<Mutex<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Open a catalog and wrap it
    pub fn open(config: Config) -> Result<Self> {
        Catalog::open(config).map(Self::new)
    }

    /// Exclusive access for a sequence of operations
    pub fn lock(&self) -> MutexGuard<'_, Catalog> {
        self.inner.lock()
    }

    /// Run one closure with exclusive access
    pub fn with<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> R {
        let mut catalog = self.inner.lock();
        f(&mut catalog)
    }
}
