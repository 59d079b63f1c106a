//! Tests for Catalog
//!
//! These tests verify:
//! - Basic add/update/delete/find_by_id operations
//! - Duplicate and missing id errors
//! - Slot allocation with LIFO free-slot reuse
//! - Index rebuild on reopen (including vacant and truncated slots)
//! - Clear, stats and shared access

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::thread;

use shelfdb::config::{Config, SyncStrategy};
use shelfdb::engine::{Catalog, SharedCatalog};
use shelfdb::record::{BookView, RECORD_SIZE};
use shelfdb::ShelfError;
use tempfile::TempDir;

const SLOT: u64 = RECORD_SIZE as u64;

// =============================================================================
// Helper Functions
// =============================================================================

fn db_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("books.db")
}

fn setup_temp_catalog() -> (TempDir, Catalog) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .db_path(db_path(&temp_dir))
        .sync_strategy(SyncStrategy::EveryWrite) // Sync every write for test reliability
        .build();
    let catalog = Catalog::open(config).unwrap();
    (temp_dir, catalog)
}

fn book(id: i32) -> BookView {
    BookView::new(id, format!("Title {}", id), format!("Author {}", id), 1900 + id, id * 10)
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_open_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data").join("books.db");

    let catalog = Catalog::open_path(&path).unwrap();

    assert!(path.exists());
    assert!(catalog.is_empty());
    assert_eq!(catalog.path(), path.as_path());
    assert_eq!(catalog.config().db_path, path);
    assert_eq!(catalog.config().sync_strategy, SyncStrategy::OnClose);
}

#[test]
fn test_open_rejects_directory_path() {
    let temp_dir = TempDir::new().unwrap();

    let result = Catalog::open_path(temp_dir.path());

    assert!(matches!(result, Err(ShelfError::Config(_))));
}

#[test]
fn test_add_and_find_by_id() {
    let (_temp, mut catalog) = setup_temp_catalog();

    catalog.add(&book(1)).unwrap();
    let record = catalog.find_by_id(1).unwrap();

    assert_eq!(record.to_view(), book(1));
}

#[test]
fn test_find_by_id_missing() {
    let (_temp, mut catalog) = setup_temp_catalog();

    let result = catalog.find_by_id(42);

    assert!(matches!(result, Err(ShelfError::NotFound { id: 42 })));
}

#[test]
fn test_add_duplicate_id_fails_and_keeps_original() {
    let (_temp, mut catalog) = setup_temp_catalog();
    catalog.add(&book(5)).unwrap();
    let size_before = catalog.stats().unwrap().file_size;

    let mut other = book(5);
    other.title = "Something else".to_string();
    let result = catalog.add(&other);

    assert!(matches!(result, Err(ShelfError::DuplicateKey { id: 5 })));
    assert_eq!(catalog.find_by_id(5).unwrap().to_view(), book(5));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.stats().unwrap().file_size, size_before);
}

#[test]
fn test_update_keeps_offset_and_reindexes() {
    let (_temp, mut catalog) = setup_temp_catalog();
    catalog.add(&book(1)).unwrap();
    catalog.add(&book(2)).unwrap();
    let offset = catalog.offset_of(2).unwrap();

    let changed = BookView::new(2, "New title", "New author", 2020, 1);
    catalog.update(&changed).unwrap();

    assert_eq!(catalog.offset_of(2), Some(offset));
    assert_eq!(catalog.find_by_id(2).unwrap().to_view(), changed);
    assert!(catalog.find_by_title("Title 2").unwrap().is_empty());
    assert!(catalog.find_by_year(1902).unwrap().is_empty());
    assert_eq!(catalog.find_by_author("New author").unwrap(), vec![changed]);
}

#[test]
fn test_update_missing_id() {
    let (_temp, mut catalog) = setup_temp_catalog();

    let result = catalog.update(&book(3));

    assert!(matches!(result, Err(ShelfError::NotFound { id: 3 })));
}

#[test]
fn test_delete_removes_from_every_index() {
    let (_temp, mut catalog) = setup_temp_catalog();
    catalog.add(&book(1)).unwrap();
    catalog.add(&book(2)).unwrap();

    catalog.delete(1).unwrap();

    assert!(matches!(catalog.find_by_id(1), Err(ShelfError::NotFound { id: 1 })));
    assert!(catalog.find_by_title("Title 1").unwrap().is_empty());
    assert!(catalog.find_by_author("Author 1").unwrap().is_empty());
    assert!(catalog.find_by_year(1901).unwrap().is_empty());
    assert_eq!(catalog.get_all().unwrap(), vec![book(2)]);
    assert_eq!(catalog.free_slots(), 1);
}

#[test]
fn test_delete_missing_id() {
    let (_temp, mut catalog) = setup_temp_catalog();

    assert!(matches!(catalog.delete(9), Err(ShelfError::NotFound { id: 9 })));
}

#[test]
fn test_get_all_sorted_by_id() {
    let (_temp, mut catalog) = setup_temp_catalog();
    for id in [5, 1, 4, 2, 3] {
        catalog.add(&book(id)).unwrap();
    }

    let ids: Vec<i32> = catalog.get_all().unwrap().iter().map(|b| b.id).collect();

    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

// =============================================================================
// Slot Allocation Tests
// =============================================================================

#[test]
fn test_offsets_are_slot_aligned() {
    let (_temp, mut catalog) = setup_temp_catalog();
    for id in 1..=3 {
        catalog.add(&book(id)).unwrap();
    }

    assert_eq!(catalog.offset_of(1), Some(0));
    assert_eq!(catalog.offset_of(2), Some(SLOT));
    assert_eq!(catalog.offset_of(3), Some(2 * SLOT));
    assert_eq!(catalog.stats().unwrap().file_size, 3 * SLOT);
}

#[test]
fn test_freed_slot_is_reused() {
    let (_temp, mut catalog) = setup_temp_catalog();
    for id in 1..=3 {
        catalog.add(&book(id)).unwrap();
    }

    catalog.delete(2).unwrap();
    catalog.add(&book(4)).unwrap();

    assert_eq!(catalog.offset_of(4), Some(SLOT));
    assert_eq!(catalog.free_slots(), 0);
    assert_eq!(catalog.stats().unwrap().file_size, 3 * SLOT);
}

#[test]
fn test_free_slots_reused_lifo() {
    let (_temp, mut catalog) = setup_temp_catalog();
    for id in 1..=4 {
        catalog.add(&book(id)).unwrap();
    }

    catalog.delete(1).unwrap();
    catalog.delete(3).unwrap();
    catalog.add(&book(10)).unwrap();
    catalog.add(&book(11)).unwrap();
    catalog.add(&book(12)).unwrap();

    assert_eq!(catalog.offset_of(10), Some(2 * SLOT));
    assert_eq!(catalog.offset_of(11), Some(0));
    assert_eq!(catalog.offset_of(12), Some(4 * SLOT));
}

// =============================================================================
// Rebuild Tests
// =============================================================================

#[test]
fn test_reopen_yields_same_records() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);

    let before = {
        let mut catalog = Catalog::open_path(&path).unwrap();
        for id in [3, 1, 2] {
            catalog.add(&book(id)).unwrap();
        }
        catalog.update(&BookView::new(2, "Changed", "Someone", 1999, 0)).unwrap();
        let all = catalog.get_all().unwrap();
        catalog.close().unwrap();
        all
    };

    let mut reopened = Catalog::open_path(&path).unwrap();

    assert_eq!(reopened.get_all().unwrap(), before);
    assert_eq!(reopened.find_by_author("Someone").unwrap().len(), 1);
}

#[test]
fn test_deleted_record_not_resurrected_on_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);

    {
        let mut catalog = Catalog::open_path(&path).unwrap();
        for id in 1..=3 {
            catalog.add(&book(id)).unwrap();
        }
        catalog.delete(2).unwrap();
        catalog.close().unwrap();
    }

    let mut reopened = Catalog::open_path(&path).unwrap();

    assert!(matches!(reopened.find_by_id(2), Err(ShelfError::NotFound { id: 2 })));
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.free_slots(), 1);

    reopened.add(&book(7)).unwrap();
    assert_eq!(reopened.offset_of(7), Some(SLOT));
}

#[test]
fn test_truncated_tail_reclaimed_as_free() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);

    {
        let mut catalog = Catalog::open_path(&path).unwrap();
        catalog.add(&book(1)).unwrap();
        catalog.close().unwrap();
    }
    {
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&[1u8; 20]).unwrap();
    }

    let mut reopened = Catalog::open_path(&path).unwrap();

    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.free_slots(), 1);

    reopened.add(&book(2)).unwrap();
    assert_eq!(reopened.offset_of(2), Some(SLOT));
    assert_eq!(reopened.stats().unwrap().file_size, 2 * SLOT);
}

#[test]
fn test_repeated_id_slot_reclaimed() {
    let temp_dir = TempDir::new().unwrap();
    let path = db_path(&temp_dir);

    {
        let mut catalog = Catalog::open_path(&path).unwrap();
        catalog.add(&book(1)).unwrap();
        catalog.close().unwrap();
    }
    // Append a byte-for-byte copy of slot 0
    let bytes = fs::read(&path).unwrap();
    let mut doubled = bytes.clone();
    doubled.extend_from_slice(&bytes);
    fs::write(&path, doubled).unwrap();

    let mut reopened = Catalog::open_path(&path).unwrap();

    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.offset_of(1), Some(0));
    assert_eq!(reopened.free_slots(), 1);
    assert_eq!(reopened.find_by_title("Title 1").unwrap().len(), 1);

    // Delete the live copy and reuse its slot; the repeat must stay gone
    reopened.delete(1).unwrap();
    reopened.add(&book(5)).unwrap();
    assert_eq!(reopened.offset_of(5), Some(0));
    reopened.close().unwrap();

    let mut again = Catalog::open_path(&path).unwrap();

    assert!(matches!(again.find_by_id(1), Err(ShelfError::NotFound { id: 1 })));
    assert!(again.find_by_title("Title 1").unwrap().is_empty());
    assert_eq!(again.len(), 1);
    assert_eq!(again.free_slots(), 1);
}

// =============================================================================
// Clear / Stats Tests
// =============================================================================

#[test]
fn test_clear_resets_everything() {
    let (_temp, mut catalog) = setup_temp_catalog();
    for id in 1..=3 {
        catalog.add(&book(id)).unwrap();
    }
    catalog.delete(2).unwrap();

    catalog.clear().unwrap();

    assert!(catalog.is_empty());
    assert_eq!(catalog.free_slots(), 0);
    assert_eq!(catalog.stats().unwrap().file_size, 0);
    assert!(catalog.get_all().unwrap().is_empty());

    catalog.add(&book(1)).unwrap();
    assert_eq!(catalog.offset_of(1), Some(0));
}

#[test]
fn test_stats_counts_live_records() {
    let (_temp, mut catalog) = setup_temp_catalog();
    for id in 1..=3 {
        catalog.add(&book(id)).unwrap();
    }
    catalog.delete(3).unwrap();

    let stats = catalog.stats().unwrap();

    assert_eq!(stats.records, 2);
    assert_eq!(stats.file_size, 3 * SLOT);
}

// =============================================================================
// Shared Access Tests
// =============================================================================

#[test]
fn test_shared_catalog_across_threads() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().db_path(db_path(&temp_dir)).build();
    let shared = SharedCatalog::open(config).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    let id = t * 100 + i;
                    shared.with(|catalog| catalog.add(&book(id))).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut catalog = shared.lock();
    assert_eq!(catalog.len(), 100);
    assert_eq!(catalog.stats().unwrap().file_size, 100 * SLOT);
    assert_eq!(catalog.get_all().unwrap().len(), 100);
}
