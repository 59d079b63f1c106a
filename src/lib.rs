//! # ShelfDB
//!
//! An embedded book catalog with:
//! - Fixed 152-byte record slots in a single headerless file
//! - Free-slot reuse (most recently freed first)
//! - In-memory id, title, author and year indexes rebuilt on open
//! - Substring and exact-value search
//! - Pipe-delimited text and JSON import/export
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              CLI / Exchange adapters                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  BookView
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Catalog                                 │
//! │               (single owner, &mut self)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼─────────────────┐
//!          │            │                 │
//!          ▼            ▼                 ▼
//!   ┌─────────────┐ ┌──────────┐  ┌─────────────┐
//!   │  IndexSet   │ │ FreeList │  │   Codec     │
//!   │ (id/title/  │ │  (LIFO)  │  │ (152-byte)  │
//!   │ author/year)│ └──────────┘  └──────┬──────┘
//!   └─────────────┘                      │
//!                                        ▼
//!                                 ┌─────────────┐
//!                                 │  SlotFile   │
//!                                 └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod search;
pub mod engine;
pub mod exchange;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ShelfError, Result};
pub use config::{Config, SyncStrategy};
pub use engine::{Catalog, CatalogStats, SharedCatalog};
pub use record::{BookRecord, BookView};
pub use search::SearchField;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ShelfDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
