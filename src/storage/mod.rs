//! Storage Module
//!
//! Persistent slot storage and the in-memory bookkeeping over it.
//!
//! ## Responsibilities
//! - Seek-then-transfer reads/writes of fixed 152-byte slots
//! - Primary and secondary indexes from key to slot offset
//! - Stack of vacated slots for reuse
//!
//! ## File Format
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Slot 0   (offset 0)                    │
//! ├────────────────────────────────────────┤
//! │ Slot 1   (offset 152)                  │
//! ├────────────────────────────────────────┤
//! │ ...                                    │
//! ├────────────────────────────────────────┤
//! │ Slot N   (offset N * 152)              │
//! └────────────────────────────────────────┘
//! ```
//! No header, no footer, no persisted free map. A slot is free when it holds
//! the vacancy marker (all 0xFF) or is cut short at the end of the file.

mod free_list;
mod index;
mod slot_file;

pub use free_list::FreeList;
pub use index::IndexSet;
pub use slot_file::SlotFile;
