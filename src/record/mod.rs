//! Record Module
//!
//! The two shapes of a book and the conversion between them.
//!
//! ## Slot Layout (152 bytes, little-endian)
//! ```text
//! ┌──────────┬──────────────────┬────────────────┬──────────┬────────────┐
//! │ Id (4)   │ Title (100)      │ Author (40)    │ Year (4) │ Copies (4) │
//! │ i32      │ UTF-8, NUL-pad   │ UTF-8, NUL-pad │ i32      │ i32        │
//! └──────────┴──────────────────┴────────────────┴──────────┴────────────┘
//!  0          4                  104              144        148       152
//! ```
//!
//! A `BookView` is lossy when pushed through a `BookRecord`: text longer than
//! its field is cut at the last whole character that fits, and invalid bytes
//! read back from disk become `?`.

mod codec;
mod view;

pub use codec::{decode, decode_text, encode, encode_text, is_vacant, VACANT_SLOT};
pub use view::{BookRecord, BookView};

// =============================================================================
// Layout Constants
// =============================================================================

/// Total size of one slot on disk
pub const RECORD_SIZE: usize = 152;

/// Width of the title field
pub const TITLE_WIDTH: usize = 100;

/// Width of the author field
pub const AUTHOR_WIDTH: usize = 40;

/// Character substituted for every byte that is not part of valid UTF-8
pub const PLACEHOLDER: char = '?';
