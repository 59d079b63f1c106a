//! Record codec
//!
//! Encoding and decoding between `BookRecord` and its 152-byte slot.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::view::BookRecord;
use super::{AUTHOR_WIDTH, PLACEHOLDER, RECORD_SIZE, TITLE_WIDTH};

/// Fill byte of a vacated slot.
///
/// 0xFF never appears in UTF-8, so no encoded title can start with it.
const VACANT_BYTE: u8 = 0xFF;

/// Bytes written over a slot when its record is deleted
pub const VACANT_SLOT: [u8; RECORD_SIZE] = [VACANT_BYTE; RECORD_SIZE];

// =============================================================================
// Slot Encoding/Decoding
// =============================================================================

/// Encode a record into its slot bytes
///
/// Format: id (4) + title (100) + author (40) + year (4) + copies (4)
pub fn encode(record: &BookRecord) -> Bytes {
    let mut buf = BytesMut::with_capacity(RECORD_SIZE);
    buf.put_i32_le(record.id);
    buf.put_slice(&record.title);
    buf.put_slice(&record.author);
    buf.put_i32_le(record.year);
    buf.put_i32_le(record.copies);

    debug_assert_eq!(buf.len(), RECORD_SIZE);
    buf.freeze()
}

/// Decode a record from slot bytes
///
/// Bytes past the first `RECORD_SIZE` are ignored.
///
/// # Panics
///
/// Panics if `block` is shorter than `RECORD_SIZE`. Slot reads never hand
/// short buffers here; a short block is a caller bug, not a disk condition.
pub fn decode(mut block: &[u8]) -> BookRecord {
    assert!(
        block.len() >= RECORD_SIZE,
        "record block too short: {} bytes, need {}",
        block.len(),
        RECORD_SIZE
    );

    let id = block.get_i32_le();

    let mut title = [0u8; TITLE_WIDTH];
    block.copy_to_slice(&mut title);

    let mut author = [0u8; AUTHOR_WIDTH];
    block.copy_to_slice(&mut author);

    let year = block.get_i32_le();
    let copies = block.get_i32_le();

    BookRecord {
        id,
        title,
        author,
        year,
        copies,
    }
}

/// True if the slot holds the vacancy marker rather than a record
pub fn is_vacant(block: &[u8]) -> bool {
    block.len() >= RECORD_SIZE && block[..RECORD_SIZE].iter().all(|&b| b == VACANT_BYTE)
}

// =============================================================================
// Text Fields
// =============================================================================

/// Copy `text` into a fixed-width field, NUL-padding the remainder.
///
/// Text longer than the field is cut at the last character boundary that
/// fits, so the stored bytes are always valid UTF-8.
pub fn encode_text(text: &str, field: &mut [u8]) {
    let mut end = text.len().min(field.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    field.fill(0);
    field[..end].copy_from_slice(&text.as_bytes()[..end]);
}

/// Read a fixed-width text field.
///
/// The text ends at the first NUL, or spans the whole field if there is none.
/// Decoding is best-effort and intentionally lossy: every byte that is not
/// part of a valid UTF-8 sequence becomes `PLACEHOLDER`, one byte at a time,
/// while valid runs are copied verbatim.
pub fn decode_text(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    let mut rest = &field[..end];
    let mut out = String::with_capacity(rest.len());

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let good = e.valid_up_to();
                if let Ok(valid) = std::str::from_utf8(&rest[..good]) {
                    out.push_str(valid);
                }
                out.push(PLACEHOLDER);
                rest = &rest[good + 1..];
            }
        }
    }
}
