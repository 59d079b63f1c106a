//! Exchange Module
//!
//! Adapters that move catalog contents in and out of external formats.
//! Imports go through `Catalog::import`, exports through `Catalog::export`.

mod json;
mod text;

pub use json::{export_json_file, import_json_file, read_json, write_json};
pub use text::{export_text_file, import_text_file, read_text, write_text, TEXT_HEADER};
