//! JSON array format
//!
//! ```json
//! [
//!   { "id": 1, "title": "Война и мир", "author": "Толстой", "year": 1869, "copies": 5 }
//! ]
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::engine::Catalog;
use crate::error::{Result, ShelfError};
use crate::record::BookView;

/// Write every view as a pretty-printed JSON array
pub fn write_json<W: Write>(writer: &mut W, views: &[BookView]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, views).map_err(std::io::Error::from)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Parse a JSON array of books
///
/// Syntax and type errors are reported as `MalformedInput` carrying the
/// line the parser stopped on.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<BookView>> {
    serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            ShelfError::Io(e.into())
        } else {
            ShelfError::MalformedInput {
                line: e.line(),
                reason: e.to_string(),
            }
        }
    })
}

/// Export every record of the catalog to a JSON file
pub fn export_json_file(catalog: &mut Catalog, path: &Path) -> Result<usize> {
    let views = catalog.export()?;
    let mut writer = BufWriter::new(File::create(path)?);
    write_json(&mut writer, &views)?;

    tracing::debug!("Exported {} books to {}", views.len(), path.display());
    Ok(views.len())
}

/// Import a JSON file into the catalog, adding new ids and updating existing
///
/// A document that fails to parse applies nothing. Failures while applying
/// report the 1-based position of the book in the array as `line`.
pub fn import_json_file(catalog: &mut Catalog, path: &Path) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);

    let views = read_json(reader).map_err(|e| match e {
        ShelfError::MalformedInput { line, .. } => ShelfError::Import {
            line,
            imported: 0,
            source: Box::new(e),
        },
        other => other,
    })?;

    catalog.import(views)
}
