//! Pipe-delimited text format
//!
//! ```text
//! ID|Название|Автор|Год|Тираж
//! 1|Война и мир|Толстой|1869|5
//! 2|Идиот|Достоевский|1869|3
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use crate::engine::Catalog;
use crate::error::{Result, ShelfError};
use crate::record::BookView;

/// Header line written on export and skipped on import
pub const TEXT_HEADER: &str = "ID|Название|Автор|Год|Тираж";

const DELIMITER: char = '|';
const FIELD_COUNT: usize = 5;

/// Write the header and one line per view
pub fn write_text<W: Write>(writer: &mut W, views: &[BookView]) -> Result<()> {
    writeln!(writer, "{}", TEXT_HEADER)?;
    for view in views {
        writeln!(
            writer,
            "{}|{}|{}|{}|{}",
            view.id, view.title, view.author, view.year, view.copies
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse every record line, pairing each view with its 1-based line number
///
/// Blank lines and the header are skipped. The first malformed line aborts
/// parsing with `MalformedInput`.
pub fn read_text<R: BufRead>(reader: R) -> Result<Vec<(usize, BookView)>> {
    let mut parsed = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_number = i + 1;
        let line = line.map_err(|e| match e.kind() {
            ErrorKind::InvalidData => malformed(line_number, "line is not valid UTF-8".to_string()),
            _ => ShelfError::Io(e),
        })?;
        let line = line.trim();

        if line.is_empty() || line == TEXT_HEADER {
            continue;
        }

        parsed.push((line_number, parse_line(line, line_number)?));
    }

    Ok(parsed)
}

/// Export every record of the catalog to a text file
pub fn export_text_file(catalog: &mut Catalog, path: &Path) -> Result<usize> {
    let views = catalog.export()?;
    let mut writer = BufWriter::new(File::create(path)?);
    write_text(&mut writer, &views)?;

    tracing::debug!("Exported {} books to {}", views.len(), path.display());
    Ok(views.len())
}

/// Import a text file into the catalog, adding new ids and updating existing
///
/// The whole file is parsed before anything is applied, so a malformed line
/// fails with `Import { imported: 0, .. }`.
pub fn import_text_file(catalog: &mut Catalog, path: &Path) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);

    let entries = read_text(reader).map_err(|e| match e {
        ShelfError::MalformedInput { line, .. } => ShelfError::Import {
            line,
            imported: 0,
            source: Box::new(e),
        },
        other => other,
    })?;

    catalog.import_numbered(entries)
}

fn parse_line(line: &str, line_number: usize) -> Result<BookView> {
    let parts: Vec<&str> = line.split(DELIMITER).collect();
    if parts.len() != FIELD_COUNT {
        return Err(malformed(
            line_number,
            format!("expected {} fields, found {}", FIELD_COUNT, parts.len()),
        ));
    }

    Ok(BookView {
        id: parse_number(parts[0], "id", line_number)?,
        title: parts[1].to_string(),
        author: parts[2].to_string(),
        year: parse_number(parts[3], "year", line_number)?,
        copies: parse_number(parts[4], "copies", line_number)?,
    })
}

fn parse_number(raw: &str, name: &str, line_number: usize) -> Result<i32> {
    raw.trim()
        .parse()
        .map_err(|_| malformed(line_number, format!("invalid {} '{}'", name, raw)))
}

fn malformed(line: usize, reason: String) -> ShelfError {
    ShelfError::MalformedInput { line, reason }
}
