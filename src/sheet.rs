//! Decoding of uploaded spreadsheet payloads.
//!
//! Only the first worksheet is read. Row 0 is the header row; everything below
//! is data. Blank header cells are dropped from the header list, but each
//! retained header keeps its original column index so value lookup never
//! depends on the position of the header in the filtered list.

use crate::errors::ParseError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;
use tracing::debug;

/// A retained header cell and the column it came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Header {
    pub index: usize,
    pub name: String,
}

/// Decoded first worksheet: filtered headers plus the raw data rows.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub headers: Vec<Header>,
    pub rows: Vec<Vec<Data>>,
}

fn header_name(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        other => other.to_string(),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Decode a binary spreadsheet payload. Pure transform: no state is touched.
pub fn parse(payload: &[u8]) -> Result<Sheet, ParseError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(payload))?;
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ParseError::NoSheet)?;
    let range = workbook.worksheet_range(&name)?;
    let mut rows = range.rows().map(<[Data]>::to_vec);
    let header_row = rows.next().ok_or(ParseError::TooFewRows)?;
    let headers = header_row
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| header_name(cell).map(|name| Header { index, name }))
        .collect::<Vec<_>>();
    let rows = rows.collect::<Vec<_>>();
    if rows.is_empty() {
        return Err(ParseError::TooFewRows);
    }
    debug!(
        sheet = %name,
        headers = headers.len(),
        rows = rows.len(),
        "decoded worksheet",
    );
    Ok(Sheet { headers, rows })
}

#[cfg(test)]
pub(crate) fn workbook_bytes(cells: &[&[&str]]) -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (r, row) in cells.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet.write(r as u32, c as u16, *value).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}
