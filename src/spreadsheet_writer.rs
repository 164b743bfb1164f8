use std::path::Path;

use log::warn;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet};

use crate::{
    models::{ID_COLUMN, TERM_COLUMN, TermTable},
    scrape_error::ExportError,
};

/// Excel refuses longer sheet names.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Derives a legal sheet name from a term value.
///
/// `position` is only used when nothing printable is left of the value.
pub fn sheet_name_for(term_value: &str, position: usize) -> String {
    let cleaned: String = term_value
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    let truncated: String = cleaned.chars().take(MAX_SHEET_NAME_LEN).collect();
    let mut name = truncated.trim_matches('\'').to_string();
    if name.eq_ignore_ascii_case("history") {
        name.push('_');
    }
    if name.trim().is_empty() {
        name = format!("Sheet{}", position + 1);
    }
    name
}

/// Assigns each term table its sheet.
///
/// When two terms end up with the same name, the later table takes over the
/// earlier one's sheet.
pub fn plan_sheets(tables: &[TermTable]) -> Vec<(String, &TermTable)> {
    let mut sheets: Vec<(String, &TermTable)> = Vec::with_capacity(tables.len());
    for (position, table) in tables.iter().enumerate() {
        let name = sheet_name_for(&table.term.value, position);
        // Excel compares sheet names case-insensitively.
        match sheets
            .iter_mut()
            .find(|(existing, _)| existing.to_lowercase() == name.to_lowercase())
        {
            Some(slot) => {
                warn!(
                    "Sheet name '{}' is shared by terms '{}' and '{}'; keeping the latter",
                    name, slot.1.term.value, table.term.value
                );
                slot.1 = table;
            }
            None => sheets.push((name, table)),
        }
    }
    sheets
}

pub fn build_workbook(tables: &[TermTable]) -> Result<Workbook, ExportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);

    for (name, table) in plan_sheets(tables) {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&name)?;
        write_sheet(worksheet, &name, table, &header_format)?;
    }
    Ok(workbook)
}

pub fn write_workbook(tables: &[TermTable], path: &Path) -> Result<(), ExportError> {
    let mut workbook = build_workbook(tables)?;
    workbook.save(path)?;
    Ok(())
}

fn write_sheet(
    worksheet: &mut Worksheet,
    name: &str,
    term_table: &TermTable,
    header_format: &Format,
) -> Result<(), ExportError> {
    let table = &term_table.table;
    let header = table.header();
    let numeric: Vec<bool> = header
        .iter()
        .map(|column| match *column {
            ID_COLUMN => true,
            TERM_COLUMN => false,
            _ => is_numeric_column(table.rows.iter().filter_map(|row| row.cells.get(*column))),
        })
        .collect();

    for (col, column) in header.iter().enumerate() {
        worksheet.write_string_with_format(0, col_index(name, col)?, *column, header_format)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let row_num = row_index(name, i + 1)?;
        for (col, column) in header.iter().enumerate() {
            let Some(value) = row.get(column) else { continue };
            let col_num = col_index(name, col)?;
            match numeric[col].then(|| parse_number(&value)).flatten() {
                Some(number) => worksheet.write_number(row_num, col_num, number)?,
                None => worksheet.write_string(row_num, col_num, value)?,
            };
        }
    }
    Ok(())
}

/// A column is numeric when it has values and every one of them is a number.
fn is_numeric_column<'a>(mut values: impl Iterator<Item = &'a String>) -> bool {
    let mut any = false;
    let all = values.all(|value| {
        any = true;
        parse_number(value).is_some()
    });
    any && all
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn row_index(sheet: &str, row: usize) -> Result<u32, ExportError> {
    u32::try_from(row)
        .ok()
        .filter(|&r| r < 1_048_576)
        .ok_or_else(|| ExportError::TooLarge {
            sheet: sheet.to_string(),
            what: "rows",
        })
}

fn col_index(sheet: &str, col: usize) -> Result<u16, ExportError> {
    u16::try_from(col)
        .ok()
        .filter(|&c| c < 16_384)
        .ok_or_else(|| ExportError::TooLarge {
            sheet: sheet.to_string(),
            what: "columns",
        })
}
