use std::{fs::File, io::BufWriter, path::Path};

use serde_json::{Map, Value};

use crate::{
    models::{ID_COLUMN, TERM_COLUMN, TermTable},
    scrape_error::ExportError,
};

/// Renders the term tables as `{ "<term value>": [ {column: cell, ...}, ... ] }`.
///
/// Missing cells are left out of their row object; `ID` is a number.
pub fn term_tables_to_json(tables: &[TermTable]) -> Value {
    let mut terms = Map::new();
    for term_table in tables {
        let rows = term_table
            .table
            .rows
            .iter()
            .map(|row| {
                let mut object = Map::new();
                for column in &term_table.table.columns {
                    if let Some(cell) = row.cells.get(column) {
                        object.insert(column.clone(), Value::String(cell.clone()));
                    }
                }
                object.insert(ID_COLUMN.to_string(), Value::from(row.id));
                object.insert(TERM_COLUMN.to_string(), Value::String(row.term.clone()));
                Value::Object(object)
            })
            .collect();
        terms.insert(term_table.term.value.clone(), Value::Array(rows));
    }
    Value::Object(terms)
}

pub fn write_json(tables: &[TermTable], path: &Path) -> Result<(), ExportError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &term_tables_to_json(tables))?;
    Ok(())
}
