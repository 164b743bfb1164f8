use crate::models::{ScheduleTable, Term, TermTable};

/// Concatenates one term's discipline tables.
///
/// Rows keep their fetch order. Columns are the union of every table's
/// columns, in order of first appearance. Returns `None` when no table had any
/// rows, so a term never shows up without data.
pub fn aggregate_term(term: &Term, tables: Vec<ScheduleTable>) -> Option<TermTable> {
    let mut merged = ScheduleTable::default();
    for table in tables.into_iter().filter(|t| !t.is_empty()) {
        for column in table.columns {
            if !merged.columns.contains(&column) {
                merged.columns.push(column);
            }
        }
        merged.rows.extend(table.rows);
    }

    (!merged.is_empty()).then(|| TermTable {
        term: term.clone(),
        table: merged,
    })
}
