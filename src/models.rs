use std::collections::HashMap;

/// Name of the synthetic identifier column appended to every schedule table.
pub const ID_COLUMN: &str = "ID";
/// Name of the synthetic column holding the owning term's value.
pub const TERM_COLUMN: &str = "Term";

/// One `<option>` of a `<select>` control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub label: String,
    pub value: String,
}

impl From<DropdownOption> for Term {
    fn from(option: DropdownOption) -> Self {
        Term {
            label: option.label,
            value: option.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discipline {
    pub label: String,
    pub value: String,
}

impl From<DropdownOption> for Discipline {
    fn from(option: DropdownOption) -> Self {
        Discipline {
            label: option.label,
            value: option.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRow {
    pub id: u64,
    pub term: String,
    pub cells: HashMap<String, String>,
}

impl ScheduleRow {
    /// Looks a cell up by header name, synthetic columns included.
    pub fn get(&self, column: &str) -> Option<String> {
        match column {
            ID_COLUMN => Some(self.id.to_string()),
            TERM_COLUMN => Some(self.term.clone()),
            _ => self.cells.get(column).cloned(),
        }
    }
}

/// Rows scraped for one discipline, or concatenated for a whole term.
///
/// `columns` holds the source columns in page order. [`ScheduleTable::header`]
/// adds the synthetic `ID` and `Term` columns at the end unless the page
/// already had columns of those names, which then keep their place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleTable {
    pub columns: Vec<String>,
    pub rows: Vec<ScheduleRow>,
}

impl ScheduleTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn header(&self) -> Vec<&str> {
        let mut header: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        for synthetic in [ID_COLUMN, TERM_COLUMN] {
            if !header.contains(&synthetic) {
                header.push(synthetic);
            }
        }
        header
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermTable {
    pub term: Term,
    pub table: ScheduleTable,
}

/// Hands out row identifiers. Starts at 1 and only ever moves forward.
///
/// Owned by whoever drives the scrape and lent out by `&mut`, so two tables can
/// never receive overlapping ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCounter {
    next: u64,
}

impl Default for IdCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl IdCounter {
    pub fn new() -> Self {
        IdCounter { next: 1 }
    }

    /// Reserves `count` consecutive ids and returns the first one.
    pub fn allocate(&mut self, count: usize) -> u64 {
        let first = self.next;
        self.next += count as u64;
        first
    }

    /// The id the next allocated row will get.
    pub fn peek(&self) -> u64 {
        self.next
    }
}
