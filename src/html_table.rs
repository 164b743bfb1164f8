use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::{scrape_error::ScrapeError, text_manipulators::extract_clean_text};

// Larger spans are treated as markup errors and clamped.
const MAX_SPAN: usize = 1000;

/// A `<table>` read into a header and rows of equal width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HtmlTable {
    pub columns: Vec<String>,
    /// `None` marks an empty cell.
    pub rows: Vec<Vec<Option<String>>>,
}

impl HtmlTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

struct RawCell {
    text: String,
    colspan: usize,
    rowspan: usize,
}

/// Reads the data tables of a document, nested ones included, in document order.
///
/// A `<table>` is only counted when it is visible (no `display: none` on it or
/// an ancestor), carries some text other than bare newlines, and has at least
/// one row with text in it. Leading blank rows are skipped and the first row
/// with text is the header. Spanned cells are copied into every slot they
/// cover and blank rows are dropped.
pub fn parse_tables(html: &str) -> Result<Vec<HtmlTable>, ScrapeError> {
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let hidden = Regex::new(r"display:\s*none")
        .map_err(|e| ScrapeError::parse("hidden-style pattern", e))?;
    let document = Html::parse_document(html);

    let tables = document
        .select(&table_selector)
        .filter(|table| !is_hidden(*table, &hidden) && has_text(*table))
        .filter_map(|table| {
            let raw_rows = own_rows(table, &row_selector)
                .filter(|row| !is_hidden(*row, &hidden))
                .map(|row| raw_cells(row, &hidden))
                .collect::<Vec<_>>();
            build_table(expand_spans(raw_rows))
        })
        .collect();
    Ok(tables)
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::parse(format!("selector '{css}'"), e))
}

/// True when the element or one of its ancestors is styled `display: none`.
fn is_hidden(element: ElementRef, hidden: &Regex) -> bool {
    std::iter::once(element)
        .chain(element.ancestors().filter_map(ElementRef::wrap))
        .any(|el| el.value().attr("style").is_some_and(|style| hidden.is_match(style)))
}

/// Spacer tables (images only, or nothing but line breaks) carry no text.
fn has_text(table: ElementRef) -> bool {
    table.text().any(|text| text.chars().any(|c| c != '\n'))
}

/// Rows whose closest enclosing `<table>` is `table` itself.
fn own_rows<'a>(
    table: ElementRef<'a>,
    row_selector: &'a Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    table.select(row_selector).filter(move |row| {
        row.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|ancestor| ancestor.value().name() == "table")
            .is_some_and(|owner| owner.id() == table.id())
    })
}

fn raw_cells(row: ElementRef, hidden: &Regex) -> Vec<RawCell> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| matches!(cell.value().name(), "td" | "th"))
        .filter(|cell| {
            !cell
                .value()
                .attr("style")
                .is_some_and(|style| hidden.is_match(style))
        })
        .map(|cell| RawCell {
            text: extract_clean_text(cell),
            colspan: span_attr(cell, "colspan"),
            rowspan: span_attr(cell, "rowspan"),
        })
        .collect()
}

fn span_attr(cell: ElementRef, name: &str) -> usize {
    cell.value()
        .attr(name)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|&span| span > 0)
        .unwrap_or(1)
        .min(MAX_SPAN)
}

/// Lays cells out on a grid, repeating colspan/rowspan cells into each slot.
fn expand_spans(raw_rows: Vec<Vec<RawCell>>) -> Vec<Vec<String>> {
    // column -> (rows still covered, text)
    let mut carried: BTreeMap<usize, (usize, String)> = BTreeMap::new();
    let mut grid = Vec::with_capacity(raw_rows.len());

    for raw_row in raw_rows {
        let mut row: Vec<String> = Vec::new();
        let mut cells = raw_row.into_iter();
        loop {
            let col = row.len();
            if take_carried(&mut carried, col, &mut row) {
                continue;
            }
            let Some(cell) = cells.next() else { break };
            for offset in 0..cell.colspan {
                if cell.rowspan > 1 {
                    carried.insert(col + offset, (cell.rowspan - 1, cell.text.clone()));
                }
                row.push(cell.text.clone());
            }
        }

        // Spans from earlier rows that sit past this row's last cell.
        let trailing: Vec<usize> = carried.range(row.len()..).map(|(col, _)| *col).collect();
        for col in trailing {
            row.resize(col, String::new());
            take_carried(&mut carried, col, &mut row);
        }

        grid.push(row);
    }
    grid
}

fn take_carried(
    carried: &mut BTreeMap<usize, (usize, String)>,
    col: usize,
    row: &mut Vec<String>,
) -> bool {
    let Some((remaining, text)) = carried.get_mut(&col) else {
        return false;
    };
    row.push(text.clone());
    *remaining -= 1;
    if *remaining == 0 {
        carried.remove(&col);
    }
    true
}

/// `None` when no row has any text; such tables hold no data.
fn build_table(grid: Vec<Vec<String>>) -> Option<HtmlTable> {
    let mut rows_with_text = grid
        .into_iter()
        .filter(|row| row.iter().any(|cell| !cell.is_empty()));
    let header = rows_with_text.next()?;
    let body: Vec<Vec<String>> = rows_with_text.collect();
    let width = body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let columns = column_names(header, width);
    let rows = body
        .into_iter()
        .map(|row| {
            let mut cells: Vec<Option<String>> = row
                .into_iter()
                .map(|cell| (!cell.is_empty()).then_some(cell))
                .collect();
            cells.resize(width, None);
            cells
        })
        .collect();

    Some(HtmlTable { columns, rows })
}

/// Blank names become `Unnamed: <i>`; repeats get `.1`, `.2`, ... suffixes.
fn column_names(header: Vec<String>, width: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(width);
    for i in 0..width {
        let base = match header.get(i) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("Unnamed: {i}"),
        };
        let mut name = base.clone();
        while seen.contains_key(&name) {
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            name = format!("{base}.{count}");
        }
        seen.insert(name.clone(), 0);
        names.push(name);
    }
    names
}
