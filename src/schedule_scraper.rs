use std::collections::HashMap;

use crate::{
    discipline_scraper::DISCIPLINE_FIELD,
    html_table::{HtmlTable, parse_tables},
    models::{Discipline, ID_COLUMN, IdCounter, ScheduleRow, ScheduleTable, TERM_COLUMN, Term},
    scrape_error::ScrapeError,
    scraping_context::ScrapingContext,
    term_scraper::TERM_FIELD,
};

/// The schedule listing is the third `<table>` on the results page; the two
/// before it are page chrome.
pub const SCHEDULE_TABLE_INDEX: usize = 2;

/// Fetches the schedule for one (term, discipline) pair and numbers its rows
/// from `ids`.
pub async fn fetch_schedule(
    ctx: &ScrapingContext,
    term: &Term,
    discipline: &Discipline,
    ids: &mut IdCounter,
) -> Result<ScheduleTable, ScrapeError> {
    let config = &ctx.scraping_config;
    let url = config.url_for(&config.schedule_path);
    let form = [
        (TERM_FIELD, term.value.as_str()),
        (DISCIPLINE_FIELD, discipline.value.as_str()),
    ];
    let html = ctx.request_client.post_form_body(&url, &form).await?;
    parse_schedule_page(&html, &term.value, ids)
}

/// Reads a schedule results page. `ids` only advances when rows are returned.
pub fn parse_schedule_page(
    html: &str,
    term_value: &str,
    ids: &mut IdCounter,
) -> Result<ScheduleTable, ScrapeError> {
    let table = select_schedule_table(parse_tables(html)?)?;
    Ok(tag_rows(table, term_value, ids))
}

/// Picks the schedule listing out of every table on the page.
///
/// This is the only place that knows where the listing sits in the markup.
pub fn select_schedule_table(tables: Vec<HtmlTable>) -> Result<HtmlTable, ScrapeError> {
    let found = tables.len();
    tables
        .into_iter()
        .nth(SCHEDULE_TABLE_INDEX)
        .ok_or(ScrapeError::ScheduleTableNotFound {
            wanted: SCHEDULE_TABLE_INDEX,
            found,
        })
}

/// Turns parsed rows into schedule rows carrying an id and the term value.
///
/// A source column named like a synthetic one keeps its place in the header
/// but its cells are replaced by the synthetic values.
pub fn tag_rows(table: HtmlTable, term_value: &str, ids: &mut IdCounter) -> ScheduleTable {
    if table.is_empty() {
        return ScheduleTable::default();
    }

    let HtmlTable { columns, rows } = table;
    let first_id = ids.allocate(rows.len());
    let rows = rows
        .into_iter()
        .zip(first_id..)
        .map(|(cells, id)| ScheduleRow {
            id,
            term: term_value.to_string(),
            cells: columns
                .iter()
                .zip(cells)
                .filter(|(column, _)| !is_synthetic(column))
                .filter_map(|(column, cell)| cell.map(|text| (column.clone(), text)))
                .collect::<HashMap<_, _>>(),
        })
        .collect();
    ScheduleTable { columns, rows }
}

fn is_synthetic(column: &str) -> bool {
    column == ID_COLUMN || column == TERM_COLUMN
}
